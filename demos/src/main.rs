// SPDX-License-Identifier: Apache-2.0

//! Prints a JSON file as an XML outline.

use std::env;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<_> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} file.json", args[0]);
        return ExitCode::FAILURE;
    }
    let path = &args[1];
    let data = match std::fs::read(path) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Error: Unable to read file '{}': {}", path, e);
            return ExitCode::FAILURE;
        }
    };
    log::debug!("rendering {} bytes", data.len());

    match demos::render(&data) {
        Ok(xml) => {
            print!("{}", xml);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: JSON parsing failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
