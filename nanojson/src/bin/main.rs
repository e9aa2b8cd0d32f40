// SPDX-License-Identifier: Apache-2.0

//! Parses a JSON file in chunks and prints its events.
//!
//! Set `RUST_LOG=trace` to watch the lexer and grammar at work.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use nanojson::{ChunkReader, Context, EventKind, EventSink, FeedError, Handler, StreamFeeder};

#[derive(Parser, Debug)]
#[command(name = "nanojson")]
#[command(about = "Stream a JSON document through nanojson and print its events", long_about = None)]
struct Cli {
    /// JSON file to parse
    path: PathBuf,

    /// Bytes handed to the parser per read, simulating packet boundaries
    #[arg(short, long, default_value_t = 64)]
    chunk_size: usize,

    /// Scratch buffer size; must hold the largest token
    #[arg(short, long, default_value_t = 4096)]
    scratch_size: usize,

    /// Only validate, print nothing on success
    #[arg(short, long)]
    quiet: bool,
}

struct Printer {
    quiet: bool,
    events: usize,
}

impl EventSink for Printer {
    fn handle_event(&mut self, context: &Context<'_>, event: EventKind) {
        self.events += 1;
        if self.quiet {
            return;
        }
        let indent = context.depth().saturating_sub(match event {
            EventKind::ObjectBegin
            | EventKind::ObjectEnd
            | EventKind::ArrayBegin
            | EventKind::ArrayEnd => 1,
            _ => 0,
        });
        let text = String::from_utf8_lossy(context.value());
        if event.has_value() {
            println!("{:width$}{:?} {}", "", event, text, width = indent * 2);
        } else {
            println!("{:width$}{:?}", "", event, width = indent * 2);
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let data = match std::fs::read(&cli.path) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Error: unable to read '{}': {}", cli.path.display(), e);
            return ExitCode::FAILURE;
        }
    };
    log::debug!("{} bytes from {}", data.len(), cli.path.display());

    let mut handler = Handler::new();
    handler.set_event_callback(Printer {
        quiet: cli.quiet,
        events: 0,
    });

    let mut scratch = vec![0u8; cli.scratch_size.max(1)];
    let mut feeder = StreamFeeder::new(ChunkReader::new(&data, cli.chunk_size), &mut scratch);
    let result = feeder.feed(&mut handler);
    let events = handler.event_callback().map_or(0, |printer| printer.events);

    match result {
        Ok(()) => {
            log::info!("{} events", events);
            ExitCode::SUCCESS
        }
        Err(FeedError::Parse(e)) => {
            eprintln!("Error: {} ({})", e, cli.path.display());
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
