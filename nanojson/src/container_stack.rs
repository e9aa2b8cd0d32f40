// SPDX-License-Identifier: Apache-2.0

use crate::bitstack::{BitBucket, BitStackConfig, DepthCounter};

/// Kind of the innermost open container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    /// Nothing is open: the document root.
    TopLevel,
    /// Inside `{ ... }`.
    Object,
    /// Inside `[ ... ]`.
    Array,
}

/// Pushing past the configured capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Overflow;

/// Nesting path from the root to the innermost open container.
///
/// Level `n` holds the kind of the `n`th open container; the root is implied
/// at depth 0 and never stored.
pub(crate) struct ContainerStack<S: BitStackConfig> {
    depth: S::Counter,
    kinds: S::Bucket,
}

impl<S: BitStackConfig> ContainerStack<S> {
    pub fn new() -> Self {
        Self {
            depth: S::Counter::default(),
            kinds: S::Bucket::default(),
        }
    }

    pub fn depth(&self) -> usize {
        self.depth.as_usize()
    }

    pub fn current(&self) -> Container {
        match self.depth.as_usize() {
            0 => Container::TopLevel,
            depth if self.kinds.get(depth - 1) => Container::Object,
            _ => Container::Array,
        }
    }

    /// Opens a container. `TopLevel` is not a pushable kind and is treated as an array.
    pub fn push(&mut self, kind: Container) -> Result<(), Overflow> {
        let level = self.depth.as_usize();
        if level >= S::capacity() {
            return Err(Overflow);
        }
        let depth = self.depth.increment().ok_or(Overflow)?;
        self.kinds.set(level, kind == Container::Object);
        self.depth = depth;
        Ok(())
    }

    /// Closes the innermost container, returning the enclosing kind.
    /// `None` when nothing is open.
    pub fn pop(&mut self) -> Option<Container> {
        self.depth = self.depth.decrement()?;
        Some(self.current())
    }
}

impl<S: BitStackConfig> core::fmt::Debug for ContainerStack<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:?}@{}", self.current(), self.depth())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitstack::{BitStackStruct, DefaultConfig};
    use test_log::test;

    #[test]
    fn test_push_pop_restores_enclosing_kind() {
        let mut stack = ContainerStack::<DefaultConfig>::new();
        assert_eq!(stack.current(), Container::TopLevel);

        stack.push(Container::Object).unwrap();
        stack.push(Container::Array).unwrap();
        stack.push(Container::Object).unwrap();
        assert_eq!(stack.depth(), 3);
        assert_eq!(stack.current(), Container::Object);

        assert_eq!(stack.pop(), Some(Container::Array));
        assert_eq!(stack.pop(), Some(Container::Object));
        assert_eq!(stack.pop(), Some(Container::TopLevel));
        assert_eq!(stack.pop(), None);
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn test_overflow_at_capacity() {
        let mut stack = ContainerStack::<BitStackStruct<u8, u8>>::new();
        for _ in 0..8 {
            stack.push(Container::Array).unwrap();
        }
        assert_eq!(stack.push(Container::Object), Err(Overflow));
        // The failed push left the stack untouched
        assert_eq!(stack.depth(), 8);
        assert_eq!(stack.current(), Container::Array);
    }

    #[test]
    fn test_reused_level_is_overwritten() {
        let mut stack = ContainerStack::<BitStackStruct<u32, u8>>::new();
        stack.push(Container::Object).unwrap();
        stack.pop();
        stack.push(Container::Array).unwrap();
        assert_eq!(stack.current(), Container::Array);
    }

    #[test]
    fn test_default_config_reaches_4096() {
        let mut stack = ContainerStack::<DefaultConfig>::new();
        for level in 0..4096 {
            let kind = if level % 3 == 0 {
                Container::Object
            } else {
                Container::Array
            };
            stack.push(kind).unwrap();
        }
        assert_eq!(stack.push(Container::Array), Err(Overflow));
        for level in (0..4096).rev() {
            let expected = if level % 3 == 0 {
                Container::Object
            } else {
                Container::Array
            };
            assert_eq!(stack.current(), expected, "level {level}");
            stack.pop();
        }
        assert_eq!(stack.current(), Container::TopLevel);
    }
}
