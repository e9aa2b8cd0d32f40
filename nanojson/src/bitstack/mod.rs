// SPDX-License-Identifier: Apache-2.0

//! Fixed-capacity storage for the container stack.
//!
//! Every open container costs one bit: `true` for an object, `false` for an
//! array. The depth itself is tracked by the caller with a [`DepthCounter`],
//! so a bucket only has to answer "what kind is open at level `n`".

use core::ops::{BitAnd, BitOr, Not, Shl, Shr};

/// Bit storage addressed by nesting level.
///
/// NOTE: buckets do not track depth. Reading a level that was never written
/// returns whatever the default value holds there (`false`).
pub trait BitBucket: Default {
    /// Number of levels this bucket can hold.
    fn capacity() -> usize;
    /// Stores `bit` at `level`. Levels at or beyond [`BitBucket::capacity`] are ignored.
    fn set(&mut self, level: usize, bit: bool);
    /// Reads the bit at `level`, `false` when out of range.
    fn get(&self, level: usize) -> bool;
}

/// Integer buckets (`u8`, `u32`, `u64`, `u128` ...): one bit per level.
impl<T> BitBucket for T
where
    T: Shl<u8, Output = T>
        + Shr<u8, Output = T>
        + BitAnd<T, Output = T>
        + BitOr<Output = T>
        + Not<Output = T>
        + PartialEq
        + Copy
        + Default
        + From<u8>,
{
    fn capacity() -> usize {
        core::mem::size_of::<T>() * 8
    }

    fn set(&mut self, level: usize, bit: bool) {
        if level >= Self::capacity() {
            return;
        }
        let mask = T::from(1) << level as u8;
        *self = if bit { *self | mask } else { *self & !mask };
    }

    fn get(&self, level: usize) -> bool {
        if level >= Self::capacity() {
            return false;
        }
        ((*self >> level as u8) & T::from(1)) != T::from(0)
    }
}

/// Array-backed bucket for deep documents: `N` words of `T` bits each.
///
/// Use the [`ArrayBitStack`] alias to pair it with a depth counter.
#[derive(Debug, Clone)]
pub struct ArrayBitBucket<const N: usize, T>(pub [T; N]);

impl<const N: usize, T: Default + Copy> Default for ArrayBitBucket<N, T> {
    fn default() -> Self {
        ArrayBitBucket([T::default(); N])
    }
}

impl<const N: usize, T: BitBucket + Copy> BitBucket for ArrayBitBucket<N, T> {
    fn capacity() -> usize {
        N * T::capacity()
    }

    fn set(&mut self, level: usize, bit: bool) {
        let word_bits = T::capacity();
        if let Some(word) = self.0.get_mut(level / word_bits) {
            word.set(level % word_bits, bit);
        }
    }

    fn get(&self, level: usize) -> bool {
        let word_bits = T::capacity();
        self.0
            .get(level / word_bits)
            .is_some_and(|word| word.get(level % word_bits))
    }
}

/// Nesting depth counter.
///
/// Implemented for all unsigned integers; the type's maximum bounds the
/// depth together with the bucket capacity.
pub trait DepthCounter: core::fmt::Debug + Copy + Default {
    /// Largest depth representable by this counter.
    fn max_depth() -> usize;
    /// Current depth as an index.
    fn as_usize(self) -> usize;
    /// Increments, returning `None` on overflow.
    fn increment(self) -> Option<Self>;
    /// Decrements, returning `None` on underflow.
    fn decrement(self) -> Option<Self>;
}

macro_rules! impl_depth_counter {
    ($($t:ty),*) => {
        $(
            impl DepthCounter for $t {
                #[inline]
                fn max_depth() -> usize { <$t>::MAX as usize }

                #[inline]
                fn as_usize(self) -> usize { self as usize }

                #[inline]
                fn increment(self) -> Option<Self> { self.checked_add(1) }

                #[inline]
                fn decrement(self) -> Option<Self> { self.checked_sub(1) }
            }
        )*
    };
}

impl_depth_counter!(u8, u16, u32, u64, usize);

/// Type-level configuration of the container stack: bit storage plus depth counter.
pub trait BitStackConfig {
    /// Storage for container kinds, one bit per level.
    type Bucket: BitBucket;
    /// Depth counter.
    type Counter: DepthCounter;

    /// Maximum nesting depth accepted before `TooDeeplyNested` is reported.
    fn capacity() -> usize {
        Self::Bucket::capacity().min(Self::Counter::max_depth())
    }
}

/// Default configuration: 4096 nesting levels (`128 x u32` bits, `u16` counter).
#[derive(Debug)]
pub struct DefaultConfig;

impl BitStackConfig for DefaultConfig {
    type Bucket = ArrayBitBucket<128, u32>;
    type Counter = u16;
}

/// Custom configuration from a bucket type `B` and a counter type `D`.
///
/// `BitStackStruct<u32, u8>` tracks up to 32 levels in a single word.
#[derive(Debug)]
pub struct BitStackStruct<B, D> {
    _phantom: core::marker::PhantomData<(B, D)>,
}

impl<B: BitBucket, D: DepthCounter> BitStackConfig for BitStackStruct<B, D> {
    type Bucket = B;
    type Counter = D;
}

/// Array-backed configuration.
///
/// ```rust
/// use nanojson::{ArrayBitStack, BitStackConfig, Handler};
///
/// // 10 x u32 bits: up to 320 levels of nesting.
/// type Deep = ArrayBitStack<10, u32, u16>;
/// assert_eq!(Deep::capacity(), 320);
/// let _handler = Handler::<(), Deep>::with_config();
/// ```
pub type ArrayBitStack<const N: usize, T, D> = BitStackStruct<ArrayBitBucket<N, T>, D>;
