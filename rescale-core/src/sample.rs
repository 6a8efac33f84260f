//! Pixel sample abstraction.
//!
//! The resampling pipeline runs identically over 8-bit and 16-bit samples;
//! the only depth-specific step is the final clip back to the valid range.
//! `Sample` captures that single seam so every filter exists once instead of
//! in parallel 8-bit/high-bit-depth copies.

/// A pixel sample (8 or 16 bits of storage).
pub trait Sample: Copy + Default + PartialEq + Send + Sync + std::fmt::Debug + 'static {
    /// Widen to a signed accumulator.
    fn widen(self) -> i32;

    /// Narrow a filtered accumulator back to the sample range for the
    /// active bit depth: `[0, (1 << bit_depth) - 1]`.
    fn clip(value: i32, bit_depth: u32) -> Self;
}

impl Sample for u8 {
    #[inline]
    fn widen(self) -> i32 {
        self as i32
    }

    #[inline]
    fn clip(value: i32, _bit_depth: u32) -> Self {
        value.clamp(0, u8::MAX as i32) as u8
    }
}

impl Sample for u16 {
    #[inline]
    fn widen(self) -> i32 {
        self as i32
    }

    #[inline]
    fn clip(value: i32, bit_depth: u32) -> Self {
        let max = (1i32 << bit_depth) - 1;
        value.clamp(0, max) as u16
    }
}
