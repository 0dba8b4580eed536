//! Shoebox mask bit codes.
//!
//! Each shoebox pixel carries an `i32` bitfield. Only the background bit is
//! interpreted by background estimation; every other bit is preserved.

/// Bit codes stored in a shoebox mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskCode;

impl MaskCode {
    /// Pixel is classified as background.
    pub const BACKGROUND: i32 = 1 << 0;

    /// Returns true if the background bit is set.
    #[inline]
    #[must_use]
    pub fn is_background(code: i32) -> bool {
        code & Self::BACKGROUND != 0
    }

    /// Sets or clears the background bit, leaving other bits untouched.
    #[inline]
    pub fn set_background(code: &mut i32, background: bool) {
        if background {
            *code |= Self::BACKGROUND;
        } else {
            *code &= !Self::BACKGROUND;
        }
    }
}
