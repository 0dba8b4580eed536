//! Pixel discrimination trait.

use crate::error::{Error, Result};

/// Trait for pixel discrimination strategies.
///
/// A discriminator classifies each shoebox pixel as background or signal by
/// setting or clearing [`crate::MaskCode::BACKGROUND`] in the parallel mask.
/// Implementations must leave all other mask bits untouched.
pub trait PixelDiscriminator: Send + Sync {
    /// Classifies the shoebox pixels, updating the mask in place.
    ///
    /// # Errors
    /// Returns [`Error::StatisticalFailure`] if the sample is too degenerate
    /// to classify, or [`Error::LengthMismatch`] if the mask does not match
    /// the shoebox.
    fn discriminate(&self, shoebox: &[f64], mask: &mut [i32]) -> Result<()>;

    /// Returns the name of the discriminator.
    fn name(&self) -> &'static str;
}

/// Checks that the mask is as long as the shoebox.
///
/// # Errors
/// Returns [`Error::LengthMismatch`] on disagreement.
pub fn check_mask_len(shoebox: &[f64], mask: &[i32]) -> Result<()> {
    if shoebox.len() == mask.len() {
        Ok(())
    } else {
        Err(Error::LengthMismatch {
            what: "mask",
            expected: shoebox.len(),
            actual: mask.len(),
        })
    }
}
