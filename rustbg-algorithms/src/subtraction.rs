//! Mean background subtraction over discriminated shoebox pixels.
//!
//! The background is modelled as flat across a shoebox: the discriminator
//! flags background pixels, their unweighted mean becomes the background
//! value, and that value is written to every pixel of the reflection's
//! background array.

use crate::batch::process_batch;
use crate::poisson::PoissonDiscriminator;
use crate::stats::mean;
use rustbg_core::discriminator::check_mask_len;
use rustbg_core::error::{Error, Result};
use rustbg_core::{BackgroundConfig, MaskCode, PixelDiscriminator, Reflection};

/// Flat background estimator parameterised by a pixel discriminator.
#[derive(Clone, Debug)]
pub struct BackgroundSubtractor<D = PoissonDiscriminator> {
    discriminator: D,
}

impl BackgroundSubtractor<PoissonDiscriminator> {
    /// Create with a Poisson discriminator.
    ///
    /// # Errors
    /// Returns a configuration error for invalid parameters.
    pub fn new(min_data: usize, n_sigma: f64) -> Result<Self> {
        Ok(Self::with_discriminator(PoissonDiscriminator::new(
            min_data, n_sigma,
        )?))
    }

    /// Create a Poisson-based subtractor from a configuration.
    ///
    /// # Errors
    /// Returns a configuration error if the configuration is invalid.
    pub fn from_config(config: &BackgroundConfig) -> Result<Self> {
        Self::new(config.min_data, config.n_sigma)
    }
}

impl<D: PixelDiscriminator> BackgroundSubtractor<D> {
    /// Create with any discrimination strategy.
    pub fn with_discriminator(discriminator: D) -> Self {
        Self { discriminator }
    }

    /// Returns the discriminator.
    pub fn discriminator(&self) -> &D {
        &self.discriminator
    }

    /// Classifies the shoebox pixels and returns the mean of the background.
    ///
    /// The mask is updated in place by the discriminator.
    ///
    /// # Errors
    /// - [`Error::LengthMismatch`] if mask and shoebox lengths differ
    /// - [`Error::StatisticalFailure`] from the discriminator
    /// - [`Error::EmptyBackgroundSet`] if no pixel is flagged as background
    pub fn estimate(&self, shoebox: &[f64], mask: &mut [i32]) -> Result<f64> {
        check_mask_len(shoebox, mask)?;
        self.discriminator.discriminate(shoebox, mask)?;

        let pixels: Vec<f64> = shoebox
            .iter()
            .zip(mask.iter())
            .filter(|(_, &code)| MaskCode::is_background(code))
            .map(|(&value, _)| value)
            .collect();

        mean(&pixels).ok_or(Error::EmptyBackgroundSet)
    }

    /// Estimates the background of one reflection and fills its background array.
    ///
    /// The background array is only written once the value is known; on
    /// error it is left unchanged.
    ///
    /// # Errors
    /// Propagates every error from [`Self::estimate`], plus a
    /// [`Error::LengthMismatch`] if the background array has the wrong length.
    pub fn process_reflection(&self, reflection: &mut Reflection) -> Result<()> {
        reflection.check_shape()?;
        let value = self.estimate(&reflection.shoebox, &mut reflection.mask)?;
        reflection.background.fill(value);
        Ok(())
    }

    /// Processes every unprocessed reflection on the rayon global pool.
    ///
    /// Failures are recorded by clearing `valid` on the failing reflection;
    /// no error is returned.
    pub fn run_batch(&self, reflections: &mut [Reflection]) {
        process_batch(self, reflections);
    }
}
