//! Normal pixel discriminator.
//!
//! Trims the brightest pixels until the maximum of the remaining sample lies
//! within `n_sigma` standard deviations of its mean. Suited to integrating
//! detectors where background noise is approximately Gaussian.

use crate::stats::{trim_brightest, Moments};
use rustbg_core::error::Result;
use rustbg_core::{BackgroundConfig, PixelDiscriminator};

/// Discriminator testing for normally distributed background.
#[derive(Clone, Debug)]
pub struct NormalDiscriminator {
    min_data: usize,
    n_sigma: f64,
}

impl NormalDiscriminator {
    /// Create with the minimum sample size and threshold.
    ///
    /// # Errors
    /// Returns a configuration error for invalid parameters.
    pub fn new(min_data: usize, n_sigma: f64) -> Result<Self> {
        BackgroundConfig::new()
            .with_min_data(min_data)
            .with_n_sigma(n_sigma)
            .validate()?;
        Ok(Self { min_data, n_sigma })
    }

    /// Create from a background configuration.
    ///
    /// # Errors
    /// Returns a configuration error if the configuration is invalid.
    pub fn from_config(config: &BackgroundConfig) -> Result<Self> {
        Self::new(config.min_data, config.n_sigma)
    }

    /// Returns true if `max` is within `n_sigma` standard deviations of the mean.
    #[must_use]
    pub fn is_normally_distributed(&self, moments: &Moments, max: f64) -> bool {
        let sd = moments.std_dev();
        if moments.n < 2 || sd == 0.0 {
            return true;
        }
        (max - moments.mean) / sd <= self.n_sigma
    }
}

impl PixelDiscriminator for NormalDiscriminator {
    fn discriminate(&self, shoebox: &[f64], mask: &mut [i32]) -> Result<()> {
        trim_brightest(shoebox, mask, self.min_data, |moments, max| {
            self.is_normally_distributed(moments, max)
        })
    }

    fn name(&self) -> &'static str {
        "Normal"
    }
}
