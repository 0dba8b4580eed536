//! Poisson pixel discriminator.
//!
//! Background pixels on a photon-counting detector follow a Poisson
//! distribution, whose variance equals its mean. Signal pixels inflate the
//! variance, so the brightest pixels are trimmed until the index of
//! dispersion (`variance / mean`) of the remainder is within `n_sigma`
//! standard errors of one.

#![allow(clippy::cast_precision_loss)]

use crate::stats::{trim_brightest, Moments};
use rustbg_core::error::Result;
use rustbg_core::{BackgroundConfig, PixelDiscriminator};

/// Discriminator testing for Poisson-distributed background.
#[derive(Clone, Debug)]
pub struct PoissonDiscriminator {
    min_data: usize,
    n_sigma: f64,
}

impl PoissonDiscriminator {
    /// Create with the minimum sample size and threshold.
    ///
    /// # Errors
    /// Returns a configuration error if `min_data` is zero or `n_sigma` is
    /// not a positive finite number.
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

    /// Minimum number of pixels kept as background.
    #[must_use]
    pub fn min_data(&self) -> usize {
        self.min_data
    }

    /// Threshold in standard errors of the dispersion index.
    #[must_use]
    pub fn n_sigma(&self) -> f64 {
        self.n_sigma
    }

    /// Returns true if the sample is consistent with a Poisson distribution.
    ///
    /// Only over-dispersion is rejected: trimming bright pixels cannot
    /// correct an under-dispersed sample.
    #[must_use]
    pub fn is_poisson_distributed(&self, moments: &Moments) -> bool {
        if moments.n < 2 || moments.variance == 0.0 {
            return true;
        }
        if moments.mean <= 0.0 {
            return false;
        }
        let dispersion = moments.variance / moments.mean;
        let standard_error = (2.0 / (moments.n as f64 - 1.0)).sqrt();
        dispersion - 1.0 <= self.n_sigma * standard_error
    }
}

impl PixelDiscriminator for PoissonDiscriminator {
    fn discriminate(&self, shoebox: &[f64], mask: &mut [i32]) -> Result<()> {
        trim_brightest(shoebox, mask, self.min_data, |moments, _| {
            self.is_poisson_distributed(moments)
        })
    }

    fn name(&self) -> &'static str {
        "Poisson"
    }
}
