//! Background estimation configuration.

use crate::error::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for shoebox background estimation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BackgroundConfig {
    /// Minimum number of pixels needed for a statistical decision.
    pub min_data: usize,
    /// Number of standard deviations used as the discrimination threshold.
    pub n_sigma: f64,
    /// Worker threads for batch processing (`None` = rayon global pool).
    pub num_threads: Option<usize>,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            min_data: 10,
            n_sigma: 3.0,
            num_threads: None,
        }
    }
}

impl BackgroundConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the minimum number of pixels.
    #[must_use]
    pub fn with_min_data(mut self, min_data: usize) -> Self {
        self.min_data = min_data;
        self
    }

    /// Sets the discrimination threshold.
    #[must_use]
    pub fn with_n_sigma(mut self, n_sigma: f64) -> Self {
        self.n_sigma = n_sigma;
        self
    }

    /// Sets the number of worker threads.
    #[must_use]
    pub fn with_num_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = Some(num_threads);
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// Returns [`Error::ConfigError`] describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.min_data == 0 {
            return Err(Error::ConfigError("min_data must be at least 1".into()));
        }
        if !self.n_sigma.is_finite() || self.n_sigma <= 0.0 {
            return Err(Error::ConfigError(format!(
                "n_sigma must be finite and positive, got {}",
                self.n_sigma
            )));
        }
        if self.num_threads == Some(0) {
            return Err(Error::ConfigError("num_threads must be at least 1".into()));
        }
        Ok(())
    }
}
