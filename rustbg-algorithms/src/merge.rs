//! Inverse-variance weighted merging of repeated observations.
#![allow(clippy::cast_precision_loss)]

use rustbg_core::error::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single intensity measurement with its standard uncertainty.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Observation {
    /// Measured intensity.
    pub intensity: f64,
    /// Standard uncertainty of the intensity.
    pub sigma: f64,
}

impl Observation {
    /// Creates a new observation.
    #[must_use]
    pub fn new(intensity: f64, sigma: f64) -> Self {
        Self { intensity, sigma }
    }
}

/// Result of merging an observation list.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MergedObservation {
    /// Weighted mean intensity.
    pub intensity: f64,
    /// Uncertainty of the weighted mean.
    pub sigma: f64,
    /// Sum of I/sigma over all observations.
    pub total_i_over_sigma: f64,
    /// Number of merged observations.
    pub multiplicity: usize,
    /// Sum of absolute deviations from the weighted mean.
    pub rmerge: f64,
}

/// Repeated observations of one reflection.
#[derive(Clone, Debug, Default)]
pub struct ObservationList {
    observations: Vec<Observation>,
}

impl ObservationList {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an observation.
    pub fn add(&mut self, intensity: f64, sigma: f64) {
        self.observations.push(Observation::new(intensity, sigma));
    }

    /// Number of observations.
    #[must_use]
    pub fn multiplicity(&self) -> usize {
        self.observations.len()
    }

    /// Returns the observations.
    #[must_use]
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Merges the observations with weights `1 / sigma^2`.
    ///
    /// # Errors
    /// - [`Error::EmptyObservationList`] if there are no observations
    /// - [`Error::InvalidSigma`] if any sigma is not finite and positive
    pub fn merge(&self) -> Result<MergedObservation> {
        if self.observations.is_empty() {
            return Err(Error::EmptyObservationList);
        }

        let mut sum_w = 0.0;
        let mut sum_wi = 0.0;
        let mut total_i_over_sigma = 0.0;
        for obs in &self.observations {
            if !obs.sigma.is_finite() || obs.sigma <= 0.0 {
                return Err(Error::InvalidSigma(obs.sigma));
            }
            let w = 1.0 / (obs.sigma * obs.sigma);
            sum_w += w;
            sum_wi += w * obs.intensity;
            total_i_over_sigma += obs.intensity / obs.sigma;
        }

        let intensity = sum_wi / sum_w;
        let rmerge = self
            .observations
            .iter()
            .map(|obs| (obs.intensity - intensity).abs())
            .sum();

        Ok(MergedObservation {
            intensity,
            sigma: 1.0 / sum_w.sqrt(),
            total_i_over_sigma,
            multiplicity: self.observations.len(),
            rmerge,
        })
    }
}

impl FromIterator<Observation> for ObservationList {
    fn from_iter<I: IntoIterator<Item = Observation>>(iter: I) -> Self {
        Self {
            observations: iter.into_iter().collect(),
        }
    }
}
