//! rustbg-algorithms: Shoebox background estimation algorithms.
//!
//! This crate provides:
//! - **Discriminators** - Poisson (primary), Normal and Preset pixel classifiers
//! - **Subtraction** - flat background from the mean of background pixels
//! - **Batch** - fault-isolated parallel processing of reflection lists
//! - **Merge** - inverse-variance weighted merging of repeated observations
//!
#![warn(missing_docs)]

mod batch;
mod merge;
mod normal;
mod poisson;
mod preset;
pub mod stats;
mod subtraction;

pub use batch::BatchRunner;
pub use merge::{MergedObservation, Observation, ObservationList};
pub use normal::NormalDiscriminator;
pub use poisson::PoissonDiscriminator;
pub use preset::PresetDiscriminator;
pub use subtraction::BackgroundSubtractor;

// Re-export core types
pub use rustbg_core::{BackgroundConfig, Error, MaskCode, PixelDiscriminator, Reflection, Result};
