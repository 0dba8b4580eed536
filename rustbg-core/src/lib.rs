//! rustbg-core: Core traits and types for shoebox background estimation.
//!
//! This crate provides the reflection data model, mask bit codes, the
//! pixel discrimination trait and the configuration shared by the
//! background estimation algorithms.
//!

pub mod config;
pub mod discriminator;
pub mod error;
pub mod mask;
pub mod reflection;

pub use config::BackgroundConfig;
pub use discriminator::PixelDiscriminator;
pub use error::{Error, Result};
pub use mask::MaskCode;
pub use reflection::{Reflection, Status};
