//! Reflection data types.

use crate::error::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Processing status of a reflection.
///
/// Background estimation only touches reflections that are still
/// [`Status::UNPROCESSED`]; later pipeline stages own every other value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Status(pub i32);

impl Status {
    /// Not yet processed.
    pub const UNPROCESSED: Status = Status(0);

    /// Returns the raw status value.
    #[inline]
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self.0
    }
}

/// A candidate diffraction spot with its shoebox and background model.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Reflection {
    /// Raw pixel intensities around the spot.
    pub shoebox: Vec<f64>,
    /// Per-pixel bitfield, see [`crate::MaskCode`].
    pub mask: Vec<i32>,
    /// Estimated background per pixel.
    #[cfg_attr(feature = "serde", serde(default))]
    pub background: Vec<f64>,
    /// Processing status.
    #[cfg_attr(feature = "serde", serde(default))]
    pub status: Status,
    /// Cleared when background estimation fails.
    #[cfg_attr(feature = "serde", serde(default = "default_valid"))]
    pub valid: bool,
}

#[cfg(feature = "serde")]
fn default_valid() -> bool {
    true
}

impl Reflection {
    /// Creates an unprocessed reflection with a zeroed background array.
    #[must_use]
    pub fn new(shoebox: Vec<f64>, mask: Vec<i32>) -> Self {
        let background = vec![0.0; shoebox.len()];
        Self {
            shoebox,
            mask,
            background,
            status: Status::UNPROCESSED,
            valid: true,
        }
    }

    /// Sets the processing status.
    #[must_use]
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// Returns the number of shoebox pixels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shoebox.len()
    }

    /// Returns true if the shoebox has no pixels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shoebox.is_empty()
    }

    /// Returns true if this reflection may be processed by background estimation.
    #[inline]
    #[must_use]
    pub fn is_unprocessed(&self) -> bool {
        self.status == Status::UNPROCESSED
    }

    /// Checks that mask and background arrays match the shoebox length.
    ///
    /// # Errors
    /// Returns [`Error::LengthMismatch`] naming the offending array.
    pub fn check_shape(&self) -> Result<()> {
        let expected = self.shoebox.len();
        if self.mask.len() != expected {
            return Err(Error::LengthMismatch {
                what: "mask",
                expected,
                actual: self.mask.len(),
            });
        }
        if self.background.len() != expected {
            return Err(Error::LengthMismatch {
                what: "background",
                expected,
                actual: self.background.len(),
            });
        }
        Ok(())
    }
}
