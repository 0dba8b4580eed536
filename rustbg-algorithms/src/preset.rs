//! Discriminator that trusts an upstream classification.

use rustbg_core::discriminator::check_mask_len;
use rustbg_core::error::Result;
use rustbg_core::PixelDiscriminator;

/// Leaves the mask untouched, using background bits set by an earlier stage.
#[derive(Clone, Copy, Debug, Default)]
pub struct PresetDiscriminator;

impl PixelDiscriminator for PresetDiscriminator {
    fn discriminate(&self, shoebox: &[f64], mask: &mut [i32]) -> Result<()> {
        check_mask_len(shoebox, mask)
    }

    fn name(&self) -> &'static str {
        "Preset"
    }
}
