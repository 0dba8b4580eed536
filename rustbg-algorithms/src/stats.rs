//! Sample statistics shared by the discriminators and the estimator.
#![allow(clippy::cast_precision_loss)]

use rustbg_core::discriminator::check_mask_len;
use rustbg_core::error::{Error, Result};
use rustbg_core::MaskCode;

/// Arithmetic mean, or `None` for an empty sample.
#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// First two moments of a sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Moments {
    /// Number of values.
    pub n: usize,
    /// Arithmetic mean.
    pub mean: f64,
    /// Unbiased sample variance (0 for fewer than two values).
    pub variance: f64,
}

impl Moments {
    fn from_sums(n: usize, sum: f64, sum_sq: f64) -> Self {
        if n == 0 {
            return Self {
                n,
                mean: 0.0,
                variance: 0.0,
            };
        }
        let count = n as f64;
        let mean = sum / count;
        let variance = if n < 2 {
            0.0
        } else {
            ((sum_sq - sum * mean) / (count - 1.0)).max(0.0)
        };
        Self { n, mean, variance }
    }

    /// Computes the moments of a slice.
    #[must_use]
    pub fn of(values: &[f64]) -> Self {
        let sum = values.iter().sum();
        let sum_sq = values.iter().map(|v| v * v).sum();
        Self::from_sums(values.len(), sum, sum_sq)
    }

    /// Sample standard deviation.
    #[inline]
    #[must_use]
    pub fn std_dev(&self) -> f64 {
        self.variance.sqrt()
    }
}

/// Classifies background pixels by trimming the brightest pixels.
///
/// Finite pixels are sorted ascending. While `accept` rejects the remaining
/// sample and more than `min_data` pixels remain, the brightest pixel is
/// dropped. Surviving pixels get the background bit set; trimmed and
/// non-finite pixels get it cleared.
///
/// `accept` receives the moments of the remaining sample and its maximum.
pub(crate) fn trim_brightest<F>(
    shoebox: &[f64],
    mask: &mut [i32],
    min_data: usize,
    accept: F,
) -> Result<()>
where
    F: Fn(&Moments, f64) -> bool,
{
    check_mask_len(shoebox, mask)?;

    let mut order: Vec<usize> = (0..shoebox.len())
        .filter(|&i| shoebox[i].is_finite())
        .collect();
    if order.is_empty() || order.len() < min_data {
        return Err(Error::StatisticalFailure(format!(
            "{} usable pixels, need at least {}",
            order.len(),
            min_data.max(1)
        )));
    }
    order.sort_unstable_by(|&a, &b| shoebox[a].total_cmp(&shoebox[b]));

    let mut sum: f64 = order.iter().map(|&i| shoebox[i]).sum();
    let mut sum_sq: f64 = order.iter().map(|&i| shoebox[i] * shoebox[i]).sum();
    if !sum.is_finite() || !sum_sq.is_finite() {
        return Err(Error::StatisticalFailure(
            "non-finite pixel statistics".into(),
        ));
    }

    let mut n = order.len();
    while n > min_data.max(1) {
        let brightest = shoebox[order[n - 1]];
        if accept(&Moments::from_sums(n, sum, sum_sq), brightest) {
            break;
        }
        sum -= brightest;
        sum_sq -= brightest * brightest;
        n -= 1;
    }

    for code in mask.iter_mut() {
        MaskCode::set_background(code, false);
    }
    for &i in &order[..n] {
        MaskCode::set_background(&mut mask[i], true);
    }
    Ok(())
}
