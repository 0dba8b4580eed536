//! Parallel background estimation over a reflection list.
//!
//! Each reflection is processed by exactly one rayon worker. A failure is
//! converted into `valid = false` on that reflection and never reaches the
//! caller or any other reflection.

use crate::poisson::PoissonDiscriminator;
use crate::subtraction::BackgroundSubtractor;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use rustbg_core::error::{Error, Result};
use rustbg_core::{BackgroundConfig, PixelDiscriminator, Reflection};

/// Result of one reflection within a batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Outcome {
    Skipped,
    Processed,
    Failed,
}

/// Per-batch tallies, used for logging.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Tally {
    processed: usize,
    skipped: usize,
    failed: usize,
}

impl Tally {
    fn of(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Skipped => Self {
                skipped: 1,
                ..Self::default()
            },
            Outcome::Processed => Self {
                processed: 1,
                ..Self::default()
            },
            Outcome::Failed => Self {
                failed: 1,
                ..Self::default()
            },
        }
    }

    fn merge(self, other: Self) -> Self {
        Self {
            processed: self.processed + other.processed,
            skipped: self.skipped + other.skipped,
            failed: self.failed + other.failed,
        }
    }
}

fn process_one<D: PixelDiscriminator>(
    subtractor: &BackgroundSubtractor<D>,
    index: usize,
    reflection: &mut Reflection,
) -> Outcome {
    if !reflection.is_unprocessed() {
        return Outcome::Skipped;
    }
    match subtractor.process_reflection(reflection) {
        Ok(()) => Outcome::Processed,
        Err(err) => {
            log::trace!("reflection {index}: background estimation failed: {err}");
            reflection.valid = false;
            Outcome::Failed
        }
    }
}

/// Runs the subtractor over every unprocessed reflection on the current rayon pool.
pub(crate) fn process_batch<D: PixelDiscriminator>(
    subtractor: &BackgroundSubtractor<D>,
    reflections: &mut [Reflection],
) {
    log::debug!(
        "estimating background for {} reflections ({} discriminator)",
        reflections.len(),
        subtractor.discriminator().name()
    );

    let tally = reflections
        .par_iter_mut()
        .enumerate()
        .map(|(index, reflection)| Tally::of(process_one(subtractor, index, reflection)))
        .reduce(Tally::default, Tally::merge);

    log::debug!(
        "background estimation finished: {} processed, {} skipped, {} failed",
        tally.processed,
        tally.skipped,
        tally.failed
    );
}

/// Batch runner with an optional dedicated thread pool.
pub struct BatchRunner<D = PoissonDiscriminator> {
    subtractor: BackgroundSubtractor<D>,
    pool: Option<ThreadPool>,
}

impl BatchRunner<PoissonDiscriminator> {
    /// Create a Poisson-based runner from a configuration.
    ///
    /// # Errors
    /// Returns a configuration error if the configuration is invalid or the
    /// thread pool cannot be built.
    pub fn from_config(config: &BackgroundConfig) -> Result<Self> {
        config.validate()?;
        Self::new(BackgroundSubtractor::from_config(config)?, config.num_threads)
    }
}

impl<D: PixelDiscriminator> BatchRunner<D> {
    /// Create a runner; `num_threads = None` uses the rayon global pool.
    ///
    /// # Errors
    /// Returns a configuration error if `num_threads` is zero or the pool
    /// cannot be built.
    pub fn new(subtractor: BackgroundSubtractor<D>, num_threads: Option<usize>) -> Result<Self> {
        let pool = match num_threads {
            None => None,
            Some(0) => {
                return Err(Error::ConfigError("num_threads must be at least 1".into()));
            }
            Some(n) => Some(
                ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| Error::ConfigError(e.to_string()))?,
            ),
        };
        Ok(Self { subtractor, pool })
    }

    /// Returns the subtractor.
    pub fn subtractor(&self) -> &BackgroundSubtractor<D> {
        &self.subtractor
    }

    /// Number of worker threads used by [`Self::run`].
    pub fn num_threads(&self) -> usize {
        self.pool
            .as_ref()
            .map_or_else(rayon::current_num_threads, ThreadPool::current_num_threads)
    }

    /// Processes every unprocessed reflection, clearing `valid` on failure.
    pub fn run(&self, reflections: &mut [Reflection]) {
        match &self.pool {
            Some(pool) => pool.install(|| process_batch(&self.subtractor, reflections)),
            None => process_batch(&self.subtractor, reflections),
        }
    }
}
