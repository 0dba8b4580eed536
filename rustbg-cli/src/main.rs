//! rustbg CLI: shoebox background estimation for reflection files.
#![allow(
    clippy::uninlined_format_args,
    clippy::cast_precision_loss,
    clippy::too_many_lines
)]

mod io;

use clap::{Parser, Subcommand, ValueEnum};

use rustbg_algorithms::{
    BackgroundSubtractor, BatchRunner, NormalDiscriminator, ObservationList, PixelDiscriminator,
    PoissonDiscriminator, PresetDiscriminator,
};
use rustbg_core::{BackgroundConfig, Reflection};
use std::path::PathBuf;
use std::time::Instant;
use thiserror::Error;

/// Result type for CLI operations.
type Result<T> = std::result::Result<T, CliError>;

/// CLI error types.
#[derive(Error, Debug)]
enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Core error: {0}")]
    Core(#[from] rustbg_core::Error),
}

/// Pixel discriminator selection.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Discriminator {
    /// Poisson index-of-dispersion test (photon counting detectors)
    Poisson,
    /// Normal n-sigma outlier test (integrating detectors)
    Normal,
    /// Use the background bits already present in the mask
    Preset,
}

/// Shoebox background estimation for X-ray diffraction reflections.
#[derive(Parser)]
#[command(name = "rustbg")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate a flat background for every unprocessed reflection
    Process {
        /// Input reflections (JSON array)
        input: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Background configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Minimum number of background pixels
        #[arg(long)]
        min_data: Option<usize>,

        /// Discrimination threshold in standard deviations
        #[arg(long)]
        n_sigma: Option<f64>,

        /// Pixel discriminator to use
        #[arg(short, long, value_enum, default_value = "poisson")]
        discriminator: Discriminator,

        /// Worker threads (default: all cores)
        #[arg(short, long)]
        threads: Option<usize>,
    },

    /// Show information about a reflection file
    Info {
        /// Input reflections (JSON array)
        input: PathBuf,
    },

    /// Merge repeated observations with inverse-variance weights
    Merge {
        /// Input groups of [intensity, sigma] pairs (JSON)
        input: PathBuf,

        /// Optional JSON output of the merged values
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Builds the effective configuration: file values, then command-line overrides.
fn resolve_config(
    config: Option<&PathBuf>,
    min_data: Option<usize>,
    n_sigma: Option<f64>,
    threads: Option<usize>,
) -> Result<BackgroundConfig> {
    let mut resolved = match config {
        Some(path) => io::load_config(path)?,
        None => BackgroundConfig::default(),
    };
    if let Some(min_data) = min_data {
        resolved.min_data = min_data;
    }
    if let Some(n_sigma) = n_sigma {
        resolved.n_sigma = n_sigma;
    }
    if threads.is_some() {
        resolved.num_threads = threads;
    }
    resolved.validate()?;
    Ok(resolved)
}

fn run_with<D: PixelDiscriminator>(
    discriminator: D,
    config: &BackgroundConfig,
    reflections: &mut [Reflection],
) -> Result<()> {
    let runner = BatchRunner::new(
        BackgroundSubtractor::with_discriminator(discriminator),
        config.num_threads,
    )?;
    log::info!(
        "{} discriminator, min_data={}, n_sigma={}, {} threads",
        runner.subtractor().discriminator().name(),
        config.min_data,
        config.n_sigma,
        runner.num_threads()
    );
    runner.run(reflections);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match cli.command {
        Commands::Process {
            input,
            output,
            config,
            min_data,
            n_sigma,
            discriminator,
            threads,
        } => {
            let config = resolve_config(config.as_ref(), min_data, n_sigma, threads)?;

            log::info!("Reading: {}", input.display());
            let mut reflections = io::load_reflections(&input)?;
            let eligible = reflections.iter().filter(|r| r.is_unprocessed()).count();

            let start = Instant::now();
            match discriminator {
                Discriminator::Poisson => run_with(
                    PoissonDiscriminator::from_config(&config)?,
                    &config,
                    &mut reflections,
                )?,
                Discriminator::Normal => run_with(
                    NormalDiscriminator::from_config(&config)?,
                    &config,
                    &mut reflections,
                )?,
                Discriminator::Preset => run_with(PresetDiscriminator, &config, &mut reflections)?,
            }
            let elapsed = start.elapsed();

            let failed = reflections
                .iter()
                .filter(|r| r.is_unprocessed() && !r.valid)
                .count();

            log::info!("Writing output to: {}", output.display());
            io::save_json(&output, &reflections)?;

            println!(
                "Processed {} reflections in {:.3}s",
                reflections.len(),
                elapsed.as_secs_f64()
            );
            println!("Eligible: {}", eligible);
            println!("Skipped: {}", reflections.len() - eligible);
            println!("Failed: {}", failed);
        }

        Commands::Info { input } => {
            let reflections = io::load_reflections(&input)?;
            let eligible = reflections.iter().filter(|r| r.is_unprocessed()).count();
            let invalid = reflections.iter().filter(|r| !r.valid).count();
            let pixels: usize = reflections.iter().map(Reflection::len).sum();
            let malformed = reflections
                .iter()
                .filter(|r| r.check_shape().is_err())
                .count();

            println!("File: {}", input.display());
            println!("Reflections: {}", reflections.len());
            println!("Unprocessed: {}", eligible);
            println!("Invalid: {}", invalid);
            println!("Malformed: {}", malformed);
            println!("Pixels: {}", pixels);
            if !reflections.is_empty() {
                println!(
                    "Mean shoebox size: {:.1}",
                    pixels as f64 / reflections.len() as f64
                );
            }
        }

        Commands::Merge { input, output } => {
            let groups = io::load_observation_groups(&input)?;
            let mut merged = Vec::with_capacity(groups.len());

            println!(
                "{:<6} | {:>12} | {:>10} | {:>5} | {:>10}",
                "Group", "I", "sigma(I)", "Mult", "Rmerge"
            );
            println!("{:-<56}", "");
            for (index, group) in groups.iter().enumerate() {
                let mut list = ObservationList::new();
                for &(intensity, sigma) in group {
                    list.add(intensity, sigma);
                }
                match list.merge() {
                    Ok(result) => {
                        println!(
                            "{:<6} | {:>12.3} | {:>10.3} | {:>5} | {:>10.3}",
                            index,
                            result.intensity,
                            result.sigma,
                            result.multiplicity,
                            result.rmerge
                        );
                        merged.push(Some(result));
                    }
                    Err(err) => {
                        log::warn!("group {}: {}", index, err);
                        merged.push(None);
                    }
                }
            }

            if let Some(path) = output {
                io::save_json(&path, &merged)?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_config_overrides() {
        let config = resolve_config(None, Some(4), None, Some(2)).unwrap();
        assert_eq!(config.min_data, 4);
        assert_eq!(config.num_threads, Some(2));
        approx::assert_relative_eq!(config.n_sigma, BackgroundConfig::default().n_sigma);
    }

    #[test]
    fn test_resolve_config_rejects_invalid() {
        assert!(resolve_config(None, Some(0), None, None).is_err());
        assert!(resolve_config(None, None, Some(-1.0), None).is_err());
    }

    #[test]
    fn test_run_with_preset() {
        let mut reflections = vec![
            Reflection::new(vec![2.0, 4.0, 90.0], vec![1, 1, 0]),
            Reflection::new(vec![2.0, 4.0], vec![0, 0]),
        ];
        run_with(
            PresetDiscriminator,
            &BackgroundConfig::default(),
            &mut reflections,
        )
        .unwrap();

        assert!(reflections[0].valid);
        approx::assert_relative_eq!(reflections[0].background[2], 3.0);
        assert!(!reflections[1].valid);
    }

    #[test]
    fn test_cli_parses_process() {
        let cli = Cli::parse_from([
            "rustbg",
            "process",
            "in.json",
            "-o",
            "out.json",
            "--discriminator",
            "normal",
            "--n-sigma",
            "2.5",
        ]);
        match cli.command {
            Commands::Process {
                discriminator,
                n_sigma,
                ..
            } => {
                assert!(matches!(discriminator, Discriminator::Normal));
                assert_eq!(n_sigma, Some(2.5));
            }
            _ => panic!("expected process command"),
        }
    }
}
