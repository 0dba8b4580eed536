//! JSON loading and saving for the CLI.

use crate::Result;
use rustbg_core::{BackgroundConfig, Reflection};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// Loads a JSON array of reflections.
///
/// Reflections stored without a background array get a zeroed one.
pub fn load_reflections(path: &Path) -> Result<Vec<Reflection>> {
    let mut reflections: Vec<Reflection> = read_json(path)?;
    for reflection in &mut reflections {
        if reflection.background.is_empty() {
            reflection.background = vec![0.0; reflection.shoebox.len()];
        }
    }
    Ok(reflections)
}

/// Loads a background configuration; missing fields take default values.
pub fn load_config(path: &Path) -> Result<BackgroundConfig> {
    read_json(path)
}

/// Loads groups of `[intensity, sigma]` pairs, one group per reflection.
pub fn load_observation_groups(path: &Path) -> Result<Vec<Vec<(f64, f64)>>> {
    read_json(path)
}

/// Writes a value as pretty-printed JSON.
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
