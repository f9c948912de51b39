//! Generation and plotting configuration
//!
//! One explicit struct passed into the engine, store, run loop and renderer.
//! Loaded from a JSON file when one is given, defaults otherwise; CLI flags
//! override individual fields.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{DEFAULT_EXACT_PRECISION, DEFAULT_OUTSIDE_LEG, DEFAULT_THEODORUS_AMOUNT};

/// The persisted column names, in row order
pub fn default_headers() -> [String; 8] {
    [
        "number",
        "outside left x",
        "outside left y",
        "outside right x",
        "outside right y",
        "inside x",
        "inside y",
        "rotation",
    ]
    .map(String::from)
}

/// Which vertex to draw when triangles aren't drawn whole
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PlotPoint {
    #[serde(rename = "outside left")]
    OutsideLeft,
    #[serde(rename = "outside right")]
    OutsideRight,
    #[default]
    #[serde(rename = "inside")]
    Inside,
}

impl PlotPoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlotPoint::OutsideLeft => "outside left",
            PlotPoint::OutsideRight => "outside right",
            PlotPoint::Inside => "inside",
        }
    }
}

/// Configuration loading failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("can't read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("can't parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// All knobs of a run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // === Generation ===
    /// Use the arbitrary-precision backend instead of f64
    pub exact_values: bool,
    /// Mantissa precision (bits) of the exact backend
    pub exact_precision_bits: u32,
    /// Length of the fixed outside leg
    pub outside_leg_length: f64,
    /// Derive the inside leg from the custom hypotenuse function
    pub custom_hypotenuse: bool,
    /// Persist only every nth triangle (the rest still seed the recurrence)
    pub save_every_n: u64,
    /// Default triangle count for `generate` (-1 = run until interrupted)
    pub generation_amount: i64,

    // === Series file ===
    /// Where the series is persisted
    pub data_file: PathBuf,
    /// Column names, written as the header row and checked on read
    pub headers: [String; 8],

    // === Plotting ===
    /// Draw whole triangle outlines instead of single vertices
    pub show_triangles: bool,
    /// Which vertex to draw when not drawing whole triangles
    pub plot_point: PlotPoint,
    /// Connect consecutive plotted vertices with lines
    pub connect_points: bool,
    /// Shade the circle the spiral winds around
    pub show_circle: bool,
    /// Overlay the classical Spiral of Theodorus in its overlapped position
    pub show_spiral: bool,
    /// How many classical-spiral triangles the overlay uses
    pub theodorus_amount: u64,
    /// Plot title
    pub plot_title: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exact_values: false,
            exact_precision_bits: DEFAULT_EXACT_PRECISION,
            outside_leg_length: DEFAULT_OUTSIDE_LEG,
            custom_hypotenuse: false,
            save_every_n: 1,
            generation_amount: 15,

            data_file: PathBuf::from("data/triangles.csv"),
            headers: default_headers(),

            show_triangles: true,
            plot_point: PlotPoint::Inside,
            connect_points: false,
            show_circle: false,
            show_spiral: true,
            theodorus_amount: DEFAULT_THEODORUS_AMOUNT,
            plot_title: "Two Spirals".to_string(),
        }
    }
}

impl Config {
    /// Load a config file; missing fields fall back to their defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!("loaded config from {}", path.display());
        Ok(config)
    }
}
