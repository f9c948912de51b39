//! Reverse Wurzelschnecke - a resumable right-triangle spiral generator
//!
//! Core modules:
//! - `numeric`: Numeric backend abstraction (machine floats or arbitrary precision)
//! - `spiral`: Triangle recurrence (the geometry engine)
//! - `store`: Resumable, append-only CSV series store
//! - `run`: Generation orchestration (resume, sampling, batching)
//! - `render`: Static plot of the accumulated series
//! - `settings`: Explicit configuration passed into engine and store

pub mod numeric;
pub mod render;
pub mod run;
pub mod settings;
pub mod spiral;
pub mod store;

pub use numeric::{Backend, BigBackend, F64Backend};
pub use settings::{Config, PlotPoint};
pub use spiral::{Point, Triangle};

/// Generation constants
pub mod consts {
    /// Default length of the fixed outside leg shared by consecutive triangles
    pub const DEFAULT_OUTSIDE_LEG: f64 = 1.0;
    /// Default mantissa precision (bits) for the exact backend
    pub const DEFAULT_EXACT_PRECISION: u32 = 256;
    /// Number of persisted columns (triangle number + 7 data fields)
    pub const COLUMN_COUNT: usize = 8;
    /// Chunk size for the reverse tail read of the data file
    pub const TAIL_CHUNK: usize = 4096;
    /// Default triangle count for the classical-spiral overlay
    pub const DEFAULT_THEODORUS_AMOUNT: u64 = 16;
}
