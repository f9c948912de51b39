//! Generation orchestration
//!
//! Glues the engine and the store together: recover the resume state, advance
//! the recurrence, persist the sampled rows. Bounded runs collect one batch
//! and write it at the end; the unbounded mode writes each retained row in
//! its own open-append-flush-close cycle so interrupting the process leaves
//! a consistent, resumable file.

use log::info;
use thiserror::Error;

use crate::numeric::Backend;
use crate::settings::Config;
use crate::spiral::{
    HypotenuseFn, ResumeState, SpiralEngine, TriangleError, default_custom_hypotenuse,
};
use crate::store::{SeriesStore, StoreError};

/// Failures of a generation run
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Triangle(#[from] TriangleError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What a bounded run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of the first triangle computed
    pub first_number: u64,
    /// Number of the last triangle computed
    pub last_number: u64,
    /// How many rows were persisted (sampling can drop the rest)
    pub rows_written: u64,
}

/// Build the store described by the configuration
pub fn store_from_config(config: &Config) -> SeriesStore {
    SeriesStore::new(&config.data_file, config.headers.clone())
}

fn engine_from_config<B: Backend + 'static>(
    backend: &mut B,
    config: &Config,
    resume: ResumeState<B::Scalar>,
) -> SpiralEngine<B> {
    let hypotenuse: Option<HypotenuseFn<B>> = config
        .custom_hypotenuse
        .then(|| Box::new(default_custom_hypotenuse::<B>) as HypotenuseFn<B>);
    SpiralEngine::new(backend, config.outside_leg_length, hypotenuse, resume)
}

/// Generate `amount` triangles (`-1` = run until the process is killed),
/// resuming from the store's last record and appending the sampled rows.
pub fn generate<B: Backend + 'static>(
    backend: &mut B,
    config: &Config,
    store: &SeriesStore,
    amount: i64,
) -> Result<RunSummary, RunError> {
    let resume = store.resume_state(backend)?;
    let create_new = matches!(resume, ResumeState::Fresh);
    if create_new {
        info!("no prior data, starting at triangle #1");
    }

    let mut engine = engine_from_config(backend, config, resume);
    let every = config.save_every_n.max(1);
    let start = engine.next_number();

    if amount < 0 {
        // Make sure the file exists before the endless loop so every later
        // write is a plain append.
        if create_new {
            store.append(backend, &[], true)?;
        }
        info!("calculating triangles from #{start} until interrupted");
        loop {
            let triangle = engine.next_triangle(backend)?;
            if triangle.number % every == 0 {
                store.append(backend, std::slice::from_ref(&triangle), false)?;
            }
        }
    }

    if amount == 0 {
        info!("nothing to calculate");
        return Ok(RunSummary {
            first_number: start,
            last_number: start.saturating_sub(1),
            rows_written: 0,
        });
    }

    let end = start + amount as u64;
    info!("calculating triangles from #{start} to #{}", end - 1);

    let mut kept = Vec::new();
    while engine.next_number() < end {
        let triangle = engine.next_triangle(backend)?;
        if triangle.number % every == 0 {
            kept.push(triangle);
        }
    }

    let rows_written = kept.len() as u64;
    store.append(backend, &kept, create_new)?;
    info!("persisted {rows_written} rows to {}", store.path().display());

    Ok(RunSummary {
        first_number: start,
        last_number: end - 1,
        rows_written,
    })
}
