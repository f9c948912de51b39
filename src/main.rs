//! Command line entry point
//!
//! Two thin subcommands over the library: `generate` advances the persisted
//! series (resuming where the data file left off), `plot` renders it.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::{error, info, warn};

use wurzelschnecke::numeric::{Backend, BigBackend, F64Backend};
use wurzelschnecke::render::{self, RenderOptions};
use wurzelschnecke::run;
use wurzelschnecke::settings::Config;
use wurzelschnecke::store::StoreError;

#[derive(Parser)]
#[command(name = "wurzelschnecke", version)]
#[command(about = "Generate, persist and plot the reverse Wurzelschnecke triangle spiral")]
struct Cli {
    /// Path to a JSON config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the data file path
    #[arg(long, global = true)]
    data_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Calculate triangles and append them to the data file
    Generate {
        /// How many triangles to calculate (-1 = run until interrupted)
        #[arg(short, long, allow_negative_numbers = true)]
        amount: Option<i64>,

        /// Keep only every nth triangle
        #[arg(short, long)]
        every: Option<u64>,

        /// Use exact arbitrary-precision values
        #[arg(long)]
        exact: bool,
    },
    /// Plot the persisted triangle series
    Plot {
        /// Output image path
        #[arg(short, long, default_value = "spiral.png")]
        output: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match try_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn try_main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(data_file) = cli.data_file {
        config.data_file = data_file;
    }

    match cli.command {
        Command::Generate {
            amount,
            every,
            exact,
        } => {
            if exact {
                config.exact_values = true;
            }
            if let Some(every) = every {
                config.save_every_n = every.max(1);
            }
            let amount = amount.unwrap_or(config.generation_amount);

            if config.exact_values {
                warn!("exact values are being used, this could take a while");
                let mut backend = BigBackend::new(config.exact_precision_bits)?;
                generate_with(&mut backend, &config, amount)
            } else {
                generate_with(&mut F64Backend, &config, amount)
            }
        }
        Command::Plot { output } => {
            if config.exact_values {
                let mut backend = BigBackend::new(config.exact_precision_bits)?;
                plot_with(&mut backend, &config, output)
            } else {
                plot_with(&mut F64Backend, &config, output)
            }
        }
    }
}

fn generate_with<B: Backend + 'static>(
    backend: &mut B,
    config: &Config,
    amount: i64,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = run::store_from_config(config);
    let summary = run::generate(backend, config, &store, amount)?;
    info!(
        "done: triangles #{}..#{}, {} rows written",
        summary.first_number, summary.last_number, summary.rows_written
    );
    Ok(())
}

fn plot_with<B: Backend>(
    backend: &mut B,
    config: &Config,
    output: PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = run::store_from_config(config);
    let vertices = match store.read_all(backend) {
        Ok(vertices) => vertices,
        // Nothing persisted yet is not a failure, there is just nothing to
        // draw.
        Err(e @ (StoreError::MissingData { .. } | StoreError::EmptyData { .. })) => {
            warn!("{e}, nothing to plot");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let triangles = render::project(backend, &vertices);
    let options = RenderOptions::from_config(config, output);
    render::render(&triangles, &options)?;
    info!("wrote {}", options.output.display());
    Ok(())
}
