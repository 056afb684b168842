//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod catalog;
mod gcode;
mod run;

pub use run::{OptimizeArgs, SimulateArgs};

use anyhow::Result;
use clap::Subcommand;
use std::path::PathBuf;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// List supported printers
    Printers,
    /// List supported filament materials
    Materials,
    /// Show remaining optimization quota
    Quota,
    /// List print priority options for a material
    Priorities {
        /// Material ID
        material_id: String,
    },
    /// Upload and register a G-code file
    Upload {
        /// Path to the G-code file
        file: PathBuf,

        /// Printer ID to associate with the G-code
        #[arg(long)]
        printer: String,

        /// Material ID to associate with the G-code
        #[arg(long)]
        material: String,
    },
    /// Show server-recommended optimization settings for a G-code
    Defaults {
        /// Registered G-code ID
        gcode_id: String,
    },
    /// List the account's recent simulations and optimizations
    Runs,
    /// Run a thermal simulation for a registered G-code
    Simulate(SimulateArgs),
    /// Run an optimization for a registered G-code
    Optimize(OptimizeArgs),
    /// Download a result artifact to a local file
    Download {
        /// Artifact URL from a finished run
        url: String,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Printers => catalog::list_printers(config).await,
        Commands::Materials => catalog::list_materials(config).await,
        Commands::Quota => catalog::show_quota(config).await,
        Commands::Priorities { material_id } => {
            catalog::list_priorities(config, &material_id).await
        }
        Commands::Upload {
            file,
            printer,
            material,
        } => gcode::upload(config, &file, &printer, &material).await,
        Commands::Defaults { gcode_id } => catalog::show_defaults(config, &gcode_id).await,
        Commands::Runs => catalog::list_runs(config).await,
        Commands::Simulate(args) => run::simulate(config, args).await,
        Commands::Optimize(args) => run::optimize(config, args).await,
        Commands::Download { url, output } => gcode::download(config, &url, &output).await,
    }
}
