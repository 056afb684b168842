//! Simulation and optimization command handlers
//!
//! Creates the remote job, waits for it, prints the report, and optionally
//! downloads the resulting G-code artifact.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use colored::*;

use helio_client::PollConfig;
use helio_core::optimization::OptimizationSettings;
use helio_core::simulation::{SimulationReport, SimulationSettings};

use crate::config::Config;

/// Polling options shared by simulate and optimize
#[derive(Args, Debug)]
pub struct PollArgs {
    /// Seconds between status checks
    #[arg(long, default_value_t = 3)]
    poll_interval: u64,

    /// Give up after this many seconds (the remote job keeps running)
    #[arg(long, default_value_t = 1800)]
    max_wait: u64,

    /// Keep polling through transient network errors
    #[arg(long)]
    retry_transient: bool,
}

impl PollArgs {
    fn to_config(&self) -> PollConfig {
        PollConfig {
            poll_interval: Duration::from_secs(self.poll_interval),
            max_wait: Duration::from_secs(self.max_wait),
            retry_transient: self.retry_transient,
            ..PollConfig::default()
        }
    }
}

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Registered G-code ID
    gcode_id: String,

    /// Chamber temperature in Celsius
    #[arg(long)]
    chamber_temp: Option<f64>,

    /// Bed temperature in Celsius
    #[arg(long)]
    bed_temp: Option<f64>,

    /// Download the thermal-index G-code to this path
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    poll: PollArgs,
}

#[derive(Args, Debug)]
pub struct OptimizeArgs {
    /// Registered G-code ID
    gcode_id: String,

    /// Chamber temperature in Celsius
    #[arg(long)]
    chamber_temp: Option<f64>,

    /// Bed temperature in Celsius
    #[arg(long)]
    bed_temp: Option<f64>,

    /// Print priority, e.g. QUALITY or SPEED
    #[arg(long)]
    priority: Option<String>,

    /// Minimum velocity bound in mm/s
    #[arg(long)]
    min_velocity: Option<f64>,

    /// Maximum velocity bound in mm/s
    #[arg(long)]
    max_velocity: Option<f64>,

    /// Minimum volumetric flow bound in mm^3/s
    #[arg(long)]
    min_flow: Option<f64>,

    /// Maximum volumetric flow bound in mm^3/s
    #[arg(long)]
    max_flow: Option<f64>,

    /// First layer to optimize
    #[arg(long)]
    from_layer: Option<i64>,

    /// Last layer to optimize (-1 = last)
    #[arg(long, allow_hyphen_values = true)]
    to_layer: Option<i64>,

    /// Download the optimized G-code to this path
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    poll: PollArgs,
}

/// Run a thermal simulation and display the report
pub async fn simulate(config: &Config, args: SimulateArgs) -> Result<()> {
    let client = config.client()?;
    let settings = SimulationSettings::from_temperatures(args.chamber_temp, args.bed_temp);

    println!("Starting simulation for gcode {}...", args.gcode_id.bold());
    let report = client
        .run_simulation(&args.gcode_id, &settings, args.poll.to_config())
        .await
        .context("Simulation did not complete")?;

    print_simulation_report(&report);

    if let Some(output) = args.output {
        let url = report
            .thermal_index_gcode_url
            .as_deref()
            .context("Simulation produced no thermal-index G-code")?;
        client.download_artifact(url, &output).await?;
        println!("{} {}", "Saved".green(), output.display());
    }

    Ok(())
}

/// Run an optimization and display the report
pub async fn optimize(config: &Config, args: OptimizeArgs) -> Result<()> {
    let client = config.client()?;
    let sim_settings = SimulationSettings::from_temperatures(args.chamber_temp, args.bed_temp);

    let mut builder = OptimizationSettings::builder()
        .velocity_bounds_mm(args.min_velocity, args.max_velocity)
        .volumetric_bounds_mm3(args.min_flow, args.max_flow);
    if let Some(priority) = &args.priority {
        builder = builder.print_priority(priority);
    }
    if let (Some(from), Some(to)) = (args.from_layer, args.to_layer) {
        builder = builder.layer_range(from, to);
    }
    let opt_settings = builder.build();

    println!("Starting optimization for gcode {}...", args.gcode_id.bold());
    let report = client
        .run_optimization(
            &args.gcode_id,
            &sim_settings,
            &opt_settings,
            args.poll.to_config(),
        )
        .await
        .context("Optimization did not complete")?;

    println!();
    println!("{}", "=== Optimization Results ===".bold());
    println!("  ID: {}", report.id);
    if let Some(name) = &report.name {
        println!("  Name: {name}");
    }
    if let Some(mean) = report.quality_mean_improvement {
        println!("  Quality mean improvement: {mean:.3}");
    }
    if let Some(std) = report.quality_std_improvement {
        println!("  Quality std improvement: {std:.3}");
    }

    if let Some(output) = args.output {
        let url = report
            .optimized_gcode_with_thermal_indexes_url
            .as_deref()
            .context("Optimization produced no optimized G-code")?;
        client.download_artifact(url, &output).await?;
        println!("{} {}", "Saved".green(), output.display());
    }

    Ok(())
}

fn print_simulation_report(report: &SimulationReport) {
    println!();
    println!("{}", "=== Simulation Results ===".bold());
    println!("  ID: {}", report.id);
    if let Some(name) = &report.name {
        println!("  Name: {name}");
    }

    if let Some(info) = &report.print_info {
        if let Some(outcome) = &info.print_outcome {
            println!("  Print outcome: {}", outcome.bold());
        }
        if let Some(description) = &info.print_outcome_description {
            println!("    {}", description.dimmed());
        }
        if let Some(direction) = &info.temperature_direction {
            println!("  Temperature direction: {direction}");
        }
        if let Some(description) = &info.temperature_direction_description {
            println!("    {}", description.dimmed());
        }
        if !info.caveats.is_empty() {
            println!("  Caveats:");
            for caveat in &info.caveats {
                println!(
                    "    - [{}] {}",
                    caveat.caveat_type.as_deref().unwrap_or(""),
                    caveat.description.as_deref().unwrap_or("")
                );
            }
        }
    }

    if let Some(speed_factor) = report.speed_factor {
        println!("  Speed factor: {speed_factor}");
    }

    if !report.suggested_fixes.is_empty() {
        println!("  Suggested fixes:");
        for fix in &report.suggested_fixes {
            println!(
                "    [{}] {}",
                fix.category.as_deref().unwrap_or(""),
                fix.fix.as_deref().unwrap_or("")
            );
            for detail in &fix.extra_details {
                println!("      - {detail}");
            }
        }
    }
}
