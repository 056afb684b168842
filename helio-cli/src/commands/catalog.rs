//! Catalog command handlers
//!
//! Printers, materials, print priorities, and quota display.

use anyhow::Result;
use colored::*;

use crate::config::Config;

/// List all supported printers
pub async fn list_printers(config: &Config) -> Result<()> {
    let client = config.client()?;
    let printers = client.list_printers().await?;

    if printers.is_empty() {
        println!("{}", "No printers found.".yellow());
        return Ok(());
    }

    println!("{}", format!("Found {} printer(s):", printers.len()).bold());
    println!();
    for printer in printers {
        let slicer_name = printer
            .alternative_names
            .and_then(|names| names.bambustudio)
            .unwrap_or_default();
        if slicer_name.is_empty() {
            println!("  {}  {}", printer.id.dimmed(), printer.name);
        } else {
            println!(
                "  {}  {} ({})",
                printer.id.dimmed(),
                printer.name,
                slicer_name.dimmed()
            );
        }
    }

    Ok(())
}

/// List all supported filament materials
pub async fn list_materials(config: &Config) -> Result<()> {
    let client = config.client()?;
    let materials = client.list_materials().await?;

    if materials.is_empty() {
        println!("{}", "No materials found.".yellow());
        return Ok(());
    }

    println!(
        "{}",
        format!("Found {} material(s):", materials.len()).bold()
    );
    println!();
    for material in materials {
        println!("  {}  {}", material.id.dimmed(), material.name);
    }

    Ok(())
}

/// List print priority options for a material
pub async fn list_priorities(config: &Config, material_id: &str) -> Result<()> {
    let client = config.client()?;
    let options = client.print_priority_options(material_id).await?;

    if options.is_empty() {
        println!("{}", "No print priority options available.".yellow());
        return Ok(());
    }

    for option in options {
        let marker = if option.is_available.unwrap_or(false) {
            option.value.green()
        } else {
            format!("{} (unavailable)", option.value).dimmed()
        };
        println!("  {}", marker);
        if let Some(description) = option.description {
            println!("    {}", description.dimmed());
        }
    }

    Ok(())
}

/// Show remaining optimization quota
pub async fn show_quota(config: &Config) -> Result<()> {
    let client = config.client()?;
    let quota = client.user_quota().await?;

    println!("{}", "Account quota".bold());
    if let Some(subscription) = quota.subscription.and_then(|s| s.name) {
        println!("  Subscription: {subscription}");
    }
    if let Some(remaining) = quota.remaining_opts_this_month {
        println!("  Optimizations left this month: {remaining}");
    }
    if let Some(addon) = quota.add_on_optimizations {
        println!("  Add-on optimizations: {addon}");
    }
    if quota.is_free_trial_active.unwrap_or(false) {
        println!("  {}", "Free trial active".green());
    } else if quota.free_trial_eligibility.unwrap_or(false) {
        println!("  {}", "Free trial available".green());
    }

    Ok(())
}

/// Show server-recommended optimization settings for a G-code
pub async fn show_defaults(config: &Config, gcode_id: &str) -> Result<()> {
    let client = config.client()?;
    let defaults = client.default_optimization_settings(gcode_id).await?;

    println!("{}", "Recommended optimization settings".bold());
    if let Some(optimizer) = defaults.optimizer {
        println!("  Optimizer: {optimizer}");
    }
    if let (Some(min), Some(max)) = (defaults.min_velocity, defaults.max_velocity) {
        println!("  Velocity: {min} .. {max} m/s");
    }
    if let (Some(min), Some(max)) = (
        defaults.min_extruder_flow_rate,
        defaults.max_extruder_flow_rate,
    ) {
        println!("  Flow rate: {min} .. {max} m^3/s");
    }
    if let Some(tolerance) = defaults.tolerance {
        println!("  Tolerance: {tolerance}");
    }
    if let Some(iterations) = defaults.max_iterations {
        println!("  Max iterations: {iterations}");
    }
    if let Some(layers) = defaults.layers_to_optimize {
        for range in layers {
            let to = if range.to_layer == -1 {
                "last".to_string()
            } else {
                range.to_layer.to_string()
            };
            println!("  Layers: {} .. {}", range.from_layer, to);
        }
    }

    Ok(())
}

/// List the account's recent simulations and optimizations
pub async fn list_runs(config: &Config) -> Result<()> {
    let client = config.client()?;
    let runs = client.recent_runs().await?;

    if runs.simulations.is_empty() && runs.optimizations.is_empty() {
        println!("{}", "No recent runs.".yellow());
        return Ok(());
    }

    if !runs.simulations.is_empty() {
        println!("{}", "Simulations".bold());
        for run in runs.simulations {
            let name = run.name.unwrap_or_else(|| "(unnamed)".to_string());
            let status = run.status.unwrap_or_default();
            let outcome = run
                .print_info
                .and_then(|info| info.print_outcome)
                .unwrap_or_default();
            if outcome.is_empty() {
                println!("  {}  {} [{}]", run.id.dimmed(), name, status.cyan());
            } else {
                println!(
                    "  {}  {} [{}] {}",
                    run.id.dimmed(),
                    name,
                    status.cyan(),
                    outcome.dimmed()
                );
            }
        }
        println!();
    }

    if !runs.optimizations.is_empty() {
        println!("{}", "Optimizations".bold());
        for run in runs.optimizations {
            let name = run.name.unwrap_or_else(|| "(unnamed)".to_string());
            let status = run.status.unwrap_or_default();
            match run.quality_mean_improvement {
                Some(improvement) => println!(
                    "  {}  {} [{}] quality +{:.1}%",
                    run.id.dimmed(),
                    name,
                    status.cyan(),
                    improvement * 100.0
                ),
                None => println!("  {}  {} [{}]", run.id.dimmed(), name, status.cyan()),
            }
        }
    }

    Ok(())
}
