//! G-code upload and artifact download handlers

use std::path::Path;

use anyhow::Result;
use colored::*;

use crate::config::Config;

/// Upload a G-code file and wait for server-side processing
pub async fn upload(config: &Config, file: &Path, printer: &str, material: &str) -> Result<()> {
    let client = config.client()?;

    println!("Uploading {}...", file.display());
    let gcode_id = client
        .upload_and_register_gcode(file, printer, material)
        .await?;

    println!("{}", "G-code registered and ready.".green());
    println!("  gcode id: {}", gcode_id.bold());
    Ok(())
}

/// Download a result artifact to a local file
pub async fn download(config: &Config, url: &str, output: &Path) -> Result<()> {
    let client = config.client()?;
    client.download_artifact(url, output).await?;
    println!("{} {}", "Saved".green(), output.display());
    Ok(())
}
