//! Artifact download helpers
//!
//! Result payloads reference artifacts by URL (optimized G-code, thermal
//! index G-code, mesh files). These helpers fetch them to local files and
//! look up mesh URLs for finished runs.

use std::path::Path;

use serde_json::{Value, json};
use tracing::info;

use crate::error::{ClientError, Result};
use crate::{HelioClient, Operation, queries};

/// One downloadable mesh asset.
#[derive(Debug, Clone)]
pub struct MeshAsset {
    pub asset_type: Option<String>,
    pub url: String,
}

impl HelioClient {
    /// Download an artifact URL to a local file.
    ///
    /// A 404 is reported distinctly: the asset may simply not exist for
    /// this run (e.g. meshes for a job that produced none).
    pub async fn download_artifact(&self, url: &str, output: &Path) -> Result<()> {
        let response = self.http_client().get(url).send().await?;

        if response.status().as_u16() == 404 {
            return Err(ClientError::transport(
                "artifact not found (404); the requested data may not exist for this run",
            ));
        }
        if !response.status().is_success() {
            return Err(ClientError::transport(format!(
                "artifact download failed: HTTP {}",
                response.status().as_u16()
            )));
        }

        let bytes = response.bytes().await?;
        tokio::fs::write(output, &bytes).await.map_err(|e| {
            ClientError::Config(format!("cannot write {}: {e}", output.display()))
        })?;
        info!(path = %output.display(), size = bytes.len(), "artifact downloaded");
        Ok(())
    }

    /// Mesh URL for a finished simulation, when the server produced one.
    pub async fn simulation_mesh(&self, simulation_id: &str) -> Result<Option<MeshAsset>> {
        let operation =
            Operation::new(queries::QUERY_SIMULATION_MESH).variable("id", json!(simulation_id));
        let data = self.execute_for_data("simulation mesh", operation).await?;
        Ok(mesh_asset(data.pointer("/simulation/meshUrl")))
    }

    /// Original and optimized mesh URLs for a finished optimization.
    pub async fn optimization_meshes(
        &self,
        optimization_id: &str,
    ) -> Result<(Option<MeshAsset>, Option<MeshAsset>)> {
        let operation =
            Operation::new(queries::QUERY_OPTIMIZATION_MESH).variable("id", json!(optimization_id));
        let data = self
            .execute_for_data("optimization meshes", operation)
            .await?;
        Ok((
            mesh_asset(data.pointer("/optimization/originalMeshAsset")),
            mesh_asset(data.pointer("/optimization/optimizedMeshAsset")),
        ))
    }
}

fn mesh_asset(value: Option<&Value>) -> Option<MeshAsset> {
    let value = value?;
    let url = value.get("url")?.as_str()?;
    Some(MeshAsset {
        asset_type: value
            .get("assetType")
            .and_then(Value::as_str)
            .map(str::to_string),
        url: url.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mesh_asset_requires_url() {
        assert!(mesh_asset(None).is_none());
        assert!(mesh_asset(Some(&json!(null))).is_none());
        assert!(mesh_asset(Some(&json!({"assetType": "MESH"}))).is_none());

        let asset = mesh_asset(Some(&json!({
            "assetType": "MESH",
            "url": "https://cdn.example/mesh.vtk"
        })))
        .unwrap();
        assert_eq!(asset.url, "https://cdn.example/mesh.vtk");
        assert_eq!(asset.asset_type.as_deref(), Some("MESH"));
    }
}
