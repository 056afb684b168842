//! Optimization workflow
//!
//! Creates a G-code optimization run and waits for it.

use serde_json::json;
use tracing::info;

use helio_core::job::{JobHandle, JobKind, JobOutcome};
use helio_core::optimization::{OptimizationReport, OptimizationSettings};
use helio_core::simulation::SimulationSettings;

use crate::error::{ClientError, Result};
use crate::poller::{JobPoller, PollConfig};
use crate::{HelioClient, Operation, generate_run_name, queries};

impl HelioClient {
    /// Create an optimization for a registered G-code.
    ///
    /// The simulation settings describe the thermal boundary conditions the
    /// optimizer simulates against; the optimization settings bound the
    /// search space.
    pub async fn create_optimization(
        &self,
        gcode_id: &str,
        sim_settings: &SimulationSettings,
        opt_settings: &OptimizationSettings,
    ) -> Result<JobHandle> {
        let input = json!({
            "name": generate_run_name(),
            "gcodeId": gcode_id,
            "simulationSettings": sim_settings,
            "optimizationSettings": opt_settings,
        });
        let operation =
            Operation::new(queries::MUTATION_CREATE_OPTIMIZATION).variable("input", input);
        let data = self
            .execute_for_data("createOptimization", operation)
            .await?;

        let id = data
            .pointer("/createOptimization/id")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| {
                ClientError::protocol("createOptimization returned no id", None)
            })?;
        info!(optimization_id = id, "optimization created");
        Ok(JobHandle::new(id, JobKind::Optimization))
    }

    /// Create an optimization and wait for its result.
    pub async fn run_optimization(
        &self,
        gcode_id: &str,
        sim_settings: &SimulationSettings,
        opt_settings: &OptimizationSettings,
        poll: PollConfig,
    ) -> Result<OptimizationReport> {
        let handle = self
            .create_optimization(gcode_id, sim_settings, opt_settings)
            .await?;
        match JobPoller::new(self, poll).await_completion(&handle).await? {
            JobOutcome::Optimization(report) => Ok(report),
            JobOutcome::Simulation(_) => Err(ClientError::protocol(
                "optimization job returned a simulation payload",
                None,
            )),
        }
    }
}
