//! Simulation workflow
//!
//! Creates a thermal simulation for a registered G-code and waits for it.

use serde_json::json;
use tracing::info;

use helio_core::job::{JobHandle, JobKind, JobOutcome};
use helio_core::simulation::{SimulationReport, SimulationSettings};

use crate::error::{ClientError, Result};
use crate::poller::{JobPoller, PollConfig};
use crate::{HelioClient, Operation, generate_run_name, queries};

impl HelioClient {
    /// Create a simulation for a registered G-code.
    ///
    /// Returns the handle identifying the remote job; pair it with a
    /// [`JobPoller`] to wait for the result.
    pub async fn create_simulation(
        &self,
        gcode_id: &str,
        settings: &SimulationSettings,
    ) -> Result<JobHandle> {
        let input = json!({
            "name": generate_run_name(),
            "gcodeId": gcode_id,
            "simulationSettings": settings,
        });
        let operation =
            Operation::new(queries::MUTATION_CREATE_SIMULATION).variable("input", input);
        let data = self.execute_for_data("createSimulation", operation).await?;

        let id = data
            .pointer("/createSimulation/id")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| {
                ClientError::protocol("createSimulation returned no id", None)
            })?;
        info!(simulation_id = id, "simulation created");
        Ok(JobHandle::new(id, JobKind::Simulation))
    }

    /// Create a simulation and wait for its result.
    pub async fn run_simulation(
        &self,
        gcode_id: &str,
        settings: &SimulationSettings,
        poll: PollConfig,
    ) -> Result<SimulationReport> {
        let handle = self.create_simulation(gcode_id, settings).await?;
        match JobPoller::new(self, poll).await_completion(&handle).await? {
            JobOutcome::Simulation(report) => Ok(report),
            JobOutcome::Optimization(_) => Err(ClientError::protocol(
                "simulation job returned an optimization payload",
                None,
            )),
        }
    }
}
