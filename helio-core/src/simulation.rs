//! Simulation settings and results
//!
//! Input settings serialize into the `simulationSettings` field of the
//! `CreateSimulation` mutation; the report mirrors the fields the poll query
//! asks for. All temperatures on the wire are Kelvin.

use serde::{Deserialize, Serialize};

/// Height below which layer temperatures are considered unstabilized, in
/// meters. Matches the 20 mm default threshold used by slicer integrations.
pub const TEMPERATURE_STABILIZATION_HEIGHT_M: f64 = 0.020;

const KELVIN_OFFSET: f64 = 273.15;

/// Thermal boundary conditions for a simulation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature_stabilization_height: Option<f64>,
    /// Initial air temperature just above the build plate, Kelvin.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub air_temperature_above_build_plate: Option<f64>,
    /// Steady-state chamber air temperature, Kelvin.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stabilized_air_temperature: Option<f64>,
}

impl SimulationSettings {
    /// Derive settings from printer temperatures in Celsius.
    ///
    /// The stabilization height is always set. When a positive chamber
    /// temperature is given the stabilized air temperature is set from it;
    /// with a positive bed temperature as well, the air just above the build
    /// plate starts at the mean of the two.
    pub fn from_temperatures(chamber_temp_c: Option<f64>, bed_temp_c: Option<f64>) -> Self {
        let mut settings = Self {
            temperature_stabilization_height: Some(TEMPERATURE_STABILIZATION_HEIGHT_M),
            ..Self::default()
        };

        if let Some(chamber) = chamber_temp_c.filter(|t| *t > 0.0) {
            if let Some(bed) = bed_temp_c.filter(|t| *t > 0.0) {
                let initial_air = (chamber + bed) / 2.0;
                settings.air_temperature_above_build_plate = Some(initial_air + KELVIN_OFFSET);
            }
            settings.stabilized_air_temperature = Some(chamber + KELVIN_OFFSET);
        }

        settings
    }
}

/// Warning attached to a simulated print outcome.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Caveat {
    #[serde(default)]
    pub caveat_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Qualitative assessment of the simulated print.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintInfo {
    #[serde(default)]
    pub print_outcome: Option<String>,
    #[serde(default)]
    pub print_outcome_description: Option<String>,
    #[serde(default)]
    pub temperature_direction: Option<String>,
    #[serde(default)]
    pub temperature_direction_description: Option<String>,
    #[serde(default)]
    pub caveats: Vec<Caveat>,
}

/// One suggested parameter change from the simulation engine.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedFix {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub fix: Option<String>,
    #[serde(default)]
    pub order_index: Option<i64>,
    #[serde(default)]
    pub extra_details: Vec<String>,
}

/// Final simulation result payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationReport {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub progress: Option<f64>,
    /// Downloadable G-code annotated with thermal indexes.
    #[serde(default)]
    pub thermal_index_gcode_url: Option<String>,
    #[serde(default)]
    pub print_info: Option<PrintInfo>,
    #[serde(default)]
    pub speed_factor: Option<f64>,
    #[serde(default)]
    pub suggested_fixes: Vec<SuggestedFix>,
}
