//! Optimization settings and results
//!
//! Builder for the `optimizationSettings` mutation input plus the result
//! report. Public inputs use slicer units (mm/s, mm^3/s); the wire schema is
//! SI (m/s, m^3/s), converted at build time.

use serde::{Deserialize, Serialize};

/// Layers below this index are never optimized; slicer priming and adhesion
/// moves live there.
pub const MIN_OPTIMIZABLE_LAYER: i64 = 2;

/// Convert a speed from mm/s to m/s.
pub fn speed_mm_to_m(mm_per_s: f64) -> f64 {
    round_to(mm_per_s / 1_000.0, 9)
}

/// Convert a volumetric flow rate from mm^3/s to m^3/s.
pub fn volumetric_mm3_to_m3(mm3_per_s: f64) -> f64 {
    mm3_per_s / 1e9
}

fn round_to(value: f64, digits: u32) -> f64 {
    let factor = 10f64.powi(digits as i32);
    (value * factor).round() / factor
}

/// Residual reduction strategy for the optimizer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResidualStrategySettings {
    pub strategy: String,
}

/// Inclusive layer range to optimize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerRange {
    pub from_layer: i64,
    /// `-1` means the last layer.
    pub to_layer: i64,
}

/// Input settings for the `CreateOptimization` mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub print_priority: Option<String>,
    /// Legacy flag, only sent when no print priority is given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimize_outerwall: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_velocity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_velocity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_extruder_flow_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_extruder_flow_rate: Option<f64>,
    pub residual_strategy_settings: ResidualStrategySettings,
    pub optimizer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layers_to_optimize: Option<Vec<LayerRange>>,
}

impl Default for OptimizationSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl OptimizationSettings {
    pub fn builder() -> OptimizationSettingsBuilder {
        OptimizationSettingsBuilder::default()
    }
}

/// Builder accepting slicer units and producing wire-ready settings.
#[derive(Debug, Clone, Default)]
pub struct OptimizationSettingsBuilder {
    print_priority: Option<String>,
    optimize_outerwall: Option<bool>,
    min_velocity_mm: Option<f64>,
    max_velocity_mm: Option<f64>,
    min_volumetric_mm3: Option<f64>,
    max_volumetric_mm3: Option<f64>,
    layer_range: Option<(i64, i64)>,
}

impl OptimizationSettingsBuilder {
    /// Print priority value, e.g. `"QUALITY"` or `"SPEED"`. Takes precedence
    /// over the legacy outer-wall flag.
    pub fn print_priority(mut self, priority: impl Into<String>) -> Self {
        self.print_priority = Some(priority.into());
        self
    }

    pub fn optimize_outerwall(mut self, enabled: bool) -> Self {
        self.optimize_outerwall = Some(enabled);
        self
    }

    /// Velocity bounds in mm/s. Non-positive bounds are dropped.
    pub fn velocity_bounds_mm(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_velocity_mm = min;
        self.max_velocity_mm = max;
        self
    }

    /// Volumetric flow bounds in mm^3/s. Non-positive bounds are dropped.
    pub fn volumetric_bounds_mm3(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_volumetric_mm3 = min;
        self.max_volumetric_mm3 = max;
        self
    }

    /// Layer range to optimize; `to_layer == -1` means the last layer.
    pub fn layer_range(mut self, from_layer: i64, to_layer: i64) -> Self {
        self.layer_range = Some((from_layer, to_layer));
        self
    }

    pub fn build(self) -> OptimizationSettings {
        let positive = |v: Option<f64>| v.filter(|x| *x > 0.0);

        // Legacy outer-wall flag is mutually exclusive with print priority.
        let (print_priority, optimize_outerwall) = match self.print_priority {
            Some(priority) => (Some(priority), None),
            None => (None, self.optimize_outerwall),
        };

        OptimizationSettings {
            print_priority,
            optimize_outerwall,
            min_velocity: positive(self.min_velocity_mm).map(speed_mm_to_m),
            max_velocity: positive(self.max_velocity_mm).map(speed_mm_to_m),
            min_extruder_flow_rate: positive(self.min_volumetric_mm3).map(volumetric_mm3_to_m3),
            max_extruder_flow_rate: positive(self.max_volumetric_mm3).map(volumetric_mm3_to_m3),
            residual_strategy_settings: ResidualStrategySettings {
                strategy: "LINEAR".to_string(),
            },
            optimizer: "HYBRID".to_string(),
            layers_to_optimize: self.layer_range.map(|(from, to)| {
                vec![LayerRange {
                    from_layer: from.max(MIN_OPTIMIZABLE_LAYER),
                    to_layer: to,
                }]
            }),
        }
    }
}

/// Server-recommended optimization settings for a registered G-code.
///
/// Returned by the defaults query; all bounds are SI units as stored
/// server-side. The strategy blobs are server-owned tuning parameters and
/// are carried opaquely.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultOptimizationSettings {
    #[serde(default)]
    pub min_velocity: Option<f64>,
    #[serde(default)]
    pub max_velocity: Option<f64>,
    #[serde(default)]
    pub min_velocity_increment: Option<f64>,
    #[serde(default)]
    pub min_extruder_flow_rate: Option<f64>,
    #[serde(default)]
    pub max_extruder_flow_rate: Option<f64>,
    #[serde(default)]
    pub tolerance: Option<f64>,
    #[serde(default)]
    pub max_iterations: Option<i64>,
    #[serde(default)]
    pub reduction_strategy_settings: Option<serde_json::Value>,
    #[serde(default)]
    pub residual_strategy_settings: Option<serde_json::Value>,
    #[serde(default)]
    pub layers_to_optimize: Option<Vec<LayerRange>>,
    #[serde(default)]
    pub optimizer: Option<String>,
}

/// Final optimization result payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationReport {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub progress: Option<f64>,
    /// Downloadable optimized G-code annotated with thermal indexes.
    #[serde(default)]
    pub optimized_gcode_with_thermal_indexes_url: Option<String>,
    #[serde(default)]
    pub quality_mean_improvement: Option<f64>,
    #[serde(default)]
    pub quality_std_improvement: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn speed_conversion_to_si() {
        assert_eq!(speed_mm_to_m(1000.0), 1.0);
        assert_eq!(speed_mm_to_m(150.0), 0.15);
    }

    #[test]
    fn volumetric_conversion_to_si() {
        assert_eq!(volumetric_mm3_to_m3(1e9), 1.0);
        assert_eq!(volumetric_mm3_to_m3(12.0), 12.0 / 1e9);
    }

    #[test]
    fn builder_always_sets_hybrid_optimizer_and_linear_residuals() {
        let settings = OptimizationSettings::builder().build();
        assert_eq!(settings.optimizer, "HYBRID");
        assert_eq!(settings.residual_strategy_settings.strategy, "LINEAR");
    }

    #[test]
    fn print_priority_suppresses_legacy_flag() {
        let settings = OptimizationSettings::builder()
            .print_priority("QUALITY")
            .optimize_outerwall(true)
            .build();
        assert_eq!(settings.print_priority.as_deref(), Some("QUALITY"));
        assert!(settings.optimize_outerwall.is_none());
    }

    #[test]
    fn legacy_flag_used_without_priority() {
        let settings = OptimizationSettings::builder()
            .optimize_outerwall(true)
            .build();
        assert!(settings.print_priority.is_none());
        assert_eq!(settings.optimize_outerwall, Some(true));
    }

    #[test]
    fn bounds_convert_units_and_drop_non_positive() {
        let settings = OptimizationSettings::builder()
            .velocity_bounds_mm(Some(20.0), Some(0.0))
            .volumetric_bounds_mm3(None, Some(12.0))
            .build();
        assert_eq!(settings.min_velocity, Some(0.02));
        assert!(settings.max_velocity.is_none());
        assert!(settings.min_extruder_flow_rate.is_none());
        assert_eq!(settings.max_extruder_flow_rate, Some(12.0 / 1e9));
    }

    #[test]
    fn layer_range_clamps_from_layer() {
        let settings = OptimizationSettings::builder().layer_range(0, -1).build();
        let ranges = settings.layers_to_optimize.unwrap();
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].from_layer, MIN_OPTIMIZABLE_LAYER);
        assert_eq!(ranges[0].to_layer, -1);
    }

    #[test]
    fn settings_serialize_camel_case() {
        let settings = OptimizationSettings::builder()
            .print_priority("SPEED")
            .layer_range(5, 40)
            .build();
        let value = serde_json::to_value(&settings).unwrap();
        assert_eq!(
            value,
            json!({
                "printPriority": "SPEED",
                "residualStrategySettings": {"strategy": "LINEAR"},
                "optimizer": "HYBRID",
                "layersToOptimize": [{"fromLayer": 5, "toLayer": 40}]
            })
        );
    }

    #[test]
    fn default_settings_decode_server_payload() {
        let defaults: DefaultOptimizationSettings = serde_json::from_value(json!({
            "minVelocity": 0.01,
            "maxVelocity": 0.3,
            "minVelocityIncrement": 0.001,
            "tolerance": 0.05,
            "maxIterations": 12,
            "reductionStrategySettings": {"strategy": "AUTOLINEAR", "linearNodesLimit": 5000},
            "residualStrategySettings": {"strategy": "LINEAR", "exponentialPenaltyHigh": 2.0},
            "layersToOptimize": [{"fromLayer": 2, "toLayer": -1}],
            "optimizer": "HYBRID"
        }))
        .unwrap();
        assert_eq!(defaults.min_velocity, Some(0.01));
        assert_eq!(defaults.max_iterations, Some(12));
        assert_eq!(defaults.optimizer.as_deref(), Some("HYBRID"));
        let layers = defaults.layers_to_optimize.unwrap();
        assert_eq!(layers[0].from_layer, 2);
        assert_eq!(layers[0].to_layer, -1);
        assert!(defaults.reduction_strategy_settings.is_some());
    }

    #[test]
    fn report_decodes_poll_response_shape() {
        let report: OptimizationReport = serde_json::from_value(json!({
            "id": "opt-1",
            "name": "run",
            "progress": 100.0,
            "optimizedGcodeWithThermalIndexesUrl": "https://cdn.example/opt.gcode",
            "qualityMeanImprovement": 0.31,
            "qualityStdImprovement": 0.12
        }))
        .unwrap();
        assert_eq!(report.id, "opt-1");
        assert_eq!(report.quality_mean_improvement, Some(0.31));
    }
}
