//! Catalog and account records
//!
//! Printers, materials, print priority options, and quota information as
//! returned by the catalog queries. Ids are opaque server-issued strings.

use serde::Deserialize;

/// Alternative names a catalog entry is known by in slicer integrations.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlternativeNames {
    #[serde(default)]
    pub bambustudio: Option<String>,
}

/// A printer model supported by the simulation service.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Printer {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub alternative_names: Option<AlternativeNames>,
}

/// A material supported by the simulation service.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub id: String,
    pub name: String,
    /// Feedstock type, e.g. `FILAMENT` or `PELLET`.
    #[serde(default)]
    pub feedstock: Option<String>,
    #[serde(default)]
    pub alternative_names: Option<AlternativeNames>,
}

impl Material {
    pub fn is_filament(&self) -> bool {
        self.feedstock.as_deref() == Some("FILAMENT")
    }
}

/// One selectable print priority for a material.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintPriorityOption {
    pub value: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub is_available: Option<bool>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Account subscription summary.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    #[serde(default)]
    pub name: Option<String>,
}

/// Remaining optimization quota for the authenticated account.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuota {
    #[serde(default)]
    pub remaining_opts_this_month: Option<i64>,
    #[serde(default)]
    pub add_on_optimizations: Option<i64>,
    #[serde(default)]
    pub is_free_trial_active: Option<bool>,
    #[serde(default)]
    pub is_free_trial_claimed: Option<bool>,
    /// Whether the account may still claim a free trial. Lives next to the
    /// `user` object in the quota response, not inside it; the client fills
    /// it in after decoding.
    #[serde(default)]
    pub free_trial_eligibility: Option<bool>,
    #[serde(default)]
    pub subscription: Option<Subscription>,
}

/// Pagination marker shared by the catalog list queries.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default)]
    pub has_next_page: bool,
}

/// Id/name pair referencing a catalog entry from a run listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogRef {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// G-code metadata attached to a recent run.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GcodeSummary {
    #[serde(default)]
    pub gcode_url: Option<String>,
    #[serde(default)]
    pub gcode_key: Option<String>,
    #[serde(default)]
    pub material: Option<CatalogRef>,
    #[serde(default)]
    pub printer: Option<CatalogRef>,
    #[serde(default)]
    pub number_of_layers: Option<i64>,
    #[serde(default)]
    pub slicer: Option<String>,
}

/// One simulation from the account's run history.
///
/// Listing entries may be in any lifecycle state, so the status stays a raw
/// label here; only the polling path enforces the strict status contract.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentSimulation {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub thermal_index_gcode_url: Option<String>,
    #[serde(default)]
    pub print_info: Option<crate::simulation::PrintInfo>,
    #[serde(default)]
    pub gcode: Option<GcodeSummary>,
}

/// One optimization from the account's run history.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentOptimization {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub optimized_gcode_with_thermal_indexes_url: Option<String>,
    #[serde(default)]
    pub quality_mean_improvement: Option<f64>,
    #[serde(default)]
    pub quality_std_improvement: Option<f64>,
    #[serde(default)]
    pub gcode: Option<GcodeSummary>,
}

/// The account's recent simulations and optimizations.
#[derive(Debug, Clone, Default)]
pub struct RecentRuns {
    pub simulations: Vec<RecentSimulation>,
    pub optimizations: Vec<RecentOptimization>,
}
