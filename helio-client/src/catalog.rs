//! Catalog and account queries
//!
//! Supported printers and materials (paginated), per-material print
//! priority options, and the account's remaining optimization quota.

use serde_json::{Value, json};
use tracing::debug;

use helio_core::catalog::{
    Material, PageInfo, PrintPriorityOption, Printer, RecentRuns, UserQuota,
};
use helio_core::optimization::DefaultOptimizationSettings;

use crate::error::{ClientError, Result};
use crate::{HelioClient, Operation, queries};

impl HelioClient {
    /// Fetch all supported printers, walking every page.
    pub async fn list_printers(&self) -> Result<Vec<Printer>> {
        self.list_paginated(queries::QUERY_PRINTERS, "printers")
            .await
    }

    /// Fetch all supported filament materials, walking every page.
    ///
    /// Non-filament feedstocks (pellets) are filtered out; the FDM
    /// workflows this client serves cannot use them.
    pub async fn list_materials(&self) -> Result<Vec<Material>> {
        let materials: Vec<Material> = self
            .list_paginated(queries::QUERY_MATERIALS, "materials")
            .await?;
        Ok(materials.into_iter().filter(Material::is_filament).collect())
    }

    /// Print priority options available for a material.
    pub async fn print_priority_options(
        &self,
        material_id: &str,
    ) -> Result<Vec<PrintPriorityOption>> {
        let operation = Operation::new(queries::QUERY_PRINT_PRIORITY_OPTIONS)
            .variable("materialId", json!(material_id));
        let data = self
            .execute_for_data("printPriorityOptions", operation)
            .await?;
        let options = data
            .get("printPriorityOptions")
            .cloned()
            .unwrap_or(Value::Array(Vec::new()));
        serde_json::from_value(options)
            .map_err(|e| ClientError::protocol(format!("malformed priority options: {e}"), None))
    }

    /// Remaining optimization quota for the authenticated account.
    pub async fn user_quota(&self) -> Result<UserQuota> {
        let operation = Operation::new(queries::QUERY_USER_QUOTA);
        let data = self.execute_for_data("user quota", operation).await?;
        let user = data
            .get("user")
            .filter(|v| !v.is_null())
            .ok_or_else(|| ClientError::protocol("quota query returned no user", None))?;
        let mut quota: UserQuota = serde_json::from_value(user.clone())
            .map_err(|e| ClientError::protocol(format!("malformed quota payload: {e}"), None))?;
        // Eligibility is a sibling of the user object in this query.
        quota.free_trial_eligibility = data.get("freeTrialEligibility").and_then(Value::as_bool);
        Ok(quota)
    }

    /// Server-recommended optimization settings for a registered G-code.
    pub async fn default_optimization_settings(
        &self,
        gcode_id: &str,
    ) -> Result<DefaultOptimizationSettings> {
        let operation = Operation::new(queries::QUERY_DEFAULT_OPT_SETTINGS)
            .variable("gcodeId", json!(gcode_id));
        let data = self
            .execute_for_data("defaultOptimizationSettings", operation)
            .await?;
        let defaults = data
            .get("defaultOptimizationSettings")
            .filter(|v| !v.is_null())
            .ok_or_else(|| {
                ClientError::protocol(
                    format!("no default optimization settings for gcode {gcode_id}"),
                    None,
                )
            })?;
        serde_json::from_value(defaults.clone())
            .map_err(|e| ClientError::protocol(format!("malformed default settings: {e}"), None))
    }

    /// The account's recent simulations and optimizations.
    pub async fn recent_runs(&self) -> Result<RecentRuns> {
        let operation = Operation::new(queries::QUERY_RECENT_RUNS);
        let data = self.execute_for_data("recent runs", operation).await?;
        Ok(RecentRuns {
            simulations: listing_objects(&data, "simulations")?,
            optimizations: listing_objects(&data, "optimizations")?,
        })
    }

    /// Walk a paginated catalog query, concatenating the `objects` of every
    /// page until `pageInfo.hasNextPage` is false.
    async fn list_paginated<T: serde::de::DeserializeOwned>(
        &self,
        document: &'static str,
        field: &str,
    ) -> Result<Vec<T>> {
        let mut all = Vec::new();
        let mut page: i64 = 1;

        loop {
            let operation = Operation::new(document).variable("page", json!(page));
            let data = self.execute_for_data(field, operation).await?;
            let listing = match data.get(field) {
                Some(Value::Null) | None => break,
                Some(listing) => listing,
            };

            if let Some(objects) = listing.get("objects").and_then(Value::as_array) {
                for object in objects {
                    let item = serde_json::from_value(object.clone()).map_err(|e| {
                        ClientError::protocol(format!("malformed {field} entry: {e}"), None)
                    })?;
                    all.push(item);
                }
            }

            let page_info: PageInfo = match listing.get("pageInfo") {
                Some(info) => serde_json::from_value(info.clone()).map_err(|e| {
                    ClientError::protocol(format!("malformed {field} page info: {e}"), None)
                })?,
                None => PageInfo::default(),
            };
            debug!(
                field,
                page,
                total = all.len(),
                has_next = page_info.has_next_page,
                "fetched catalog page"
            );
            if !page_info.has_next_page {
                break;
            }
            page += 1;
        }

        Ok(all)
    }
}

/// Decode the `objects` array of one run listing in the response data.
fn listing_objects<T: serde::de::DeserializeOwned>(data: &Value, field: &str) -> Result<Vec<T>> {
    let objects = match data.pointer(&format!("/{field}/objects")) {
        Some(Value::Array(objects)) => objects,
        Some(Value::Null) | None => return Ok(Vec::new()),
        Some(_) => {
            return Err(ClientError::protocol(
                format!("{field} listing is not an array"),
                None,
            ));
        }
    };
    objects
        .iter()
        .map(|object| {
            serde_json::from_value(object.clone()).map_err(|e| {
                ClientError::protocol(format!("malformed {field} entry: {e}"), None)
            })
        })
        .collect()
}
