//! Column name normalization and the canonical production run column names

use polars::prelude::*;

use super::error::{PipelineError, PipelineResult};

pub const CATALYST_USAGE: &str = "Catalyst_Usage_(kg)";
pub const ENERGY_CONSUMPTION: &str = "Energy_Consumption_(kWh)";
pub const RAW_MATERIAL_INPUT: &str = "Raw_Material_Input_(kg)";
pub const BIOFUEL_YIELD: &str = "Biofuel_Yield_(L)";

pub const TOTAL_RESOURCE_INPUT: &str = "Total_Resource_Input";
pub const RESOURCE_EFFICIENCY: &str = "Resource_Efficiency";

/// The three resource inputs, in the order they are summed and charted.
pub const RESOURCE_COLUMNS: [&str; 3] = [CATALYST_USAGE, ENERGY_CONSUMPTION, RAW_MATERIAL_INPUT];

/// Every column the metrics calculator needs.
pub const REQUIRED_COLUMNS: [&str; 4] = [
    CATALYST_USAGE,
    ENERGY_CONSUMPTION,
    RAW_MATERIAL_INPUT,
    BIOFUEL_YIELD,
];

/// Normalize a raw header into its canonical identifier.
///
/// Surrounding whitespace is stripped and every remaining space becomes an
/// underscore, so `" Catalyst Usage (kg) "` becomes `"Catalyst_Usage_(kg)"`.
/// Applying it twice gives the same result as applying it once.
pub fn normalize_column_name(raw: &str) -> String {
    raw.trim().replace(' ', "_")
}

/// Normalize every column name of an existing DataFrame in place, keeping order.
pub fn normalize_column_names(df: &mut DataFrame) -> PipelineResult<()> {
    let normalized: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| normalize_column_name(name.as_str()))
        .collect();

    if let Some(duplicate) = first_duplicate(&normalized) {
        return Err(PipelineError::malformed(
            "<table>",
            format!("duplicate column '{}' after normalization", duplicate),
        ));
    }

    df.set_column_names(normalized.iter().map(|s| s.as_str()))?;
    Ok(())
}

/// Fail with `MissingColumn` naming the first required column that is absent.
pub fn ensure_columns(df: &DataFrame, required: &[&str]) -> PipelineResult<()> {
    let schema = df.schema();
    match required.iter().find(|name| schema.get(name).is_none()) {
        Some(missing) => Err(PipelineError::MissingColumn(missing.to_string())),
        None => Ok(()),
    }
}

pub(crate) fn first_duplicate(names: &[String]) -> Option<&str> {
    names
        .iter()
        .enumerate()
        .find(|(i, name)| names[..*i].contains(name))
        .map(|(_, name)| name.as_str())
}
