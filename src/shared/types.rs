use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

/// A selectable entry for a system, dimension, or unit list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "units.ts")]
pub struct SelectOption {
    pub value: String, // Entity code (e.g., "SI", "length", "cm")
    pub label: String, // Display name (e.g., "Centimeter")
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Sort options by label, breaking ties by code
pub fn sort_options(mut options: Vec<SelectOption>) -> Vec<SelectOption> {
    options.sort_by(|a, b| a.label.cmp(&b.label).then_with(|| a.value.cmp(&b.value)));
    options
}

// ============================================================================
// Catalog payload
// ============================================================================

/// Configuration payload the converter is built from.
///
/// Every section maps an entity code to its metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogPayload {
    #[serde(default)]
    pub systems: BTreeMap<String, SystemData>,
    #[serde(default)]
    pub dimensions: BTreeMap<String, DimensionData>,
    #[serde(default)]
    pub units: BTreeMap<String, UnitData>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemData {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub dimensions: BTreeSet<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DimensionData {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_unit: Option<String>,
    #[serde(default)]
    pub units: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitData {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_plural: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_plural: Option<String>,
    pub system: String,
    pub dimension: String,
    /// Amount of the dimension's base unit in one of this unit
    #[serde(deserialize_with = "deserialize_ratio")]
    pub ratio: f64,
}

/// Ratios arrive either as JSON numbers or as decimal strings (exported
/// straight from a decimal column).
fn deserialize_ratio<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrString {
        Num(f64),
        Str(String),
    }

    match NumOrString::deserialize(deserializer)? {
        NumOrString::Num(n) => Ok(n),
        NumOrString::Str(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| serde::de::Error::custom(format!("invalid ratio '{}': {}", s, e))),
    }
}

// ============================================================================
// Field set DTOs
// ============================================================================

/// Plain-data view of a quantity for hosts and logs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "units.ts")]
pub struct QuantitySnapshot {
    pub scalar: Option<f64>,
    pub unit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "units.ts")]
pub struct FieldSnapshot {
    pub id: String,
    pub current: Option<QuantitySnapshot>,
    pub default: Option<QuantitySnapshot>,
    pub undo_depth: usize,
    pub redo_depth: usize,
}

/// User input events a field set reacts to.
///
/// The view has already been updated when an event arrives (the new
/// selection or text is in place); the event only says what changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type")]
#[ts(export, export_to = "units.ts")]
pub enum FieldEvent {
    SystemChanged,
    DimensionChanged,
    UnitChanged,
    /// The scalar input lost focus
    ScalarCommitted,
    Reset,
    Undo,
    Redo,
}
