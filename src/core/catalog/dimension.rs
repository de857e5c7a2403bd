use std::collections::BTreeSet;

use crate::shared::types::{sort_options, DimensionData, SelectOption};

use super::converter::Converter;
use super::system::UnitSystem;
use super::unit::Unit;

/// A dimension like length, volume, mass, etc.
///
/// Units are held by code and resolved through the converter on every call.
#[derive(Debug, Clone)]
pub struct Dimension {
    code: String,
    name: String,
    base_unit: Option<String>,
    unit_codes: BTreeSet<String>,
}

impl Dimension {
    pub fn new(code: impl Into<String>, data: DimensionData) -> Self {
        Self {
            code: code.into(),
            name: data.name,
            base_unit: data.base_unit,
            unit_codes: data.units,
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit_codes(&self) -> impl Iterator<Item = &str> {
        self.unit_codes.iter().map(String::as_str)
    }

    /// The unit every ratio in this dimension is expressed against
    pub fn base_unit<'c>(&self, converter: &'c Converter) -> Option<&'c Unit> {
        self.base_unit.as_deref().and_then(|code| converter.get_unit(code))
    }

    /// Units in this dimension, optionally restricted to one system.
    ///
    /// Codes that do not resolve are skipped.
    pub fn units<'c>(&self, converter: &'c Converter, system: Option<&UnitSystem>) -> Vec<&'c Unit> {
        self.unit_codes
            .iter()
            .filter_map(|code| {
                let unit = converter.get_unit(code);
                if unit.is_none() {
                    tracing::warn!(dimension = %self.code, unit = %code, "[Dimension] Skipping unknown unit");
                }
                unit
            })
            .filter(|unit| system.map_or(true, |s| unit.system_code() == s.code()))
            .collect()
    }

    /// Select options for the units in this dimension, sorted by label
    pub fn unit_options(&self, converter: &Converter, system: Option<&UnitSystem>) -> Vec<SelectOption> {
        sort_options(self.units(converter, system).into_iter().map(Unit::option).collect())
    }

    /// A select option for this dimension
    pub fn option(&self) -> SelectOption {
        SelectOption::new(self.code.clone(), self.name.clone())
    }

    pub(crate) fn to_data(&self) -> DimensionData {
        DimensionData {
            name: self.name.clone(),
            base_unit: self.base_unit.clone(),
            units: self.unit_codes.clone(),
        }
    }
}

impl PartialEq for Dimension {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for Dimension {}

#[cfg(test)]
mod tests {
    use crate::core::catalog::test_support::sample_converter;

    #[test]
    fn test_units_filtered_by_system() {
        let converter = sample_converter();
        let length = converter.get_dimension("length").unwrap();
        let si = converter.get_system("SI").unwrap();

        let all: Vec<&str> = length.units(&converter, None).iter().map(|u| u.code()).collect();
        assert_eq!(all, vec!["cm", "in", "m"]);

        let metric: Vec<&str> = length.units(&converter, Some(si)).iter().map(|u| u.code()).collect();
        assert_eq!(metric, vec!["cm", "m"]);
    }

    #[test]
    fn test_unknown_unit_codes_are_skipped() {
        let converter = sample_converter();
        let mass = converter.get_dimension("mass").unwrap();
        // "ghost" is listed but never defined
        let codes: Vec<&str> = mass.units(&converter, None).iter().map(|u| u.code()).collect();
        assert_eq!(codes, vec!["g"]);
    }

    #[test]
    fn test_unit_options_sorted_by_label() {
        let converter = sample_converter();
        let length = converter.get_dimension("length").unwrap();
        let labels: Vec<String> = length
            .unit_options(&converter, None)
            .into_iter()
            .map(|o| o.label)
            .collect();
        assert_eq!(labels, vec!["Centimeter", "Inch", "Meter"]);
    }

    #[test]
    fn test_base_unit_resolves() {
        let converter = sample_converter();
        let length = converter.get_dimension("length").unwrap();
        assert_eq!(length.base_unit(&converter).map(|u| u.code()), Some("m"));
    }
}
