use std::collections::BTreeSet;

use crate::shared::types::{sort_options, SelectOption, SystemData};

use super::converter::Converter;
use super::dimension::Dimension;

/// A system of units like SI, US, nautical, etc.
#[derive(Debug, Clone)]
pub struct UnitSystem {
    code: String,
    name: String,
    description: String,
    dimension_codes: BTreeSet<String>,
}

impl UnitSystem {
    pub fn new(code: impl Into<String>, data: SystemData) -> Self {
        Self {
            code: code.into(),
            name: data.name,
            description: data.description,
            dimension_codes: data.dimensions,
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Dimensions supported by this system, resolved through the converter.
    ///
    /// Never cached: the converter is the only owner of dimension values.
    pub fn dimensions<'c>(&self, converter: &'c Converter) -> Vec<&'c Dimension> {
        self.dimension_codes
            .iter()
            .filter_map(|code| {
                let dimension = converter.get_dimension(code);
                if dimension.is_none() {
                    tracing::warn!(system = %self.code, dimension = %code, "[UnitSystem] Skipping unknown dimension");
                }
                dimension
            })
            .collect()
    }

    /// Select options for this system's dimensions, sorted by label
    pub fn dimension_options(&self, converter: &Converter) -> Vec<SelectOption> {
        sort_options(self.dimensions(converter).into_iter().map(Dimension::option).collect())
    }

    /// Check if the dimension with this code exists in the system
    pub fn contains_dimension(&self, converter: &Converter, dimension_code: &str) -> bool {
        self.dimension_codes.contains(dimension_code) && converter.get_dimension(dimension_code).is_some()
    }

    pub fn option(&self) -> SelectOption {
        SelectOption::new(self.code.clone(), self.name.clone())
    }

    pub(crate) fn to_data(&self) -> SystemData {
        SystemData {
            name: self.name.clone(),
            description: self.description.clone(),
            dimensions: self.dimension_codes.clone(),
        }
    }
}

impl PartialEq for UnitSystem {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for UnitSystem {}
