use std::fmt;

use crate::shared::error::{UnitsError, UnitsResult};
use crate::shared::types::{SelectOption, UnitData};

/// A unit like meters, liters, pounds, etc.
#[derive(Debug, Clone)]
pub struct Unit {
    code: String,
    plural_code: Option<String>,
    name: String,
    plural_name: Option<String>,
    dimension_code: String,
    system_code: String,
    ratio: f64, // base/this
}

impl Unit {
    pub fn new(code: impl Into<String>, data: UnitData) -> UnitsResult<Self> {
        let code = code.into();
        if !data.ratio.is_finite() || data.ratio <= 0.0 {
            return Err(UnitsError::Catalog(format!(
                "Unit '{}' has ratio {}; ratios must be positive and finite",
                code, data.ratio
            )));
        }

        Ok(Self {
            code,
            plural_code: data.code_plural,
            name: data.name,
            plural_name: data.name_plural,
            dimension_code: data.dimension,
            system_code: data.system,
            ratio: data.ratio,
        })
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// Code, or plural code when asked for (falls back to the singular)
    pub fn code_label(&self, plural: bool) -> &str {
        match (&self.plural_code, plural) {
            (Some(code), true) => code,
            _ => &self.code,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Readable label, plural when asked for (falls back to the singular)
    pub fn label(&self, plural: bool) -> &str {
        match (&self.plural_name, plural) {
            (Some(name), true) => name,
            _ => &self.name,
        }
    }

    pub fn dimension_code(&self) -> &str {
        &self.dimension_code
    }

    pub fn system_code(&self) -> &str {
        &self.system_code
    }

    /// Ratio that converts a scalar in this unit to the base unit (base/this)
    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    /// Ratio that, multiplied on a scalar in this unit, yields the scalar in `target`.
    ///
    /// `None` when the units measure different dimensions.
    pub fn ratio_to_target(&self, target: &Unit) -> Option<f64> {
        if self.dimension_code != target.dimension_code {
            return None;
        }
        // target/this = (base/this) / (base/target)
        Some(self.ratio / target.ratio)
    }

    /// Ratio that, multiplied on a scalar in `source`, yields the scalar in this unit
    pub fn ratio_from_source(&self, source: &Unit) -> Option<f64> {
        source.ratio_to_target(self)
    }

    pub fn option(&self) -> SelectOption {
        SelectOption::new(self.code.clone(), self.name.clone())
    }

    pub(crate) fn to_data(&self) -> UnitData {
        UnitData {
            name: self.name.clone(),
            name_plural: self.plural_name.clone(),
            code_plural: self.plural_code.clone(),
            system: self.system_code.clone(),
            dimension: self.dimension_code.clone(),
            ratio: self.ratio,
        }
    }
}

/// Units are equal when code, dimension and system all match
impl PartialEq for Unit {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
            && self.dimension_code == other.dimension_code
            && self.system_code == other.system_code
    }
}

impl Eq for Unit {}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] {}", self.code, self.dimension_code, self.system_code)
    }
}
