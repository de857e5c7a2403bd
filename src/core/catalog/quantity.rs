use std::fmt;

use crate::shared::error::{UnitsError, UnitsResult};
use crate::shared::types::QuantitySnapshot;

use super::converter::Converter;
use super::scalar::{format_scalar, parse_scalar, round_scalar};
use super::unit::Unit;

/// A quantity like 1 m, 32.1 L, 1.23 lb etc.
///
/// Either part may be absent. Quantities are never modified; conversion
/// produces a new one.
#[derive(Debug, Clone, Copy, Default)]
pub struct Quantity<'c> {
    scalar: Option<f64>,
    unit: Option<&'c Unit>,
}

impl<'c> Quantity<'c> {
    pub fn new(scalar: Option<f64>, unit: Option<&'c Unit>) -> UnitsResult<Self> {
        if let Some(value) = scalar {
            if !value.is_finite() {
                return Err(UnitsError::InvalidScalar(value.to_string()));
            }
        }
        Ok(Self { scalar, unit })
    }

    /// A quantity with neither scalar nor unit
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a quantity from decimal text such as `" -2.5 "`
    pub fn parse(text: &str, unit: Option<&'c Unit>) -> UnitsResult<Self> {
        let scalar = parse_scalar(text).ok_or_else(|| UnitsError::InvalidScalar(text.to_string()))?;
        Ok(Self {
            scalar: Some(scalar),
            unit,
        })
    }

    pub fn scalar(&self) -> Option<f64> {
        self.scalar
    }

    pub fn unit(&self) -> Option<&'c Unit> {
        self.unit
    }

    /// An equivalent quantity expressed in `target`.
    ///
    /// `None` when the units measure different dimensions, this quantity
    /// lacks a scalar or unit, or the result overflows.
    pub fn convert_to(&self, target: &'c Unit) -> Option<Quantity<'c>> {
        let unit = self.unit?;
        let scalar = self.scalar?;
        let ratio = unit.ratio_to_target(target)?;
        let converted = scalar * ratio;
        if !converted.is_finite() {
            tracing::debug!(scalar, from = %unit.code(), to = %target.code(), "[Quantity] Conversion overflowed");
            return None;
        }
        Some(Quantity {
            scalar: Some(round_scalar(converted)),
            unit: Some(target),
        })
    }

    /// This quantity expressed in its dimension's base unit
    pub fn normalized(&self, converter: &'c Converter) -> Option<Quantity<'c>> {
        let dimension = converter.get_dimension(self.unit?.dimension_code())?;
        self.convert_to(dimension.base_unit(converter)?)
    }

    /// Same scalar and equal units. Both quantities must carry a unit.
    pub fn equal_to(&self, other: &Quantity<'_>) -> UnitsResult<bool> {
        let (Some(unit), Some(other_unit)) = (self.unit, other.unit) else {
            return Err(UnitsError::IncompleteQuantity("Quantity::equal_to".to_string()));
        };
        Ok(self.scalar == other.scalar && unit == other_unit)
    }

    pub fn snapshot(&self) -> QuantitySnapshot {
        QuantitySnapshot {
            scalar: self.scalar,
            unit: self.unit.map(|u| u.code().to_string()),
        }
    }
}

impl PartialEq for Quantity<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.scalar == other.scalar && self.unit == other.unit
    }
}

impl fmt::Display for Quantity<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scalar = self.scalar.map(format_scalar).unwrap_or_default();
        match self.unit {
            Some(unit) => write!(f, "{} {}", scalar, unit.code_label(self.scalar != Some(1.0))),
            None => write!(f, "{}", scalar),
        }
    }
}
