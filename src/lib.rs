//! Units of measure
//!
//! A catalog of unit systems, dimensions and units with ratio-based
//! conversion, plus interactive quantity field sets with bounded undo/redo.

pub mod core;
pub mod shared;

pub use crate::core::catalog::{Converter, Dimension, Quantity, Unit, UnitSystem};
pub use crate::core::fieldset::{FieldSet, FieldSetOptions, FieldView, HeadlessView, QuantityHistory};
pub use crate::shared::settings::ConverterSettings;
pub use crate::shared::types::{FieldEvent, FieldSnapshot, QuantitySnapshot, SelectOption};
pub use crate::shared::{UnitsError, UnitsResult};
