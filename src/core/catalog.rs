//! Unit catalog module
//!
//! Immutable catalog entities and the registry that owns them:
//! - `unit`, `dimension`, `system`: the entities, referencing each other by code
//! - `quantity`: scalar + unit value with ratio-based conversion
//! - `converter`: the code-indexed registry and field set factory
//! - `scalar`: decimal text parsing and the 12-digit rounding policy

pub mod converter;
pub mod dimension;
pub mod quantity;
pub mod scalar;
pub mod system;
pub mod unit;

pub use converter::Converter;
pub use dimension::Dimension;
pub use quantity::Quantity;
pub use system::UnitSystem;
pub use unit::Unit;
