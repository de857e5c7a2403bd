//! Catalog registry
//!
//! The converter owns every system, dimension and unit, indexed by code.
//! It is built once from a `CatalogPayload` and never changes afterwards;
//! field sets borrow it for lookups.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::fs;

use crate::core::fieldset::{FieldSet, FieldSetOptions, FieldView};
use crate::shared::error::{UnitsError, UnitsResult};
use crate::shared::settings::{ConverterSettings, MAX_HISTORY_SIZE};
use crate::shared::types::{sort_options, CatalogPayload, SelectOption};

use super::dimension::Dimension;
use super::quantity::Quantity;
use super::system::UnitSystem;
use super::unit::Unit;

const BUILTIN_CATALOG: &str = include_str!("../../../data/catalog.json");

#[derive(Debug)]
pub struct Converter {
    systems: HashMap<String, UnitSystem>,
    dimensions: HashMap<String, Dimension>,
    units: HashMap<String, Unit>,
    /// Counter for unique field set ids
    next_id: AtomicUsize,
}

impl Converter {
    pub fn from_payload(payload: CatalogPayload) -> UnitsResult<Self> {
        let systems: HashMap<String, UnitSystem> = payload
            .systems
            .into_iter()
            .map(|(code, data)| (code.clone(), UnitSystem::new(code, data)))
            .collect();
        let dimensions: HashMap<String, Dimension> = payload
            .dimensions
            .into_iter()
            .map(|(code, data)| (code.clone(), Dimension::new(code, data)))
            .collect();
        let units = payload
            .units
            .into_iter()
            .map(|(code, data)| Ok((code.clone(), Unit::new(code, data)?)))
            .collect::<UnitsResult<HashMap<String, Unit>>>()?;

        let converter = Self {
            systems,
            dimensions,
            units,
            next_id: AtomicUsize::new(0),
        };
        converter.validate()?;

        tracing::debug!(
            systems = converter.systems.len(),
            dimensions = converter.dimensions.len(),
            units = converter.units.len(),
            "[Converter] Catalog loaded"
        );
        Ok(converter)
    }

    pub fn from_json(json: &str) -> UnitsResult<Self> {
        let payload: CatalogPayload = serde_json::from_str(json)
            .map_err(|e| UnitsError::Catalog(format!("Failed to parse catalog: {}", e)))?;
        Self::from_payload(payload)
    }

    /// The catalog bundled with this crate
    pub fn builtin() -> UnitsResult<Self> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub async fn load(path: &Path) -> UnitsResult<Self> {
        let content = fs::read_to_string(path).await
            .map_err(|e| UnitsError::Io(format!("Failed to read catalog {}: {}", path.display(), e)))?;
        Self::from_json(&content)
    }

    /// Load the configured catalog file, or the built-in catalog when none is set
    pub async fn from_settings(settings: &ConverterSettings) -> UnitsResult<Self> {
        match settings.catalog.path.as_deref() {
            Some(path) => Self::load(Path::new(path)).await,
            None => Self::builtin(),
        }
    }

    /// Units must point at known systems and dimensions; every other
    /// dangling reference is tolerated and skipped at lookup time.
    fn validate(&self) -> UnitsResult<()> {
        for unit in self.units.values() {
            if !self.systems.contains_key(unit.system_code()) {
                return Err(UnitsError::Catalog(format!(
                    "Unit '{}' refers to unknown system '{}'",
                    unit.code(),
                    unit.system_code()
                )));
            }
            let Some(dimension) = self.dimensions.get(unit.dimension_code()) else {
                return Err(UnitsError::Catalog(format!(
                    "Unit '{}' refers to unknown dimension '{}'",
                    unit.code(),
                    unit.dimension_code()
                )));
            };
            if !dimension.unit_codes().any(|code| code == unit.code()) {
                tracing::warn!(unit = %unit.code(), dimension = %dimension.code(), "[Converter] Unit is not listed by its dimension");
            }
        }

        for dimension in self.dimensions.values() {
            for code in dimension.unit_codes() {
                match self.units.get(code) {
                    None => tracing::warn!(dimension = %dimension.code(), unit = %code, "[Converter] Dimension lists unknown unit"),
                    Some(unit) if unit.dimension_code() != dimension.code() => {
                        tracing::warn!(dimension = %dimension.code(), unit = %code, "[Converter] Dimension lists a unit of another dimension")
                    }
                    Some(_) => {}
                }
            }
            match dimension.base_unit(self) {
                Some(base) if base.ratio() != 1.0 => {
                    tracing::warn!(dimension = %dimension.code(), unit = %base.code(), ratio = base.ratio(), "[Converter] Base unit ratio is not 1")
                }
                None if dimension.unit_codes().next().is_some() => {
                    tracing::warn!(dimension = %dimension.code(), "[Converter] Dimension has no resolvable base unit")
                }
                _ => {}
            }
        }

        for system in self.systems.values() {
            // Resolving logs any dimension codes that do not exist
            system.dimensions(self);
        }

        Ok(())
    }

    pub fn get_system(&self, code: &str) -> Option<&UnitSystem> {
        self.systems.get(code)
    }

    pub fn get_dimension(&self, code: &str) -> Option<&Dimension> {
        self.dimensions.get(code)
    }

    pub fn get_unit(&self, code: &str) -> Option<&Unit> {
        self.units.get(code)
    }

    pub fn systems(&self) -> impl Iterator<Item = &UnitSystem> {
        self.systems.values()
    }

    /// Select options for the known unit systems, sorted by label
    pub fn system_options(&self) -> Vec<SelectOption> {
        sort_options(self.systems.values().map(UnitSystem::option).collect())
    }

    /// The catalog in payload form, ready to be written back out as JSON
    pub fn payload(&self) -> CatalogPayload {
        CatalogPayload {
            systems: self.systems.iter().map(|(code, s)| (code.clone(), s.to_data())).collect(),
            dimensions: self.dimensions.iter().map(|(code, d)| (code.clone(), d.to_data())).collect(),
            units: self.units.iter().map(|(code, u)| (code.clone(), u.to_data())).collect(),
        }
    }

    pub fn to_json(&self) -> UnitsResult<String> {
        Ok(serde_json::to_string_pretty(&self.payload())?)
    }

    /// Get the next number to be used in a field set id
    pub fn next_id(&self) -> usize {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Create an unattached field set for `quantity`.
    ///
    /// With a unit, the quantity decides the initial selection and becomes
    /// the reset target. Without one, the first system, dimension and unit
    /// are selected.
    pub fn create_field_set<'c, V: FieldView>(&'c self, quantity: Quantity<'c>) -> UnitsResult<FieldSet<'c, V>> {
        self.build_field_set(quantity, None, MAX_HISTORY_SIZE)
    }

    /// Like `create_field_set`, honoring the history limit and preferred system
    pub fn create_field_set_with<'c, V: FieldView>(
        &'c self,
        quantity: Quantity<'c>,
        settings: &ConverterSettings,
    ) -> UnitsResult<FieldSet<'c, V>> {
        self.build_field_set(
            quantity,
            settings.preferences.default_system.as_deref(),
            settings.history.effective_limit(),
        )
    }

    fn build_field_set<'c, V: FieldView>(
        &'c self,
        quantity: Quantity<'c>,
        preferred_system: Option<&str>,
        history_limit: usize,
    ) -> UnitsResult<FieldSet<'c, V>> {
        let id = format!("quantity{}", self.next_id());

        let (system, dimension, unit) = match quantity.unit() {
            Some(unit) => (
                unit.system_code().to_string(),
                unit.dimension_code().to_string(),
                Some(unit.code().to_string()),
            ),
            None => {
                let system = preferred_system
                    .and_then(|code| self.get_system(code))
                    .map(|s| s.code().to_string())
                    .or_else(|| self.system_options().into_iter().next().map(|o| o.value))
                    .ok_or_else(|| UnitsError::EmptyCatalog("systems".to_string()))?;
                let selected_system = self.get_system(&system);
                let dimension = selected_system
                    .and_then(|s| s.dimension_options(self).into_iter().next())
                    .map(|o| o.value)
                    .ok_or_else(|| UnitsError::EmptyCatalog(format!("dimensions in system '{}'", system)))?;
                let unit = self
                    .get_dimension(&dimension)
                    .and_then(|d| d.unit_options(self, selected_system).into_iter().next())
                    .map(|o| o.value);
                (system, dimension, unit)
            }
        };

        tracing::debug!(id = %id, system = %system, dimension = %dimension, unit = ?unit, "[Converter] Created field set");

        Ok(FieldSet::new(self, FieldSetOptions {
            id,
            quantity,
            system,
            dimension,
            unit,
            history_limit,
        }))
    }
}
