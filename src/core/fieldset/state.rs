use crate::core::catalog::scalar::{format_scalar, parse_scalar};
use crate::core::catalog::{Converter, Dimension, Quantity, Unit, UnitSystem};
use crate::shared::error::{UnitsError, UnitsResult};
use crate::shared::types::{FieldEvent, FieldSnapshot};

use super::history::QuantityHistory;
use super::view::FieldView;

/// Everything a field set needs before it is attached to a view
#[derive(Debug, Clone)]
pub struct FieldSetOptions<'c> {
    pub id: String,
    /// Starting quantity; becomes the reset target when it has a unit
    pub quantity: Quantity<'c>,
    pub system: String,
    pub dimension: String,
    pub unit: Option<String>,
    pub history_limit: usize,
}

/// Interactive state of one quantity input.
///
/// Holds the current quantity, the reset target and the undo/redo history,
/// and keeps the system → dimension → unit selection of its view consistent.
/// Every operation except construction requires an attached view.
pub struct FieldSet<'c, V> {
    converter: &'c Converter,
    id: String,
    initial: FieldSetOptions<'c>,
    view: Option<V>,
    history: QuantityHistory<'c>,
    current: Option<Quantity<'c>>,
    default: Option<Quantity<'c>>,
}

impl<'c, V: FieldView> FieldSet<'c, V> {
    pub fn new(converter: &'c Converter, options: FieldSetOptions<'c>) -> Self {
        let default = options.quantity.unit().map(|_| options.quantity);
        Self {
            converter,
            id: options.id.clone(),
            history: QuantityHistory::new(options.history_limit),
            initial: options,
            view: None,
            current: None,
            default,
        }
    }

    /// Attach this field set to its view and render the initial state
    pub fn attach(&mut self, view: V) -> UnitsResult<()> {
        if self.view.is_some() {
            return Err(UnitsError::AlreadyAttached);
        }
        self.view = Some(view);
        self.render_initial()?;

        match self.default {
            Some(default) => {
                self.set_fields(&default)?;
                self.store_quantity()?;
            }
            // Nothing to reset to
            None => self.attached_mut("FieldSet::attach")?.set_reset_enabled(false),
        }

        tracing::debug!(id = %self.id, default = ?self.default.map(|q| q.snapshot()), "[FieldSet] Attached");
        self.update_scalar_activity()?;
        self.sync_buttons()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn converter(&self) -> &'c Converter {
        self.converter
    }

    pub fn is_attached(&self) -> bool {
        self.view.is_some()
    }

    pub fn view(&self) -> Option<&V> {
        self.view.as_ref()
    }

    /// Mutable view access, for hosts that route user input through the field set
    pub fn view_mut(&mut self) -> Option<&mut V> {
        self.view.as_mut()
    }

    pub fn into_view(self) -> Option<V> {
        self.view
    }

    pub fn current(&self) -> Option<Quantity<'c>> {
        self.current
    }

    pub fn default_quantity(&self) -> Option<Quantity<'c>> {
        self.default
    }

    pub fn history(&self) -> &QuantityHistory<'c> {
        &self.history
    }

    pub fn snapshot(&self) -> FieldSnapshot {
        FieldSnapshot {
            id: self.id.clone(),
            current: self.current.map(|q| q.snapshot()),
            default: self.default.map(|q| q.snapshot()),
            undo_depth: self.history.undo_depth(),
            redo_depth: self.history.redo_depth(),
        }
    }

    // ========================================================================
    // Selection
    // ========================================================================

    pub fn selected_system(&self) -> UnitsResult<Option<&'c UnitSystem>> {
        let code = self.attached("FieldSet::selected_system")?.selected_system();
        Ok(code.and_then(|c| self.converter.get_system(&c)))
    }

    pub fn selected_dimension(&self) -> UnitsResult<Option<&'c Dimension>> {
        let code = self.attached("FieldSet::selected_dimension")?.selected_dimension();
        Ok(code.and_then(|c| self.converter.get_dimension(&c)))
    }

    pub fn selected_unit(&self) -> UnitsResult<Option<&'c Unit>> {
        let code = self.attached("FieldSet::selected_unit")?.selected_unit();
        Ok(code.and_then(|c| self.converter.get_unit(&c)))
    }

    /// The quantity currently displayed, or `None` if scalar or unit is unreadable
    pub fn read_quantity(&self) -> UnitsResult<Option<Quantity<'c>>> {
        let text = self.attached("FieldSet::read_quantity")?.scalar_text();
        let Some(scalar) = parse_scalar(&text) else {
            return Ok(None);
        };
        let Some(unit) = self.selected_unit()? else {
            return Ok(None);
        };
        Ok(Some(Quantity::new(Some(scalar), Some(unit))?))
    }

    // ========================================================================
    // Events
    // ========================================================================

    pub fn apply(&mut self, event: FieldEvent) -> UnitsResult<()> {
        tracing::debug!(id = %self.id, event = ?event, "[FieldSet] Event");
        match event {
            FieldEvent::SystemChanged => self.on_system_changed(),
            FieldEvent::DimensionChanged => self.on_dimension_changed(),
            FieldEvent::UnitChanged => self.on_unit_changed(),
            FieldEvent::ScalarCommitted => self.on_scalar_committed(),
            FieldEvent::Reset => self.reset(),
            FieldEvent::Undo => self.undo(),
            FieldEvent::Redo => self.redo(),
        }
    }

    /// The view shows a new system
    pub fn on_system_changed(&mut self) -> UnitsResult<()> {
        self.attached("FieldSet::on_system_changed")?;
        // A structural change invalidates any pending redo
        self.history.clear_redo();
        self.update_dimensions()?;
        self.update_units()?;
        if !self.convert_quantity()? {
            self.push_current_to_history();
            self.attached_mut("FieldSet::on_system_changed")?.set_scalar_text("");
        }
        self.sync_buttons()
    }

    /// The view shows a new dimension; the old scalar is cleared, not converted
    pub fn on_dimension_changed(&mut self) -> UnitsResult<()> {
        self.update_units()?;
        self.clear_quantity()?;
        self.sync_buttons()
    }

    /// The view shows a new unit
    pub fn on_unit_changed(&mut self) -> UnitsResult<()> {
        if !self.convert_quantity()? {
            self.push_current_to_history();
        }
        self.sync_buttons()
    }

    /// The scalar input lost focus
    pub fn on_scalar_committed(&mut self) -> UnitsResult<()> {
        self.store_quantity()
    }

    /// Reset this field to the quantity it was created with
    pub fn reset(&mut self) -> UnitsResult<()> {
        self.attached("FieldSet::reset")?;
        let Some(default) = self.default else {
            tracing::debug!(id = %self.id, "[FieldSet] Reset ignored, no default quantity");
            return Ok(());
        };
        self.set_fields(&default)?;
        self.store_quantity()?;
        self.update_scalar_activity()
    }

    /// Undo the latest change
    pub fn undo(&mut self) -> UnitsResult<()> {
        self.attached("FieldSet::undo")?;
        let Some(previous) = self.history.pop_undo() else {
            return Ok(());
        };
        if let Some(current) = self.current.take() {
            self.history.push_redo(current);
        }
        self.current = Some(previous);
        self.set_fields(&previous)?;
        self.sync_buttons()
    }

    /// Redo the latest undo
    pub fn redo(&mut self) -> UnitsResult<()> {
        self.attached("FieldSet::redo")?;
        let Some(next) = self.history.pop_redo() else {
            return Ok(());
        };
        if let Some(current) = self.current.take() {
            self.history.push_undo(current);
        }
        self.current = Some(next);
        self.set_fields(&next)?;
        self.sync_buttons()
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn attached(&self, operation: &str) -> UnitsResult<&V> {
        self.view
            .as_ref()
            .ok_or_else(|| UnitsError::NotAttached(operation.to_string()))
    }

    fn attached_mut(&mut self, operation: &str) -> UnitsResult<&mut V> {
        self.view
            .as_mut()
            .ok_or_else(|| UnitsError::NotAttached(operation.to_string()))
    }

    fn render_initial(&mut self) -> UnitsResult<()> {
        let system_options = self.converter.system_options();
        let system = self.initial.system.clone();
        let dimension = self.initial.dimension.clone();
        let unit = self.initial.unit.clone();
        let scalar = self.initial.quantity.scalar().map(format_scalar).unwrap_or_default();

        let view = self.attached_mut("FieldSet::render_initial")?;
        view.replace_system_options(system_options);
        view.select_system(&system);
        self.render_dimensions(Some(&system), Some(&dimension))?;
        self.update_units()?;

        let view = self.attached_mut("FieldSet::render_initial")?;
        if let Some(unit) = unit {
            view.select_unit(&unit);
        }
        view.set_scalar_text(&scalar);
        Ok(())
    }

    /// Fill the dimension list for a system, keeping a selected dimension
    /// from outside the system available at the end of the list
    fn render_dimensions(&mut self, system_code: Option<&str>, dimension_code: Option<&str>) -> UnitsResult<()> {
        let converter = self.converter;
        let system = system_code.and_then(|code| converter.get_system(code));
        let dimension = dimension_code.and_then(|code| converter.get_dimension(code));

        let mut options = system.map(|s| s.dimension_options(converter)).unwrap_or_default();
        if let Some(dimension) = dimension {
            let native = system.is_some_and(|s| s.contains_dimension(converter, dimension.code()));
            if !native {
                tracing::debug!(
                    id = %self.id,
                    dimension = %dimension.code(),
                    system = ?system_code,
                    "[FieldSet] Keeping dimension from outside the system"
                );
                options.push(dimension.option());
            }
        }

        let view = self.attached_mut("FieldSet::render_dimensions")?;
        view.replace_dimension_options(options);
        if let Some(dimension) = dimension {
            view.select_dimension(dimension.code());
        }
        Ok(())
    }

    /// Update the dimension list for the currently selected system
    fn update_dimensions(&mut self) -> UnitsResult<()> {
        let view = self.attached("FieldSet::update_dimensions")?;
        let system = view.selected_system();
        let dimension = view.selected_dimension();
        self.render_dimensions(system.as_deref(), dimension.as_deref())
    }

    /// Update the unit list for the currently selected system and dimension
    fn update_units(&mut self) -> UnitsResult<()> {
        let system = self.selected_system()?;
        let options = self
            .selected_dimension()?
            .map(|d| d.unit_options(self.converter, system))
            .unwrap_or_default();
        self.attached_mut("FieldSet::update_units")?.replace_unit_options(options);
        self.update_scalar_activity()
    }

    /// The scalar can only be edited while a unit is selected
    fn update_scalar_activity(&mut self) -> UnitsResult<()> {
        let view = self.attached_mut("FieldSet::update_scalar_activity")?;
        let enabled = view.selected_unit().is_some();
        view.set_scalar_enabled(enabled);
        Ok(())
    }

    /// Convert the current quantity into the selected unit and store it.
    ///
    /// Returns whether the conversion happened.
    fn convert_quantity(&mut self) -> UnitsResult<bool> {
        let Some(target) = self.selected_unit()? else {
            return Ok(false);
        };
        // Abort if there is no current state or the dimensions differ
        let Some(converted) = self.current.and_then(|current| current.convert_to(target)) else {
            return Ok(false);
        };

        let text = converted.scalar().map(format_scalar).unwrap_or_default();
        self.attached_mut("FieldSet::convert_quantity")?.set_scalar_text(&text);
        self.store_quantity()?;
        Ok(true)
    }

    /// Clear the current scalar, keeping the cleared quantity in history
    fn clear_quantity(&mut self) -> UnitsResult<()> {
        self.attached("FieldSet::clear_quantity")?;
        self.history.clear_redo();
        self.push_current_to_history();
        self.attached_mut("FieldSet::clear_quantity")?.set_scalar_text("");
        self.sync_buttons()
    }

    /// Commit the displayed quantity as current
    fn store_quantity(&mut self) -> UnitsResult<()> {
        let Some(read) = self.read_quantity()? else {
            tracing::debug!(id = %self.id, "[FieldSet] Store skipped, quantity unreadable");
            return Ok(());
        };

        if let Some(current) = self.current {
            if current.equal_to(&read)? {
                return Ok(());
            }
            self.push_current_to_history();
        }

        tracing::debug!(id = %self.id, quantity = %read, "[FieldSet] Stored quantity");
        self.current = Some(read);
        // A genuine edit abandons the redo future
        self.history.clear_redo();
        self.sync_buttons()
    }

    /// Display `quantity` across scalar, system, dimension and unit
    fn set_fields(&mut self, quantity: &Quantity<'c>) -> UnitsResult<()> {
        let unit = quantity
            .unit()
            .ok_or_else(|| UnitsError::IncompleteQuantity("FieldSet::set_fields".to_string()))?;
        let text = quantity.scalar().map(format_scalar).unwrap_or_default();

        let view = self.attached_mut("FieldSet::set_fields")?;
        view.set_scalar_text(&text);
        view.select_system(unit.system_code());
        self.render_dimensions(Some(unit.system_code()), Some(unit.dimension_code()))?;
        self.update_units()?;
        self.attached_mut("FieldSet::set_fields")?.select_unit(unit.code());
        self.update_scalar_activity()
    }

    fn push_current_to_history(&mut self) {
        if let Some(current) = self.current.take() {
            self.history.push_undo(current);
        }
    }

    fn sync_buttons(&mut self) -> UnitsResult<()> {
        let can_undo = self.history.can_undo();
        let can_redo = self.history.can_redo();
        let view = self.attached_mut("FieldSet::sync_buttons")?;
        view.set_undo_enabled(can_undo);
        view.set_redo_enabled(can_redo);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::test_support::sample_converter;
    use crate::core::fieldset::HeadlessView;

    fn attached<'c>(converter: &'c Converter, quantity: Quantity<'c>) -> FieldSet<'c, HeadlessView> {
        let mut field_set = converter.create_field_set(quantity).unwrap();
        field_set.attach(HeadlessView::new()).unwrap();
        field_set
    }

    fn meters(converter: &Converter, scalar: f64) -> Quantity<'_> {
        Quantity::new(Some(scalar), converter.get_unit("m")).unwrap()
    }

    fn type_scalar(field_set: &mut FieldSet<'_, HeadlessView>, text: &str) {
        field_set.view_mut().unwrap().set_scalar_text(text);
        field_set.on_scalar_committed().unwrap();
    }

    fn current_scalar(field_set: &FieldSet<'_, HeadlessView>) -> Option<f64> {
        field_set.current().and_then(|q| q.scalar())
    }

    fn current_unit<'a>(field_set: &'a FieldSet<'_, HeadlessView>) -> Option<&'a str> {
        field_set.current().and_then(|q| q.unit()).map(|u| u.code())
    }

    #[test]
    fn test_attach_renders_default() {
        let converter = sample_converter();
        let field_set = attached(&converter, meters(&converter, 2.0));
        let view = field_set.view().unwrap();

        assert_eq!(view.selected_system().as_deref(), Some("SI"));
        assert_eq!(view.selected_dimension().as_deref(), Some("length"));
        assert_eq!(view.selected_unit().as_deref(), Some("m"));
        assert_eq!(view.scalar_text(), "2");
        assert!(view.is_scalar_enabled());
        assert!(view.is_reset_enabled());
        assert!(!view.is_undo_enabled());
        assert!(!view.is_redo_enabled());

        assert_eq!(field_set.current(), Some(meters(&converter, 2.0)));
        assert_eq!(field_set.history().undo_depth(), 0);
    }

    #[test]
    fn test_attach_twice_fails() {
        let converter = sample_converter();
        let mut field_set = attached(&converter, meters(&converter, 2.0));
        assert!(matches!(field_set.attach(HeadlessView::new()), Err(UnitsError::AlreadyAttached)));
    }

    #[test]
    fn test_operations_require_a_view() {
        let converter = sample_converter();
        let mut field_set: FieldSet<HeadlessView> = converter.create_field_set(meters(&converter, 2.0)).unwrap();

        assert!(matches!(field_set.undo(), Err(UnitsError::NotAttached(_))));
        assert!(matches!(field_set.reset(), Err(UnitsError::NotAttached(_))));
        assert!(matches!(field_set.read_quantity(), Err(UnitsError::NotAttached(_))));
        assert!(matches!(field_set.apply(FieldEvent::UnitChanged), Err(UnitsError::NotAttached(_))));
    }

    #[test]
    fn test_unit_change_converts_and_undo_redo() {
        let converter = sample_converter();
        let mut field_set = attached(&converter, meters(&converter, 2.0));

        field_set.view_mut().unwrap().select_unit("cm");
        field_set.apply(FieldEvent::UnitChanged).unwrap();
        assert_eq!(field_set.view().unwrap().scalar_text(), "200");
        assert_eq!(current_scalar(&field_set), Some(200.0));
        assert_eq!(current_unit(&field_set), Some("cm"));
        assert!(field_set.view().unwrap().is_undo_enabled());

        field_set.apply(FieldEvent::Undo).unwrap();
        let view = field_set.view().unwrap();
        assert_eq!(view.scalar_text(), "2");
        assert_eq!(view.selected_unit().as_deref(), Some("m"));
        assert!(view.is_redo_enabled());
        assert!(!view.is_undo_enabled());

        field_set.apply(FieldEvent::Redo).unwrap();
        let view = field_set.view().unwrap();
        assert_eq!(view.scalar_text(), "200");
        assert_eq!(view.selected_unit().as_deref(), Some("cm"));
        assert!(!view.is_redo_enabled());
        assert!(view.is_undo_enabled());
    }

    #[test]
    fn test_system_change_converts_into_new_system() {
        let converter = sample_converter();
        let mut field_set = attached(&converter, meters(&converter, 2.0));

        field_set.view_mut().unwrap().select_system("US");
        field_set.apply(FieldEvent::SystemChanged).unwrap();

        let view = field_set.view().unwrap();
        assert_eq!(view.selected_dimension().as_deref(), Some("length"));
        assert_eq!(view.selected_unit().as_deref(), Some("in"));
        assert_eq!(current_unit(&field_set), Some("in"));
        let inches = current_scalar(&field_set).unwrap();
        assert!((inches - 78.740157480315).abs() < 1e-9);
        assert_eq!(field_set.history().undo_depth(), 1);
    }

    #[test]
    fn test_overflowing_system_change_clears_scalar() {
        let converter = sample_converter();
        // 1e307 m is more inches than f64 can hold
        let mut field_set = attached(&converter, meters(&converter, 1e307));

        field_set.view_mut().unwrap().select_system("US");
        field_set.apply(FieldEvent::SystemChanged).unwrap();

        let view = field_set.view().unwrap();
        assert_eq!(view.selected_unit().as_deref(), Some("in"));
        assert_eq!(view.scalar_text(), "");
        assert_eq!(field_set.current(), None);
        assert_eq!(field_set.history().undo_depth(), 1);

        // Undo brings back the original quantity and selection
        field_set.undo().unwrap();
        assert_eq!(field_set.current(), Some(meters(&converter, 1e307)));
        assert_eq!(field_set.view().unwrap().selected_unit().as_deref(), Some("m"));
    }

    #[test]
    fn test_foreign_dimension_is_kept_without_units() {
        let converter = sample_converter();
        let grams = Quantity::new(Some(5.0), converter.get_unit("g")).unwrap();
        let mut field_set = attached(&converter, grams);

        field_set.view_mut().unwrap().select_system("US");
        field_set.apply(FieldEvent::SystemChanged).unwrap();

        let view = field_set.view().unwrap();
        let dimensions: Vec<&str> = view.dimension_options().iter().map(|o| o.value.as_str()).collect();
        assert_eq!(dimensions, vec!["length", "mass"]);
        assert_eq!(view.selected_dimension().as_deref(), Some("mass"));
        assert!(view.unit_options().is_empty());
        assert!(!view.is_scalar_enabled());
        assert_eq!(view.scalar_text(), "");

        assert_eq!(field_set.read_quantity().unwrap(), None);
        assert_eq!(field_set.current(), None);
        assert_eq!(field_set.history().undo_depth(), 1);
    }

    #[test]
    fn test_dimension_change_clears_scalar() {
        let converter = sample_converter();
        let mut field_set = attached(&converter, meters(&converter, 2.0));

        field_set.view_mut().unwrap().select_dimension("mass");
        field_set.apply(FieldEvent::DimensionChanged).unwrap();

        let view = field_set.view().unwrap();
        assert_eq!(view.selected_unit().as_deref(), Some("g"));
        assert_eq!(view.scalar_text(), "");
        assert_eq!(field_set.current(), None);
        assert!(view.is_undo_enabled());

        type_scalar(&mut field_set, "5");
        assert_eq!(current_scalar(&field_set), Some(5.0));
        assert_eq!(current_unit(&field_set), Some("g"));
    }

    #[test]
    fn test_invalid_scalar_is_ignored() {
        let converter = sample_converter();
        let mut field_set = attached(&converter, meters(&converter, 2.0));

        type_scalar(&mut field_set, "abc");
        assert_eq!(current_scalar(&field_set), Some(2.0));
        assert_eq!(field_set.history().undo_depth(), 0);

        // Same value again is not a change either
        type_scalar(&mut field_set, " 2.0 ");
        assert_eq!(field_set.history().undo_depth(), 0);
    }

    #[test]
    fn test_history_keeps_three_entries() {
        let converter = sample_converter();
        let mut field_set = attached(&converter, meters(&converter, 2.0));

        for text in ["3", "4", "5", "6"] {
            type_scalar(&mut field_set, text);
        }
        assert_eq!(field_set.history().undo_depth(), 3);

        for _ in 0..3 {
            field_set.undo().unwrap();
        }
        // 2 was evicted
        assert_eq!(current_scalar(&field_set), Some(3.0));
        assert!(!field_set.view().unwrap().is_undo_enabled());

        // Undo on an empty history does nothing
        field_set.undo().unwrap();
        assert_eq!(current_scalar(&field_set), Some(3.0));
        assert_eq!(field_set.history().redo_depth(), 3);
    }

    #[test]
    fn test_edit_after_undo_clears_redo() {
        let converter = sample_converter();
        let mut field_set = attached(&converter, meters(&converter, 2.0));

        type_scalar(&mut field_set, "3");
        field_set.undo().unwrap();
        assert!(field_set.history().can_redo());

        type_scalar(&mut field_set, "7");
        assert!(!field_set.history().can_redo());
        assert!(!field_set.view().unwrap().is_redo_enabled());

        // Redo on an empty history does nothing
        field_set.redo().unwrap();
        assert_eq!(current_scalar(&field_set), Some(7.0));
    }

    #[test]
    fn test_reset_restores_default() {
        let converter = sample_converter();
        let mut field_set = attached(&converter, meters(&converter, 2.0));

        field_set.view_mut().unwrap().select_unit("cm");
        field_set.on_unit_changed().unwrap();
        type_scalar(&mut field_set, "50");

        field_set.apply(FieldEvent::Reset).unwrap();
        assert_eq!(field_set.view().unwrap().scalar_text(), "2");
        assert_eq!(field_set.current(), Some(meters(&converter, 2.0)));
        assert_eq!(field_set.history().undo_depth(), 3);
    }

    #[test]
    fn test_without_default_reset_is_disabled_and_ignored() {
        let converter = sample_converter();
        let mut field_set = attached(&converter, Quantity::empty());

        let view = field_set.view().unwrap();
        assert!(!view.is_reset_enabled());
        assert_eq!(view.selected_system().as_deref(), Some("SI"));
        assert_eq!(view.selected_dimension().as_deref(), Some("length"));
        assert_eq!(view.selected_unit().as_deref(), Some("cm"));
        assert_eq!(field_set.current(), None);

        field_set.reset().unwrap();
        assert_eq!(field_set.current(), None);
        assert_eq!(field_set.default_quantity(), None);
    }

    #[test]
    fn test_snapshot_reports_depths() {
        let converter = sample_converter();
        let mut field_set = attached(&converter, meters(&converter, 2.0));
        type_scalar(&mut field_set, "3");

        let snapshot = field_set.snapshot();
        assert_eq!(snapshot.id, field_set.id());
        assert_eq!(snapshot.current.and_then(|q| q.scalar), Some(3.0));
        assert_eq!(snapshot.default.and_then(|q| q.scalar), Some(2.0));
        assert_eq!(snapshot.undo_depth, 1);
        assert_eq!(snapshot.redo_depth, 0);
    }
}
