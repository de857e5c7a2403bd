//! View capability consumed by field sets
//!
//! The field set never touches rendering. It reads what the user entered
//! and writes display state through `FieldView`; each UI technology
//! supplies an adapter. `HeadlessView` is the in-memory adapter.

use crate::shared::types::SelectOption;

/// What a field set needs from the input it drives.
///
/// Selection lists behave like select boxes: replacing the options resets
/// the selection to the first option (or to nothing when empty), and
/// selecting a code that is not among the options leaves nothing selected.
pub trait FieldView {
    /// Scalar text exactly as displayed
    fn scalar_text(&self) -> String;
    fn set_scalar_text(&mut self, text: &str);

    fn selected_system(&self) -> Option<String>;
    fn selected_dimension(&self) -> Option<String>;
    fn selected_unit(&self) -> Option<String>;

    fn select_system(&mut self, code: &str);
    fn select_dimension(&mut self, code: &str);
    fn select_unit(&mut self, code: &str);

    fn replace_system_options(&mut self, options: Vec<SelectOption>);
    fn replace_dimension_options(&mut self, options: Vec<SelectOption>);
    fn replace_unit_options(&mut self, options: Vec<SelectOption>);

    fn set_scalar_enabled(&mut self, enabled: bool);
    fn set_undo_enabled(&mut self, enabled: bool);
    fn set_redo_enabled(&mut self, enabled: bool);
    fn set_reset_enabled(&mut self, enabled: bool);
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Selection {
    options: Vec<SelectOption>,
    selected: Option<String>,
}

impl Selection {
    fn replace(&mut self, options: Vec<SelectOption>) {
        self.selected = options.first().map(|o| o.value.clone());
        self.options = options;
    }

    fn select(&mut self, code: &str) {
        self.selected = self
            .options
            .iter()
            .find(|o| o.value == code)
            .map(|o| o.value.clone());
    }
}

/// In-memory view for hosts without a UI, and for driving field sets in tests
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessView {
    scalar: String,
    systems: Selection,
    dimensions: Selection,
    units: Selection,
    scalar_enabled: bool,
    undo_enabled: bool,
    redo_enabled: bool,
    reset_enabled: bool,
}

impl HeadlessView {
    /// Empty lists, with the scalar and reset enabled like a freshly rendered input
    pub fn new() -> Self {
        Self {
            scalar: String::new(),
            systems: Selection::default(),
            dimensions: Selection::default(),
            units: Selection::default(),
            scalar_enabled: true,
            undo_enabled: false,
            redo_enabled: false,
            reset_enabled: true,
        }
    }

    pub fn system_options(&self) -> &[SelectOption] {
        &self.systems.options
    }

    pub fn dimension_options(&self) -> &[SelectOption] {
        &self.dimensions.options
    }

    pub fn unit_options(&self) -> &[SelectOption] {
        &self.units.options
    }

    pub fn is_scalar_enabled(&self) -> bool {
        self.scalar_enabled
    }

    pub fn is_undo_enabled(&self) -> bool {
        self.undo_enabled
    }

    pub fn is_redo_enabled(&self) -> bool {
        self.redo_enabled
    }

    pub fn is_reset_enabled(&self) -> bool {
        self.reset_enabled
    }
}

impl Default for HeadlessView {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldView for HeadlessView {
    fn scalar_text(&self) -> String {
        self.scalar.clone()
    }

    fn set_scalar_text(&mut self, text: &str) {
        self.scalar = text.to_string();
    }

    fn selected_system(&self) -> Option<String> {
        self.systems.selected.clone()
    }

    fn selected_dimension(&self) -> Option<String> {
        self.dimensions.selected.clone()
    }

    fn selected_unit(&self) -> Option<String> {
        self.units.selected.clone()
    }

    fn select_system(&mut self, code: &str) {
        self.systems.select(code);
    }

    fn select_dimension(&mut self, code: &str) {
        self.dimensions.select(code);
    }

    fn select_unit(&mut self, code: &str) {
        self.units.select(code);
    }

    fn replace_system_options(&mut self, options: Vec<SelectOption>) {
        self.systems.replace(options);
    }

    fn replace_dimension_options(&mut self, options: Vec<SelectOption>) {
        self.dimensions.replace(options);
    }

    fn replace_unit_options(&mut self, options: Vec<SelectOption>) {
        self.units.replace(options);
    }

    fn set_scalar_enabled(&mut self, enabled: bool) {
        self.scalar_enabled = enabled;
    }

    fn set_undo_enabled(&mut self, enabled: bool) {
        self.undo_enabled = enabled;
    }

    fn set_redo_enabled(&mut self, enabled: bool) {
        self.redo_enabled = enabled;
    }

    fn set_reset_enabled(&mut self, enabled: bool) {
        self.reset_enabled = enabled;
    }
}
