//! Interactive quantity inputs
//!
//! A `FieldSet` owns the state of one quantity input (current value, reset
//! target, bounded undo/redo) and drives a `FieldView` through it.

pub mod history;
pub mod view;
mod state;

pub use history::QuantityHistory;
pub use state::{FieldSet, FieldSetOptions};
pub use view::{FieldView, HeadlessView};
