pub mod catalog;
pub mod fieldset;
