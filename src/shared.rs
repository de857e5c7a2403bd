pub mod types;
pub mod settings;
pub mod error;


// Re-export UnitsError for convenience
pub use error::{UnitsError, UnitsResult};
