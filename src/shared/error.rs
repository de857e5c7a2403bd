//! Error handling with UnitsError enum
//!
//! Malformed user input never reaches this type: unreadable scalars and
//! cross-dimension conversions are handled as no-ops where they occur.
//! What remains are catalog problems, I/O, and usage-contract violations.
//! All errors are serializable so hosts can forward them over IPC.

use thiserror::Error;
use serde::Serialize;

#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "message")]
pub enum UnitsError {
    /// A field set was operated on before a view was attached
    #[error("Tried to use field set components before attaching a view. See {0}")]
    NotAttached(String),

    /// A field set can only be attached to one view
    #[error("This field set has already been attached to a view")]
    AlreadyAttached,

    /// Scalar text or value that cannot define a quantity
    #[error("A bad scalar was used to define a quantity: {0}")]
    InvalidScalar(String),

    /// A quantity without a unit was used where one is required
    #[error("Quantity has no unit: {0}")]
    IncompleteQuantity(String),

    /// Malformed or inconsistent catalog data
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// The catalog has nothing to select
    #[error("Catalog has no selectable {0}")]
    EmptyCatalog(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Settings error: {0}")]
    Settings(String),
}

impl From<std::io::Error> for UnitsError {
    fn from(err: std::io::Error) -> Self {
        UnitsError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for UnitsError {
    fn from(err: serde_json::Error) -> Self {
        UnitsError::Serialization(err.to_string())
    }
}

pub type UnitsResult<T> = Result<T, UnitsError>;
