// In: src/error.rs

//! This module defines the single, unified error type for the entire shpforge library.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.

#[cfg(feature = "python")]
use pyo3::PyErr;
use thiserror::Error;

use crate::types::ShapeType;

#[derive(Error, Debug)]
pub enum ShpforgeError {
    // =========================================================================
    // === High-Level, Semantic Errors (Specific to our library's logic)
    // =========================================================================
    /// A feature's geometry does not belong to the bucket being encoded.
    /// This aborts the whole encode; no partial files are produced.
    #[error("Geometry kind mismatch at record {record}: bucket is {expected}, feature is {found}")]
    GeometryKindMismatch {
        record: usize,
        expected: ShapeType,
        found: ShapeType,
    },

    #[error("Unknown shape type code: {0}")]
    UnknownShapeType(i32),

    #[error("Shapefile too large: {0}")]
    FileTooLarge(String),

    #[error("Attribute table too large: {0}")]
    TableTooLarge(String),

    #[error("Malformed file header: {0}")]
    MalformedHeader(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal logic error (this is a bug): {0}")]
    InternalError(String),

    // =========================================================================
    // === External Error Wrappers (Using #[from] for automatic conversion)
    // =========================================================================
    /// An error from the Serde JSON library, typically while adapting JSON
    /// graphics or loading an `EncoderConfig`.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// An error originating from the underlying I/O subsystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error for Python FFI (Foreign Function Interface) operations.
    #[error("FFI operation failed: {0}")]
    FfiError(String), // PyErr doesn't impl Error, so we can't use #[from] here.
}

// =============================================================================
// === Manual `From` Implementations ===
// =============================================================================

#[cfg(feature = "python")]
impl From<PyErr> for ShpforgeError {
    fn from(err: PyErr) -> Self {
        ShpforgeError::FfiError(err.to_string())
    }
}

#[cfg(feature = "python")]
impl From<ShpforgeError> for PyErr {
    fn from(err: ShpforgeError) -> PyErr {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}
