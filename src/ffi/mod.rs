//! This module serves as the public API for the Foreign Function Interface (FFI) layer.
//!
//! Its only responsibility is to declare the sub-modules that translate between
//! Python objects and the crate's native types. Everything here is compiled only
//! with the `python` feature.

//==================================================================================
// 1. Module Declarations
//==================================================================================
/// Contains all logic for interfacing with the Python/CPython ecosystem.
pub mod python;

//==================================================================================
// 2. Public API Re-exports
//==================================================================================
pub use self::python::{enable_verbose_logging_py, PyShapefileWriter};
