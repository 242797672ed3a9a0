//! This file is the root of the `shpforge` Rust crate.
//!
//! Its responsibilities are strictly limited to:
//! 1.  Declaring all the top-level modules of our library (`pipeline`, `bridge`, etc.)
//!     so the Rust compiler knows they exist, and re-exporting the public API.
//! 2.  Defining the `#[pymodule]` which acts as the main entry point when the
//!     compiled library is imported into Python (feature `python`).

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
//==================================================================================
// 1. Module Declarations
//==================================================================================
#[macro_use]
pub mod observability; // Make macros available throughout the crate

pub mod bridge;
pub mod config;
pub mod kernels;
pub mod model;
pub mod pipeline;
pub mod types;

mod error;
#[cfg(feature = "python")]
mod ffi;
mod traits;

//==================================================================================
// 2. Public API Re-exports
//==================================================================================
pub use bridge::{EsriJsonGraphic, GeoJsonFeature, ShapefileWriter};
pub use config::{EncoderConfig, MixedKindPolicy};
pub use error::ShpforgeError;
pub use model::{AttributeValue, Attributes, Coord, Feature, FeatureBucket, Geometry};
pub use pipeline::{encode_bucket, encode_bucket_with_schema, FieldDescriptor, FileRole, OutputBundle};
pub use traits::SourceGraphic;
pub use types::{BoundingBox, FieldKind, ShapeType};

//==================================================================================
// 3. Python Module Definition
//==================================================================================
#[cfg(feature = "python")]
use pyo3::prelude::*;

/// The `shpforge` Python module, containing all exposed Rust functions.
#[cfg(feature = "python")]
#[pymodule]
fn shpforge(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ffi::PyShapefileWriter>()?;

    // --- Expose the custom error type ---
    m.add(
        "ShpforgeError",
        m.py().get_type_bound::<pyo3::exceptions::PyValueError>(),
    )?;

    // --- Expose version string as a module attribute ---
    m.add("__version__", VERSION)?;

    m.add_function(wrap_pyfunction!(ffi::enable_verbose_logging_py, m)?)?;

    Ok(())
}
