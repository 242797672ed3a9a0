//! This module defines the core, strongly-typed representations shared by the
//! geometry encoder, the attribute-table encoder and the format readers.
//!
//! It currently includes the canonical `ShapeType` enum (a closed, exhaustively
//! matched set of geometry kinds), the `FieldKind` enum describing dBASE column
//! types, and the `BoundingBox` accumulated while records are written.

pub mod bounding_box;
pub mod field_kind;
pub mod shape_type;

// Re-export the main type(s) for easier access.
pub use bounding_box::BoundingBox;
pub use field_kind::FieldKind;
pub use shape_type::ShapeType;
