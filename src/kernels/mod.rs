//! This module collects the pure, stateless, low-level byte kernels that the
//! encoders in `pipeline` are built on.
//!
//! Nothing here knows about shapefiles: `byte_writer` is an offset-addressed,
//! endian-explicit writer over a growable arena and `ascii` holds the fixed-width
//! text helpers the dBASE encoder needs.

//==================================================================================
// 1. Module Declarations
//==================================================================================

/// Fixed-width integer/float writes with explicit byte order.
pub mod byte_writer;

/// Single-byte text mapping and fixed-width padding.
pub mod ascii;

pub use byte_writer::ByteWriter;
