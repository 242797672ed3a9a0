//! This module is the encoding pipeline: one bucket in, one `OutputBundle` out.
//!
//! Data flow for a single pass:
//!
//!   FeatureBucket
//!       |
//!       |-> [schema]  infer_schema  -> Vec<FieldDescriptor>
//!       |-> [shp]     encode_shapes -> .shp + .shx
//!       `-> [dbf]     encode_table  -> .dbf (consumes the bucket + field list)
//!                          |
//!                          `-> [bundle] OutputBundle
//!
//! `orchestrator` strings these together; `format` holds the on-disk constants
//! and the readers used to inspect finished files.

//==================================================================================
// 1. Module Declarations
//==================================================================================

pub mod bundle;
pub mod dbf;
pub mod format;
pub mod orchestrator;
pub mod schema;
pub mod shp;

//==================================================================================
// 2. Public API Re-exports
//==================================================================================

pub use self::bundle::{FileRole, OutputBundle};
pub use self::format::{read_index, IndexEntry, MainHeader, TableHeader};
pub use self::orchestrator::{encode_bucket, encode_bucket_with_schema};
pub use self::schema::{infer_schema, FieldDescriptor};
