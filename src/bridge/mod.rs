// In: src/bridge/mod.rs

// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Bridge Layer
// ====================================================================================
//
// The `bridge` is the public-facing API of the shpforge library. It turns loosely
// structured input (native features, ESRI JSON graphics, GeoJSON features) into
// per-kind `FeatureBucket`s and hands one bucket at a time to the pure `pipeline`
// engine, which knows nothing about any input format.
//
// Data Flow:
//
//   1. [Adapters (esri_json, geojson, Feature)] -> implement `SourceGraphic`
//         |
//         `-> `to_feature()` yields `Some(Feature)` or `None` (dropped)
//
//   2. [Normalizer (NormalizedBuckets)]          -> routes each Feature by kind
//         |
//         `-> Point / Polyline / Polygon buckets, each in input order
//
//   3. [Stateful Facade (ShapefileWriter)]       -> `export(kind)`
//         |
//         `-> calls `pipeline::encode_bucket` on that one bucket
//
//   4. [Pipeline Engine]                         -> Returns `Result<OutputBundle>`
//
// ====================================================================================
pub mod esri_json;
pub mod geojson;
pub(crate) mod json_values;
pub mod normalizer;
pub mod writer;

// --- High-Level Stateful API ---
pub use writer::ShapefileWriter;

// --- Adapters and Routing ---
pub use esri_json::EsriJsonGraphic;
pub use geojson::GeoJsonFeature;
pub use normalizer::{normalize, NormalizedBuckets};

#[cfg(test)]
mod tests;
