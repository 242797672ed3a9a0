//! The normalized, source-agnostic feature model consumed by every encoder.
//!
//! Nothing in here knows about any map API or file format; adapters in
//! `bridge` produce these values and the `pipeline` encoders consume them.

mod attributes;
mod bucket;
mod feature;

pub use attributes::{AttributeValue, Attributes};
pub use bucket::FeatureBucket;
pub use feature::{Coord, Feature, Geometry};
