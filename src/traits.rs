//! This module defines the adapter trait shared by every input source.

use crate::model::Feature;

/// Something that can be turned into a `Feature`: a native feature, an ESRI JSON
/// graphic, a GeoJSON feature, or any caller-defined record.
///
/// Returning `None` means the graphic has no recognizable geometry; the
/// normalizer drops it.
pub trait SourceGraphic {
    fn to_feature(&self) -> Option<Feature>;
}

impl SourceGraphic for Feature {
    fn to_feature(&self) -> Option<Feature> {
        Some(self.clone())
    }
}

impl<T: SourceGraphic + ?Sized> SourceGraphic for Box<T> {
    fn to_feature(&self) -> Option<Feature> {
        (**self).to_feature()
    }
}

impl<T: SourceGraphic + ?Sized> SourceGraphic for &T {
    fn to_feature(&self) -> Option<Feature> {
        (**self).to_feature()
    }
}
