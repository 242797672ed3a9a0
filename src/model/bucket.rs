//! An ordered collection of features sharing one geometry kind.

use crate::error::ShpforgeError;
use crate::model::Feature;
use crate::types::ShapeType;

/// Features of a single kind, in output order.
///
/// Record *i* of the `.shp`, entry *i* of the `.shx` and row *i* of the `.dbf`
/// all describe `features[i]`; nothing else links them.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureBucket {
    kind: ShapeType,
    features: Vec<Feature>,
}

impl FeatureBucket {
    pub fn new(kind: ShapeType) -> Self {
        Self {
            kind,
            features: Vec::new(),
        }
    }

    /// Builds a bucket from an iterator, rejecting the first feature of another kind.
    pub fn from_features<I>(kind: ShapeType, features: I) -> Result<Self, ShpforgeError>
    where
        I: IntoIterator<Item = Feature>,
    {
        let mut bucket = Self::new(kind);
        for feature in features {
            bucket.push(feature)?;
        }
        Ok(bucket)
    }

    pub fn push(&mut self, feature: Feature) -> Result<(), ShpforgeError> {
        let found = feature.shape_type();
        if found != self.kind {
            return Err(ShpforgeError::GeometryKindMismatch {
                record: self.features.len() + 1,
                expected: self.kind,
                found,
            });
        }
        self.features.push(feature);
        Ok(())
    }

    pub fn kind(&self) -> ShapeType {
        self.kind
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Feature> {
        self.features.iter()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn clear(&mut self) {
        self.features.clear();
    }
}

impl<'a> IntoIterator for &'a FeatureBucket {
    type Item = &'a Feature;
    type IntoIter = std::slice::Iter<'a, Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.iter()
    }
}
