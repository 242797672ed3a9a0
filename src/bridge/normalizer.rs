// In: src/bridge/normalizer.rs

//! Splits heterogeneous input graphics into one bucket per geometry kind.

use crate::error::ShpforgeError;
use crate::model::{Feature, FeatureBucket};
use crate::traits::SourceGraphic;
use crate::types::ShapeType;

/// The three per-kind buckets, each in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedBuckets {
    point: FeatureBucket,
    polyline: FeatureBucket,
    polygon: FeatureBucket,
}

impl Default for NormalizedBuckets {
    fn default() -> Self {
        Self {
            point: FeatureBucket::new(ShapeType::Point),
            polyline: FeatureBucket::new(ShapeType::Polyline),
            polygon: FeatureBucket::new(ShapeType::Polygon),
        }
    }
}

impl NormalizedBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bucket(&self, kind: ShapeType) -> &FeatureBucket {
        match kind {
            ShapeType::Point => &self.point,
            ShapeType::Polyline => &self.polyline,
            ShapeType::Polygon => &self.polygon,
        }
    }

    pub(crate) fn bucket_mut(&mut self, kind: ShapeType) -> &mut FeatureBucket {
        match kind {
            ShapeType::Point => &mut self.point,
            ShapeType::Polyline => &mut self.polyline,
            ShapeType::Polygon => &mut self.polygon,
        }
    }

    /// Appends `feature` to the bucket of its own kind.
    pub fn push(&mut self, feature: Feature) -> Result<(), ShpforgeError> {
        self.bucket_mut(feature.shape_type()).push(feature)
    }

    /// Adapts and routes every graphic. Graphics without a recognizable
    /// geometry are skipped. Returns how many were accepted.
    pub fn extend<I, G>(&mut self, graphics: I) -> Result<usize, ShpforgeError>
    where
        I: IntoIterator<Item = G>,
        G: SourceGraphic,
    {
        let mut accepted = 0;
        for (i, graphic) in graphics.into_iter().enumerate() {
            match graphic.to_feature() {
                Some(feature) => {
                    self.push(feature)?;
                    accepted += 1;
                }
                None => log::debug!("Dropping graphic #{} without a recognizable geometry", i),
            }
        }
        Ok(accepted)
    }

    pub fn len(&self) -> usize {
        self.point.len() + self.polyline.len() + self.polygon.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.point.clear();
        self.polyline.clear();
        self.polygon.clear();
    }
}

/// Routes `graphics` into fresh per-kind buckets.
pub fn normalize<I, G>(graphics: I) -> Result<NormalizedBuckets, ShpforgeError>
where
    I: IntoIterator<Item = G>,
    G: SourceGraphic,
{
    let mut buckets = NormalizedBuckets::new();
    let accepted = buckets.extend(graphics)?;
    log_metric!(
        "event" = "normalize",
        "accepted" = accepted,
        "points" = buckets.point.len(),
        "polylines" = buckets.polyline.len(),
        "polygons" = buckets.polygon.len()
    );
    Ok(buckets)
}
