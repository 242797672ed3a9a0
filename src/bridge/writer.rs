// In: src/bridge/writer.rs

use crate::bridge::esri_json::EsriJsonGraphic;
use crate::bridge::geojson::GeoJsonFeature;
use crate::bridge::normalizer::NormalizedBuckets;
use crate::config::EncoderConfig;
use crate::error::ShpforgeError;
use crate::model::{Feature, FeatureBucket};
use crate::pipeline::{encode_bucket, encode_bucket_with_schema, FieldDescriptor, OutputBundle};
use crate::traits::SourceGraphic;
use crate::types::ShapeType;

/// A high-level, stateful object that collects features of every kind and
/// exports one shapefile triple per kind on request.
///
/// Adding graphics only routes them into buckets; all encoding happens in
/// `export`, which reads one bucket and leaves the others untouched.
#[derive(Debug, Clone)]
pub struct ShapefileWriter {
    config: EncoderConfig,
    buckets: NormalizedBuckets,
}

impl Default for ShapefileWriter {
    fn default() -> Self {
        Self::new(EncoderConfig::default())
    }
}

impl ShapefileWriter {
    pub fn new(config: EncoderConfig) -> Self {
        Self {
            config,
            buckets: NormalizedBuckets::new(),
        }
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    pub fn add_feature(&mut self, feature: Feature) -> Result<(), ShpforgeError> {
        self.buckets.push(feature)
    }

    /// Adds graphics from any adapter. Returns how many carried a usable geometry.
    pub fn add_graphics<I, G>(&mut self, graphics: I) -> Result<usize, ShpforgeError>
    where
        I: IntoIterator<Item = G>,
        G: SourceGraphic,
    {
        self.buckets.extend(graphics)
    }

    /// Adds one ESRI JSON graphic, an array of them, or a feature set.
    pub fn add_esri_json(&mut self, json: &str) -> Result<usize, ShpforgeError> {
        let graphics = EsriJsonGraphic::parse_many(json)?;
        self.add_graphics(graphics)
    }

    /// Adds a GeoJSON `FeatureCollection`, a single `Feature`, or an array of features.
    pub fn add_geojson(&mut self, json: &str) -> Result<usize, ShpforgeError> {
        let features = GeoJsonFeature::parse_many(json)?;
        self.add_graphics(features)
    }

    pub fn bucket(&self, kind: ShapeType) -> &FeatureBucket {
        self.buckets.bucket(kind)
    }

    /// Encodes the bucket for `kind`, inferring its attribute schema.
    ///
    /// Returns `Ok(None)` when that bucket is empty. The bucket is cleared
    /// only after a successful encode; on error its features are kept.
    pub fn export(&mut self, kind: ShapeType) -> Result<Option<OutputBundle>, ShpforgeError> {
        self.export_inner(kind, None)
    }

    /// Like `export`, but with a caller-supplied field list.
    pub fn export_with_schema(
        &mut self,
        kind: ShapeType,
        fields: &[FieldDescriptor],
    ) -> Result<Option<OutputBundle>, ShpforgeError> {
        self.export_inner(kind, Some(fields))
    }

    fn export_inner(
        &mut self,
        kind: ShapeType,
        fields: Option<&[FieldDescriptor]>,
    ) -> Result<Option<OutputBundle>, ShpforgeError> {
        let bucket = self.buckets.bucket(kind);
        if bucket.is_empty() {
            log::info!("No {} features to export", kind);
            return Ok(None);
        }

        let bundle = match fields {
            Some(fields) => encode_bucket_with_schema(bucket, fields, &self.config)?,
            None => encode_bucket(bucket, &self.config)?,
        };
        self.buckets.bucket_mut(kind).clear();
        Ok(Some(bundle))
    }

    pub fn clear_all(&mut self) {
        self.buckets.clear();
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
