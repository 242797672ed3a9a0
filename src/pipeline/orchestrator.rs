// In: src/pipeline/orchestrator.rs

use std::time::Instant;

use crate::config::EncoderConfig;
use crate::error::ShpforgeError;
use crate::model::FeatureBucket;
use crate::pipeline::bundle::OutputBundle;
use crate::pipeline::dbf::encode_table;
use crate::pipeline::schema::{infer_schema, FieldDescriptor};
use crate::pipeline::shp::encode_shapes;

//==================================================================================
// 1. Public Orchestration API
//==================================================================================

/// Runs one complete encode pass over `bucket`, inferring the attribute schema.
///
/// The bucket is only read. Geometry and index are written first; if that fails
/// (e.g. a feature of the wrong kind) no table is built and nothing is returned.
pub fn encode_bucket(
    bucket: &FeatureBucket,
    config: &EncoderConfig,
) -> Result<OutputBundle, ShpforgeError> {
    let fields = infer_schema(bucket, config);
    encode_bucket_with_schema(bucket, &fields, config)
}

/// Runs one encode pass with a caller-supplied field list.
///
/// This is the only way to get a `Date` column from non-date values (e.g. text
/// already in `YYYYMMDD` form) or to fix column widths ahead of time.
pub fn encode_bucket_with_schema(
    bucket: &FeatureBucket,
    fields: &[FieldDescriptor],
    config: &EncoderConfig,
) -> Result<OutputBundle, ShpforgeError> {
    if fields.is_empty() {
        return Err(ShpforgeError::InvalidInput(
            "An attribute table needs at least one field".into(),
        ));
    }

    let start = Instant::now();
    let shapes = encode_shapes(bucket)?;
    let table = encode_table(bucket, fields, config.resolve_table_date())?;

    log::info!(
        "Encoded {} {} record(s): shp={}B shx={}B dbf={}B fields={} bbox={:?} in {:.2?}",
        shapes.record_count,
        bucket.kind(),
        shapes.shape.len(),
        shapes.index.len(),
        table.len(),
        fields.len(),
        shapes.bbox.to_array(),
        start.elapsed(),
    );

    Ok(OutputBundle::new(shapes.shape, shapes.index, table))
}
