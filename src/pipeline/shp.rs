//! The geometry + index encoder: writes the `.shp` file and its parallel `.shx`.
//!
//! The encoder is an explicit state machine,
//! `Init -> WritingHeader -> WritingRecords(1..N) -> Finalized`. Both headers are
//! written with placeholder length and bounding-box fields; the record pass grows
//! the bounding box and the byte counter; `finish` patches the deferred fields
//! and hands back both buffers. Every `.shx` offset is taken from the actual
//! length of the `.shp` arena at the moment its record starts.

use crate::error::ShpforgeError;
use crate::kernels::ByteWriter;
use crate::model::{Coord, Feature, FeatureBucket, Geometry};
use crate::pipeline::format::{
    BBOX_OFFSET, FILE_CODE, FILE_LENGTH_OFFSET, INDEX_RECORD_LEN, MAIN_HEADER_LEN,
    MULTIPART_FIXED_CONTENT_LEN, POINT_CONTENT_LEN, RECORD_HEADER_LEN, SHAPE_VERSION,
};
use crate::types::{BoundingBox, ShapeType};

//==================================================================================
// 1. Public Types
//==================================================================================

/// The two geometry buffers produced by one pass, plus the extent written into them.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeOutput {
    pub shape: Vec<u8>,
    pub index: Vec<u8>,
    pub bbox: BoundingBox,
    pub record_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EncoderState {
    Init,
    WritingHeader,
    /// Holds the 1-based number the next record will get.
    WritingRecords(usize),
    Finalized,
}

//==================================================================================
// 2. Size Helpers
//==================================================================================

/// Content length in bytes of one record, excluding its 8-byte record header.
pub fn content_len(geometry: &Geometry) -> usize {
    match geometry {
        Geometry::Point { .. } => POINT_CONTENT_LEN,
        Geometry::Polyline { .. } | Geometry::Polygon { .. } => {
            MULTIPART_FIXED_CONTENT_LEN + 4 * geometry.parts().len() + 16 * geometry.point_count()
        }
    }
}

/// Converts a byte count into the 16-bit word count the format stores.
fn to_words(bytes: usize, what: &str) -> Result<i32, ShpforgeError> {
    i32::try_from(bytes / 2).map_err(|_| {
        ShpforgeError::FileTooLarge(format!("{} of {} bytes exceeds the i32 word range", what, bytes))
    })
}

fn to_i32(count: usize, what: &str) -> Result<i32, ShpforgeError> {
    i32::try_from(count)
        .map_err(|_| ShpforgeError::FileTooLarge(format!("{} {} exceeds i32", what, count)))
}

//==================================================================================
// 3. The Encoder
//==================================================================================

pub struct ShapeEncoder {
    kind: ShapeType,
    state: EncoderState,
    shape: ByteWriter,
    index: ByteWriter,
    bbox: BoundingBox,
}

impl ShapeEncoder {
    /// Creates an encoder with both arenas sized exactly for `bucket`.
    pub fn for_bucket(bucket: &FeatureBucket) -> Self {
        let records_len: usize = bucket
            .iter()
            .map(|f| RECORD_HEADER_LEN + content_len(&f.geometry))
            .sum();
        Self {
            kind: bucket.kind(),
            state: EncoderState::Init,
            shape: ByteWriter::with_capacity(MAIN_HEADER_LEN + records_len),
            index: ByteWriter::with_capacity(MAIN_HEADER_LEN + INDEX_RECORD_LEN * bucket.len()),
            bbox: BoundingBox::empty(),
        }
    }

    pub fn new(kind: ShapeType) -> Self {
        Self {
            kind,
            state: EncoderState::Init,
            shape: ByteWriter::with_capacity(MAIN_HEADER_LEN),
            index: ByteWriter::with_capacity(MAIN_HEADER_LEN),
            bbox: BoundingBox::empty(),
        }
    }

    fn unexpected_state(&self, op: &str) -> ShpforgeError {
        ShpforgeError::InternalError(format!(
            "ShapeEncoder::{} called in state {:?}",
            op, self.state
        ))
    }

    /// Writes the 100-byte header into both arenas. Length and bounding box are
    /// placeholders until `finish`.
    pub fn write_headers(&mut self) -> Result<(), ShpforgeError> {
        if self.state != EncoderState::Init {
            return Err(self.unexpected_state("write_headers"));
        }
        self.state = EncoderState::WritingHeader;
        let code = self.kind.code();
        for w in [&mut self.shape, &mut self.index] {
            w.put_i32_be(FILE_CODE);
            w.put_zeros(FILE_LENGTH_OFFSET - 4);
            w.put_i32_be(0); // file length, patched in `finish`
            w.put_i32_le(SHAPE_VERSION);
            w.put_i32_le(code);
            w.put_zeros(MAIN_HEADER_LEN - BBOX_OFFSET); // bbox + unused Z/M ranges
        }
        self.state = EncoderState::WritingRecords(1);
        Ok(())
    }

    /// Appends one record to the `.shp` and its entry to the `.shx`.
    pub fn write_record(&mut self, feature: &Feature) -> Result<(), ShpforgeError> {
        let EncoderState::WritingRecords(record_number) = self.state else {
            return Err(self.unexpected_state("write_record"));
        };

        let found = feature.shape_type();
        if found != self.kind {
            return Err(ShpforgeError::GeometryKindMismatch {
                record: record_number,
                expected: self.kind,
                found,
            });
        }

        let content_bytes = content_len(&feature.geometry);
        let content_words = to_words(content_bytes, "Record content")?;
        let offset_words = to_words(self.shape.len(), "Record offset")?;

        // --- .shx entry: where this record starts and how long its content is ---
        self.index.put_i32_be(offset_words);
        self.index.put_i32_be(content_words);

        // --- .shp record header ---
        self.shape.put_i32_be(to_i32(record_number, "Record number")?);
        self.shape.put_i32_be(content_words);

        // --- .shp record content ---
        self.shape.put_i32_le(self.kind.code());
        match &feature.geometry {
            Geometry::Point { x, y } => {
                self.shape.put_f64_le(*x);
                self.shape.put_f64_le(*y);
                self.bbox.extend(*x, *y);
            }
            Geometry::Polyline { paths: parts } | Geometry::Polygon { rings: parts } => {
                self.write_parts(parts)?;
            }
        }

        self.state = EncoderState::WritingRecords(record_number + 1);
        Ok(())
    }

    /// Box, part count, point count, part start indices, then every vertex.
    fn write_parts(&mut self, parts: &[Vec<Coord>]) -> Result<(), ShpforgeError> {
        let mut feature_bbox = BoundingBox::empty();
        for &(x, y) in parts.iter().flatten() {
            feature_bbox.extend(x, y);
        }
        self.bbox.union(&feature_bbox);

        for v in feature_bbox.or_zero().to_array() {
            self.shape.put_f64_le(v);
        }

        let num_points: usize = parts.iter().map(Vec::len).sum();
        self.shape.put_i32_le(to_i32(parts.len(), "Part count")?);
        self.shape.put_i32_le(to_i32(num_points, "Point count")?);

        let mut start = 0usize;
        for part in parts {
            self.shape.put_i32_le(to_i32(start, "Part start index")?);
            start += part.len();
        }

        for &(x, y) in parts.iter().flatten() {
            self.shape.put_f64_le(x);
            self.shape.put_f64_le(y);
        }
        Ok(())
    }

    /// Patches the deferred header fields and returns both buffers.
    pub fn finish(mut self) -> Result<ShapeOutput, ShpforgeError> {
        let EncoderState::WritingRecords(next) = self.state else {
            return Err(self.unexpected_state("finish"));
        };
        self.state = EncoderState::Finalized;

        let bbox = self.bbox.or_zero();
        let shape_words = to_words(self.shape.len(), "Shape file")?;
        let index_words = to_words(self.index.len(), "Index file")?;

        self.shape.patch_i32_be(FILE_LENGTH_OFFSET, shape_words)?;
        self.index.patch_i32_be(FILE_LENGTH_OFFSET, index_words)?;
        for w in [&mut self.shape, &mut self.index] {
            for (i, v) in bbox.to_array().into_iter().enumerate() {
                w.patch_f64_le(BBOX_OFFSET + 8 * i, v)?;
            }
        }

        Ok(ShapeOutput {
            shape: self.shape.into_inner(),
            index: self.index.into_inner(),
            bbox,
            record_count: next - 1,
        })
    }
}

/// Runs a complete geometry + index pass over `bucket`.
pub fn encode_shapes(bucket: &FeatureBucket) -> Result<ShapeOutput, ShpforgeError> {
    let mut encoder = ShapeEncoder::for_bucket(bucket);
    encoder.write_headers()?;
    for feature in bucket {
        encoder.write_record(feature)?;
    }
    let output = encoder.finish()?;
    log_metric!(
        "event" = "encode_shapes",
        "kind" = bucket.kind(),
        "records" = output.record_count,
        "shp_bytes" = output.shape.len()
    );
    Ok(output)
}

//==================================================================================
// 4. Unit Tests
//==================================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::format::{read_index, MainHeader};

    fn i32_be(bytes: &[u8], at: usize) -> i32 {
        i32::from_be_bytes(bytes[at..at + 4].try_into().unwrap())
    }

    fn i32_le(bytes: &[u8], at: usize) -> i32 {
        i32::from_le_bytes(bytes[at..at + 4].try_into().unwrap())
    }

    fn f64_le(bytes: &[u8], at: usize) -> f64 {
        f64::from_le_bytes(bytes[at..at + 8].try_into().unwrap())
    }

    #[test]
    fn test_single_point_layout() {
        let bucket =
            FeatureBucket::from_features(ShapeType::Point, [Feature::point(1.5, -2.0)]).unwrap();
        let out = encode_shapes(&bucket).unwrap();

        assert_eq!(out.shape.len(), 128);
        assert_eq!(i32_be(&out.shape, 0), 9994);
        assert_eq!(i32_be(&out.shape, 24), 64);
        assert_eq!(i32_le(&out.shape, 28), 1000);
        assert_eq!(i32_le(&out.shape, 32), 1);
        // record header
        assert_eq!(i32_be(&out.shape, 100), 1);
        assert_eq!(i32_be(&out.shape, 104), 10);
        // record content
        assert_eq!(i32_le(&out.shape, 108), 1);
        assert_eq!(f64_le(&out.shape, 112), 1.5);
        assert_eq!(f64_le(&out.shape, 120), -2.0);

        assert_eq!(out.index.len(), 108);
        assert_eq!(i32_be(&out.index, 24), 54);
        assert_eq!(i32_be(&out.index, 100), 50);
        assert_eq!(i32_be(&out.index, 104), 10);
    }

    #[test]
    fn test_polyline_record_layout() {
        let line = Feature::polyline(vec![
            vec![(0.0, 0.0), (2.0, 1.0)],
            vec![(5.0, 5.0), (6.0, 4.0), (7.0, 9.0)],
        ]);
        let bucket = FeatureBucket::from_features(ShapeType::Polyline, [line]).unwrap();
        let out = encode_shapes(&bucket).unwrap();

        let content = 44 + 4 * 2 + 16 * 5;
        assert_eq!(out.shape.len(), 100 + 8 + content);
        assert_eq!(i32_be(&out.shape, 104), (content / 2) as i32);

        let c = 108; // content start
        assert_eq!(i32_le(&out.shape, c), 3);
        assert_eq!(f64_le(&out.shape, c + 4), 0.0);
        assert_eq!(f64_le(&out.shape, c + 12), 0.0);
        assert_eq!(f64_le(&out.shape, c + 20), 7.0);
        assert_eq!(f64_le(&out.shape, c + 28), 9.0);
        assert_eq!(i32_le(&out.shape, c + 36), 2); // parts
        assert_eq!(i32_le(&out.shape, c + 40), 5); // points
        assert_eq!(i32_le(&out.shape, c + 44), 0);
        assert_eq!(i32_le(&out.shape, c + 48), 2);
        // first vertex of the second part
        assert_eq!(f64_le(&out.shape, c + 52 + 16 * 2), 5.0);
        assert_eq!(f64_le(&out.shape, c + 52 + 16 * 2 + 8), 5.0);
    }

    #[test]
    fn test_feature_box_is_per_feature() {
        let a = Feature::polygon(vec![vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]]);
        let b = Feature::polygon(vec![vec![(10.0, 10.0), (12.0, 10.0), (12.0, 13.0), (10.0, 10.0)]]);
        let bucket = FeatureBucket::from_features(ShapeType::Polygon, [a, b]).unwrap();
        let out = encode_shapes(&bucket).unwrap();

        let entries = read_index(&out.index).unwrap();
        let second = entries[1].offset_bytes() + 8;
        assert_eq!(f64_le(&out.shape, second + 4), 10.0);
        assert_eq!(f64_le(&out.shape, second + 28), 13.0);

        let header = MainHeader::parse(&out.shape).unwrap();
        assert_eq!(header.bbox.to_array(), [0.0, 0.0, 12.0, 13.0]);
    }

    #[test]
    fn test_empty_bucket_writes_headers_only() {
        let out = encode_shapes(&FeatureBucket::new(ShapeType::Polygon)).unwrap();
        assert_eq!(out.shape.len(), 100);
        assert_eq!(out.index.len(), 100);
        assert_eq!(i32_be(&out.shape, 24), 50);
        assert_eq!(out.bbox, BoundingBox::ZERO);
    }

    #[test]
    fn test_kind_mismatch_aborts() {
        let mut encoder = ShapeEncoder::new(ShapeType::Polyline);
        encoder.write_headers().unwrap();
        let err = encoder.write_record(&Feature::point(0.0, 0.0)).unwrap_err();
        assert!(matches!(
            err,
            ShpforgeError::GeometryKindMismatch {
                record: 1,
                expected: ShapeType::Polyline,
                found: ShapeType::Point
            }
        ));
    }

    #[test]
    fn test_out_of_order_calls_are_rejected() {
        let mut encoder = ShapeEncoder::new(ShapeType::Point);
        assert!(encoder.write_record(&Feature::point(0.0, 0.0)).is_err());
        encoder.write_headers().unwrap();
        assert!(encoder.write_headers().is_err());
    }
}
