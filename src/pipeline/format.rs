// In: src/pipeline/format.rs

//! Defines all on-disk constants for the shapefile triple and the readers that
//! parse them back. The encoders in `shp` and `dbf` write against these constants;
//! the readers exist so callers (and our tests) can inspect a produced file
//! without a third-party GIS stack.

use std::io::{Cursor, Read};

use crate::error::ShpforgeError;
use crate::pipeline::schema::FieldDescriptor;
use crate::types::{BoundingBox, FieldKind, ShapeType};

//==================================================================================
// I. Geometry (.shp) and Index (.shx) Format
//==================================================================================

/// File code stored big-endian at offset 0 of both `.shp` and `.shx`.
pub const FILE_CODE: i32 = 9994;
/// Version stored little-endian at offset 28.
pub const SHAPE_VERSION: i32 = 1000;
/// Length of the main file header shared by `.shp` and `.shx`.
pub const MAIN_HEADER_LEN: usize = 100;
/// Offset of the big-endian file length (in 16-bit words).
pub const FILE_LENGTH_OFFSET: usize = 24;
/// Offset of the first of four little-endian bounding-box doubles.
pub const BBOX_OFFSET: usize = 36;
/// Record number + content length, both big-endian `i32`.
pub const RECORD_HEADER_LEN: usize = 8;
/// One `.shx` entry: offset + content length, both big-endian `i32` words.
pub const INDEX_RECORD_LEN: usize = 8;
/// Shape type + x + y.
pub const POINT_CONTENT_LEN: usize = 20;
/// Shape type + box + numParts + numPoints, before the part index and vertices.
pub const MULTIPART_FIXED_CONTENT_LEN: usize = 44;

//==================================================================================
// II. Attribute Table (.dbf) Format
//==================================================================================

/// dBASE III without memo.
pub const DBF_SIGNATURE: u8 = 0x03;
pub const DBF_HEADER_PREFIX_LEN: usize = 32;
pub const DBF_FIELD_DESCRIPTOR_LEN: usize = 32;
pub const DBF_HEADER_TERMINATOR: u8 = 0x0D;
/// Deletion flag of a live record.
pub const DBF_RECORD_ACTIVE: u8 = 0x20;
pub const DBF_EOF: u8 = 0x1A;

//==================================================================================
// III. Readers
//==================================================================================

fn map_err(e: std::io::Error) -> ShpforgeError {
    ShpforgeError::MalformedHeader(e.to_string())
}

fn read_array<const N: usize>(cursor: &mut Cursor<&[u8]>) -> Result<[u8; N], ShpforgeError> {
    let mut buf = [0u8; N];
    cursor.read_exact(&mut buf).map_err(map_err)?;
    Ok(buf)
}

fn read_i32_be(cursor: &mut Cursor<&[u8]>) -> Result<i32, ShpforgeError> {
    Ok(i32::from_be_bytes(read_array(cursor)?))
}

fn read_i32_le(cursor: &mut Cursor<&[u8]>) -> Result<i32, ShpforgeError> {
    Ok(i32::from_le_bytes(read_array(cursor)?))
}

fn read_f64_le(cursor: &mut Cursor<&[u8]>) -> Result<f64, ShpforgeError> {
    Ok(f64::from_le_bytes(read_array(cursor)?))
}

/// The metadata in the 100-byte header of a `.shp` or `.shx` file.
#[derive(Debug, Clone, PartialEq)]
pub struct MainHeader {
    pub file_length_words: i32,
    pub version: i32,
    pub shape_type: ShapeType,
    pub bbox: BoundingBox,
}

impl MainHeader {
    /// Parses the main header, validating the file code and the shape type.
    pub fn parse(bytes: &[u8]) -> Result<Self, ShpforgeError> {
        if bytes.len() < MAIN_HEADER_LEN {
            return Err(ShpforgeError::MalformedHeader(format!(
                "File is too small to hold a header. Minimum size: {}, got: {}",
                MAIN_HEADER_LEN,
                bytes.len()
            )));
        }

        let mut cursor = Cursor::new(bytes);
        let file_code = read_i32_be(&mut cursor)?;
        if file_code != FILE_CODE {
            return Err(ShpforgeError::MalformedHeader(format!(
                "Invalid file code: expected {}, got {}",
                FILE_CODE, file_code
            )));
        }

        cursor.set_position(FILE_LENGTH_OFFSET as u64);
        let file_length_words = read_i32_be(&mut cursor)?;
        let version = read_i32_le(&mut cursor)?;
        let shape_type = ShapeType::from_code(read_i32_le(&mut cursor)?)?;
        let bbox = BoundingBox {
            xmin: read_f64_le(&mut cursor)?,
            ymin: read_f64_le(&mut cursor)?,
            xmax: read_f64_le(&mut cursor)?,
            ymax: read_f64_le(&mut cursor)?,
        };

        Ok(Self {
            file_length_words,
            version,
            shape_type,
            bbox,
        })
    }

    pub fn file_length_bytes(&self) -> usize {
        self.file_length_words.max(0) as usize * 2
    }
}

/// One `.shx` entry, both values in 16-bit words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexEntry {
    pub offset_words: i32,
    pub content_length_words: i32,
}

impl IndexEntry {
    pub fn offset_bytes(&self) -> usize {
        self.offset_words.max(0) as usize * 2
    }

    pub fn content_length_bytes(&self) -> usize {
        self.content_length_words.max(0) as usize * 2
    }
}

/// Parses every entry of a `.shx` file.
pub fn read_index(bytes: &[u8]) -> Result<Vec<IndexEntry>, ShpforgeError> {
    MainHeader::parse(bytes)?;
    let body = &bytes[MAIN_HEADER_LEN..];
    if body.len() % INDEX_RECORD_LEN != 0 {
        return Err(ShpforgeError::MalformedHeader(format!(
            "Index body of {} bytes is not a multiple of {}",
            body.len(),
            INDEX_RECORD_LEN
        )));
    }

    let mut cursor = Cursor::new(body);
    let mut entries = Vec::with_capacity(body.len() / INDEX_RECORD_LEN);
    for _ in 0..body.len() / INDEX_RECORD_LEN {
        entries.push(IndexEntry {
            offset_words: read_i32_be(&mut cursor)?,
            content_length_words: read_i32_be(&mut cursor)?,
        });
    }
    Ok(entries)
}

/// The metadata in a `.dbf` header, including its field descriptors.
#[derive(Debug, Clone, PartialEq)]
pub struct TableHeader {
    /// `(year - 1900, month, day)` as stored.
    pub last_update: (u8, u8, u8),
    pub record_count: u32,
    pub header_length: u16,
    pub record_length: u16,
    pub fields: Vec<FieldDescriptor>,
}

impl TableHeader {
    pub fn parse(bytes: &[u8]) -> Result<Self, ShpforgeError> {
        let min_len = DBF_HEADER_PREFIX_LEN + 1;
        if bytes.len() < min_len {
            return Err(ShpforgeError::MalformedHeader(format!(
                "Table is too small to hold a header. Minimum size: {}, got: {}",
                min_len,
                bytes.len()
            )));
        }
        if bytes[0] != DBF_SIGNATURE {
            return Err(ShpforgeError::MalformedHeader(format!(
                "Invalid table signature: 0x{:02X}",
                bytes[0]
            )));
        }

        let last_update = (bytes[1], bytes[2], bytes[3]);
        let record_count = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        let header_length = u16::from_le_bytes([bytes[8], bytes[9]]);
        let record_length = u16::from_le_bytes([bytes[10], bytes[11]]);

        let header_end = header_length as usize;
        if header_end < min_len
            || header_end > bytes.len()
            || (header_end - min_len) % DBF_FIELD_DESCRIPTOR_LEN != 0
        {
            return Err(ShpforgeError::MalformedHeader(format!(
                "Invalid table header length {}",
                header_length
            )));
        }
        if bytes[header_end - 1] != DBF_HEADER_TERMINATOR {
            return Err(ShpforgeError::MalformedHeader(
                "Missing field descriptor terminator".into(),
            ));
        }

        let field_count = (header_end - min_len) / DBF_FIELD_DESCRIPTOR_LEN;
        let mut fields = Vec::with_capacity(field_count);
        for i in 0..field_count {
            let start = DBF_HEADER_PREFIX_LEN + i * DBF_FIELD_DESCRIPTOR_LEN;
            let block = &bytes[start..start + DBF_FIELD_DESCRIPTOR_LEN];
            let name_len = block[..10].iter().position(|&b| b == 0).unwrap_or(10);
            let name: String = block[..name_len].iter().map(|&b| b as char).collect();
            let kind = FieldKind::from_type_code(block[11]).ok_or_else(|| {
                ShpforgeError::MalformedHeader(format!(
                    "Unknown field type code '{}' for field '{}'",
                    block[11] as char, name
                ))
            })?;
            fields.push(FieldDescriptor {
                source_key: name.clone(),
                name,
                kind,
                length: block[16],
                scale: block[17],
            });
        }

        Ok(Self {
            last_update,
            record_count,
            header_length,
            record_length,
            fields,
        })
    }
}
