//! The attribute table encoder: writes the `.dbf` for a bucket and its field list.
//!
//! All values are stored as fixed-width single-byte text. Row *i* of the table
//! describes feature *i* of the bucket; a feature without a value for a column
//! gets its zero-based row index, printed, in that column.

use std::borrow::Cow;

use chrono::{Datelike, NaiveDate};

use crate::error::ShpforgeError;
use crate::kernels::ascii::{null_padded, pad_left, pad_right, to_single_bytes};
use crate::kernels::ByteWriter;
use crate::model::{AttributeValue, FeatureBucket};
use crate::pipeline::format::{
    DBF_EOF, DBF_FIELD_DESCRIPTOR_LEN, DBF_HEADER_PREFIX_LEN, DBF_HEADER_TERMINATOR,
    DBF_RECORD_ACTIVE, DBF_SIGNATURE,
};
use crate::pipeline::schema::{FieldDescriptor, FIELD_NAME_LEN};
use crate::types::FieldKind;

//==================================================================================
// 1. Layout
//==================================================================================

/// Sizes derived from the field list, checked against the header's integer widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableLayout {
    pub record_count: u32,
    pub header_length: u16,
    pub record_length: u16,
}

impl TableLayout {
    pub fn compute(fields: &[FieldDescriptor], records: usize) -> Result<Self, ShpforgeError> {
        fields.iter().try_for_each(validate_field)?;

        let header_length = DBF_HEADER_PREFIX_LEN + DBF_FIELD_DESCRIPTOR_LEN * fields.len() + 1;
        let record_length = 1 + fields.iter().map(|f| f.length as usize).sum::<usize>();

        let too_large = |what: &str, value: usize| {
            ShpforgeError::TableTooLarge(format!("{} {} does not fit the dBASE header", what, value))
        };
        Ok(Self {
            record_count: u32::try_from(records).map_err(|_| too_large("Record count", records))?,
            header_length: u16::try_from(header_length)
                .map_err(|_| too_large("Header length", header_length))?,
            record_length: u16::try_from(record_length)
                .map_err(|_| too_large("Record length", record_length))?,
        })
    }

    /// Exact size of the finished table, EOF marker included.
    pub fn total_len(&self) -> usize {
        self.header_length as usize + self.record_length as usize * self.record_count as usize + 1
    }
}

/// Rejects descriptors whose width or scale the column type cannot hold.
/// `FieldDescriptor::new` always produces valid ones; hand-built ones may not.
fn validate_field(field: &FieldDescriptor) -> Result<(), ShpforgeError> {
    if field.kind.clamp_length(field.length as usize) != field.length {
        return Err(ShpforgeError::InvalidInput(format!(
            "Field '{}' ({}) cannot have length {}",
            field.name, field.kind, field.length
        )));
    }
    if field.scale > field.length {
        return Err(ShpforgeError::InvalidInput(format!(
            "Field '{}' has scale {} greater than its length {}",
            field.name, field.scale, field.length
        )));
    }
    Ok(())
}

//==================================================================================
// 2. Header
//==================================================================================

fn write_header(
    w: &mut ByteWriter,
    layout: &TableLayout,
    fields: &[FieldDescriptor],
    date: NaiveDate,
) -> Result<(), ShpforgeError> {
    let year = u8::try_from(date.year() - 1900).map_err(|_| {
        ShpforgeError::InvalidInput(format!("Table date {} is outside 1900..=2155", date))
    })?;

    w.put_u8(DBF_SIGNATURE);
    w.put_u8(year);
    w.put_u8(date.month() as u8);
    w.put_u8(date.day() as u8);
    w.put_u32_le(layout.record_count);
    w.put_u16_le(layout.header_length);
    w.put_u16_le(layout.record_length);
    w.put_zeros(DBF_HEADER_PREFIX_LEN - 12);

    for field in fields {
        w.put_bytes(&null_padded(&field.name, FIELD_NAME_LEN));
        w.put_u8(0);
        w.put_u8(field.kind.type_code());
        w.put_zeros(4);
        w.put_u8(field.length);
        w.put_u8(match field.kind {
            FieldKind::Numeric => field.scale,
            _ => 0,
        });
        w.put_zeros(14);
    }
    w.put_u8(DBF_HEADER_TERMINATOR);
    Ok(())
}

//==================================================================================
// 3. Records
//==================================================================================

/// Writes one value into its column. Always writes exactly `field.length` bytes.
/// Returns `true` when a Numeric value had to be cut to fit.
fn write_cell(w: &mut ByteWriter, field: &FieldDescriptor, value: &AttributeValue) -> bool {
    let width = field.length as usize;
    match field.kind {
        FieldKind::Logical => {
            w.put_u8(if value.is_truthy() { b'T' } else { b'F' });
        }
        FieldKind::Date => {
            let printed = value.printed();
            if printed.chars().count() == 8 {
                w.put_bytes(&to_single_bytes(&printed));
            } else {
                log::debug!(
                    "Value '{}' for date field '{}' is not YYYYMMDD; writing blanks",
                    printed,
                    field.name
                );
                w.put_bytes(&[b' '; 8]);
            }
        }
        FieldKind::Numeric => match value {
            AttributeValue::Number(n) if !n.is_finite() => {
                w.put_bytes(&vec![b' '; width]);
            }
            _ => {
                let printed = value.printed();
                w.put_bytes(&pad_left(&printed, width));
                return width > 0 && printed.chars().count() > width;
            }
        },
        FieldKind::Character => {
            w.put_bytes(&pad_right(&value.printed(), width));
        }
    }
    false
}

/// Encodes the full table for `bucket` using the given field list.
pub fn encode_table(
    bucket: &FeatureBucket,
    fields: &[FieldDescriptor],
    date: NaiveDate,
) -> Result<Vec<u8>, ShpforgeError> {
    let layout = TableLayout::compute(fields, bucket.len())?;
    let mut w = ByteWriter::with_capacity(layout.total_len());

    for field in fields.iter().filter(|f| f.length == 0) {
        log::warn!(
            "Field '{}' ({}) has zero length; its values will not be written",
            field.name,
            field.kind
        );
    }

    write_header(&mut w, &layout, fields, date)?;

    for (row, feature) in bucket.iter().enumerate() {
        w.put_u8(DBF_RECORD_ACTIVE);
        for field in fields {
            let value = match feature.attributes.get(&field.source_key) {
                Some(v) if !v.is_null() => Cow::Borrowed(v),
                _ => Cow::Owned(AttributeValue::Text(row.to_string())),
            };
            if write_cell(&mut w, field, &value) {
                log::warn!(
                    "Value '{}' in row {} does not fit numeric field '{}' (length {}); it was truncated",
                    value.printed(),
                    row,
                    field.name,
                    field.length
                );
            }
        }
    }
    w.put_u8(DBF_EOF);

    if w.len() != layout.total_len() {
        return Err(ShpforgeError::InternalError(format!(
            "Table length {} does not match computed layout {}",
            w.len(),
            layout.total_len()
        )));
    }

    log_metric!(
        "event" = "encode_table",
        "records" = layout.record_count,
        "fields" = fields.len(),
        "record_length" = layout.record_length
    );
    Ok(w.into_inner())
}
