//! Attribute schema inference: derives the ordered dBASE column list for a bucket.
//!
//! The field list is materialised once per encode pass and then reused, unchanged,
//! for the table header and for every record, so column order can never drift
//! between the two.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::config::{EncoderConfig, MixedKindPolicy};
use crate::kernels::ascii::truncate_chars;
use crate::model::{AttributeValue, FeatureBucket};
use crate::types::FieldKind;

/// Maximum length of a dBASE field name, in characters.
pub const FIELD_NAME_LEN: usize = 10;

//==================================================================================
// 1. FieldDescriptor
//==================================================================================

/// One attribute-table column.
///
/// `name` is what goes into the header (at most 10 characters); `source_key`
/// is the full attribute key values are looked up by.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub source_key: String,
    pub kind: FieldKind,
    pub length: u8,
    pub scale: u8,
}

impl FieldDescriptor {
    /// Builds a descriptor, truncating the name and clamping length and scale
    /// to what `kind` allows.
    pub fn new(source_key: impl Into<String>, kind: FieldKind, length: usize, scale: usize) -> Self {
        let source_key = source_key.into();
        let length = kind.clamp_length(length);
        let scale = match kind {
            FieldKind::Numeric => scale.min(length as usize) as u8,
            _ => 0,
        };
        Self {
            name: truncate_chars(&source_key, FIELD_NAME_LEN).to_string(),
            source_key,
            kind,
            length,
            scale,
        }
    }

    pub fn numeric(source_key: impl Into<String>, length: usize, scale: usize) -> Self {
        Self::new(source_key, FieldKind::Numeric, length, scale)
    }

    pub fn character(source_key: impl Into<String>, length: usize) -> Self {
        Self::new(source_key, FieldKind::Character, length, 0)
    }

    pub fn logical(source_key: impl Into<String>) -> Self {
        Self::new(source_key, FieldKind::Logical, 1, 0)
    }

    pub fn date(source_key: impl Into<String>) -> Self {
        Self::new(source_key, FieldKind::Date, 8, 0)
    }
}

//==================================================================================
// 2. Inference
//==================================================================================

/// Running statistics for one attribute key.
struct ColumnStats<'a> {
    key: &'a str,
    kind: FieldKind,
    /// Widest printed value seen for this key, over every value kind.
    max_len: usize,
    scale: usize,
    coerced: bool,
}

/// What a single value says about its column, or `None` if the value is not
/// one of the recognized kinds.
fn classify(value: &AttributeValue) -> Option<(FieldKind, usize, usize)> {
    match value {
        AttributeValue::Number(n) if n.is_finite() => {
            let printed = value.printed();
            let scale = match printed.split_once('.') {
                Some((_, fraction)) => fraction.len(),
                None => 0,
            };
            Some((FieldKind::Numeric, printed.chars().count(), scale))
        }
        AttributeValue::Boolean(_) => Some((FieldKind::Logical, value.printed().len(), 0)),
        AttributeValue::Text(s) => Some((FieldKind::Character, s.chars().count(), 0)),
        AttributeValue::Date(_) => Some((FieldKind::Date, 8, 0)),
        AttributeValue::Number(_) | AttributeValue::Null => None,
    }
}

/// Infers the ordered field list for `bucket`.
///
/// Columns appear in first-seen key order. If no feature carries a recognized
/// attribute, the single synthetic Numeric column `config.auto_id_field` of
/// width 8 is returned.
pub fn infer_schema(bucket: &FeatureBucket, config: &EncoderConfig) -> Vec<FieldDescriptor> {
    let mut columns: Vec<ColumnStats> = Vec::new();
    let mut index_of: HashMap<&str, usize> = HashMap::new();

    for feature in bucket {
        for (key, value) in feature.attributes.iter() {
            let Some((kind, printed_len, scale)) = classify(value) else {
                log::debug!("Skipping unrecognized value for attribute '{}'", key);
                continue;
            };

            match index_of.get(key) {
                None => {
                    index_of.insert(key, columns.len());
                    columns.push(ColumnStats {
                        key,
                        kind,
                        max_len: printed_len,
                        scale,
                        coerced: false,
                    });
                }
                Some(&idx) => {
                    let column = &mut columns[idx];
                    column.max_len = column.max_len.max(printed_len);
                    if kind == column.kind {
                        column.scale = column.scale.max(scale);
                    } else if config.mixed_kinds == MixedKindPolicy::CoerceToCharacter {
                        if !column.coerced {
                            log::warn!(
                                "Attribute '{}' seen as both {} and {}; writing it as Character",
                                key,
                                column.kind,
                                kind
                            );
                        }
                        column.kind = FieldKind::Character;
                        column.scale = 0;
                        column.coerced = true;
                    }
                }
            }
        }
    }

    if columns.is_empty() {
        return vec![FieldDescriptor::numeric(config.auto_id_field.as_str(), 8, 0)];
    }

    let fields: Vec<FieldDescriptor> = columns
        .iter()
        .map(|c| FieldDescriptor::new(c.key, c.kind, c.max_len, c.scale))
        .collect();

    warn_on_duplicate_names(&fields);
    log_metric!("event" = "infer_schema", "records" = bucket.len(), "fields" = fields.len());
    fields
}

/// Truncated names are not de-duplicated; two keys sharing their first ten
/// characters produce two columns with the same header name.
fn warn_on_duplicate_names(fields: &[FieldDescriptor]) {
    let mut seen: HashMap<&str, &str> = HashMap::new();
    for field in fields {
        if let Some(first) = seen.insert(field.name.as_str(), field.source_key.as_str()) {
            log::warn!(
                "Attributes '{}' and '{}' share the truncated column name '{}'",
                first,
                field.source_key,
                field.name
            );
        }
    }
}

//==================================================================================
// 3. Unit Tests
//==================================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Attributes, Feature};
    use crate::types::ShapeType;
    use chrono::NaiveDate;

    fn point_with(attrs: Attributes) -> Feature {
        let mut f = Feature::point(0.0, 0.0);
        f.attributes = attrs;
        f
    }

    fn bucket_of(rows: Vec<Attributes>) -> FeatureBucket {
        FeatureBucket::from_features(ShapeType::Point, rows.into_iter().map(point_with)).unwrap()
    }

    #[test]
    fn test_widening_keeps_first_seen_order() {
        let bucket = bucket_of(vec![
            Attributes::from_iter([("NAME", "A".into()), ("VAL", AttributeValue::from(1))]),
            Attributes::from_iter([("NAME", "BB".into()), ("VAL", AttributeValue::from(2))]),
            Attributes::from_iter([("NAME", "C".into()), ("VAL", AttributeValue::from(10))]),
        ]);
        let fields = infer_schema(&bucket, &EncoderConfig::default());
        assert_eq!(
            fields,
            vec![
                FieldDescriptor::character("NAME", 2),
                FieldDescriptor::numeric("VAL", 2, 0),
            ]
        );
    }

    #[test]
    fn test_numeric_scale_widens() {
        let bucket = bucket_of(vec![
            Attributes::from_iter([("RATE", AttributeValue::from(1.5))]),
            Attributes::from_iter([("RATE", AttributeValue::from(2.25))]),
            Attributes::from_iter([("RATE", AttributeValue::from(300))]),
        ]);
        let fields = infer_schema(&bucket, &EncoderConfig::default());
        assert_eq!(fields, vec![FieldDescriptor::numeric("RATE", 4, 2)]);
    }

    #[test]
    fn test_no_attributes_yields_auto_id() {
        let bucket = bucket_of(vec![Attributes::new(), Attributes::new()]);
        let fields = infer_schema(&bucket, &EncoderConfig::default());
        assert_eq!(fields, vec![FieldDescriptor::numeric("ID_AUTO", 8, 0)]);
    }

    #[test]
    fn test_float_scale_and_other_kinds() {
        let date = NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
        let bucket = bucket_of(vec![Attributes::from_iter([
            ("AREA", AttributeValue::from(12.375)),
            ("OPEN", AttributeValue::from(true)),
            ("SINCE", AttributeValue::from(date)),
        ])]);
        let fields = infer_schema(&bucket, &EncoderConfig::default());
        assert_eq!(fields[0], FieldDescriptor::numeric("AREA", 6, 3));
        assert_eq!(fields[1], FieldDescriptor::logical("OPEN"));
        assert_eq!(fields[2], FieldDescriptor::date("SINCE"));
    }

    #[test]
    fn test_null_and_non_finite_are_skipped_until_recognized() {
        let bucket = bucket_of(vec![
            Attributes::from_iter([("A", AttributeValue::Null), ("B", AttributeValue::from(f64::NAN))]),
            Attributes::from_iter([("B", AttributeValue::from("xyz"))]),
        ]);
        let fields = infer_schema(&bucket, &EncoderConfig::default());
        assert_eq!(fields, vec![FieldDescriptor::character("B", 3)]);
    }

    #[test]
    fn test_mixed_kinds_coerce_to_character() {
        let bucket = bucket_of(vec![
            Attributes::from_iter([("CODE", AttributeValue::from(7))]),
            Attributes::from_iter([("CODE", AttributeValue::from("seven"))]),
            Attributes::from_iter([("CODE", AttributeValue::from(1234567))]),
        ]);
        let fields = infer_schema(&bucket, &EncoderConfig::default());
        assert_eq!(fields, vec![FieldDescriptor::character("CODE", 7)]);
    }

    #[test]
    fn test_mixed_kinds_first_seen_policy() {
        let config = EncoderConfig {
            mixed_kinds: MixedKindPolicy::FirstSeen,
            ..EncoderConfig::default()
        };
        let bucket = bucket_of(vec![
            Attributes::from_iter([("FLAG", AttributeValue::from(true))]),
            Attributes::from_iter([("FLAG", AttributeValue::from("maybe"))]),
        ]);
        let fields = infer_schema(&bucket, &config);
        assert_eq!(fields, vec![FieldDescriptor::logical("FLAG")]);
    }

    #[test]
    fn test_long_names_truncate_without_dedup() {
        let bucket = bucket_of(vec![Attributes::from_iter([
            ("POPULATION_2010", AttributeValue::from(5)),
            ("POPULATION_2020", AttributeValue::from(6)),
        ])]);
        let fields = infer_schema(&bucket, &EncoderConfig::default());
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].name, "POPULATION");
        assert_eq!(fields[1].name, "POPULATION");
        assert_eq!(fields[1].source_key, "POPULATION_2020");
    }

    #[test]
    fn test_lengths_are_clamped() {
        let long_text = "x".repeat(300);
        let bucket = bucket_of(vec![Attributes::from_iter([
            ("BIG", AttributeValue::from(1.0e20)),
            ("TEXT", AttributeValue::from(long_text)),
        ])]);
        let fields = infer_schema(&bucket, &EncoderConfig::default());
        assert_eq!(fields[0].length, 18);
        assert_eq!(fields[1].length, 254);
    }
}
