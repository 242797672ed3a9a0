// In: src/config.rs

//! The single source of truth for all shpforge encoder configuration.
//!
//! `EncoderConfig` is created once at the application boundary (e.g. from a
//! JSON document or a Python dictionary) and then passed by reference into every
//! encode pass. Every field has a default, so an empty document is a valid config.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ShpforgeError;

//==================================================================================
// I. Core Configuration Enums
//==================================================================================

/// How schema inference resolves an attribute key that appears with different
/// value kinds across features (e.g. text in one feature, a number in another).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MixedKindPolicy {
    /// **Default:** The column becomes Character, wide enough for the longest
    /// printed value of any kind. Every value then round-trips as text.
    #[default]
    CoerceToCharacter,

    /// The kind seen first is kept and only Character/Numeric widths are widened.
    /// Later values of another kind are printed into the first kind's column,
    /// padded or truncated to fit.
    FirstSeen,
}

//==================================================================================
// II. The Unified EncoderConfig
//==================================================================================

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct EncoderConfig {
    /// Resolution for attribute keys seen with more than one value kind.
    #[serde(default)]
    pub mixed_kinds: MixedKindPolicy,

    /// The "last update" date stamped into the `.dbf` header.
    /// `None` uses the current local date; set it for byte-reproducible tables.
    #[serde(default)]
    pub table_date: Option<NaiveDate>,

    /// Name of the synthetic Numeric column written when no feature in the
    /// bucket carries attributes. Truncated to 10 characters like any field name.
    #[serde(default = "default_auto_id_field")]
    pub auto_id_field: String,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            mixed_kinds: MixedKindPolicy::default(),
            table_date: None,
            auto_id_field: default_auto_id_field(),
        }
    }
}

impl EncoderConfig {
    /// Parses a config from a JSON document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ShpforgeError> {
        Ok(serde_json::from_str(json)?)
    }

    /// The date to stamp into the table header for this pass.
    pub fn resolve_table_date(&self) -> NaiveDate {
        self.table_date
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}

/// Helper for `serde` to provide a default for `auto_id_field`.
fn default_auto_id_field() -> String {
    "ID_AUTO".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        let config = EncoderConfig::from_json("{}").unwrap();
        assert_eq!(config, EncoderConfig::default());
        assert_eq!(config.auto_id_field, "ID_AUTO");
    }

    #[test]
    fn test_parse_all_fields() {
        let config = EncoderConfig::from_json(
            r#"{"mixed_kinds": "first_seen", "table_date": "2023-11-05", "auto_id_field": "FID"}"#,
        )
        .unwrap();
        assert_eq!(config.mixed_kinds, MixedKindPolicy::FirstSeen);
        assert_eq!(config.table_date, NaiveDate::from_ymd_opt(2023, 11, 5));
        assert_eq!(config.auto_id_field, "FID");
    }

    #[test]
    fn test_bad_policy_is_error() {
        let result = EncoderConfig::from_json(r#"{"mixed_kinds": "guess"}"#);
        assert!(matches!(result, Err(ShpforgeError::SerdeJson(_))));
    }
}
