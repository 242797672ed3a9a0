//! Attribute values and the insertion-ordered attribute map.

use chrono::NaiveDate;

//==================================================================================
// 1. AttributeValue
//==================================================================================

/// A primitive attribute value attached to a feature.
///
/// `Null` is a present-but-empty value (e.g. a JSON `null`). It never fixes a
/// column type during schema inference and is treated as missing when records
/// are written.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Boolean(bool),
    Number(f64),
    Date(NaiveDate),
    Text(String),
    Null,
}

impl AttributeValue {
    /// The printed form used for length inference and for ASCII record output.
    ///
    /// Numbers print in their shortest round-trip form with integral values
    /// carrying no decimal point (`1.0` prints as `1`).
    pub fn printed(&self) -> String {
        match self {
            Self::Boolean(b) => b.to_string(),
            Self::Number(n) => format_number(*n),
            Self::Date(d) => d.format("%Y%m%d").to_string(),
            Self::Text(s) => s.clone(),
            Self::Null => String::new(),
        }
    }

    /// Truthiness as used by Logical columns.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Boolean(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::Date(_) => true,
            Self::Text(s) => !s.is_empty(),
            Self::Null => false,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// Formats an `f64` the way the attribute table expects to see it.
pub(crate) fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let s = if n > 0.0 { "Infinity" } else { "-Infinity" };
        s.to_string()
    } else if n == 0.0 {
        // Collapses -0.0.
        "0".to_string()
    } else {
        format!("{}", n)
    }
}

// --- Conversions ---

impl From<bool> for AttributeValue {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<f64> for AttributeValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<f32> for AttributeValue {
    fn from(v: f32) -> Self {
        Self::Number(v as f64)
    }
}

impl From<i32> for AttributeValue {
    fn from(v: i32) -> Self {
        Self::Number(v as f64)
    }
}

impl From<i64> for AttributeValue {
    fn from(v: i64) -> Self {
        Self::Number(v as f64)
    }
}

impl From<u32> for AttributeValue {
    fn from(v: u32) -> Self {
        Self::Number(v as f64)
    }
}

impl From<&str> for AttributeValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<NaiveDate> for AttributeValue {
    fn from(v: NaiveDate) -> Self {
        Self::Date(v)
    }
}

impl<T: Into<AttributeValue>> From<Option<T>> for AttributeValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Self::Null)
    }
}

//==================================================================================
// 2. Attributes
//==================================================================================

/// An insertion-ordered map of attribute name to value.
///
/// Column order in the attribute table follows first-seen key order across a
/// bucket, so the order of entries here is significant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    entries: Vec<(String, AttributeValue)>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value. An existing key keeps its position and has its value replaced.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<AttributeValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Attributes
where
    K: Into<String>,
    V: Into<AttributeValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Attributes::new();
        for (k, v) in iter {
            attrs.insert(k, v);
        }
        attrs
    }
}
