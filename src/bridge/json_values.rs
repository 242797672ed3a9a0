// In: src/bridge/json_values.rs

//! Conversions from `serde_json::Value` shared by the ESRI JSON and GeoJSON
//! adapters. Every function returns `None` instead of failing; the caller
//! decides whether a missing piece drops the whole graphic.

use serde_json::{Map, Value};

use crate::model::{AttributeValue, Attributes, Coord};

/// `[x, y, ...]` to `(x, y)`. Extra ordinates (z, m) are ignored.
pub(crate) fn coord(value: &Value) -> Option<Coord> {
    let items = value.as_array()?;
    match items.as_slice() {
        [x, y, ..] => Some((x.as_f64()?, y.as_f64()?)),
        _ => None,
    }
}

/// An array of positions. Any malformed vertex rejects the whole path.
pub(crate) fn path(value: &Value) -> Option<Vec<Coord>> {
    value.as_array()?.iter().map(coord).collect()
}

/// An array of paths (ESRI `paths`/`rings`, GeoJSON `MultiLineString`/`Polygon`).
pub(crate) fn parts(value: &Value) -> Option<Vec<Vec<Coord>>> {
    value.as_array()?.iter().map(path).collect()
}

/// Maps one JSON value to an attribute value. Arrays and objects have no
/// column representation and yield `None`.
pub(crate) fn attribute(value: &Value) -> Option<AttributeValue> {
    match value {
        Value::Null => Some(AttributeValue::Null),
        Value::Bool(b) => Some(AttributeValue::Boolean(*b)),
        Value::Number(n) => n.as_f64().map(AttributeValue::Number),
        Value::String(s) => Some(AttributeValue::Text(s.clone())),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Builds attributes from a JSON object, keeping document order.
pub(crate) fn attributes(map: Option<&Map<String, Value>>) -> Attributes {
    let mut out = Attributes::new();
    for (key, value) in map.into_iter().flatten() {
        match attribute(value) {
            Some(v) => out.insert(key.as_str(), v),
            None => log::debug!("Dropping non-scalar attribute '{}'", key),
        }
    }
    out
}
