// In: src/bridge/esri_json.rs

//! Adapter for ESRI JSON graphics:
//! `{"geometry": {"x", "y"} | {"paths"} | {"rings"}, "attributes": {...}}`.

use serde_json::Value;

use crate::bridge::json_values;
use crate::error::ShpforgeError;
use crate::model::{Feature, Geometry};
use crate::traits::SourceGraphic;
use crate::types::ShapeType;

/// One ESRI JSON graphic, held as parsed JSON until it is normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct EsriJsonGraphic(pub Value);

impl EsriJsonGraphic {
    /// Parses a document holding either one graphic or an array of graphics.
    /// A `{"features": [...]}` wrapper (a feature set) is unwrapped as well.
    pub fn parse_many(json: &str) -> Result<Vec<Self>, ShpforgeError> {
        let value: Value = serde_json::from_str(json)?;
        Ok(match value {
            Value::Array(items) => items.into_iter().map(Self).collect(),
            Value::Object(mut map) if map.get("features").is_some_and(Value::is_array) => {
                match map.remove("features") {
                    Some(Value::Array(items)) => items.into_iter().map(Self).collect(),
                    _ => Vec::new(),
                }
            }
            other => vec![Self(other)],
        })
    }

    /// The kind this graphic declares or, failing that, the kind its keys imply.
    fn kind(geometry: &Value) -> Option<ShapeType> {
        if let Some(declared) = geometry.get("type").and_then(Value::as_str) {
            return match declared.to_ascii_lowercase().as_str() {
                "point" | "esrigeometrypoint" => Some(ShapeType::Point),
                "polyline" | "esrigeometrypolyline" => Some(ShapeType::Polyline),
                "polygon" | "esrigeometrypolygon" => Some(ShapeType::Polygon),
                _ => None,
            };
        }
        if geometry.get("x").is_some() && geometry.get("y").is_some() {
            Some(ShapeType::Point)
        } else if geometry.get("paths").is_some() {
            Some(ShapeType::Polyline)
        } else if geometry.get("rings").is_some() {
            Some(ShapeType::Polygon)
        } else {
            None
        }
    }

    fn geometry(&self) -> Option<Geometry> {
        let geometry = self.0.get("geometry")?;
        match Self::kind(geometry)? {
            ShapeType::Point => Some(Geometry::Point {
                x: geometry.get("x")?.as_f64()?,
                y: geometry.get("y")?.as_f64()?,
            }),
            ShapeType::Polyline => Some(Geometry::Polyline {
                paths: json_values::parts(geometry.get("paths")?)?,
            }),
            ShapeType::Polygon => Some(Geometry::Polygon {
                rings: json_values::parts(geometry.get("rings")?)?,
            }),
        }
    }
}

impl SourceGraphic for EsriJsonGraphic {
    fn to_feature(&self) -> Option<Feature> {
        let geometry = self.geometry()?;
        let attributes =
            json_values::attributes(self.0.get("attributes").and_then(Value::as_object));
        Some(Feature::with_attributes(geometry, attributes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AttributeValue;
    use serde_json::json;

    #[test]
    fn test_sniffed_kinds() {
        let point = EsriJsonGraphic(json!({"geometry": {"x": 1, "y": 2}, "attributes": {"A": "b"}}));
        let feature = point.to_feature().unwrap();
        assert_eq!(feature.geometry, Geometry::Point { x: 1.0, y: 2.0 });
        assert_eq!(feature.attributes.get("A"), Some(&AttributeValue::from("b")));

        let line = EsriJsonGraphic(json!({"geometry": {"paths": [[[0, 0], [1, 1]]]}}));
        assert_eq!(line.to_feature().unwrap().shape_type(), ShapeType::Polyline);

        let polygon = EsriJsonGraphic(json!({"geometry": {"rings": [[[0, 0], [1, 0], [0, 1], [0, 0]]]}}));
        assert_eq!(polygon.to_feature().unwrap().shape_type(), ShapeType::Polygon);
    }

    #[test]
    fn test_declared_type_wins_over_keys() {
        let graphic = EsriJsonGraphic(json!({
            "geometry": {"type": "POLYGON", "x": 5, "y": 5, "rings": [[[0, 0], [1, 1], [0, 0]]]}
        }));
        assert_eq!(graphic.to_feature().unwrap().shape_type(), ShapeType::Polygon);

        let mismatched = EsriJsonGraphic(json!({"geometry": {"type": "polyline", "x": 5, "y": 5}}));
        assert!(mismatched.to_feature().is_none());
    }

    #[test]
    fn test_missing_geometry_is_dropped() {
        assert!(EsriJsonGraphic(json!({"attributes": {"A": 1}})).to_feature().is_none());
        assert!(EsriJsonGraphic(json!({"geometry": {"z": 1}})).to_feature().is_none());
    }

    #[test]
    fn test_parse_many_shapes() {
        assert_eq!(EsriJsonGraphic::parse_many(r#"[{}, {}]"#).unwrap().len(), 2);
        assert_eq!(EsriJsonGraphic::parse_many(r#"{"features": [{}]}"#).unwrap().len(), 1);
        assert_eq!(EsriJsonGraphic::parse_many(r#"{"geometry": {}}"#).unwrap().len(), 1);
        assert!(matches!(
            EsriJsonGraphic::parse_many("{nope"),
            Err(ShpforgeError::SerdeJson(_))
        ));
    }
}
