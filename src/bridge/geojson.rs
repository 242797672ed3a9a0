// In: src/bridge/geojson.rs

//! Adapter for GeoJSON `Feature` objects.
//!
//! `Point` maps to a point; `LineString` and `MultiLineString` map to a polyline;
//! `Polygon` and `MultiPolygon` map to a polygon whose rings are the polygons'
//! rings flattened in document order. `MultiPoint`, `GeometryCollection` and
//! null geometries have no single-kind equivalent and are dropped.

use serde_json::Value;

use crate::bridge::json_values;
use crate::error::ShpforgeError;
use crate::model::{Feature, Geometry};
use crate::traits::SourceGraphic;

#[derive(Debug, Clone, PartialEq)]
pub struct GeoJsonFeature(pub Value);

impl GeoJsonFeature {
    /// Parses a `FeatureCollection`, a single `Feature`, or a bare array of features.
    pub fn parse_many(json: &str) -> Result<Vec<Self>, ShpforgeError> {
        let value: Value = serde_json::from_str(json)?;
        match value {
            Value::Array(items) => Ok(items.into_iter().map(Self).collect()),
            Value::Object(mut map) => match map.get("type").and_then(Value::as_str) {
                Some("FeatureCollection") => match map.remove("features") {
                    Some(Value::Array(items)) => Ok(items.into_iter().map(Self).collect()),
                    _ => Err(ShpforgeError::InvalidInput(
                        "FeatureCollection has no 'features' array".into(),
                    )),
                },
                _ => Ok(vec![Self(Value::Object(map))]),
            },
            other => Err(ShpforgeError::InvalidInput(format!(
                "Expected a GeoJSON object or array, got {}",
                other
            ))),
        }
    }

    fn geometry(&self) -> Option<Geometry> {
        let geometry = self.0.get("geometry")?;
        let coordinates = geometry.get("coordinates")?;
        match geometry.get("type")?.as_str()? {
            "Point" => {
                let (x, y) = json_values::coord(coordinates)?;
                Some(Geometry::Point { x, y })
            }
            "LineString" => Some(Geometry::Polyline {
                paths: vec![json_values::path(coordinates)?],
            }),
            "MultiLineString" => Some(Geometry::Polyline {
                paths: json_values::parts(coordinates)?,
            }),
            "Polygon" => Some(Geometry::Polygon {
                rings: json_values::parts(coordinates)?,
            }),
            "MultiPolygon" => {
                let polygons = coordinates.as_array()?;
                let mut rings = Vec::new();
                for polygon in polygons {
                    rings.extend(json_values::parts(polygon)?);
                }
                Some(Geometry::Polygon { rings })
            }
            other => {
                log::debug!("GeoJSON geometry type '{}' is not supported", other);
                None
            }
        }
    }
}

impl SourceGraphic for GeoJsonFeature {
    fn to_feature(&self) -> Option<Feature> {
        let geometry = self.geometry()?;
        let attributes =
            json_values::attributes(self.0.get("properties").and_then(Value::as_object));
        Some(Feature::with_attributes(geometry, attributes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AttributeValue;
    use crate::types::ShapeType;
    use serde_json::json;

    fn feature(geometry: Value) -> GeoJsonFeature {
        GeoJsonFeature(json!({"type": "Feature", "geometry": geometry, "properties": {"K": 3}}))
    }

    #[test]
    fn test_point_and_properties() {
        let f = feature(json!({"type": "Point", "coordinates": [10.5, -3.0]}))
            .to_feature()
            .unwrap();
        assert_eq!(f.geometry, Geometry::Point { x: 10.5, y: -3.0 });
        assert_eq!(f.attributes.get("K"), Some(&AttributeValue::Number(3.0)));
    }

    #[test]
    fn test_line_kinds_become_polyline() {
        let single = feature(json!({"type": "LineString", "coordinates": [[0, 0], [1, 2]]}));
        assert_eq!(
            single.to_feature().unwrap().geometry,
            Geometry::Polyline { paths: vec![vec![(0.0, 0.0), (1.0, 2.0)]] }
        );
        let multi = feature(json!({"type": "MultiLineString", "coordinates": [[[0, 0], [1, 1]], [[2, 2], [3, 3]]]}));
        assert_eq!(multi.to_feature().unwrap().geometry.parts().len(), 2);
    }

    #[test]
    fn test_multipolygon_rings_are_flattened() {
        let f = feature(json!({
            "type": "MultiPolygon",
            "coordinates": [
                [[[0, 0], [1, 0], [0, 1], [0, 0]], [[0.1, 0.1], [0.2, 0.1], [0.1, 0.2], [0.1, 0.1]]],
                [[[5, 5], [6, 5], [5, 6], [5, 5]]]
            ]
        }))
        .to_feature()
        .unwrap();
        assert_eq!(f.shape_type(), ShapeType::Polygon);
        assert_eq!(f.geometry.parts().len(), 3);
        assert_eq!(f.geometry.parts()[2][0], (5.0, 5.0));
    }

    #[test]
    fn test_unsupported_geometries_are_dropped() {
        assert!(feature(json!({"type": "MultiPoint", "coordinates": [[0, 0]]})).to_feature().is_none());
        assert!(feature(Value::Null).to_feature().is_none());
    }

    #[test]
    fn test_parse_many_inputs() {
        let collection = r#"{"type": "FeatureCollection", "features": [{"type": "Feature"}, {"type": "Feature"}]}"#;
        assert_eq!(GeoJsonFeature::parse_many(collection).unwrap().len(), 2);
        assert_eq!(GeoJsonFeature::parse_many(r#"{"type": "Feature"}"#).unwrap().len(), 1);
        assert_eq!(GeoJsonFeature::parse_many(r#"[]"#).unwrap().len(), 0);
        assert!(matches!(
            GeoJsonFeature::parse_many(r#"{"type": "FeatureCollection"}"#),
            Err(ShpforgeError::InvalidInput(_))
        ));
        assert!(matches!(GeoJsonFeature::parse_many("42"), Err(ShpforgeError::InvalidInput(_))));
    }
}
