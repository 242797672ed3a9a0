use super::*;
use crate::config::EncoderConfig;
use crate::error::ShpforgeError;
use crate::model::{AttributeValue, Feature};
use crate::pipeline::{FieldDescriptor, MainHeader, TableHeader};
use crate::types::{BoundingBox, FieldKind, ShapeType};
use chrono::NaiveDate;

fn writer() -> ShapefileWriter {
    ShapefileWriter::new(EncoderConfig {
        table_date: NaiveDate::from_ymd_opt(2020, 1, 2),
        ..EncoderConfig::default()
    })
}

const ESRI_GRAPHICS: &str = r#"[
    {"geometry": {"x": -1.5, "y": 2.0}, "attributes": {"NAME": "A", "VAL": 1}},
    {"geometry": {"x": 3.0, "y": -4.0}, "attributes": {"NAME": "BB", "VAL": 2}},
    {"geometry": {"paths": [[[0, 0], [10, 10]]]}, "attributes": {"ROAD": "main"}},
    {"attributes": {"ORPHAN": true}}
]"#;

#[test]
fn test_esri_graphics_are_split_by_kind() {
    let mut w = writer();
    assert_eq!(w.add_esri_json(ESRI_GRAPHICS).unwrap(), 3);
    assert_eq!(w.bucket(ShapeType::Point).len(), 2);
    assert_eq!(w.bucket(ShapeType::Polyline).len(), 1);
    assert_eq!(w.bucket(ShapeType::Polygon).len(), 0);
}

#[test]
fn test_export_produces_triple_and_clears_only_that_bucket() {
    let mut w = writer();
    w.add_esri_json(ESRI_GRAPHICS).unwrap();

    let bundle = w.export(ShapeType::Point).unwrap().unwrap();
    let header = MainHeader::parse(bundle.shape()).unwrap();
    assert_eq!(header.shape_type, ShapeType::Point);
    assert_eq!(
        header.bbox,
        BoundingBox { xmin: -1.5, ymin: -4.0, xmax: 3.0, ymax: 2.0 }
    );

    let table = TableHeader::parse(bundle.table()).unwrap();
    assert_eq!(table.last_update, (120, 1, 2));
    let names: Vec<&str> = table.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["NAME", "VAL"]);

    assert!(w.bucket(ShapeType::Point).is_empty());
    assert_eq!(w.bucket(ShapeType::Polyline).len(), 1);
}

#[test]
fn test_export_of_empty_bucket_is_none() {
    let mut w = writer();
    assert!(w.export(ShapeType::Polygon).unwrap().is_none());
}

#[test]
fn test_failed_export_keeps_bucket() {
    let mut w = writer();
    w.add_feature(Feature::point(1.0, 1.0)).unwrap();
    let result = w.export_with_schema(ShapeType::Point, &[]);
    assert!(matches!(result, Err(ShpforgeError::InvalidInput(_))));
    assert_eq!(w.bucket(ShapeType::Point).len(), 1);

    let fields = [FieldDescriptor::logical("FLAG")];
    let bundle = w.export_with_schema(ShapeType::Point, &fields).unwrap().unwrap();
    let table = TableHeader::parse(bundle.table()).unwrap();
    assert_eq!(table.fields[0].kind, FieldKind::Logical);
    assert!(w.is_empty());
}

#[test]
fn test_geojson_collection_round_trip() {
    let collection = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature",
             "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [4, 0], [4, 3], [0, 0]]]},
             "properties": {"ZONE": "r1", "AREA": 6.5}},
            {"type": "Feature",
             "geometry": {"type": "MultiPolygon", "coordinates": [[[[10, 10], [11, 10], [10, 12], [10, 10]]]]},
             "properties": {"ZONE": "c2", "AREA": null}},
            {"type": "Feature", "geometry": null, "properties": {}}
        ]
    }"#;
    let mut w = writer();
    assert_eq!(w.add_geojson(collection).unwrap(), 2);

    let features = w.bucket(ShapeType::Polygon).features();
    assert_eq!(features[1].attributes.get("AREA"), Some(&AttributeValue::Null));

    let bundle = w.export(ShapeType::Polygon).unwrap().unwrap();
    let header = MainHeader::parse(bundle.index()).unwrap();
    assert_eq!(
        header.bbox,
        BoundingBox { xmin: 0.0, ymin: 0.0, xmax: 11.0, ymax: 12.0 }
    );
    let table = TableHeader::parse(bundle.table()).unwrap();
    assert_eq!(table.record_count, 2);
    assert_eq!(table.fields[1], FieldDescriptor::numeric("AREA", 3, 1));
}

#[test]
fn test_clear_all_empties_every_bucket() {
    let mut w = writer();
    w.add_esri_json(ESRI_GRAPHICS).unwrap();
    assert_eq!(w.len(), 3);
    w.clear_all();
    assert!(w.is_empty());
    for kind in ShapeType::ALL {
        assert!(w.export(kind).unwrap().is_none());
    }
}
