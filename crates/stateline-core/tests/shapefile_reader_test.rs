//! Integration tests for the shapefile reader against files written with
//! the same `shapefile` crate.

use std::fs;
use std::path::PathBuf;

use shapefile::dbase::{FieldName, FieldValue, Record, TableWriterBuilder};
use shapefile::{Point, Polygon, PolygonRing, Writer};
use tempfile::TempDir;

use stateline_core::formats::{FormatReader, ShapefileReader};
use stateline_core::models::Geometry;

/// Write a two-state boundary shapefile: AA covers x,y in [0,10],
/// BB covers x,y in [20,30].
fn write_state_fixture(dir: &TempDir) -> PathBuf {
    let shp_path = dir.path().join("states.shp");

    let table = TableWriterBuilder::new()
        .add_character_field(FieldName::try_from("STUSPS").unwrap(), 2)
        .add_character_field(FieldName::try_from("NAME").unwrap(), 40);

    let mut writer = Writer::from_path(&shp_path, table).unwrap();

    let squares = [("AA", "Alpha", 0.0), ("BB", "Beta", 20.0)];
    for (code, name, origin) in squares {
        let ring = PolygonRing::Outer(vec![
            Point::new(origin, origin),
            Point::new(origin, origin + 10.0),
            Point::new(origin + 10.0, origin + 10.0),
            Point::new(origin + 10.0, origin),
            Point::new(origin, origin),
        ]);

        let mut record = Record::default();
        record.insert("STUSPS".to_string(), FieldValue::Character(Some(code.to_string())));
        record.insert("NAME".to_string(), FieldValue::Character(Some(name.to_string())));

        writer.write_shape_and_record(&Polygon::new(ring), &record).unwrap();
    }

    drop(writer);
    shp_path
}

#[test]
fn test_read_states_fixture() {
    let dir = TempDir::new().unwrap();
    let shp_path = write_state_fixture(&dir);

    let collection = ShapefileReader.read(&shp_path).unwrap();

    assert_eq!(collection.name, "states");
    assert_eq!(collection.len(), 2);

    let codes: Vec<&str> =
        collection.features.iter().filter_map(|f| f.property_str("STUSPS")).collect();
    assert_eq!(codes, vec!["AA", "BB"]);

    for feature in &collection.features {
        assert!(matches!(feature.geometry, Some(Geometry::Polygon { .. })));
    }
}

#[test]
fn test_missing_prj_defaults_to_wgs84() {
    let dir = TempDir::new().unwrap();
    let shp_path = write_state_fixture(&dir);

    let collection = ShapefileReader.read(&shp_path).unwrap();

    assert_eq!(collection.crs.epsg, 4326);
}

#[test]
fn test_prj_with_authority_is_honored() {
    let dir = TempDir::new().unwrap();
    let shp_path = write_state_fixture(&dir);

    let prj = r#"PROJCS["WGS 84 / Pseudo-Mercator",GEOGCS["WGS 84",AUTHORITY["EPSG","4326"]],AUTHORITY["EPSG","3857"]]"#;
    fs::write(shp_path.with_extension("prj"), prj).unwrap();

    let collection = ShapefileReader.read(&shp_path).unwrap();

    // The outermost CRS node wins, not the nested geographic one
    assert_eq!(collection.crs.epsg, 3857);
}

#[test]
fn test_missing_shx_component_is_an_error() {
    let dir = TempDir::new().unwrap();
    let shp_path = write_state_fixture(&dir);

    fs::remove_file(shp_path.with_extension("shx")).unwrap();

    let err = ShapefileReader.read(&shp_path).unwrap_err();
    assert!(err.to_string().contains(".shx"));
}
