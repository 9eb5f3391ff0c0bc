// Integration tests for RegionCatalog and generate_tiles over boundary files:
//   loading, name resolution with suggestions, heuristic sizing per source,
//   per-region error isolation, and tile export.

mod common;

use std::{fs, io::Write};

use serde_json::{json, Value};
use shapefile::{
    dbase::{FieldValue, Record, TableWriterBuilder},
    Point, Polygon, PolygonRing, Writer,
};
use tempfile::{tempdir, NamedTempFile};

use placetiles::{
    determine_tile_size_km, generate_tiles, write_tiles_geojson, write_tiles_json, RegionCatalog, RegionStatus,
    SourceType, TileRequest, TilingConfig, TilingError,
};

use common::{lonlat_box, projector};

fn feature(name: &str, geometry: Value, state: &str) -> Value {
    json!({ "type": "Feature", "geometry": geometry, "properties": {
        "LGA_NAME24": name, "STE_NAME21": state,
    } })
}

fn lga_file() -> NamedTempFile {
    let collection = json!({ "type": "FeatureCollection", "features": [
        feature("Sydney", lonlat_box(151.18, -33.90, 0.05), "New South Wales"),
        feature("North Sydney", lonlat_box(151.19, -33.85, 0.03), "New South Wales"),
        feature("Parramatta", lonlat_box(150.95, -33.85, 0.10), "New South Wales"),
        // Zero-size ring: loads, but cannot be tiled.
        feature("Broken Hill", lonlat_box(141.40, -31.98, 0.0), "New South Wales"),
    ] });

    let mut file = tempfile::Builder::new().suffix(".geojson").tempfile().unwrap();
    file.write_all(collection.to_string().as_bytes()).unwrap();
    file
}

#[test]
fn loads_geojson_file() {
    let file = lga_file();
    let catalog = RegionCatalog::load(SourceType::Lga, file.path(), &projector()).unwrap();
    assert_eq!(catalog.len(), 4);
    assert_eq!(catalog.get("parramatta").and_then(|r| r.state()), Some("New South Wales"));
}

#[test]
fn loads_shapefile_with_attributes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("lga.shp");

    {
        let table = TableWriterBuilder::new()
            .add_character_field("LGA_NAME24".try_into().unwrap(), 50)
            .add_numeric_field("AREASQKM".try_into().unwrap(), 18, 6)
            .add_character_field("STE_NAME21".try_into().unwrap(), 50);
        let mut writer = Writer::from_path(&path, table).unwrap();

        let ring = [(146.6, -37.1), (146.6, -36.5), (147.4, -36.5), (147.4, -37.1), (146.6, -37.1)];
        let polygon = Polygon::new(PolygonRing::Outer(ring.iter().map(|&(x, y)| Point::new(x, y)).collect()));

        let mut record = Record::default();
        record.insert("LGA_NAME24".to_string(), FieldValue::Character(Some("Alpine".to_string())));
        record.insert("AREASQKM".to_string(), FieldValue::Numeric(Some(4788.2)));
        record.insert("STE_NAME21".to_string(), FieldValue::Character(Some("Victoria".to_string())));
        writer.write_shape_and_record(&polygon, &record).unwrap();
    }

    let catalog = RegionCatalog::load(SourceType::Lga, &path, &projector()).unwrap();
    assert_eq!(catalog.len(), 1);

    let alpine = catalog.resolve("alpine").unwrap();
    assert_eq!(alpine.display_name(), "Alpine");
    assert_eq!(alpine.metadata_area_sqkm(), Some(4788.2));
    assert_eq!(alpine.area_sqkm(), 4788.2);
    assert_eq!(alpine.state(), Some("Victoria"));
}

#[test]
fn misspelt_name_suggests_closest() {
    let file = lga_file();
    let catalog = RegionCatalog::load(SourceType::Lga, file.path(), &projector()).unwrap();

    let err = catalog.resolve("Sydeny").unwrap_err();
    assert!(matches!(err, TilingError::RegionNotFound { .. }));
    assert!(err.suggestions().iter().any(|s| s == "sydney"), "{:?}", err.suggestions());
    assert!(err.to_string().contains("did you mean"));
}

#[test]
fn missing_file_is_a_load_error() {
    let err = RegionCatalog::load(SourceType::Gccsa, std::path::Path::new("/nonexistent/gccsa.geojson"), &projector()).unwrap_err();
    assert!(matches!(err, TilingError::CatalogLoad { source_type: SourceType::Gccsa, .. }));
}

#[test]
fn single_region_request() {
    let file = lga_file();
    let request = TileRequest::new(SourceType::Lga, file.path()).region("parramatta");
    let run = generate_tiles(&request, &TilingConfig::default()).unwrap();

    assert_eq!(run.outcomes.len(), 1);
    assert!(run.outcomes[0].is_ok());
    assert!(!run.tiles.is_empty());
    assert!(run.tiles.iter().all(|t| t.region == "Parramatta" && t.source == "lga"));
}

#[test]
fn single_region_request_not_found() {
    let file = lga_file();
    let request = TileRequest::new(SourceType::Lga, file.path()).region("Sydeny");
    let err = generate_tiles(&request, &TilingConfig::default()).unwrap_err();
    assert!(err.suggestions().iter().any(|s| s == "sydney"));
}

#[test]
fn sweep_isolates_degenerate_region() {
    let file = lga_file();
    let request = TileRequest::new(SourceType::Lga, file.path()).state("NSW");
    let run = generate_tiles(&request, &TilingConfig::default()).unwrap();

    let names = run.outcomes.iter().map(|o| o.region.as_str()).collect::<Vec<_>>();
    assert_eq!(names, ["Broken Hill", "North Sydney", "Parramatta", "Sydney"]);
    assert!(matches!(run.outcomes[0].status, RegionStatus::Failed(_)));
    assert_eq!(run.failures().count(), 1);

    assert!(run.tiles.iter().all(|t| t.region != "Broken Hill"));
    assert!(run.tiles.iter().all(|t| t.state.as_deref() == Some("NSW")));
}

#[test]
fn heuristic_uses_metro_membership() {
    let projector = projector();
    let bytes = serde_json::to_vec(&json!({ "type": "FeatureCollection", "features": [
        { "type": "Feature", "geometry": lonlat_box(151.00, -33.80, 0.1), "properties": {
            "SA2_NAME21": "Parramatta - South", "AREASQKM21": 1200.0, "GCC_NAME21": "Greater Sydney", "STE_NAME21": "New South Wales" } },
        { "type": "Feature", "geometry": lonlat_box(146.00, -31.00, 0.1), "properties": {
            "SA2_NAME21": "Cobar", "AREASQKM21": 1200.0, "GCC_NAME21": "Rest of NSW", "STE_NAME21": "New South Wales" } },
    ] })).unwrap();
    let catalog = RegionCatalog::from_geojson_bytes(SourceType::Sa2, &bytes, &projector).unwrap();
    let heuristic = TilingConfig::default().heuristic;

    let size = |name: &str| determine_tile_size_km(catalog.get(name).unwrap(), SourceType::Sa2, &heuristic);
    assert_eq!(size("Parramatta - South"), 5);
    assert_eq!(size("Cobar"), 20);
}

#[test]
fn tiles_export_as_json_and_geojson() {
    let file = lga_file();
    let request = TileRequest::new(SourceType::Lga, file.path()).region("Sydney");
    let tiles = generate_tiles(&request, &TilingConfig::default()).unwrap().tiles;

    let dir = tempdir().unwrap();
    let (json_path, geojson_path) = (dir.path().join("tiles.json"), dir.path().join("tiles.geojson"));
    write_tiles_json(&json_path, &tiles).unwrap();
    write_tiles_geojson(&geojson_path, &tiles).unwrap();

    let records: Value = serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), tiles.len());
    let mut keys = records[0].as_object().unwrap().keys().cloned().collect::<Vec<_>>();
    keys.sort();
    assert_eq!(keys, ["high", "low", "region", "source", "state", "tile_name"]);
    assert!(records[0]["low"]["latitude"].as_f64().unwrap() < records[0]["high"]["latitude"].as_f64().unwrap());

    let collection: Value = serde_json::from_str(&fs::read_to_string(&geojson_path).unwrap()).unwrap();
    assert_eq!(collection["type"], "FeatureCollection");
    assert_eq!(collection["features"].as_array().unwrap().len(), tiles.len());
}
