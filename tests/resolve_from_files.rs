use std::fs;
use std::path::Path;
use tempfile::TempDir;
use ward_resolver::{AppConfig, LatLon, TieBreak, WardResolver};

const WARDS: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {
      "type": "Feature",
      "properties": {
        "name": "Ward 5",
        "COL519A9F225DE5362C": "East",
        "COL519A9F225D815914": "Shivajinagar",
        "COL519A9F225DDB66BD": "Vasanthnagar",
        "COL519A9F225DC0CB09": "Shivajinagar",
        "COL519A9F225DC40EAA": "Bangalore Central"
      },
      "geometry": {
        "type": "Polygon",
        "coordinates": [[[77.50, 12.90], [77.60, 12.90], [77.60, 13.00], [77.50, 13.00], [77.50, 12.90]]]
      }
    },
    {
      "type": "Feature",
      "properties": { "name": "Ward 6", "COL519A9F225DE5362C": "East" },
      "geometry": {
        "type": "Polygon",
        "coordinates": [[[77.55, 12.95], [77.70, 12.95], [77.70, 13.05], [77.55, 13.05], [77.55, 12.95]]]
      }
    },
    {
      "type": "Feature",
      "properties": { "name": "Ward 9" },
      "geometry": {
        "type": "Polygon",
        "coordinates": [[[77.80, 12.80], [77.90, 12.80], [77.90, 12.90], [77.80, 12.90], [77.80, 12.80]]]
      }
    }
  ]
}"#;

const CHAPTERS: &str = r#"{
  "Ward 5": "Shivajinagar Chapter",
  "WARD 6": "Ulsoor Chapter"
}"#;

fn write_inputs(dir: &Path, wards: &str, extra_config: &str) -> AppConfig {
    let wards_path = dir.join("wards.geojson");
    let roster_path = dir.join("chapters.json");
    fs::write(&wards_path, wards).unwrap();
    fs::write(&roster_path, CHAPTERS).unwrap();

    let config_path = dir.join("config.toml");
    fs::write(
        &config_path,
        format!(
            "[input]\nboundaries = {:?}\nroster = {:?}\n{}",
            wards_path.to_string_lossy(),
            roster_path.to_string_lossy(),
            extra_config
        ),
    )
    .unwrap();

    AppConfig::load_from_file(&config_path).unwrap()
}

#[test]
fn resolves_point_inside_single_ward() {
    let dir = TempDir::new().unwrap();
    let resolver = WardResolver::load(&write_inputs(dir.path(), WARDS, ""));

    let info = resolver.resolve(LatLon::new(12.92, 77.52)).unwrap();
    assert_eq!(info.ward, "Ward 5");
    assert_eq!(info.zone, "East");
    assert_eq!(info.division, "Shivajinagar");
    assert_eq!(info.subdivision, "Vasanthnagar");
    assert_eq!(info.assembly, "Shivajinagar");
    assert_eq!(info.parliament, "Bangalore Central");
    assert_eq!(info.chapter.as_deref(), Some("Shivajinagar Chapter"));
}

#[test]
fn overlapping_wards_follow_configured_policy() {
    let dir = TempDir::new().unwrap();
    let overlap = LatLon::new(12.97, 77.57);

    let last = WardResolver::load(&write_inputs(dir.path(), WARDS, ""));
    let info = last.resolve(overlap).unwrap();
    assert_eq!(info.ward, "Ward 6");
    assert_eq!(info.chapter.as_deref(), Some("Ulsoor Chapter"));
    assert_eq!(info.division, "Unknown Division");

    let config = write_inputs(
        dir.path(),
        WARDS,
        "[resolver]\ntie_break = \"first-match\"\n",
    );
    assert_eq!(config.resolver.tie_break, TieBreak::FirstMatch);
    let first = WardResolver::load(&config);
    assert_eq!(first.resolve(overlap).unwrap().ward, "Ward 5");
}

#[test]
fn ward_without_roster_entry_has_no_chapter() {
    let dir = TempDir::new().unwrap();
    let resolver = WardResolver::load(&write_inputs(dir.path(), WARDS, ""));

    let info = resolver.resolve(LatLon::new(12.85, 77.85)).unwrap();
    assert_eq!(info.ward, "Ward 9");
    assert_eq!(info.chapter, None);
}

#[test]
fn point_outside_city_is_not_found() {
    let dir = TempDir::new().unwrap();
    let resolver = WardResolver::load(&write_inputs(dir.path(), WARDS, ""));
    assert_eq!(resolver.resolve(LatLon::new(28.61, 77.20)), None);
}

#[test]
fn malformed_dataset_degrades_to_not_found() {
    let dir = TempDir::new().unwrap();
    let resolver = WardResolver::load(&write_inputs(dir.path(), "{ not geojson", ""));

    assert!(!resolver.is_loaded());
    assert_eq!(resolver.roster().len(), 2);
    assert_eq!(resolver.resolve(LatLon::new(12.92, 77.52)), None);
}

#[test]
fn missing_files_degrade_to_not_found() {
    let config = AppConfig::from_toml(
        "[input]\nboundaries = \"/nonexistent/wards.geojson\"\nroster = \"/nonexistent/chapters.json\"\n",
    )
    .unwrap();
    let resolver = WardResolver::load(&config);

    assert!(!resolver.is_loaded());
    assert!(resolver.roster().is_empty());
    assert_eq!(resolver.resolve(LatLon::new(12.92, 77.52)), None);
}
