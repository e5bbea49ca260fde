use crate::config::LabelConfig;
use geo::{MultiPolygon, Point};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }

    /// Planar point with `x = lon`, `y = lat`, the axis order of the boundary files.
    pub fn to_point(self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }
}

/// Administrative attributes attached to a region. `None` means the
/// property was absent, null or blank in the source file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionProperties {
    pub name: Option<String>,
    pub zone: Option<String>,
    pub division: Option<String>,
    pub subdivision: Option<String>,
    pub assembly: Option<String>,
    pub parliament: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Region {
    pub geometry: MultiPolygon<f64>,
    pub properties: RegionProperties,
}

impl Region {
    /// Name shown for the region and used for the roster lookup.
    pub fn ward_name<'a>(&'a self, labels: &'a LabelConfig) -> &'a str {
        self.properties.name.as_deref().unwrap_or(&labels.ward)
    }
}

/// Result of a single resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WardInfo {
    pub ward: String,
    pub zone: String,
    pub division: String,
    pub subdivision: String,
    pub assembly: String,
    pub parliament: String,
    pub chapter: Option<String>,
}

impl WardInfo {
    /// One-line text handed to the clipboard by the embeddable widget.
    pub fn summary(&self) -> String {
        format!(
            "Ward: {}, Chapter: {}",
            self.ward,
            self.chapter.as_deref().unwrap_or("Unknown")
        )
    }
}

impl fmt::Display for WardInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Ward: {}", self.ward)?;
        writeln!(f, "Zone: {}", self.zone)?;
        writeln!(f, "Division: {}", self.division)?;
        writeln!(f, "Subdivision: {}", self.subdivision)?;
        writeln!(f, "Assembly: {}", self.assembly)?;
        writeln!(f, "Parliament: {}", self.parliament)?;
        write!(
            f,
            "Chapter: {}",
            self.chapter.as_deref().unwrap_or("Unknown Chapter")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(chapter: Option<&str>) -> WardInfo {
        WardInfo {
            ward: "Ward 12".to_string(),
            zone: "East".to_string(),
            division: "D1".to_string(),
            subdivision: "S1".to_string(),
            assembly: "A1".to_string(),
            parliament: "P1".to_string(),
            chapter: chapter.map(str::to_string),
        }
    }

    #[test]
    fn summary_falls_back_to_unknown_chapter() {
        assert_eq!(info(None).summary(), "Ward: Ward 12, Chapter: Unknown");
        assert_eq!(
            info(Some("Indiranagar")).summary(),
            "Ward: Ward 12, Chapter: Indiranagar"
        );
    }

    #[test]
    fn display_lists_every_field() {
        let text = info(None).to_string();
        assert!(text.starts_with("Ward: Ward 12\nZone: East\n"));
        assert!(text.ends_with("Chapter: Unknown Chapter"));
        assert_eq!(text.lines().count(), 7);
    }

    #[test]
    fn chapter_serializes_as_null_when_absent() {
        let json = serde_json::to_value(info(None)).unwrap();
        assert!(json["chapter"].is_null());
        assert_eq!(json["ward"], "Ward 12");
    }

    #[test]
    fn lat_lon_maps_to_lon_lat_point() {
        let p = LatLon::new(12.97, 77.59).to_point();
        assert_eq!((p.x(), p.y()), (77.59, 12.97));
        assert!(!LatLon::new(f64::NAN, 1.0).is_finite());
    }
}
