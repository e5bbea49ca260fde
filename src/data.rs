use crate::config::PropertyConfig;
use crate::types::{Region, RegionProperties};
use anyhow::{anyhow, Context, Result};
use geo::{BoundingRect, MultiPolygon, Point};
use geojson::{GeoJson, JsonObject};
use rstar::{RTree, RTreeObject, AABB};
use shapefile::dbase::{FieldValue, Record};
use shapefile::Reader;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, info};

// Bounding box of one region, pointing back at its position in the dataset.
struct RegionEnvelope {
    index: usize,
    aabb: AABB<[f64; 2]>,
}

impl RTreeObject for RegionEnvelope {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        self.aabb
    }
}

/// Ward polygons in file order plus a bounding-box index over them.
pub struct BoundaryDataset {
    regions: Vec<Region>,
    tree: RTree<RegionEnvelope>,
}

impl BoundaryDataset {
    pub fn new(regions: Vec<Region>) -> Self {
        let envelopes: Vec<RegionEnvelope> = regions
            .iter()
            .enumerate()
            .filter_map(|(index, region)| {
                let rect = region.geometry.bounding_rect()?;
                Some(RegionEnvelope {
                    index,
                    aabb: AABB::from_corners(
                        [rect.min().x, rect.min().y],
                        [rect.max().x, rect.max().y],
                    ),
                })
            })
            .collect();

        Self {
            regions,
            tree: RTree::bulk_load(envelopes),
        }
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Indices of regions whose bounding box covers `point`, in dataset order.
    pub fn candidates_at(&self, point: Point<f64>) -> Vec<usize> {
        let envelope = AABB::from_point([point.x(), point.y()]);
        let mut indices: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|candidate| candidate.index)
            .collect();
        indices.sort_unstable();
        indices
    }
}

impl fmt::Debug for BoundaryDataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundaryDataset")
            .field("regions", &self.regions.len())
            .finish()
    }
}

pub fn load_boundaries(path: &Path, properties: &PropertyConfig) -> Result<BoundaryDataset> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .ok_or_else(|| anyhow!("Boundary file has no extension: {:?}", path))?;

    let regions = match extension.as_str() {
        "shp" => load_shapefile(path, properties)?,
        "json" | "geojson" => load_geojson(path, properties)?,
        _ => return Err(anyhow!("Unsupported geometry format: {}", extension)),
    };

    info!(regions = regions.len(), path = ?path, "Loaded boundary dataset");
    Ok(BoundaryDataset::new(regions))
}

fn load_geojson(path: &Path, properties: &PropertyConfig) -> Result<Vec<Region>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open GeoJSON file: {:?}", path))?;
    let geojson = GeoJson::from_reader(BufReader::new(file)).context("Failed to parse GeoJSON")?;
    regions_from_geojson(geojson, properties)
}

pub fn regions_from_geojson(geojson: GeoJson, properties: &PropertyConfig) -> Result<Vec<Region>> {
    let collection = match geojson {
        GeoJson::FeatureCollection(fc) => fc,
        _ => return Err(anyhow!("GeoJSON must be a FeatureCollection")),
    };

    let mut regions = Vec::new();

    for (position, feature) in collection.features.into_iter().enumerate() {
        let Some(geometry) = feature.geometry else {
            debug!(position, "Skipping feature without geometry");
            continue;
        };

        let geometry: geo::Geometry<f64> = geometry
            .value
            .try_into()
            .map_err(|e| anyhow!("Failed to convert geojson geometry: {:?}", e))?;

        let geometry = match geometry {
            geo::Geometry::MultiPolygon(mp) => mp,
            geo::Geometry::Polygon(p) => MultiPolygon::new(vec![p]),
            _ => {
                debug!(position, "Skipping non-polygon feature");
                continue;
            }
        };

        let props = feature.properties.as_ref();
        let field = |key: &str| props.and_then(|p| json_property(p, key));

        regions.push(Region {
            geometry,
            properties: RegionProperties {
                name: field(&properties.name),
                zone: field(&properties.zone),
                division: field(&properties.division),
                subdivision: field(&properties.subdivision),
                assembly: field(&properties.assembly),
                parliament: field(&properties.parliament),
            },
        });
    }

    Ok(regions)
}

fn json_property(props: &JsonObject, key: &str) -> Option<String> {
    let text = match props.get(key)? {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    non_blank(text)
}

fn load_shapefile(path: &Path, properties: &PropertyConfig) -> Result<Vec<Region>> {
    let mut reader = Reader::from_path(path)
        .with_context(|| format!("Failed to open Shapefile: {:?}", path))?;

    let mut regions = Vec::new();

    for result in reader.iter_shapes_and_records() {
        let (shape, record) = result?;

        let geometry: MultiPolygon<f64> = match shape {
            shapefile::Shape::Polygon(polygon) => polygon
                .try_into()
                .map_err(|e| anyhow!("Failed to convert polygon: {:?}", e))?,
            shapefile::Shape::PolygonM(polygon) => polygon
                .try_into()
                .map_err(|e| anyhow!("Failed to convert polygonM: {:?}", e))?,
            shapefile::Shape::PolygonZ(polygon) => polygon
                .try_into()
                .map_err(|e| anyhow!("Failed to convert polygonZ: {:?}", e))?,
            _ => {
                debug!("Skipping non-polygon shape");
                continue;
            }
        };

        regions.push(Region {
            geometry,
            properties: RegionProperties {
                name: dbase_property(&record, &properties.name),
                zone: dbase_property(&record, &properties.zone),
                division: dbase_property(&record, &properties.division),
                subdivision: dbase_property(&record, &properties.subdivision),
                assembly: dbase_property(&record, &properties.assembly),
                parliament: dbase_property(&record, &properties.parliament),
            },
        });
    }

    Ok(regions)
}

fn dbase_property(record: &Record, key: &str) -> Option<String> {
    let text = match record.get(key)? {
        FieldValue::Character(Some(s)) => s.clone(),
        FieldValue::Memo(s) => s.clone(),
        FieldValue::Numeric(Some(n)) => n.to_string(),
        FieldValue::Integer(i) => i.to_string(),
        FieldValue::Double(d) => d.to_string(),
        FieldValue::Logical(Some(b)) => b.to_string(),
        _ => return None,
    };
    non_blank(text)
}

fn non_blank(text: String) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}
