use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub input: InputConfig,
    #[serde(default)]
    pub properties: PropertyConfig,
    #[serde(default)]
    pub labels: LabelConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub roster_csv: RosterCsvConfig,
    #[serde(default)]
    pub batch: BatchConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InputConfig {
    /// GeoJSON FeatureCollection or Shapefile with the ward polygons.
    pub boundaries: PathBuf,
    /// JSON object or CSV table mapping ward names to chapters.
    pub roster: PathBuf,
}

/// Property keys read from each boundary feature.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PropertyConfig {
    pub name: String,
    pub zone: String,
    pub division: String,
    pub subdivision: String,
    pub assembly: String,
    pub parliament: String,
}

impl Default for PropertyConfig {
    fn default() -> Self {
        Self {
            name: "name".to_string(),
            zone: "COL519A9F225DE5362C".to_string(),
            division: "COL519A9F225D815914".to_string(),
            subdivision: "COL519A9F225DDB66BD".to_string(),
            assembly: "COL519A9F225DC0CB09".to_string(),
            parliament: "COL519A9F225DC40EAA".to_string(),
        }
    }
}

/// Text shown in place of a missing property.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LabelConfig {
    pub ward: String,
    pub zone: String,
    pub division: String,
    pub subdivision: String,
    pub assembly: String,
    pub parliament: String,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            ward: "Unnamed Ward".to_string(),
            zone: "Unknown Zone".to_string(),
            division: "Unknown Division".to_string(),
            subdivision: "Unknown Subdivision".to_string(),
            assembly: "Unknown Assembly Constituency".to_string(),
            parliament: "Unknown Parliament Constituency".to_string(),
        }
    }
}

/// Which region wins when several contain the point.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum TieBreak {
    /// Later regions in file order overwrite earlier matches.
    #[default]
    LastMatch,
    FirstMatch,
    /// Smallest planar area; equal areas go to the later region.
    SmallestArea,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ResolverConfig {
    pub tie_break: TieBreak,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct RosterCsvConfig {
    pub ward_column: String,
    pub chapter_column: String,
}

impl Default for RosterCsvConfig {
    fn default() -> Self {
        Self {
            ward_column: "ward".to_string(),
            chapter_column: "chapter".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct BatchConfig {
    pub lat_column: String,
    pub lon_column: String,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            lat_column: "lat".to_string(),
            lon_column: "lon".to_string(),
        }
    }
}

impl AppConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).with_context(|| "Failed to parse TOML configuration")
    }
}
