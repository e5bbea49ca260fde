use crate::config::RosterCsvConfig;
use anyhow::{anyhow, Context, Result};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{info, warn};

/// Canonical lookup key for a ward name.
///
/// Lowercases, collapses whitespace runs and strips any leading `ward` tokens,
/// so `"Ward 5"`, `"ward   5"` and `" WARD 5 "` all become `"5"`. The token
/// must be followed by whitespace: `"Ward5"` is left alone. Applying it twice
/// gives the same result as applying it once.
pub fn normalize_ward_name(name: &str) -> String {
    let words: Vec<String> = name
        .split_whitespace()
        .map(|w| w.to_lowercase())
        .collect();

    let leading = words.iter().take_while(|w| *w == "ward").count();
    // A lone "ward" is a name, not a prefix.
    let strip = if leading == words.len() {
        leading.saturating_sub(1)
    } else {
        leading
    };

    words[strip..].join(" ")
}

/// Normalized ward name -> chapter name.
#[derive(Debug, Clone, Default)]
pub struct ChapterRoster {
    chapters: HashMap<String, String>,
}

impl ChapterRoster {
    /// Builds a roster from raw pairs, normalizing every key. Later pairs win
    /// when two keys normalize to the same value; empty chapters are dropped.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut chapters = HashMap::new();
        for (raw_key, chapter) in entries {
            let chapter = chapter.into();
            let key = normalize_ward_name(raw_key.as_ref());
            if chapter.trim().is_empty() {
                warn!(ward = raw_key.as_ref(), "Roster entry has an empty chapter, skipping");
                continue;
            }
            if let Some(previous) = chapters.insert(key.clone(), chapter) {
                warn!(
                    key = %key,
                    ward = raw_key.as_ref(),
                    replaced = %previous,
                    "Roster key collides after normalization, later entry wins"
                );
            }
        }
        Self { chapters }
    }

    pub fn chapter_for(&self, ward_name: &str) -> Option<&str> {
        self.chapters
            .get(&normalize_ward_name(ward_name))
            .map(String::as_str)
    }

    pub fn contains_key(&self, normalized: &str) -> bool {
        self.chapters.contains_key(normalized)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.chapters.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }
}

pub fn load_roster(path: &Path, csv_config: &RosterCsvConfig) -> Result<ChapterRoster> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .ok_or_else(|| anyhow!("Roster file has no extension: {:?}", path))?;

    let roster = match extension.as_str() {
        "json" => load_json_roster(path)?,
        "csv" => load_csv_roster(path, csv_config)?,
        _ => return Err(anyhow!("Unsupported roster format: {}", extension)),
    };

    info!(entries = roster.len(), path = ?path, "Loaded chapter roster");
    Ok(roster)
}

fn load_json_roster(path: &Path) -> Result<ChapterRoster> {
    let file =
        File::open(path).with_context(|| format!("Failed to open roster file: {:?}", path))?;
    let value: serde_json::Value = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse roster JSON: {:?}", path))?;
    parse_json_roster(value)
}

fn parse_json_roster(value: serde_json::Value) -> Result<ChapterRoster> {
    let object = match value {
        serde_json::Value::Object(map) => map,
        _ => return Err(anyhow!("Roster JSON must be an object of ward -> chapter")),
    };

    let entries = object.into_iter().filter_map(|(ward, chapter)| match chapter {
        serde_json::Value::String(s) => Some((ward, s)),
        serde_json::Value::Null => None,
        other => Some((ward, other.to_string())),
    });

    Ok(ChapterRoster::from_entries(entries))
}

fn load_csv_roster(path: &Path, config: &RosterCsvConfig) -> Result<ChapterRoster> {
    let file =
        File::open(path).with_context(|| format!("Failed to open roster CSV: {:?}", path))?;
    let mut rdr = ReaderBuilder::new().trim(csv::Trim::All).from_reader(file);
    let headers = rdr.headers()?.clone();

    let ward_idx = headers
        .iter()
        .position(|h| h == config.ward_column)
        .ok_or_else(|| anyhow!("Ward column '{}' not found in roster CSV", config.ward_column))?;
    let chapter_idx = headers
        .iter()
        .position(|h| h == config.chapter_column)
        .ok_or_else(|| {
            anyhow!("Chapter column '{}' not found in roster CSV", config.chapter_column)
        })?;

    let mut entries = Vec::new();
    for result in rdr.records() {
        let record = result.with_context(|| format!("Malformed roster row in {:?}", path))?;
        let ward = record.get(ward_idx).unwrap_or("");
        if ward.is_empty() {
            continue;
        }
        let chapter = record.get(chapter_idx).unwrap_or("");
        entries.push((ward.to_string(), chapter.to_string()));
    }

    Ok(ChapterRoster::from_entries(entries))
}
