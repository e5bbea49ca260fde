use crate::config::LabelConfig;
use crate::data::BoundaryDataset;
use crate::roster::{normalize_ward_name, ChapterRoster};
use std::collections::BTreeSet;
use std::fmt;

/// How well the roster lines up with the ward names in the boundary file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoverageReport {
    pub regions: usize,
    pub roster_entries: usize,
    /// Ward names (as displayed, fallback label included) with no chapter.
    pub wards_without_chapter: Vec<String>,
    /// Normalized roster keys that no region name normalizes to.
    pub unmatched_roster_keys: Vec<String>,
}

/// Regions without a name are checked under their fallback label, the same
/// string `WardResolver::resolve` looks up.
pub fn coverage(
    dataset: &BoundaryDataset,
    roster: &ChapterRoster,
    labels: &LabelConfig,
) -> CoverageReport {
    let mut region_keys = BTreeSet::new();
    let mut wards_without_chapter = Vec::new();

    for region in dataset.regions() {
        let name = region.ward_name(labels);
        let key = normalize_ward_name(name);
        if !roster.contains_key(&key) {
            wards_without_chapter.push(name.to_string());
        }
        region_keys.insert(key);
    }

    let mut unmatched_roster_keys: Vec<String> = roster
        .keys()
        .filter(|key| !region_keys.contains(*key))
        .map(str::to_string)
        .collect();
    unmatched_roster_keys.sort();

    CoverageReport {
        regions: dataset.len(),
        roster_entries: roster.len(),
        wards_without_chapter,
        unmatched_roster_keys,
    }
}

impl fmt::Display for CoverageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Regions: {}", self.regions)?;
        writeln!(f, "Roster entries: {}", self.roster_entries)?;
        writeln!(
            f,
            "Wards without chapter: {}",
            self.wards_without_chapter.len()
        )?;
        for ward in &self.wards_without_chapter {
            writeln!(f, "  {}", ward)?;
        }
        write!(
            f,
            "Roster keys matching no ward: {}",
            self.unmatched_roster_keys.len()
        )?;
        for key in &self.unmatched_roster_keys {
            write!(f, "\n  {}", key)?;
        }
        Ok(())
    }
}
