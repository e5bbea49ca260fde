use crate::config::{AppConfig, LabelConfig, TieBreak};
use crate::data::{self, BoundaryDataset};
use crate::roster::{self, ChapterRoster};
use crate::types::{LatLon, Region, WardInfo};
use geo::{Area, Intersects};
use tracing::{debug, error};

/// Maps points to wards and wards to chapters.
///
/// The boundary dataset is optional: until one is installed every lookup
/// returns `None`. Dataset and roster are read-only once loaded, so a resolver
/// can be shared across threads without locking.
#[derive(Debug, Default)]
pub struct WardResolver {
    dataset: Option<BoundaryDataset>,
    roster: ChapterRoster,
    labels: LabelConfig,
    tie_break: TieBreak,
}

impl WardResolver {
    pub fn new(dataset: Option<BoundaryDataset>, roster: ChapterRoster) -> Self {
        Self {
            dataset,
            roster,
            ..Self::default()
        }
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn with_labels(mut self, labels: LabelConfig) -> Self {
        self.labels = labels;
        self
    }

    /// Loads boundaries and roster named by the config. A file that fails to
    /// load is logged and left empty; lookups then degrade to "not found".
    pub fn load(config: &AppConfig) -> Self {
        let dataset = match data::load_boundaries(&config.input.boundaries, &config.properties) {
            Ok(dataset) => Some(dataset),
            Err(e) => {
                error!(error = ?e, "Failed to load boundary dataset");
                None
            }
        };

        let roster = match roster::load_roster(&config.input.roster, &config.roster_csv) {
            Ok(roster) => roster,
            Err(e) => {
                error!(error = ?e, "Failed to load chapter roster");
                ChapterRoster::default()
            }
        };

        Self::new(dataset, roster)
            .with_tie_break(config.resolver.tie_break)
            .with_labels(config.labels.clone())
    }

    pub fn install_dataset(&mut self, dataset: BoundaryDataset) {
        self.dataset = Some(dataset);
    }

    pub fn is_loaded(&self) -> bool {
        self.dataset.is_some()
    }

    pub fn dataset(&self) -> Option<&BoundaryDataset> {
        self.dataset.as_ref()
    }

    pub fn roster(&self) -> &ChapterRoster {
        &self.roster
    }

    pub fn labels(&self) -> &LabelConfig {
        &self.labels
    }

    pub fn resolve(&self, location: LatLon) -> Option<WardInfo> {
        let Some(dataset) = &self.dataset else {
            debug!("Boundary dataset is not loaded yet");
            return None;
        };

        if !location.is_finite() {
            debug!(?location, "Ignoring non-finite coordinates");
            return None;
        }

        let point = location.to_point();
        let mut found: Option<&Region> = None;

        for index in dataset.candidates_at(point) {
            let region = &dataset.regions()[index];
            // Intersects counts points on the boundary as inside.
            if !region.geometry.intersects(&point) {
                continue;
            }
            found = match (self.tie_break, found) {
                (TieBreak::FirstMatch, Some(_)) => break,
                (TieBreak::SmallestArea, Some(current))
                    if current.geometry.unsigned_area() < region.geometry.unsigned_area() =>
                {
                    Some(current)
                }
                _ => Some(region),
            };
        }

        let Some(region) = found else {
            debug!(?location, "Point not found in any ward");
            return None;
        };

        let info = self.ward_info(region);
        debug!(ward = %info.ward, chapter = ?info.chapter, "Resolved ward");
        Some(info)
    }

    fn ward_info(&self, region: &Region) -> WardInfo {
        let props = &region.properties;
        let or_label = |value: &Option<String>, label: &str| {
            value.clone().unwrap_or_else(|| label.to_string())
        };

        let ward = region.ward_name(&self.labels).to_string();
        let chapter = self.roster.chapter_for(&ward).map(str::to_string);

        WardInfo {
            chapter,
            zone: or_label(&props.zone, &self.labels.zone),
            division: or_label(&props.division, &self.labels.division),
            subdivision: or_label(&props.subdivision, &self.labels.subdivision),
            assembly: or_label(&props.assembly, &self.labels.assembly),
            parliament: or_label(&props.parliament, &self.labels.parliament),
            ward,
        }
    }
}
