pub mod batch;
pub mod config;
pub mod coverage;
pub mod data;
pub mod resolver;
pub mod roster;
pub mod types;

pub use config::{AppConfig, TieBreak};
pub use data::{load_boundaries, BoundaryDataset};
pub use resolver::WardResolver;
pub use roster::{load_roster, normalize_ward_name, ChapterRoster};
pub use types::{LatLon, Region, RegionProperties, WardInfo};
