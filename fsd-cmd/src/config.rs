//! Paths and thresholds for a scrape run.

use fsd_site::{client::SITE_ROOT, listing::LISTING_PATH};
use std::path::PathBuf;

/// Directory holding `main.html` and one `<title>.html` per project.
pub const PROJECTS_DIR: &str = "ciel_et_terre_projects";

pub const LEDGER_FILE: &str = "last_downloaded.csv";

pub const DATASET_FILE: &str = "floating_solar_dataset.csv";

/// Cached pages older than this many days are downloaded again.
pub const STALE_AFTER_DAYS: i64 = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub site_root: String,
    pub listing_path: String,
    pub projects_dir: PathBuf,
    pub ledger_path: PathBuf,
    pub dataset_path: PathBuf,
    pub stale_after_days: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            site_root: SITE_ROOT.to_string(),
            listing_path: LISTING_PATH.to_string(),
            projects_dir: PathBuf::from(PROJECTS_DIR),
            ledger_path: PathBuf::from(LEDGER_FILE),
            dataset_path: PathBuf::from(DATASET_FILE),
            stale_after_days: STALE_AFTER_DAYS,
        }
    }
}

impl Settings {
    pub fn main_page_path(&self) -> PathBuf {
        self.projects_dir.join("main.html")
    }
}
