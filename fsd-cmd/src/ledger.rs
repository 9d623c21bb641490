//! Download ledger: when each page was last fetched, and whether the cached
//! copy is still good enough.
//!
//! The local file decides whether there is anything to parse; the ledger only
//! decides whether an existing file is old enough to be fetched again.

use anyhow::Context;
use chrono::NaiveDate;
use fsd_utils::dates::{days_since, format_date, parse_date};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fmt, fs,
    path::{Path, PathBuf},
};

/// Why a page has to be downloaded.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum FetchReason {
    /// No cached copy on disk
    Missing,
    /// The cached copy is older than the staleness threshold
    Stale { age_days: i64 },
}

impl fmt::Display for FetchReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchReason::Missing => write!(f, "not cached"),
            FetchReason::Stale { age_days } => write!(f, "cached copy is {} days old", age_days),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum CacheDecision {
    Reuse,
    Fetch(FetchReason),
}

#[derive(Debug, Serialize, Deserialize)]
struct LedgerRow {
    title: String,
    last_downloaded: String,
}

/// Title → date of the last successful download, persisted as CSV.
#[derive(Debug)]
pub struct Ledger {
    path: PathBuf,
    entries: BTreeMap<String, NaiveDate>,
}

impl Ledger {
    /// An empty ledger that will be saved to `path`.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Ledger {
            path: path.as_ref().to_path_buf(),
            entries: BTreeMap::new(),
        }
    }

    /// Read the ledger at `path`. A missing file gives an empty ledger; rows
    /// with an unreadable date are skipped.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let mut ledger = Ledger::new(&path);
        if !path.as_ref().exists() {
            debug!("No ledger at {}, starting empty", path.as_ref().display());
            return Ok(ledger);
        }

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(path.as_ref())
            .with_context(|| format!("opening ledger {}", path.as_ref().display()))?;

        for result in rdr.deserialize() {
            let row: LedgerRow = result?;
            match parse_date(&row.last_downloaded) {
                Ok(date) => {
                    ledger.entries.insert(row.title, date);
                }
                Err(e) => warn!("Ignoring ledger entry for {}: {}", row.title, e),
            }
        }
        debug!("Loaded {} ledger entries", ledger.entries.len());
        Ok(ledger)
    }

    /// Write every entry back to the ledger file.
    pub fn save(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut writer = csv::Writer::from_path(&self.path)
            .with_context(|| format!("writing ledger {}", self.path.display()))?;
        if self.entries.is_empty() {
            writer.write_record(["title", "last_downloaded"])?;
        }
        for (title, date) in &self.entries {
            writer.serialize(LedgerRow {
                title: title.clone(),
                last_downloaded: format_date(date),
            })?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last_downloaded(&self, title: &str) -> Option<NaiveDate> {
        self.entries.get(title).copied()
    }

    pub fn record(&mut self, title: &str, date: NaiveDate) {
        self.entries.insert(title.to_string(), date);
    }

    /// Decide between the cached copy and a new download.
    ///
    /// A missing file is always fetched. An existing file is fetched again
    /// only when its ledger entry is more than `stale_after_days` old.
    pub fn decide(
        &self,
        title: &str,
        file_exists: bool,
        today: NaiveDate,
        stale_after_days: i64,
    ) -> CacheDecision {
        if !file_exists {
            return CacheDecision::Fetch(FetchReason::Missing);
        }
        match self.last_downloaded(title) {
            Some(date) => {
                let age_days = days_since(&date, &today);
                if age_days > stale_after_days {
                    CacheDecision::Fetch(FetchReason::Stale { age_days })
                } else {
                    CacheDecision::Reuse
                }
            }
            None => CacheDecision::Reuse,
        }
    }
}
