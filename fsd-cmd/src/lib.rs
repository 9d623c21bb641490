//! Command implementation for the floating solar dataset.
//!
//! Downloads the project references of ciel-et-terre.net, keeps a local copy
//! of every page, and builds the dataset CSV from the cached pages.

use chrono::Local;
use clap::Args;
use std::path::PathBuf;

pub mod config;
pub mod ledger;
pub mod progress;
pub mod scrape;

use config::{Settings, DATASET_FILE, LEDGER_FILE, PROJECTS_DIR, STALE_AFTER_DAYS};
use fsd_site::{client::SITE_ROOT, listing::LISTING_PATH};

/// Overrides for the fixed paths and thresholds. Every flag is optional.
#[derive(Args, Debug, Clone)]
pub struct ScrapeArgs {
    /// Directory for cached listing and detail pages
    #[arg(long, default_value = PROJECTS_DIR)]
    pub projects_dir: PathBuf,

    /// Download ledger CSV
    #[arg(long, default_value = LEDGER_FILE)]
    pub ledger: PathBuf,

    /// Output dataset CSV
    #[arg(short = 'o', long, default_value = DATASET_FILE)]
    pub output: PathBuf,

    /// Days after which a cached page is downloaded again
    #[arg(long, default_value_t = STALE_AFTER_DAYS)]
    pub stale_days: i64,

    /// Site root that relative links are resolved against
    #[arg(long, default_value = SITE_ROOT)]
    pub site_root: String,
}

impl From<ScrapeArgs> for Settings {
    fn from(args: ScrapeArgs) -> Self {
        Settings {
            site_root: args.site_root,
            listing_path: LISTING_PATH.to_string(),
            projects_dir: args.projects_dir,
            ledger_path: args.ledger,
            dataset_path: args.output,
            stale_after_days: args.stale_days,
        }
    }
}

pub async fn run(args: ScrapeArgs) -> anyhow::Result<()> {
    let settings = Settings::from(args);
    let today = Local::now().date_naive();
    scrape::run_scrape(&settings, today).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        scrape: ScrapeArgs,
    }

    #[test]
    fn test_no_arguments_gives_default_settings() {
        let cli = TestCli::parse_from(["fsd-cli"]);
        assert_eq!(Settings::from(cli.scrape), Settings::default());
    }

    #[test]
    fn test_overrides() {
        let cli = TestCli::parse_from([
            "fsd-cli",
            "--projects-dir",
            "cache",
            "-o",
            "out.csv",
            "--stale-days",
            "7",
        ]);
        let settings = Settings::from(cli.scrape);
        assert_eq!(settings.projects_dir, PathBuf::from("cache"));
        assert_eq!(settings.dataset_path, PathBuf::from("out.csv"));
        assert_eq!(settings.stale_after_days, 7);
        assert_eq!(settings.ledger_path, PathBuf::from(LEDGER_FILE));
    }
}
