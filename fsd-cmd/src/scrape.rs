//! The scrape run: listing page → cache decision → download → extraction →
//! dataset.

use crate::{
    config::Settings,
    ledger::{CacheDecision, Ledger},
    progress::create_progress_bar,
};
use anyhow::Context;
use chrono::NaiveDate;
use fsd_data::{
    dataset::{write_csv, Dataset, ProjectRecord},
    extract::extract,
};
use fsd_site::{
    client::SiteClient,
    listing::extract_listing,
    page::{content_fragment, page_text},
    project::{ListedProject, MAIN_TITLE},
};
use log::{debug, info, warn};
use scraper::Html;
use std::fs;

/// State shared by every stage of one run.
pub struct RunContext<'a> {
    pub settings: &'a Settings,
    pub client: SiteClient,
    pub ledger: Ledger,
    pub dataset: Dataset,
    pub today: NaiveDate,
}

impl<'a> RunContext<'a> {
    pub fn new(settings: &'a Settings, today: NaiveDate) -> anyhow::Result<Self> {
        Ok(RunContext {
            settings,
            client: SiteClient::new(settings.site_root.as_str())?,
            ledger: Ledger::load(&settings.ledger_path)?,
            dataset: Dataset::new(),
            today,
        })
    }

    fn decide(&self, title: &str, file_exists: bool) -> CacheDecision {
        self.ledger
            .decide(title, file_exists, self.today, self.settings.stale_after_days)
    }

    /// Mark `title` as downloaded today and persist the ledger right away.
    fn record_download(&mut self, title: &str) -> anyhow::Result<()> {
        self.ledger.record(title, self.today);
        self.ledger.save()
    }

    /// HTML of the listing page, from disk or from the site.
    pub async fn listing_html(&mut self) -> anyhow::Result<String> {
        let path = self.settings.main_page_path();
        match self.decide(MAIN_TITLE, path.exists()) {
            CacheDecision::Reuse => {
                debug!("Using cached listing page {}", path.display());
                Ok(fs::read_to_string(&path)
                    .with_context(|| format!("reading {}", path.display()))?)
            }
            CacheDecision::Fetch(reason) => {
                info!("Downloading listing page ({})", reason);
                let html = self.client.fetch(&self.settings.listing_path).await?.html();
                fs::write(&path, &html).with_context(|| format!("writing {}", path.display()))?;
                self.record_download(MAIN_TITLE)?;
                Ok(html)
            }
        }
    }

    /// Cached article fragment of a project's detail page, downloading it
    /// first when needed.
    pub async fn detail_html(&mut self, project: &ListedProject) -> anyhow::Result<String> {
        let title = project.title.key();
        let path = self.settings.projects_dir.join(project.title.file_name());
        match self.decide(&title, path.exists()) {
            CacheDecision::Reuse => Ok(fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?),
            CacheDecision::Fetch(reason) => {
                info!("Downloading {} ({})", title, reason);
                let body = self.client.fetch_text(&project.link).await?;
                let fragment = content_fragment(&Html::parse_document(&body))
                    .with_context(|| format!("detail page of {}", title))?;
                fs::write(&path, &fragment)
                    .with_context(|| format!("writing {}", path.display()))?;
                self.record_download(&title)?;
                Ok(fragment)
            }
        }
    }

    /// Fetch or reuse one project's page and add its fields to the dataset.
    pub async fn process(&mut self, project: &ListedProject) -> anyhow::Result<()> {
        let title = project.title.key();
        let html = self.detail_html(project).await?;
        let text = page_text(&Html::parse_document(&html));
        match extract(&text).with_context(|| format!("extracting fields of {}", title))? {
            Some(fields) => self.dataset.insert(&title, &project.link, fields),
            None => warn!("{} has no paragraph text, skipping", title),
        }
        Ok(())
    }
}

/// Run the whole pipeline and write the dataset and ledger files.
pub async fn run_scrape(settings: &Settings, today: NaiveDate) -> anyhow::Result<Vec<ProjectRecord>> {
    fs::create_dir_all(&settings.projects_dir)
        .with_context(|| format!("creating {}", settings.projects_dir.display()))?;

    let mut ctx = RunContext::new(settings, today)?;

    let listing = ctx.listing_html().await?;
    let projects = {
        let document = Html::parse_document(&listing);
        extract_listing(&document)?
    };
    info!("Found {} floating solar projects", projects.len());

    let pb = create_progress_bar(projects.len() as u64, "Parsing projects");
    for project in &projects {
        pb.set_message(project.title.key());
        ctx.process(project).await?;
        pb.inc(1);
    }
    pb.finish_and_clear();

    let records = ctx.dataset.finalize()?;
    write_csv(&records, &settings.dataset_path)?;
    ctx.ledger.save()?;

    info!(
        "Scrape complete. {} projects in {}, ledger {}",
        records.len(),
        settings.dataset_path.display(),
        ctx.ledger.path().display()
    );
    Ok(records)
}
