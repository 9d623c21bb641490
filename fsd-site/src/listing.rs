//! Project discovery on the references (listing) page.

use crate::{
    error::{Result, SiteError},
    project::{ListedProject, ProjectTitle},
};
use log::debug;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

/// Path of the listing page, relative to the site root.
pub const LISTING_PATH: &str = "our-floating-solar-power-plants-references/";

/// One `li` per floating solar project.
pub const ENTRY_SELECTOR: &str = "li.filter-floating-solar-system";

/// Anchor carrying the detail page link.
pub const LINK_SELECTOR: &str = "a.eg-washington-element-10";

/// Block carrying the "<boilerplate> - <name> - <capacity>" title.
pub const TITLE_SELECTOR: &str = "div.esg-center.esg-flipdown";

static ENTRY: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(ENTRY_SELECTOR).expect("valid entry selector"));
static LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(LINK_SELECTOR).expect("valid link selector"));
static TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(TITLE_SELECTOR).expect("valid title selector"));

static BOILERPLATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)floating solar(?: pv)? (?:system|plant)\W*-").expect("valid boilerplate regex")
});

/// Strip the "Floating solar [PV] system/plant -" prefix and split the rest
/// on its first hyphen into name and capacity label.
///
/// A title without any hyphen yields an empty capacity label.
pub fn split_title(raw: &str) -> ProjectTitle {
    let stripped = BOILERPLATE.replace_all(raw, "");
    let (name, capacity) = stripped.split_once('-').unwrap_or((stripped.as_ref(), ""));
    ProjectTitle::new(name.trim(), capacity.trim())
}

/// Leading text of an element, before its first child element.
fn leading_text<'a>(element: ElementRef<'a>) -> Option<&'a str> {
    element
        .children()
        .next()
        .and_then(|node| node.value().as_text())
        .map(|text| &**text)
}

fn entry_link(entry: ElementRef) -> Result<String> {
    entry
        .select(&LINK)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(str::to_string)
        .ok_or(SiteError::MissingLink)
}

fn entry_title(entry: ElementRef) -> Result<ProjectTitle> {
    let raw = entry
        .select(&TITLE)
        .next()
        .and_then(leading_text)
        .ok_or(SiteError::MissingTitle)?;
    Ok(split_title(raw))
}

/// Every listed project, in page order.
pub fn extract_listing(document: &Html) -> Result<Vec<ListedProject>> {
    let projects = document
        .select(&ENTRY)
        .map(|entry| -> Result<ListedProject> {
            let link = entry_link(entry)?;
            let title = entry_title(entry)?;
            Ok(ListedProject { title, link })
        })
        .collect::<Result<Vec<ListedProject>>>()?;
    debug!("Listing page holds {} projects", projects.len());
    Ok(projects)
}
