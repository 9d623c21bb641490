//! Regex based field extraction from detail page text.
//!
//! Every field is pulled out by its own named [`Rule`]. Rules are
//! independent of each other and a rule that does not match leaves its field
//! empty. The interconnection date is the exception: a page without a
//! parsable date is an error.

use crate::error::{DataError, Result};
use chrono::NaiveDate;
use fsd_utils::dates::parse_month_or_year;
use log::debug;
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// A named pattern. Capture group 1 holds the field value unless stated
/// otherwise.
#[derive(Debug)]
pub struct Rule {
    pub name: &'static str,
    regex: Regex,
}

impl Rule {
    pub fn new(name: &'static str, pattern: &str) -> Self {
        let regex = Regex::new(pattern).unwrap_or_else(|e| panic!("rule {name}: {e}"));
        Rule { name, regex }
    }

    pub fn captures<'t>(&self, text: &'t str) -> Option<Captures<'t>> {
        self.regex.captures(text)
    }

    /// First capture group of the first match.
    pub fn capture<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
    }

    /// Groups 1 and 2 of the first match, only when both are present.
    pub fn capture_pair<'t>(&self, text: &'t str) -> Option<(&'t str, &'t str)> {
        let captures = self.captures(text)?;
        Some((captures.get(1)?.as_str(), captures.get(2)?.as_str()))
    }
}

pub static KWP: LazyLock<Rule> = LazyLock::new(|| Rule::new("kwp", r"(\d+) ?kWp"));
pub static LOCATION: LazyLock<Rule> = LazyLock::new(|| {
    Rule::new(
        "location",
        r"installed on [^,]+, ?(?:located in )?([^\n]+?)\.?(?:\n|$)",
    )
});
pub static WATER_BODY_TYPE: LazyLock<Rule> =
    LazyLock::new(|| Rule::new("water_body_type", r"installed on ([^,.]+),"));
pub static PANEL_NUMBER: LazyLock<Rule> =
    LazyLock::new(|| Rule::new("panel_number", r"(\d+) panels"));
pub static PANEL_TYPE: LazyLock<Rule> =
    LazyLock::new(|| Rule::new("panel_type", r"\(([^)]+(?:modules|panels))"));
pub static COVERS_PCT: LazyLock<Rule> =
    LazyLock::new(|| Rule::new("covers_pct", r"covers (?:about )?([^%]+) ?%"));
/// Group 1 is the covered area, group 2 the total area.
pub static COVERS_AREA: LazyLock<Rule> =
    LazyLock::new(|| Rule::new("covers_area", r"\((\S+) out of (\S+) ha\)."));
pub static MAX_DEPTH: LazyLock<Rule> =
    LazyLock::new(|| Rule::new("max_depth", r"a maximum depth of (\S+) m"));
pub static LEVEL_VARIATION: LazyLock<Rule> =
    LazyLock::new(|| Rule::new("level_variation", r"variation of (\S+) m"));
pub static INTERCONNECTION: LazyLock<Rule> =
    LazyLock::new(|| Rule::new("interconnection", r"effective in ((?:\w+ )?\d+)"));
pub static CONSTRUCTION: LazyLock<Rule> = LazyLock::new(|| {
    Rule::new(
        "construction",
        r"construction lasted (\d+ (?:days?|weeks?|months?))",
    )
});

/// Every rule, in column order.
pub fn rules() -> [&'static Rule; 11] {
    [
        &*KWP,
        &*LOCATION,
        &*WATER_BODY_TYPE,
        &*PANEL_NUMBER,
        &*PANEL_TYPE,
        &*COVERS_PCT,
        &*COVERS_AREA,
        &*MAX_DEPTH,
        &*LEVEL_VARIATION,
        &*INTERCONNECTION,
        &*CONSTRUCTION,
    ]
}

/// Fields as they appear in the text. Numbers stay text until the dataset
/// is finalized.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RawFields {
    pub kwp: Option<String>,
    pub location: Option<String>,
    pub water_body_type: Option<String>,
    pub panel_number: Option<String>,
    pub panel_type: Option<String>,
    pub covers_pct: Option<String>,
    pub covers_panels: Option<String>,
    pub covers_total: Option<String>,
    pub max_depth: Option<String>,
    pub level_variation: Option<String>,
    pub interconnection_date: Option<NaiveDate>,
    /// Raw label such as "3 months"
    pub construction_duration: Option<String>,
}

fn owned(value: Option<&str>) -> Option<String> {
    value.map(str::to_string)
}

/// Parse the "effective in ..." phrase into a date.
pub fn interconnection_date(text: &str) -> Result<NaiveDate> {
    let phrase = INTERCONNECTION.capture(text).ok_or(DataError::MissingDate)?;
    Ok(parse_month_or_year(phrase)?)
}

/// Apply every rule to the page text.
///
/// Returns `Ok(None)` for an empty text: such a page yields no row at all.
pub fn extract(text: &str) -> Result<Option<RawFields>> {
    if text.is_empty() {
        return Ok(None);
    }

    for rule in rules() {
        if !rule.regex.is_match(text) {
            debug!("Rule {} found no match", rule.name);
        }
    }

    let (covers_panels, covers_total) = match COVERS_AREA.capture_pair(text) {
        Some((panels, total)) => (Some(panels.to_string()), Some(total.to_string())),
        None => (None, None),
    };

    Ok(Some(RawFields {
        kwp: owned(KWP.capture(text)),
        location: owned(LOCATION.capture(text)),
        water_body_type: owned(WATER_BODY_TYPE.capture(text)),
        panel_number: owned(PANEL_NUMBER.capture(text)),
        panel_type: owned(PANEL_TYPE.capture(text)),
        covers_pct: owned(COVERS_PCT.capture(text)),
        covers_panels,
        covers_total,
        max_depth: owned(MAX_DEPTH.capture(text)),
        level_variation: owned(LEVEL_VARIATION.capture(text)),
        interconnection_date: Some(interconnection_date(text)?),
        construction_duration: owned(CONSTRUCTION.capture(text)),
    }))
}
