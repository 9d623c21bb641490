//! The project table: raw fields per title, coerced into typed records and
//! written out as CSV once every project has been parsed.

use crate::{
    error::{DataError, Result},
    extract::RawFields,
};
use chrono::NaiveDate;
use log::{info, warn};
use regex::Regex;
use serde::Serialize;
use std::{collections::HashMap, path::Path, str::FromStr, sync::LazyLock};

/// Header of the dataset CSV, in column order.
pub const COLUMNS: [&str; 14] = [
    "title",
    "link",
    "kWp",
    "location",
    "water_body_type",
    "panel_number",
    "panel_type",
    "covers_pct",
    "covers_panels",
    "covers_total",
    "max_depth",
    "level_variation",
    "interconnection_date",
    "construction_duration",
];

/// A finalized dataset row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectRecord {
    pub title: String,
    pub link: String,
    #[serde(rename = "kWp")]
    pub kwp: i64,
    pub location: Option<String>,
    pub water_body_type: Option<String>,
    pub panel_number: i64,
    pub panel_type: Option<String>,
    pub covers_pct: Option<f64>,
    /// Hectares covered by the panels
    pub covers_panels: Option<f64>,
    /// Hectares of the whole water body
    pub covers_total: Option<f64>,
    /// Meters
    pub max_depth: Option<f64>,
    /// Meters
    pub level_variation: Option<f64>,
    pub interconnection_date: Option<NaiveDate>,
    /// Days
    pub construction_duration: Option<i64>,
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum DurationUnit {
    Day,
    Week,
    Month,
}

/// A construction duration label such as "3 months".
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct ConstructionDuration {
    pub count: i64,
    pub unit: DurationUnit,
}

static DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<num>\d+) (?P<unit>day|week|month)s?$").expect("valid duration regex")
});

impl FromStr for ConstructionDuration {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self> {
        let coercion_error = || DataError::Coercion {
            field: "construction_duration",
            value: s.to_string(),
        };
        let captures = DURATION.captures(s.trim()).ok_or_else(coercion_error)?;
        let count = captures["num"].parse().map_err(|_| coercion_error())?;
        let unit = match &captures["unit"] {
            "day" => DurationUnit::Day,
            "week" => DurationUnit::Week,
            _ => DurationUnit::Month,
        };
        Ok(ConstructionDuration { count, unit })
    }
}

impl ConstructionDuration {
    /// Length in days. Months have no fixed length, so they yield `None`.
    pub fn days(&self) -> Option<i64> {
        match self.unit {
            DurationUnit::Day => Some(self.count),
            DurationUnit::Week => Some(self.count * 7),
            DurationUnit::Month => None,
        }
    }
}

/// Decimal text with either `.` or `,` as separator.
pub fn parse_decimal(field: &'static str, value: &str) -> Result<f64> {
    value
        .trim()
        .replace(',', ".")
        .parse()
        .map_err(|_| DataError::Coercion {
            field,
            value: value.to_string(),
        })
}

pub fn parse_integer(field: &'static str, value: &str) -> Result<i64> {
    value.trim().parse().map_err(|_| DataError::Coercion {
        field,
        value: value.to_string(),
    })
}

fn decimal(field: &'static str, value: &Option<String>) -> Result<Option<f64>> {
    value.as_deref().map(|v| parse_decimal(field, v)).transpose()
}

fn duration_days(title: &str, label: &Option<String>) -> Result<Option<i64>> {
    let Some(label) = label else {
        return Ok(None);
    };
    let duration: ConstructionDuration = label.parse()?;
    let days = duration.days();
    if days.is_none() {
        warn!(
            "{}: construction duration {:?} has no fixed day count, leaving it empty",
            title, label
        );
    }
    Ok(days)
}

#[derive(Debug, Clone)]
struct Row {
    title: String,
    link: String,
    fields: RawFields,
}

/// Raw rows keyed by title, in discovery order.
#[derive(Debug, Default)]
pub struct Dataset {
    rows: Vec<Row>,
    index: HashMap<String, usize>,
}

impl Dataset {
    pub fn new() -> Self {
        Dataset::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Add a row. A title seen before replaces the earlier row in place.
    pub fn insert(&mut self, title: &str, link: &str, fields: RawFields) {
        let row = Row {
            title: title.to_string(),
            link: link.to_string(),
            fields,
        };
        match self.index.get(title) {
            Some(&i) => {
                warn!("Duplicate project title {}, keeping the last one", title);
                self.rows[i] = row;
            }
            None => {
                self.index.insert(title.to_string(), self.rows.len());
                self.rows.push(row);
            }
        }
    }

    /// Coerce every row into a typed record.
    ///
    /// A missing capacity becomes 0 while a missing panel count is an error.
    /// Malformed numbers are errors.
    pub fn finalize(&self) -> Result<Vec<ProjectRecord>> {
        self.rows
            .iter()
            .map(|row| -> Result<ProjectRecord> {
                let f = &row.fields;
                let kwp = match &f.kwp {
                    Some(v) => parse_integer("kWp", v)?,
                    None => 0,
                };
                let panel_number = match &f.panel_number {
                    Some(v) => parse_integer("panel_number", v)?,
                    None => return Err(DataError::MissingField("panel_number")),
                };
                Ok(ProjectRecord {
                    title: row.title.clone(),
                    link: row.link.clone(),
                    kwp,
                    location: f.location.clone(),
                    water_body_type: f.water_body_type.clone(),
                    panel_number,
                    panel_type: f.panel_type.clone(),
                    covers_pct: decimal("covers_pct", &f.covers_pct)?,
                    covers_panels: decimal("covers_panels", &f.covers_panels)?,
                    covers_total: decimal("covers_total", &f.covers_total)?,
                    max_depth: decimal("max_depth", &f.max_depth)?,
                    level_variation: decimal("level_variation", &f.level_variation)?,
                    interconnection_date: f.interconnection_date,
                    construction_duration: duration_days(&row.title, &f.construction_duration)?,
                })
            })
            .collect()
    }
}

/// Write records to `path`, header first.
pub fn write_csv<P: AsRef<Path>>(records: &[ProjectRecord], path: P) -> Result<()> {
    let mut writer = csv::Writer::from_path(path.as_ref())?;
    if records.is_empty() {
        writer.write_record(COLUMNS)?;
    }
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    info!(
        "Wrote {} projects to {}",
        records.len(),
        path.as_ref().display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> RawFields {
        RawFields {
            kwp: Some("1180".to_string()),
            location: Some("Japan".to_string()),
            water_body_type: Some("a reservoir".to_string()),
            panel_number: Some("4536".to_string()),
            panel_type: Some("260 Wp modules".to_string()),
            covers_pct: Some("45 ".to_string()),
            covers_panels: Some("3,2".to_string()),
            covers_total: Some("7".to_string()),
            max_depth: None,
            level_variation: Some("1.5".to_string()),
            interconnection_date: NaiveDate::from_ymd_opt(2014, 3, 1),
            construction_duration: Some("2 weeks".to_string()),
        }
    }

    #[test]
    fn test_construction_duration() {
        let d: ConstructionDuration = "3 days".parse().unwrap();
        assert_eq!(d.days(), Some(3));
        let d: ConstructionDuration = "1 day".parse().unwrap();
        assert_eq!(d.days(), Some(1));
        let d: ConstructionDuration = "2 weeks".parse().unwrap();
        assert_eq!(d.days(), Some(14));
        let d: ConstructionDuration = "3 months".parse().unwrap();
        assert_eq!(d.unit, DurationUnit::Month);
        assert_eq!(d.days(), None);
        assert!("a fortnight".parse::<ConstructionDuration>().is_err());
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("max_depth", "4,5").unwrap(), 4.5);
        assert_eq!(parse_decimal("covers_pct", "45 ").unwrap(), 45.0);
        assert!(matches!(
            parse_decimal("covers_pct", "about half"),
            Err(DataError::Coercion { field: "covers_pct", .. })
        ));
    }

    #[test]
    fn test_finalize() {
        let mut dataset = Dataset::new();
        dataset.insert("Okegawa-1180 kWp", "/projects/okegawa/", fields());
        let records = dataset.finalize().unwrap();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.kwp, 1180);
        assert_eq!(record.panel_number, 4536);
        assert_eq!(record.covers_pct, Some(45.0));
        assert_eq!(record.covers_panels, Some(3.2));
        assert_eq!(record.covers_total, Some(7.0));
        assert_eq!(record.max_depth, None);
        assert_eq!(record.level_variation, Some(1.5));
        assert_eq!(record.construction_duration, Some(14));
    }

    #[test]
    fn test_missing_capacity_defaults_to_zero() {
        let mut dataset = Dataset::new();
        dataset.insert(
            "A-1 kWp",
            "/a/",
            RawFields {
                kwp: None,
                ..fields()
            },
        );
        assert_eq!(dataset.finalize().unwrap()[0].kwp, 0);
    }

    #[test]
    fn test_missing_panel_number_is_fatal() {
        let mut dataset = Dataset::new();
        dataset.insert(
            "A-1 kWp",
            "/a/",
            RawFields {
                panel_number: None,
                ..fields()
            },
        );
        assert!(matches!(
            dataset.finalize(),
            Err(DataError::MissingField("panel_number"))
        ));
    }

    #[test]
    fn test_month_duration_left_empty() {
        let mut dataset = Dataset::new();
        dataset.insert(
            "A-1 kWp",
            "/a/",
            RawFields {
                construction_duration: Some("3 months".to_string()),
                ..fields()
            },
        );
        assert_eq!(dataset.finalize().unwrap()[0].construction_duration, None);
    }

    #[test]
    fn test_insert_last_write_wins_in_place() {
        let mut dataset = Dataset::new();
        dataset.insert("A-1 kWp", "/a/", fields());
        dataset.insert("B-2 kWp", "/b/", fields());
        dataset.insert(
            "A-1 kWp",
            "/a2/",
            RawFields {
                kwp: Some("5".to_string()),
                ..fields()
            },
        );
        assert_eq!(dataset.len(), 2);
        let records = dataset.finalize().unwrap();
        assert_eq!(records[0].title, "A-1 kWp");
        assert_eq!(records[0].link, "/a2/");
        assert_eq!(records[0].kwp, 5);
        assert_eq!(records[1].title, "B-2 kWp");
    }

    #[test]
    fn test_write_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("floating_solar_dataset.csv");
        let mut dataset = Dataset::new();
        dataset.insert(
            "Okegawa-1180 kWp",
            "/projects/okegawa/",
            RawFields {
                construction_duration: Some("3 months".to_string()),
                ..fields()
            },
        );
        write_csv(&dataset.finalize().unwrap(), &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let mut lines = written.lines();
        assert_eq!(lines.next().unwrap(), COLUMNS.join(","));
        assert_eq!(
            lines.next().unwrap(),
            "Okegawa-1180 kWp,/projects/okegawa/,1180,Japan,a reservoir,4536,260 Wp modules,45.0,3.2,7.0,,1.5,2014-03-01,"
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_write_csv_empty_has_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        write_csv(&[], &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written.trim_end(), COLUMNS.join(","));
    }
}
