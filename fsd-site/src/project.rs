use serde::{Deserialize, Serialize};
use std::fmt;

/// Ledger title reserved for the listing page itself.
pub const MAIN_TITLE: &str = "main";

/// The name and capacity label a listing entry advertises, e.g.
/// `("Okegawa", "1180 kWp")`.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Serialize, Deserialize)]
pub struct ProjectTitle {
    pub name: String,
    pub capacity: String,
}

impl ProjectTitle {
    pub fn new(name: impl Into<String>, capacity: impl Into<String>) -> Self {
        ProjectTitle {
            name: name.into(),
            capacity: capacity.into(),
        }
    }

    /// Composite key `"<name>-<capacity>"`, used as row key, ledger key and
    /// cache file stem.
    pub fn key(&self) -> String {
        format!("{}-{}", self.name, self.capacity)
    }

    /// Cache file name for the detail page of this project. Path separators
    /// in the title become underscores.
    pub fn file_name(&self) -> String {
        format!("{}.html", self.key().replace('/', "_"))
    }
}

impl fmt::Display for ProjectTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.name, self.capacity)
    }
}

/// One entry of the listing page.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct ListedProject {
    pub title: ProjectTitle,
    /// Detail page address as found in the listing (absolute or relative)
    pub link: String,
}
