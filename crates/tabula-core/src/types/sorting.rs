//! Sort direction normalization.

use serde::{Deserialize, Serialize};

/// Sort direction for the grid's single order column.
///
/// Incoming request values are normalized leniently: anything containing
/// "desc" (case-insensitively) sorts descending, anything containing "asc"
/// sorts ascending, everything else leaves the direction unspecified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    /// Ascending order.
    Asc,
    /// Descending order.
    Desc,
    /// No direction given; compiled queries emit no direction keyword.
    #[default]
    #[serde(other)]
    Unspecified,
}

impl OrderDirection {
    /// Normalize a raw request value.
    pub fn normalize(raw: &str) -> Self {
        let lower = raw.to_ascii_lowercase();
        if lower.contains("desc") {
            Self::Desc
        } else if lower.contains("asc") {
            Self::Asc
        } else {
            Self::Unspecified
        }
    }

    /// Strict parse for construction options: only exact `asc`/`desc`
    /// (case-insensitive) are accepted.
    pub fn parse_strict(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }

    /// The SQL keyword, or an empty string when unspecified.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
            Self::Unspecified => "",
        }
    }

    /// Whether a direction was actually given.
    pub fn is_specified(&self) -> bool {
        !matches!(self, Self::Unspecified)
    }
}
