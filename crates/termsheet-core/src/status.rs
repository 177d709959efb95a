//! # Term Sheet Status
//!
//! The flat, closed enumeration stored in the `term_sheet_status` column.
//! Unlike the composite slots it carries no payload; the wire and stored
//! forms are the same display string.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Whether a provision is present in the term sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TermSheetStatus {
    /// The provision is present.
    #[serde(rename = "Yes")]
    Yes,
    /// The provision is partially present.
    #[serde(rename = "Partial")]
    Partial,
    /// The provision is absent.
    #[serde(rename = "No")]
    No,
    /// The provision does not apply to the instrument.
    #[serde(rename = "N/A")]
    NotApplicable,
    /// The term sheet is silent on the provision.
    #[serde(rename = "Not stated in Term Sheet")]
    NotStated,
}

impl TermSheetStatus {
    /// Every status value, in declaration order.
    pub fn all() -> &'static [TermSheetStatus] {
        &[
            Self::Yes,
            Self::Partial,
            Self::No,
            Self::NotApplicable,
            Self::NotStated,
        ]
    }

    /// The display string used on the wire and in the database.
    ///
    /// Must match the serde renames above.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::Partial => "Partial",
            Self::No => "No",
            Self::NotApplicable => "N/A",
            Self::NotStated => "Not stated in Term Sheet",
        }
    }
}

impl fmt::Display for TermSheetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TermSheetStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                let expected: Vec<&str> = Self::all().iter().map(|s| s.as_str()).collect();
                format!("unknown term sheet status `{s}`, expected one of: {}", expected.join(", "))
            })
    }
}
