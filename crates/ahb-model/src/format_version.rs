use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{ModelError, Result};

/// EDIFACT format version tag as used for directory names, e.g. `FV2504`.
///
/// Ordering is chronological: `FV2410 < FV2504 < FV2510`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FormatVersion {
    tag: String,
    year: u16,
    month: u8,
}

impl FormatVersion {
    /// Parse a `FV<YY><MM>` tag.
    pub fn parse(value: &str) -> Result<Self> {
        let invalid = |reason| ModelError::InvalidFormatVersion {
            value: value.to_string(),
            reason,
        };
        let Some(digits) = value.strip_prefix("FV") else {
            return Err(invalid("expected prefix FV"));
        };
        if value.len() != 6 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("expected four digits after FV"));
        }
        let year: u16 = digits[..2]
            .parse()
            .map_err(|_| invalid("year is not numeric"))?;
        let month: u8 = digits[2..]
            .parse()
            .map_err(|_| invalid("month is not numeric"))?;
        if !(1..=12).contains(&month) {
            return Err(invalid("month must be between 01 and 12"));
        }
        Ok(Self {
            tag: value.to_string(),
            year: 2000 + year,
            month,
        })
    }

    /// Returns true if the name looks like a format version directory.
    pub fn is_format_version_name(name: &str) -> bool {
        name.starts_with("FV") && name.len() == 6
    }

    pub fn as_str(&self) -> &str {
        &self.tag
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }
}

impl Ord for FormatVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.year, self.month).cmp(&(other.year, other.month))
    }
}

impl PartialOrd for FormatVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag)
    }
}

impl FromStr for FormatVersion {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for FormatVersion {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<FormatVersion> for String {
    fn from(value: FormatVersion) -> Self {
        value.tag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_year_and_month() {
        let fv = FormatVersion::parse("FV2504").unwrap();
        assert_eq!(fv.year(), 2025);
        assert_eq!(fv.month(), 4);
        assert_eq!(fv.as_str(), "FV2504");
    }

    #[test]
    fn rejects_malformed_tags() {
        for value in ["2504", "FV25", "FV25044", "FVxx04", "FV2513", "FV2500"] {
            assert!(FormatVersion::parse(value).is_err(), "{value} should fail");
        }
    }

    #[test]
    fn orders_chronologically() {
        let mut versions: Vec<FormatVersion> = ["FV2504", "FV2310", "FV2410", "FV2404"]
            .iter()
            .map(|v| v.parse().unwrap())
            .collect();
        versions.sort();
        let tags: Vec<&str> = versions.iter().map(FormatVersion::as_str).collect();
        assert_eq!(tags, vec!["FV2310", "FV2404", "FV2410", "FV2504"]);
    }
}
