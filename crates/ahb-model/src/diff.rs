use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;
use crate::row::AhbRow;

/// Classification of one aligned row pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiffType {
    Unchanged,
    Modified,
    Added,
    Removed,
}

impl DiffType {
    pub fn as_str(self) -> &'static str {
        match self {
            DiffType::Unchanged => "UNCHANGED",
            DiffType::Modified => "MODIFIED",
            DiffType::Added => "ADDED",
            DiffType::Removed => "REMOVED",
        }
    }

    /// Text shown in the change column of rendered tables; empty for unchanged rows.
    pub fn label(self) -> &'static str {
        match self {
            DiffType::Unchanged => "",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for DiffType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiffType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "UNCHANGED" | "" => Ok(DiffType::Unchanged),
            "MODIFIED" => Ok(DiffType::Modified),
            "ADDED" => Ok(DiffType::Added),
            "REMOVED" => Ok(DiffType::Removed),
            _ => Err(ModelError::UnknownDiffType(s.to_string())),
        }
    }
}

/// Result of comparing two rows.
///
/// `changed_fields` is only populated for [`DiffType::Modified`]; each changed
/// field contributes one identifier per side (`<field>_<format_version>`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowDiff {
    pub diff_type: DiffType,
    #[serde(default)]
    pub changed_fields: Vec<String>,
}

impl RowDiff {
    pub fn unchanged() -> Self {
        Self {
            diff_type: DiffType::Unchanged,
            changed_fields: Vec::new(),
        }
    }

    pub fn added() -> Self {
        Self {
            diff_type: DiffType::Added,
            changed_fields: Vec::new(),
        }
    }

    pub fn removed() -> Self {
        Self {
            diff_type: DiffType::Removed,
            changed_fields: Vec::new(),
        }
    }

    /// `Modified` when any field changed, `Unchanged` otherwise.
    pub fn from_changes(changed_fields: Vec<String>) -> Self {
        if changed_fields.is_empty() {
            Self::unchanged()
        } else {
            Self {
                diff_type: DiffType::Modified,
                changed_fields,
            }
        }
    }

    pub fn is_modified(&self) -> bool {
        self.diff_type == DiffType::Modified
    }

    pub fn has_changed(&self, changed_id: &str) -> bool {
        self.changed_fields.iter().any(|id| id == changed_id)
    }
}

/// One output unit of an alignment: both sides are always present, one of
/// them may be an empty placeholder row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowComparison {
    pub previous: AhbRow,
    pub diff: RowDiff,
    pub subsequent: AhbRow,
}

impl RowComparison {
    pub fn diff_type(&self) -> DiffType {
        self.diff.diff_type
    }

    /// Section name shown for this line: previous side first, else subsequent side.
    pub fn display_section_name(&self) -> &str {
        if self.previous.section_name.is_empty() {
            &self.subsequent.section_name
        } else {
            &self.previous.section_name
        }
    }
}

/// Per-diff-type counts of one alignment result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonSummary {
    pub total_lines: usize,
    pub unchanged: usize,
    pub modified: usize,
    pub added: usize,
    pub removed: usize,
}

impl ComparisonSummary {
    pub fn record(&mut self, diff_type: DiffType) {
        self.total_lines += 1;
        match diff_type {
            DiffType::Unchanged => self.unchanged += 1,
            DiffType::Modified => self.modified += 1,
            DiffType::Added => self.added += 1,
            DiffType::Removed => self.removed += 1,
        }
    }

    pub fn has_changes(&self) -> bool {
        self.modified + self.added + self.removed > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_changes_picks_diff_type() {
        assert_eq!(RowDiff::from_changes(vec![]), RowDiff::unchanged());
        let diff = RowDiff::from_changes(vec!["name_FV2410".into(), "name_FV2504".into()]);
        assert!(diff.is_modified());
        assert!(diff.has_changed("name_FV2504"));
        assert!(!diff.has_changed("conditions_FV2504"));
    }

    #[test]
    fn diff_type_parses_labels() {
        assert_eq!("added".parse::<DiffType>().unwrap(), DiffType::Added);
        assert_eq!("".parse::<DiffType>().unwrap(), DiffType::Unchanged);
        assert!("moved".parse::<DiffType>().is_err());
        assert_eq!(DiffType::Unchanged.label(), "");
        assert_eq!(DiffType::Removed.label(), "REMOVED");
    }

    #[test]
    fn summary_counts() {
        let mut summary = ComparisonSummary::default();
        for diff_type in [DiffType::Unchanged, DiffType::Added, DiffType::Added] {
            summary.record(diff_type);
        }
        assert_eq!(summary.total_lines, 3);
        assert_eq!(summary.added, 2);
        assert!(summary.has_changes());
    }
}
