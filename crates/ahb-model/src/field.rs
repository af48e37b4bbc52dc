//! Descriptive field identifiers of an AHB row.
//!
//! The known fields form a fixed superset schema shared by all format
//! versions. Columns a source table carries beyond that schema are kept as
//! [`FieldName::Extra`] and always ordered after the known fields.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Source column holding the section name (the alignment key).
pub const SECTION_NAME_HEADER: &str = "Segmentname";

/// Known descriptive fields in canonical comparison and display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AhbField {
    /// `Segmentgruppe`, e.g. "SG2"
    SegmentGroupKey,
    /// `Segment`, e.g. "UNH"
    SegmentCode,
    /// `Datenelement`, e.g. "0062"
    DataElement,
    /// `Segment ID`, e.g. "00001"
    SegmentId,
    /// `Code` or `Qualifier`, e.g. "E_6022" or "IC"
    ValuePoolEntry,
    /// `Beschreibung`
    Name,
    /// `Bedingungsausdruck`, e.g. "Muss"
    AhbExpression,
    /// `Bedingung`
    Conditions,
}

impl AhbField {
    pub const ALL: [AhbField; 8] = [
        AhbField::SegmentGroupKey,
        AhbField::SegmentCode,
        AhbField::DataElement,
        AhbField::SegmentId,
        AhbField::ValuePoolEntry,
        AhbField::Name,
        AhbField::AhbExpression,
        AhbField::Conditions,
    ];

    /// Stable identifier used in changed-field lists and persisted results.
    pub fn key(self) -> &'static str {
        match self {
            AhbField::SegmentGroupKey => "segment_group_key",
            AhbField::SegmentCode => "segment_code",
            AhbField::DataElement => "data_element",
            AhbField::SegmentId => "segment_id",
            AhbField::ValuePoolEntry => "value_pool_entry",
            AhbField::Name => "name",
            AhbField::AhbExpression => "ahb_expression",
            AhbField::Conditions => "conditions",
        }
    }

    /// Column header used when rendering.
    pub fn header(self) -> &'static str {
        match self {
            AhbField::SegmentGroupKey => "Segmentgruppe",
            AhbField::SegmentCode => "Segment",
            AhbField::DataElement => "Datenelement",
            AhbField::SegmentId => "Segment ID",
            AhbField::ValuePoolEntry => "Code",
            AhbField::Name => "Beschreibung",
            AhbField::AhbExpression => "Bedingungsausdruck",
            AhbField::Conditions => "Bedingung",
        }
    }

    /// Source column headers this field is read from, in order of preference.
    pub fn source_headers(self) -> &'static [&'static str] {
        match self {
            AhbField::SegmentGroupKey => &["Segmentgruppe"],
            AhbField::SegmentCode => &["Segment"],
            AhbField::DataElement => &["Datenelement"],
            AhbField::SegmentId => &["Segment ID"],
            AhbField::ValuePoolEntry => &["Code", "Qualifier"],
            AhbField::Name => &["Beschreibung"],
            AhbField::AhbExpression => &["Bedingungsausdruck"],
            AhbField::Conditions => &["Bedingung"],
        }
    }

    /// Looks up the field a source column header belongs to.
    pub fn from_header(header: &str) -> Option<AhbField> {
        Self::ALL
            .into_iter()
            .find(|field| field.source_headers().contains(&header))
    }
}

impl fmt::Display for AhbField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A comparable field: either part of the known schema or an extra column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldName {
    Known(AhbField),
    Extra(String),
}

impl FieldName {
    pub fn key(&self) -> &str {
        match self {
            FieldName::Known(field) => field.key(),
            FieldName::Extra(name) => name,
        }
    }

    pub fn header(&self) -> &str {
        match self {
            FieldName::Known(field) => field.header(),
            FieldName::Extra(name) => name,
        }
    }

    /// Identifier recorded in [`crate::RowDiff::changed_fields`] for one side.
    pub fn changed_id(&self, format_version: &str) -> String {
        format!("{}_{}", self.key(), format_version)
    }
}

impl From<AhbField> for FieldName {
    fn from(field: AhbField) -> Self {
        FieldName::Known(field)
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
