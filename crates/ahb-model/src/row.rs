use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::field::{AhbField, FieldName};

/// One line of an AHB table for a single format version.
///
/// Known descriptive fields are `None` when the source table has no such
/// column and `Some("")` when the column exists but the cell is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AhbRow {
    pub format_version: String,
    /// Alignment key, not unique within a table.
    pub section_name: String,
    pub segment_group_key: Option<String>,
    pub segment_code: Option<String>,
    pub data_element: Option<String>,
    pub segment_id: Option<String>,
    pub value_pool_entry: Option<String>,
    pub name: Option<String>,
    pub ahb_expression: Option<String>,
    pub conditions: Option<String>,
    /// Columns outside the known schema, keyed by source header.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl AhbRow {
    pub fn new(format_version: impl Into<String>, section_name: impl Into<String>) -> Self {
        Self {
            format_version: format_version.into(),
            section_name: section_name.into(),
            ..Self::default()
        }
    }

    /// Placeholder partner for a row that exists in only one version.
    pub fn empty(format_version: impl Into<String>) -> Self {
        Self::new(format_version, "")
    }

    /// True for placeholders created by [`AhbRow::empty`].
    pub fn is_empty(&self) -> bool {
        self.section_name.is_empty()
            && AhbField::ALL.iter().all(|field| self.known(*field).is_none())
            && self.extra.is_empty()
    }

    #[must_use]
    pub fn with_field(mut self, field: AhbField, value: impl Into<String>) -> Self {
        *self.known_mut(field) = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_extra(mut self, header: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(header.into(), value.into());
        self
    }

    pub fn known(&self, field: AhbField) -> Option<&str> {
        let value = match field {
            AhbField::SegmentGroupKey => &self.segment_group_key,
            AhbField::SegmentCode => &self.segment_code,
            AhbField::DataElement => &self.data_element,
            AhbField::SegmentId => &self.segment_id,
            AhbField::ValuePoolEntry => &self.value_pool_entry,
            AhbField::Name => &self.name,
            AhbField::AhbExpression => &self.ahb_expression,
            AhbField::Conditions => &self.conditions,
        };
        value.as_deref()
    }

    pub fn known_mut(&mut self, field: AhbField) -> &mut Option<String> {
        match field {
            AhbField::SegmentGroupKey => &mut self.segment_group_key,
            AhbField::SegmentCode => &mut self.segment_code,
            AhbField::DataElement => &mut self.data_element,
            AhbField::SegmentId => &mut self.segment_id,
            AhbField::ValuePoolEntry => &mut self.value_pool_entry,
            AhbField::Name => &mut self.name,
            AhbField::AhbExpression => &mut self.ahb_expression,
            AhbField::Conditions => &mut self.conditions,
        }
    }

    /// Value of any comparable field, `None` when absent.
    pub fn field(&self, field: &FieldName) -> Option<&str> {
        match field {
            FieldName::Known(known) => self.known(*known),
            FieldName::Extra(header) => self.extra.get(header).map(String::as_str),
        }
    }
}
