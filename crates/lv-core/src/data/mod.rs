//! Data-model contract consumed by the interaction engine
//!
//! Storage and query internals live elsewhere (see the `lv-data` crate); the
//! engine only needs unique row identifiers, field configuration, single
//! cell lookup and row selection by predicate.

mod identifiers;

pub use identifiers::IdentifierTable;

use std::fmt::Debug;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Unique identifier of a row inside one data model
pub type RowId = usize;

/// A single cell value
pub type CellValue = serde_json::Value;

/// Semantic type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Categorical or temporal field used to identify rows
    Dimension,
    /// Numeric field that is aggregated and plotted
    Measure,
}

/// Definition of a single field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

impl FieldDef {
    pub fn dimension(name: impl Into<String>) -> Self {
        Self { name: name.into(), field_type: FieldType::Dimension }
    }

    pub fn measure(name: impl Into<String>) -> Self {
        Self { name: name.into(), field_type: FieldType::Measure }
    }

    pub fn is_measure(&self) -> bool {
        self.field_type == FieldType::Measure
    }
}

/// Field name to definition, in schema order
pub type FieldsConfig = IndexMap<String, FieldDef>;

/// Tabular data shared by one or more visual units
pub trait DataModel: Send + Sync + Debug {
    /// Unique row identifiers, in row order
    fn uids(&self) -> Vec<RowId>;

    /// Field configuration in schema order
    fn fields_config(&self) -> FieldsConfig;

    /// Value of `field` for `row`, if both exist
    fn value(&self, row: RowId, field: &str) -> Option<CellValue>;

    /// Child model restricted to rows accepted by the predicate.
    ///
    /// Row identifiers are preserved in the child.
    fn select(&self, predicate: &dyn Fn(RowId) -> bool) -> Arc<dyn DataModel>;

    fn is_empty(&self) -> bool {
        self.uids().is_empty()
    }

    fn field_type(&self, field: &str) -> Option<FieldType> {
        self.fields_config().get(field).map(|def| def.field_type)
    }

    /// Names of all dimension fields, in schema order
    fn dimension_fields(&self) -> Vec<String> {
        self.fields_config()
            .values()
            .filter(|def| def.field_type == FieldType::Dimension)
            .map(|def| def.name.clone())
            .collect()
    }
}

/// Numeric view of a cell, used by range criteria and summaries
pub fn as_number(value: &CellValue) -> Option<f64> {
    match value {
        CellValue::Number(n) => n.as_f64(),
        CellValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Display form of a cell without JSON quoting
pub fn display_value(value: &CellValue) -> String {
    match value {
        CellValue::String(s) => s.clone(),
        CellValue::Null => String::new(),
        other => other.to_string(),
    }
}
