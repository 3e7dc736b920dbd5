use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use super::{as_number, display_value, CellValue, DataModel, FieldDef, FieldsConfig, RowId};

/// Identifier tuples over a set of fields.
///
/// This is the form in which targeted rows travel between units: each unit
/// matches the tuples against its own data over the fields it shares.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentifierTable {
    pub fields: Vec<FieldDef>,
    pub values: Vec<Vec<CellValue>>,
}

impl IdentifierTable {
    pub fn new(fields: Vec<FieldDef>, values: Vec<Vec<CellValue>>) -> Self {
        Self { fields, values }
    }

    /// Build the tuples of `rows` over `fields`; fields missing from the
    /// model are skipped.
    pub fn from_rows(model: &dyn DataModel, fields: &[String], rows: &[RowId]) -> Self {
        let config = model.fields_config();
        let fields: Vec<FieldDef> = fields
            .iter()
            .filter_map(|name| config.get(name).cloned())
            .collect();

        let values = rows
            .iter()
            .map(|&row| {
                fields
                    .iter()
                    .map(|def| model.value(row, &def.name).unwrap_or(CellValue::Null))
                    .collect()
            })
            .collect();

        Self { fields, values }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|def| def.name.as_str())
    }

    pub fn has_measure(&self) -> bool {
        self.fields.iter().any(FieldDef::is_measure)
    }

    /// Whether any identifier field exists in `fields`
    pub fn shares_fields_with(&self, fields: &FieldsConfig) -> bool {
        self.field_names().any(|name| fields.contains_key(name))
    }

    /// Rows of `model` whose values equal one of the tuples on every shared
    /// field. Nothing matches when no field is shared.
    pub fn matching_rows(&self, model: &dyn DataModel) -> Vec<RowId> {
        let config = model.fields_config();
        let columns: Vec<(usize, &str)> = self
            .fields
            .iter()
            .enumerate()
            .filter(|(_, def)| config.contains_key(&def.name))
            .map(|(idx, def)| (idx, def.name.as_str()))
            .collect();

        if columns.is_empty() {
            return Vec::new();
        }

        let wanted: AHashSet<String> = self
            .values
            .iter()
            .map(|tuple| tuple_key(columns.iter().map(|(idx, _)| tuple.get(*idx))))
            .collect();

        model
            .uids()
            .into_iter()
            .filter(|&row| {
                let cells: Vec<Option<CellValue>> =
                    columns.iter().map(|(_, name)| model.value(row, name)).collect();
                wanted.contains(&tuple_key(cells.iter().map(Option::as_ref)))
            })
            .collect()
    }
}

/// Numbers key by value so that `2`, `2.0` and `"2"` coincide across tables
fn cell_key(value: &CellValue) -> String {
    match as_number(value) {
        Some(n) => n.to_string(),
        None => display_value(value),
    }
}

fn tuple_key<'a>(values: impl Iterator<Item = Option<&'a CellValue>>) -> String {
    values
        .map(|value| value.map(cell_key).unwrap_or_default())
        .collect::<Vec<_>>()
        .join("\u{1f}")
}
