//! In-memory row table

use std::sync::Arc;

use lv_core::{CellValue, DataModel, FieldDef, FieldsConfig, RowId};

use crate::DataError;

/// Row-oriented table whose selections share the parent's storage
#[derive(Debug, Clone)]
pub struct DataTable {
    name: String,
    fields: FieldsConfig,
    rows: Arc<Vec<Vec<CellValue>>>,
    /// Visible row ids, ascending
    uids: Vec<RowId>,
}

impl DataTable {
    /// Create a new table; every row must carry one value per field
    pub fn new(
        name: impl Into<String>,
        fields: Vec<FieldDef>,
        rows: Vec<Vec<CellValue>>,
    ) -> Result<Self, DataError> {
        let expected = fields.len();
        if let Some((row, values)) = rows.iter().enumerate().find(|(_, values)| values.len() != expected) {
            return Err(DataError::RaggedRow { row, expected, found: values.len() });
        }

        let fields: FieldsConfig = fields.into_iter().map(|def| (def.name.clone(), def)).collect();
        let uids = (0..rows.len()).collect();

        Ok(Self {
            name: name.into(),
            fields,
            rows: Arc::new(rows),
            uids,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn row_count(&self) -> usize {
        self.uids.len()
    }

    /// All values of `row` in field order
    pub fn row(&self, row: RowId) -> Option<&[CellValue]> {
        self.uids.binary_search(&row).ok()?;
        self.rows.get(row).map(Vec::as_slice)
    }

    fn column(&self, field: &str) -> Option<usize> {
        self.fields.get_index_of(field)
    }

    /// Values of one column across the visible rows
    pub fn column_values(&self, field: &str) -> Result<Vec<CellValue>, DataError> {
        let col = self.column(field).ok_or_else(|| DataError::UnknownField(field.to_string()))?;
        Ok(self.uids.iter().map(|&row| self.rows[row][col].clone()).collect())
    }

    pub fn into_model(self) -> Arc<dyn DataModel> {
        Arc::new(self)
    }
}

impl DataModel for DataTable {
    fn uids(&self) -> Vec<RowId> {
        self.uids.clone()
    }

    fn fields_config(&self) -> FieldsConfig {
        self.fields.clone()
    }

    fn value(&self, row: RowId, field: &str) -> Option<CellValue> {
        let col = self.column(field)?;
        self.row(row)?.get(col).cloned()
    }

    fn select(&self, predicate: &dyn Fn(RowId) -> bool) -> Arc<dyn DataModel> {
        Arc::new(Self {
            name: self.name.clone(),
            fields: self.fields.clone(),
            rows: Arc::clone(&self.rows),
            uids: self.uids.iter().copied().filter(|&row| predicate(row)).collect(),
        })
    }

    fn is_empty(&self) -> bool {
        self.uids.is_empty()
    }
}
