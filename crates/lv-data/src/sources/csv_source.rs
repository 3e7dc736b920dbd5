use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::ReaderBuilder;
use lv_core::{CellValue, FieldDef, FieldType};
use serde_json::Number;

use crate::config::TableConfig;
use crate::schema::SchemaDetector;
use crate::table::DataTable;
use crate::DataError;

/// Loads CSV input into a [`DataTable`]
pub struct CsvSource {
    config: TableConfig,
}

impl CsvSource {
    /// Create a new CSV source with the given configuration
    pub fn new(config: TableConfig) -> Self {
        Self { config }
    }

    /// Load a CSV file; the table is named after the file stem unless configured
    pub fn from_path(&self, path: &Path) -> Result<DataTable, DataError> {
        let file = File::open(path)?;
        let name = self.config.name.clone().unwrap_or_else(|| {
            path.file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| "table".to_string())
        });
        tracing::info!("Loading CSV file {:?}", path);
        self.load(name, BufReader::new(file))
    }

    /// Load CSV text from any reader
    pub fn from_reader<R: Read>(&self, reader: R) -> Result<DataTable, DataError> {
        let name = self.config.name.clone().unwrap_or_else(|| "table".to_string());
        self.load(name, reader)
    }

    fn load<R: Read>(&self, name: String, reader: R) -> Result<DataTable, DataError> {
        let mut delimiter = [0u8; 4];
        let delimiter = self.config.delimiter.encode_utf8(&mut delimiter).as_bytes()[0];

        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(delimiter)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader.headers()?.iter().map(|h| h.trim().to_string()).collect();

        let mut raw_rows = Vec::new();
        for (idx, result) in csv_reader.records().enumerate() {
            let record = result?;
            if record.len() != headers.len() {
                return Err(DataError::RaggedRow { row: idx, expected: headers.len(), found: record.len() });
            }
            raw_rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
        }

        let detected = SchemaDetector::from_config(&self.config).detect_from_samples(&headers, &raw_rows);
        let fields: Vec<FieldDef> = detected
            .into_values()
            .map(|def| FieldDef {
                field_type: self.config.field_type(&def.name, def.field_type),
                name: def.name,
            })
            .collect();

        let rows: Vec<Vec<CellValue>> = raw_rows
            .iter()
            .map(|raw| {
                raw.iter()
                    .zip(&fields)
                    .map(|(value, def)| self.parse_cell(value, def.field_type))
                    .collect()
            })
            .collect();

        tracing::info!("Loaded table '{}' with {} rows and {} fields", name, rows.len(), fields.len());
        DataTable::new(name, fields, rows)
    }

    fn parse_cell(&self, value: &str, field_type: FieldType) -> CellValue {
        if self.config.null_config.is_null(value) {
            return CellValue::Null;
        }
        let trimmed = value.trim();
        match field_type {
            FieldType::Measure => trimmed
                .parse::<i64>()
                .map(CellValue::from)
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().and_then(Number::from_f64).map(CellValue::Number))
                .unwrap_or_else(|| CellValue::String(trimmed.to_string())),
            FieldType::Dimension => CellValue::String(trimmed.to_string()),
        }
    }
}

impl Default for CsvSource {
    fn default() -> Self {
        Self::new(TableConfig::default())
    }
}
