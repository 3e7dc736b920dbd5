//! Table loading configuration

use std::collections::HashMap;

use lv_core::FieldType;
use serde::{Deserialize, Serialize};

use crate::DataError;

/// How a table is loaded and typed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Table name; defaults to the file stem
    pub name: Option<String>,

    /// Field type overrides
    pub field_types: HashMap<String, FieldType>,

    /// Field delimiter for CSV input
    pub delimiter: char,

    /// Number of rows inspected for type inference
    pub sample_size: usize,

    /// Null value handling
    pub null_config: NullConfig,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            name: None,
            field_types: HashMap::new(),
            delimiter: ',',
            sample_size: 1000,
            null_config: NullConfig::default(),
        }
    }
}

impl TableConfig {
    pub fn from_json(json: &str) -> Result<Self, DataError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_field_type(mut self, field: impl Into<String>, field_type: FieldType) -> Self {
        self.field_types.insert(field.into(), field_type);
        self
    }

    /// Get field type with override
    pub fn field_type(&self, field: &str, detected: FieldType) -> FieldType {
        self.field_types.get(field).copied().unwrap_or(detected)
    }
}

/// Raw cell values read as null
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NullConfig {
    pub patterns: Vec<String>,
    /// Trim surrounding whitespace before matching
    pub trim_whitespace: bool,
    pub case_sensitive: bool,
}

impl Default for NullConfig {
    fn default() -> Self {
        Self {
            patterns: ["", "-", "N/A", "null", "None", "NaN"].map(String::from).to_vec(),
            trim_whitespace: true,
            case_sensitive: false,
        }
    }
}

impl NullConfig {
    pub fn is_null(&self, raw: &str) -> bool {
        let raw = if self.trim_whitespace { raw.trim() } else { raw };
        if self.case_sensitive {
            self.patterns.iter().any(|pattern| pattern == raw)
        } else {
            self.patterns.iter().any(|pattern| pattern.eq_ignore_ascii_case(raw))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_null_patterns() {
        let config = NullConfig::default();
        assert!(config.is_null("  "));
        assert!(config.is_null("n/a"));
        assert!(!config.is_null("0"));
    }

    #[test]
    fn test_case_sensitive_nulls() {
        let config = NullConfig { case_sensitive: true, ..Default::default() };
        assert!(config.is_null("null"));
        assert!(!config.is_null("NULL"));
    }

    #[test]
    fn test_table_config_from_json() {
        let config = TableConfig::from_json(r#"{"field_types": {"Year": "dimension"}, "delimiter": ";"}"#).unwrap();
        assert_eq!(config.delimiter, ';');
        assert_eq!(config.field_type("Year", FieldType::Measure), FieldType::Dimension);
        assert_eq!(config.field_type("Other", FieldType::Measure), FieldType::Measure);
        assert_eq!(config.sample_size, 1000);
    }
}
