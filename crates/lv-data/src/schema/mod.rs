//! Dimension / measure inference from sampled values

use lv_core::{FieldDef, FieldType, FieldsConfig};

use crate::config::{NullConfig, TableConfig};

/// Schema detector for deciding which fields are measures
pub struct SchemaDetector {
    sample_size: usize,
    null_config: NullConfig,
}

/// Statistics about a sampled column
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnStats {
    pub null_count: usize,
    pub numeric_count: usize,
    pub text_count: usize,
}

impl Default for SchemaDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaDetector {
    /// Create a new schema detector
    pub fn new() -> Self {
        Self {
            sample_size: 1000,
            null_config: NullConfig::default(),
        }
    }

    /// Create a detector honouring a table configuration
    pub fn from_config(config: &TableConfig) -> Self {
        Self {
            sample_size: config.sample_size,
            null_config: config.null_config.clone(),
        }
    }

    /// Set the sample size for detection
    pub fn with_sample_size(mut self, size: usize) -> Self {
        self.sample_size = size;
        self
    }

    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    /// Detect field types from sample rows.
    ///
    /// A column is a measure when every non-null sampled value parses as a
    /// number and at least one such value exists.
    pub fn detect_from_samples(&self, headers: &[String], samples: &[Vec<String>]) -> FieldsConfig {
        headers
            .iter()
            .enumerate()
            .map(|(idx, header)| {
                let stats = self.analyze_column(samples, idx);
                let field_type = if stats.numeric_count > 0 && stats.text_count == 0 {
                    FieldType::Measure
                } else {
                    FieldType::Dimension
                };
                tracing::debug!("Detected field '{}' as {:?} ({:?})", header, field_type, stats);
                (header.clone(), FieldDef { name: header.clone(), field_type })
            })
            .collect()
    }

    /// Collect statistics for one column over at most `sample_size` rows
    pub fn analyze_column(&self, samples: &[Vec<String>], col_idx: usize) -> ColumnStats {
        let mut stats = ColumnStats::default();

        for row in samples.iter().take(self.sample_size) {
            match row.get(col_idx) {
                None => stats.null_count += 1,
                Some(value) if self.null_config.is_null(value) => stats.null_count += 1,
                Some(value) if value.trim().parse::<f64>().is_ok() => stats.numeric_count += 1,
                Some(_) => stats.text_count += 1,
            }
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter().map(|row| row.iter().map(|v| v.to_string()).collect()).collect()
    }

    #[test]
    fn test_numeric_columns_become_measures() {
        let headers = vec!["Origin".to_string(), "Horsepower".to_string()];
        let samples = rows(&[&["USA", "130"], &["Japan", "N/A"], &["Europe", "90.5"]]);

        let fields = SchemaDetector::new().detect_from_samples(&headers, &samples);

        assert_eq!(fields["Origin"].field_type, FieldType::Dimension);
        assert_eq!(fields["Horsepower"].field_type, FieldType::Measure);
    }

    #[test]
    fn test_all_null_column_is_dimension() {
        let headers = vec!["Empty".to_string()];
        let samples = rows(&[&[""], &["null"]]);

        let fields = SchemaDetector::new().detect_from_samples(&headers, &samples);

        assert_eq!(fields["Empty"].field_type, FieldType::Dimension);
    }

    #[test]
    fn test_sample_size_limits_inspection() {
        let samples = rows(&[&["1"], &["2"], &["oops"]]);
        let stats = SchemaDetector::new().with_sample_size(2).analyze_column(&samples, 0);

        assert_eq!(stats.numeric_count, 2);
        assert_eq!(stats.text_count, 0);
    }
}
