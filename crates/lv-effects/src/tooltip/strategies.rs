//! Tooltip content strategies

use lv_core::{as_number, display_value, DataModel, FieldType};

/// Builds the lines of a tooltip from the rows it describes, honouring an
/// optional field order
pub type ContentStrategy = fn(&dyn DataModel, Option<&[String]>) -> Vec<String>;

pub const DEFAULT: &str = "default";
pub const SUMMARY: &str = "summary";

/// Strategy registered under `name`, falling back to the default one
pub fn strategy(name: Option<&str>) -> ContentStrategy {
    match name.unwrap_or(DEFAULT) {
        DEFAULT => default_content,
        SUMMARY => summary_content,
        other => {
            tracing::debug!("Unknown tooltip strategy '{}', using default", other);
            default_content
        }
    }
}

/// Fields listed in `order` first, then the rest in schema order
fn ordered_fields(model: &dyn DataModel, order: Option<&[String]>) -> Vec<(String, FieldType)> {
    let config = model.fields_config();
    let mut fields: Vec<(String, FieldType)> = order
        .unwrap_or_default()
        .iter()
        .filter_map(|name| config.get(name).map(|def| (def.name.clone(), def.field_type)))
        .collect();

    for def in config.values() {
        if !fields.iter().any(|(name, _)| name == &def.name) {
            fields.push((def.name.clone(), def.field_type));
        }
    }
    fields
}

/// One `field: value` line per field and row
pub fn default_content(model: &dyn DataModel, order: Option<&[String]>) -> Vec<String> {
    let fields = ordered_fields(model, order);
    let fields = &fields;
    model
        .uids()
        .into_iter()
        .flat_map(move |row| {
            fields.iter().map(move |(name, _)| {
                let value = model.value(row, name).map(|v| display_value(&v)).unwrap_or_default();
                format!("{name}: {value}")
            })
        })
        .collect()
}

/// Row count, distinct dimension values and measure totals
pub fn summary_content(model: &dyn DataModel, order: Option<&[String]>) -> Vec<String> {
    let rows = model.uids();
    let mut lines = vec![format!("{} items", rows.len())];

    for (name, field_type) in ordered_fields(model, order) {
        let values = rows.iter().filter_map(|&row| model.value(row, &name));
        let line = match field_type {
            FieldType::Measure => {
                let total: f64 = values.filter_map(|v| as_number(&v)).sum();
                format!("{name}: {total}")
            }
            FieldType::Dimension => {
                let mut distinct: Vec<String> = Vec::new();
                for value in values.map(|v| display_value(&v)) {
                    if !distinct.contains(&value) {
                        distinct.push(value);
                    }
                }
                format!("{name}: {}", distinct.join(", "))
            }
        };
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::cars;

    #[test]
    fn test_default_single_row() {
        let model = cars().select(&|row| row == 2);
        assert_eq!(
            default_content(&*model, None),
            vec!["Origin: Japan", "Year: 1970", "Horsepower: 95"]
        );
    }

    #[test]
    fn test_order_moves_fields_first() {
        let model = cars().select(&|row| row == 0);
        let order = vec!["Horsepower".to_string(), "Missing".to_string()];
        assert_eq!(
            default_content(&*model, Some(&order)),
            vec!["Horsepower: 130", "Origin: USA", "Year: 1970"]
        );
    }

    #[test]
    fn test_summary() {
        let model = cars().select(&|row| row < 2);
        assert_eq!(
            summary_content(&*model, None),
            vec!["2 items", "Origin: USA", "Year: 1970, 1971", "Horsepower: 295"]
        );
    }

    #[test]
    fn test_unknown_strategy_falls_back() {
        let model = cars().select(&|row| row == 3);
        let lines = strategy(Some("fancy"))(&*model, None);
        assert_eq!(lines[0], "Origin: Europe");
    }
}
