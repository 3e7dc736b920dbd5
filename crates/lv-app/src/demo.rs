//! Demo dashboard: sample data, panel wiring and a scripted pointer session

use std::sync::Arc;

use anyhow::Result;
use lv_core::{
    AxisFields, BehaviourEvent, BoundingBox, DataModel, DrawingContext, Encoding, FieldType,
    InteractionConfig, LayerInfo, PhysicalAction, Point, PropagationEngine, StaticGeometry,
    UnitContext,
};
use lv_data::{CsvSource, DataTable, TableConfig};
use lv_effects::{default_registry, EffectsConfig};

pub const SAMPLE_CSV: &str = "\
Origin,Year,Horsepower,Acceleration
USA,1970,130,12.0
USA,1971,165,11.5
Japan,1970,95,15.5
Japan,1972,88,14.5
Europe,1971,90,14.0
Europe,1972,97,16.5
";

pub const INTERACTION_CONFIG: &str = r#"{
    "behaviours": {
        "highlight": ["tooltip", "anchors", "highlighter"],
        "select": ["highlighter"],
        "brush": [{"name": "tooltip", "options": {"strategy": "summary"}}, "highlighter"],
        "filter": [{"name": "filter", "apply_on_source": false}]
    }
}"#;

pub const EFFECTS_CONFIG: &str = r#"{
    "tooltip": {"mode": "fragmented", "padding": 5}
}"#;

/// Sample table with the year treated as a category
pub fn sample_table() -> Result<DataTable> {
    let config = TableConfig {
        name: Some("cars".to_string()),
        ..TableConfig::default().with_field_type("Year", FieldType::Dimension)
    };
    Ok(CsvSource::new(config).from_reader(SAMPLE_CSV.as_bytes())?)
}

/// A bar-like panel: one 24px wide mark per row, height from the first measure
pub fn panel(
    alias: &str,
    data: Arc<dyn DataModel>,
    effects: &EffectsConfig,
    interaction: InteractionConfig,
) -> Result<Arc<PropagationEngine>> {
    let measure = data
        .fields_config()
        .values()
        .find(|def| def.is_measure())
        .map(|def| def.name.clone());

    let mut geometry = StaticGeometry::new();
    for (idx, row) in data.uids().into_iter().enumerate() {
        let value = measure
            .as_deref()
            .and_then(|field| data.value(row, field))
            .as_ref()
            .and_then(lv_core::data::as_number)
            .unwrap_or(0.0);
        let height = value.min(250.0);
        geometry.insert(row, BoundingBox::new(20.0 + 40.0 * idx as f64, 280.0 - height, 24.0, height));
    }

    let x = data.dimension_fields().into_iter().next();
    let drawing = DrawingContext {
        width: 480.0,
        height: 300.0,
        html_container: format!("{alias}-tooltips"),
        svg_container: format!("{alias}-marks"),
    };
    let unit = UnitContext::new(alias, data, drawing, Arc::new(geometry))
        .with_fields(AxisFields {
            x: x.iter().cloned().collect(),
            y: measure.iter().cloned().collect(),
        })
        .with_layers(vec![LayerInfo {
            alias: format!("{alias}-bars"),
            mark: "bar".to_string(),
            encoding: Encoding { x, y: measure, color: None, size: None },
            draws_anchors: true,
        }]);

    let registry = default_registry(&unit, effects)?;
    Ok(PropagationEngine::with_config(unit, registry, interaction)?)
}

/// One input of the scripted session
pub enum Step {
    Physical(PhysicalAction, BehaviourEvent),
    Behaviour(&'static str, BehaviourEvent),
}

/// Hover two rows, brush a range, filter to one row, then leave
pub fn script() -> Vec<Step> {
    vec![
        Step::Physical(PhysicalAction::Hover, BehaviourEvent::rows(vec![0]).at(Point::new(32.0, 150.0))),
        Step::Physical(PhysicalAction::Hover, BehaviourEvent::rows(vec![2, 4])),
        Step::Physical(PhysicalAction::Drag, BehaviourEvent::rows(vec![1, 2, 3])),
        Step::Behaviour(lv_core::behaviours::FILTER, BehaviourEvent::rows(vec![5]).propagating()),
        Step::Physical(PhysicalAction::Leave, BehaviourEvent::clear()),
    ]
}
