//! Linked views demo entry point
//!
//! Usage: `linked-views [table.csv] [interaction.json]`

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use lv_core::{InteractionConfig, PropagationEngine, PropagationGroup};
use lv_data::{CsvSource, TableConfig};
use lv_effects::{EffectsConfig, FilterEffect, HighlighterEffect, TooltipEffect};

mod demo;

use demo::Step;

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting linked views demo");

    let mut args = std::env::args().skip(1);
    let table = match args.next() {
        Some(path) => CsvSource::new(TableConfig::default()).from_path(Path::new(&path))?,
        None => demo::sample_table()?,
    };
    let interaction = match args.next() {
        Some(path) => InteractionConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => InteractionConfig::from_json(demo::INTERACTION_CONFIG)?,
    };
    let effects = EffectsConfig::from_json(demo::EFFECTS_CONFIG)?;

    info!("Loaded table '{}' with {} rows", table.name(), table.row_count());
    let data = table.into_model();

    let group = PropagationGroup::new("dashboard");
    let mut panels = Vec::new();
    for alias in ["overview", "detail"] {
        let panel = demo::panel(alias, data.clone(), &effects, interaction.clone())?;
        panel.join(&group);
        panels.push(panel);
    }

    let source = &panels[0];
    for step in demo::script() {
        let outcomes = match step {
            Step::Physical(action, event) => source.on_physical_action(action, event)?,
            Step::Behaviour(behaviour, event) => vec![source.dispatch(behaviour, event)?],
        };
        for outcome in &outcomes {
            info!(
                "'{}' targeted {:?}, applied {:?}, reached {} sibling(s)",
                outcome.behaviour,
                outcome.selection.merged_enter.uids,
                outcome.applied,
                outcome.propagated_to.len()
            );
        }
        for panel in &panels {
            report(panel);
        }
    }

    for panel in &panels {
        panel.remove();
    }
    info!("Done");
    Ok(())
}

fn report(panel: &Arc<PropagationEngine>) {
    let alias = &panel.context().alias;
    let tooltips = panel
        .with_side_effect::<TooltipEffect, _>("tooltip", |tooltip| {
            tooltip
                .tooltips()
                .iter()
                .map(|(key, phase, overlay)| format!("{key:?}/{phase:?}@({:.0},{:.0})", overlay.position().x, overlay.position().y))
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();
    let highlighted = panel
        .with_side_effect::<HighlighterEffect, _>("highlighter", HighlighterEffect::highlighted)
        .unwrap_or_default();
    let filtered = panel
        .with_side_effect::<FilterEffect, _>("filter", |filter| filter.visible_rows().map(<[_]>::to_vec))
        .flatten();

    info!(
        "  {}: tooltips {:?}, highlighted {:?}, filtered to {:?}",
        alias, tooltips, highlighted, filtered
    );
}
