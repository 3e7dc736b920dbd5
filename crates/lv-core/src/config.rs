//! Serializable interaction configuration

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::behaviours;
use crate::error::InteractionError;
use crate::side_effect::{EffectBinding, SideEffectEntry};

/// Normalized physical input delivered by the event layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhysicalAction {
    Hover,
    Click,
    Drag,
    /// Pointer left the unit
    Leave,
}

/// Behaviour to side effect mapping and physical action table of a unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    pub behaviours: IndexMap<String, Vec<SideEffectEntry>>,
    pub physical_actions: IndexMap<PhysicalAction, Vec<String>>,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        let named = |names: &[&str]| -> Vec<SideEffectEntry> {
            names.iter().map(|name| SideEffectEntry::named(*name)).collect()
        };

        let mut effects: IndexMap<String, Vec<SideEffectEntry>> = IndexMap::new();
        effects.insert(behaviours::HIGHLIGHT.to_string(), named(&["tooltip", "anchors", "highlighter"]));
        effects.insert(behaviours::SELECT.to_string(), named(&["highlighter"]));
        effects.insert(behaviours::BRUSH.to_string(), named(&["tooltip", "highlighter"]));
        effects.insert(
            behaviours::FILTER.to_string(),
            vec![SideEffectEntry::named("filter").with_apply_on_source(false)],
        );

        let mut physical_actions = IndexMap::new();
        physical_actions.insert(PhysicalAction::Hover, vec![behaviours::HIGHLIGHT.to_string()]);
        physical_actions.insert(PhysicalAction::Click, vec![behaviours::SELECT.to_string()]);
        physical_actions.insert(PhysicalAction::Drag, vec![behaviours::BRUSH.to_string()]);
        physical_actions.insert(PhysicalAction::Leave, vec![behaviours::HIGHLIGHT.to_string()]);

        Self { behaviours: effects, physical_actions }
    }
}

impl InteractionConfig {
    pub fn from_json(json: &str) -> Result<Self, InteractionError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, InteractionError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Configured side effects of one behaviour, as bindings
    pub fn bindings_for(&self, behaviour: &str) -> Vec<EffectBinding> {
        self.behaviours
            .get(behaviour)
            .map(|effects| {
                vec![EffectBinding {
                    behaviours: vec![behaviour.to_string()],
                    effects: effects.clone(),
                }]
            })
            .unwrap_or_default()
    }

    pub fn behaviours_for(&self, action: PhysicalAction) -> &[String] {
        self.physical_actions.get(&action).map(Vec::as_slice).unwrap_or(&[])
    }
}
