//! Side effects: visual consequences of behaviours

mod registry;

pub use registry::SideEffectRegistry;

use std::any::Any;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::payload::Payload;
use crate::propagation::PropagationInfo;
use crate::selection::SelectionSet;
use crate::unit::UnitContext;

/// Static capabilities of a side effect kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Applying the effect persists selection state beyond the event
    pub mutates: bool,
    /// The effect may run on the unit that originated the event
    pub apply_on_source: bool,
}

/// Closed set of side effect kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SideEffectKind {
    Tooltip,
    Anchors,
    Highlighter,
    Filter,
}

impl SideEffectKind {
    pub const fn capabilities(self) -> Capabilities {
        match self {
            SideEffectKind::Filter => Capabilities { mutates: true, apply_on_source: true },
            SideEffectKind::Tooltip | SideEffectKind::Anchors | SideEffectKind::Highlighter => {
                Capabilities { mutates: false, apply_on_source: true }
            }
        }
    }

    pub const fn formal_name(self) -> &'static str {
        match self {
            SideEffectKind::Tooltip => "tooltip",
            SideEffectKind::Anchors => "anchors",
            SideEffectKind::Highlighter => "highlighter",
            SideEffectKind::Filter => "filter",
        }
    }

    /// Kinds that materialize their own overlay elements
    pub const fn is_spawnable(self) -> bool {
        matches!(self, SideEffectKind::Tooltip | SideEffectKind::Anchors)
    }
}

/// Per-entry options handed to the side effect on apply
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EffectOptions {
    /// Named content strategy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
    /// Field display order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<Vec<String>>,
}

/// A side effect as referenced from the behaviour map.
///
/// Deserializes from a bare name (`"tooltip"`) or an object
/// (`{"name": "filter", "apply_on_source": false}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawEntry")]
pub struct SideEffectEntry {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apply_on_source: Option<bool>,
    #[serde(default)]
    pub options: EffectOptions,
}

impl SideEffectEntry {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            apply_on_source: None,
            options: EffectOptions::default(),
        }
    }

    pub fn with_apply_on_source(mut self, apply_on_source: bool) -> Self {
        self.apply_on_source = Some(apply_on_source);
        self
    }

    pub fn with_options(mut self, options: EffectOptions) -> Self {
        self.options = options;
        self
    }

    /// Entry override first, kind default otherwise
    pub fn applies_on_source(&self, capabilities: Option<Capabilities>) -> bool {
        self.apply_on_source
            .or(capabilities.map(|caps| caps.apply_on_source))
            .unwrap_or(true)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Name(String),
    Full {
        name: String,
        #[serde(default)]
        apply_on_source: Option<bool>,
        #[serde(default)]
        options: EffectOptions,
    },
}

impl From<RawEntry> for SideEffectEntry {
    fn from(raw: RawEntry) -> Self {
        match raw {
            RawEntry::Name(name) => SideEffectEntry::named(name),
            RawEntry::Full { name, apply_on_source, options } => {
                SideEffectEntry { name, apply_on_source, options }
            }
        }
    }
}

/// Side effects bound to the behaviours that trigger them
#[derive(Debug, Clone, PartialEq)]
pub struct EffectBinding {
    pub behaviours: Vec<String>,
    pub effects: Vec<SideEffectEntry>,
}

/// Cross-unit filter registered under a side effect name.
///
/// Called with the originating payload when a behaviour arrives on a unit
/// other than the one it started on.
pub type SourcePredicate = Arc<dyn Fn(&Payload, &PropagationInfo, &UnitContext) -> bool + Send + Sync>;

/// Everything a side effect sees besides the selection set and payload
pub struct ApplyContext<'a> {
    pub unit: &'a UnitContext,
    pub propagation: &'a PropagationInfo,
    pub options: &'a EffectOptions,
}

/// A configured side effect instance, owned by one unit
pub trait SideEffect: Send {
    /// Registry name
    fn name(&self) -> &str {
        self.kind().formal_name()
    }

    fn kind(&self) -> SideEffectKind;

    fn capabilities(&self) -> Capabilities {
        self.kind().capabilities()
    }

    /// Cross-unit filter for this effect, if it has one
    fn source_predicate(&self) -> Option<SourcePredicate> {
        None
    }

    /// Render or update for the given selection
    fn apply(&mut self, selection: &SelectionSet, payload: &Payload, ctx: &ApplyContext<'_>);

    /// Visually suppress everything the effect currently shows
    fn hide(&mut self, payload: &Payload);

    /// Detach everything; the effect may be applied again later
    fn remove(&mut self);

    /// Get as any for downcasting
    fn as_any(&self) -> &dyn Any;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_from_bare_name() {
        let entry: SideEffectEntry = serde_json::from_str("\"tooltip\"").unwrap();
        assert_eq!(entry, SideEffectEntry::named("tooltip"));
    }

    #[test]
    fn test_entry_from_object() {
        let entry: SideEffectEntry = serde_json::from_str(
            r#"{"name": "filter", "apply_on_source": false, "options": {"strategy": "summary"}}"#,
        )
        .unwrap();
        assert_eq!(entry.name, "filter");
        assert_eq!(entry.apply_on_source, Some(false));
        assert_eq!(entry.options.strategy.as_deref(), Some("summary"));
    }

    #[test]
    fn test_apply_on_source_resolution() {
        let caps = SideEffectKind::Filter.capabilities();
        assert!(SideEffectEntry::named("filter").applies_on_source(Some(caps)));
        assert!(!SideEffectEntry::named("filter")
            .with_apply_on_source(false)
            .applies_on_source(Some(caps)));
    }

    #[test]
    fn test_only_filter_mutates() {
        assert!(SideEffectKind::Filter.capabilities().mutates);
        assert!(!SideEffectKind::Tooltip.capabilities().mutates);
        assert!(SideEffectKind::Tooltip.is_spawnable());
        assert!(!SideEffectKind::Highlighter.is_spawnable());
    }
}
