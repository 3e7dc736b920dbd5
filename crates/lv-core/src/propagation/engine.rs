//! Propagation engine implementation

use std::sync::Arc;

use ahash::AHashMap;
use indexmap::IndexMap;
use parking_lot::{Mutex, RwLock};

use super::{source_field_present, PropagationGroup, PropagationInfo, PropagationValue};
use crate::config::{InteractionConfig, PhysicalAction};
use crate::data::{IdentifierTable, RowId};
use crate::error::InteractionError;
use crate::geometry::Point;
use crate::history::{ActionHistory, ActionHistoryEntry};
use crate::payload::{Criteria, Payload, PayloadFn, PayloadGenerators};
use crate::resolve::{ApplicabilityResolver, MutabilityResolver};
use crate::selection::{SelectionSet, SelectionSetBuilder};
use crate::side_effect::{ApplyContext, EffectOptions, SideEffectEntry, SideEffectRegistry, SourcePredicate};
use crate::unit::{UnitContext, UnitId};

/// A behaviour request built from a normalized physical event
#[derive(Debug, Clone, Default)]
pub struct BehaviourEvent {
    pub criteria: Criteria,
    pub position: Option<Point>,
    /// Show overlays at `position` rather than at the targeted marks
    pub show_in_position: bool,
    /// One-shot side effect override
    pub side_effects: Option<Vec<SideEffectEntry>>,
    /// Forward to the other units of the group after applying locally
    pub propagate: bool,
}

impl BehaviourEvent {
    pub fn new(criteria: Criteria) -> Self {
        Self {
            criteria,
            ..Default::default()
        }
    }

    pub fn rows(rows: impl Into<Vec<RowId>>) -> Self {
        Self::new(Criteria::Rows(rows.into()))
    }

    pub fn clear() -> Self {
        Self::new(Criteria::Clear)
    }

    /// Pointer position; overlays follow it on the originating unit
    pub fn at(mut self, position: Point) -> Self {
        self.position = Some(position);
        self.show_in_position = true;
        self
    }

    pub fn with_side_effects(mut self, side_effects: Vec<SideEffectEntry>) -> Self {
        self.side_effects = Some(side_effects);
        self
    }

    pub fn propagating(mut self) -> Self {
        self.propagate = true;
        self
    }
}

/// Result of dispatching a behaviour on one unit
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchOutcome {
    pub behaviour: String,
    pub selection: SelectionSet,
    /// Side effects applied, in application order
    pub applied: Vec<String>,
    pub is_mutable_action: bool,
    /// Sibling units the behaviour was forwarded to
    pub propagated_to: Vec<UnitId>,
}

/// Mutable state owned by one unit's engine
struct EngineState {
    config: InteractionConfig,
    side_effects: SideEffectRegistry,
    generators: PayloadGenerators,
    history: ActionHistory,
    /// Rows currently targeted per behaviour
    targets: AHashMap<String, Vec<RowId>>,
}

/// Turns behaviours into side effects on one unit and forwards them to the
/// unit's siblings.
///
/// Dispatch runs synchronously to completion. A unit cannot be re-entered
/// while it is dispatching; such calls fail with
/// [`InteractionError::Reentrant`].
pub struct PropagationEngine {
    context: UnitContext,
    state: Mutex<EngineState>,
    group: RwLock<Option<Arc<PropagationGroup>>>,
}

impl PropagationEngine {
    /// Create an engine with no behaviour mapped yet
    pub fn new(context: UnitContext, side_effects: SideEffectRegistry) -> Arc<Self> {
        let config = InteractionConfig {
            behaviours: IndexMap::new(),
            ..Default::default()
        };

        Arc::new(Self {
            context,
            state: Mutex::new(EngineState {
                config,
                side_effects,
                generators: PayloadGenerators::default(),
                history: ActionHistory::new(),
                targets: AHashMap::new(),
            }),
            group: RwLock::new(None),
        })
    }

    /// Create and configure an engine in one step
    pub fn with_config(
        context: UnitContext,
        side_effects: SideEffectRegistry,
        config: InteractionConfig,
    ) -> Result<Arc<Self>, InteractionError> {
        let engine = Self::new(context, side_effects);
        engine.configure(config)?;
        Ok(engine)
    }

    pub fn id(&self) -> UnitId {
        self.context.id
    }

    pub fn context(&self) -> &UnitContext {
        &self.context
    }

    /// Replace the behaviour map, rejecting references to unregistered
    /// side effects
    pub fn configure(&self, config: InteractionConfig) -> Result<(), InteractionError> {
        let mut state = self.lock()?;
        state.side_effects.validate(&config.behaviours)?;
        tracing::debug!(
            "Unit {} configured with {} behaviours",
            self.id(),
            config.behaviours.len()
        );
        state.config = config;
        Ok(())
    }

    pub fn register_payload_generator(
        &self,
        behaviour: impl Into<String>,
        generator: PayloadFn,
    ) -> Result<(), InteractionError> {
        self.lock()?.generators.register(behaviour, generator);
        Ok(())
    }

    pub fn register_source_predicate(
        &self,
        name: impl Into<String>,
        predicate: SourcePredicate,
    ) -> Result<(), InteractionError> {
        self.lock()?.side_effects.register_predicate(name, predicate);
        Ok(())
    }

    /// Subscribe this unit to a group, leaving any previous one
    pub fn join(self: &Arc<Self>, group: &Arc<PropagationGroup>) {
        self.leave();
        group.subscribe(self);
        *self.group.write() = Some(group.clone());
    }

    pub fn leave(&self) {
        if let Some(group) = self.group.write().take() {
            group.unsubscribe(self.id());
        }
    }

    pub fn group(&self) -> Option<Arc<PropagationGroup>> {
        self.group.read().clone()
    }

    /// Dispatch a behaviour originating on this unit.
    ///
    /// The behaviour is applied here first; when the event asks for it, it is
    /// then forwarded to every other unit of the group.
    pub fn dispatch(
        &self,
        behaviour: &str,
        event: BehaviourEvent,
    ) -> Result<DispatchOutcome, InteractionError> {
        let source_identifiers = self.source_identifiers(&event.criteria);

        let mut payload = Payload::new(behaviour, event.criteria);
        payload.position = event.position;
        payload.show_in_position = event.show_in_position;
        payload.side_effects = event.side_effects;
        payload.source_unit = Some(self.id());
        payload.source_canvas = Some(self.context.alias.clone());

        let value = PropagationValue {
            payload,
            source_id: self.id(),
            source_identifiers,
        };

        let mut outcome = self.receive(&value)?;

        if event.propagate {
            match self.group() {
                Some(group) => {
                    outcome.propagated_to = group.propagate(&value);
                    tracing::debug!(
                        "'{}' propagated from unit {} to {} units of '{}'",
                        behaviour,
                        self.id(),
                        outcome.propagated_to.len(),
                        group.name()
                    );
                }
                None => tracing::debug!("Unit {} has no group to propagate '{}' to", self.id(), behaviour),
            }
        }

        Ok(outcome)
    }

    /// Translate a physical action into every behaviour mapped to it and
    /// dispatch each one with propagation. Leaving the unit clears.
    pub fn on_physical_action(
        &self,
        action: PhysicalAction,
        event: BehaviourEvent,
    ) -> Result<Vec<DispatchOutcome>, InteractionError> {
        let behaviours = self.lock()?.config.behaviours_for(action).to_vec();
        let event = match action {
            PhysicalAction::Leave => BehaviourEvent {
                criteria: Criteria::Clear,
                ..event
            },
            _ => event,
        };

        behaviours
            .iter()
            .map(|behaviour| self.dispatch(behaviour, event.clone().propagating()))
            .collect()
    }

    /// Apply a propagated behaviour on this unit.
    ///
    /// Rebuilds the payload against this unit's data, decides mutability,
    /// records history and runs the applicable side effects. Never forwards.
    pub fn receive(&self, value: &PropagationValue) -> Result<DispatchOutcome, InteractionError> {
        let mut guard = self.lock()?;
        let state = &mut *guard;
        let action = value.payload.action.clone();
        let model = &*self.context.data;

        let generator = state.generators.get(&action);
        let is_source_field_present =
            source_field_present(value.source_identifiers.as_ref(), &model.fields_config());
        let data = self.related_rows(value, is_source_field_present);
        let payload = generator(&self.context, &data, value);

        let entries = state.config.behaviours.get(&action).cloned().unwrap_or_default();
        let is_mutable_action = MutabilityResolver::resolve(
            &action,
            &entries,
            &state.side_effects,
            value.payload.source_unit,
            self.id(),
        );

        let propagation = PropagationInfo {
            propagate: false,
            persistent: false,
            source_id: value.source_id,
            source_identifiers: value.source_identifiers.clone(),
            is_source_field_present,
            prop_payload: value.payload.clone(),
            data,
        };

        state.history.record(
            action.clone(),
            ActionHistoryEntry {
                payload: payload.clone(),
                propagation: propagation.clone(),
                is_mutable_action,
            },
        );

        let (selection, applied) = self.dispatch_behaviour(state, &payload, &propagation);

        Ok(DispatchOutcome {
            behaviour: action,
            selection,
            applied,
            is_mutable_action,
            propagated_to: Vec::new(),
        })
    }

    /// Latest history entry of a behaviour
    pub fn history(&self, behaviour: &str) -> Option<ActionHistoryEntry> {
        self.state.lock().history.get(behaviour).cloned()
    }

    /// Rows currently targeted by a behaviour
    pub fn targets(&self, behaviour: &str) -> Vec<RowId> {
        self.state.lock().targets.get(behaviour).cloned().unwrap_or_default()
    }

    /// Inspect a side effect instance by name and concrete type.
    ///
    /// Must not be called from inside a side effect.
    pub fn with_side_effect<T: 'static, R>(&self, name: &str, f: impl FnOnce(&T) -> R) -> Option<R> {
        let state = self.state.lock();
        state
            .side_effects
            .get(name)
            .and_then(|effect| effect.as_any().downcast_ref::<T>())
            .map(f)
    }

    /// Detach this unit: leave the group and remove every side effect
    pub fn remove(&self) {
        self.leave();
        let mut state = self.state.lock();
        state.side_effects.remove_all();
        state.history.clear();
        state.targets.clear();
        tracing::debug!("Unit {} removed", self.id());
    }

    fn lock(&self) -> Result<parking_lot::MutexGuard<'_, EngineState>, InteractionError> {
        self.state.try_lock().ok_or_else(|| {
            tracing::warn!("Unit {} re-entered while dispatching", self.id());
            InteractionError::Reentrant(self.id())
        })
    }

    /// Identifier tuples describing what the criteria target on this unit
    fn source_identifiers(&self, criteria: &Criteria) -> Option<IdentifierTable> {
        let model = &*self.context.data;
        let fields: Vec<String> = match criteria {
            Criteria::Unchanged | Criteria::Clear => return None,
            Criteria::Identifiers(table) => return Some(table.clone()),
            Criteria::Range(ranges) => ranges.keys().cloned().collect(),
            Criteria::Rows(_) => {
                let dimensions = model.dimension_fields();
                if dimensions.is_empty() {
                    model.fields_config().keys().cloned().collect()
                } else {
                    dimensions
                }
            }
        };
        Some(IdentifierTable::from_rows(model, &fields, &criteria.rows_in(model)))
    }

    /// Rows of this unit related to a propagated value
    fn related_rows(&self, value: &PropagationValue, is_source_field_present: bool) -> Vec<RowId> {
        let model = &*self.context.data;
        match &value.payload.criteria {
            Criteria::Rows(_) if value.source_id != self.id() => {
                if !is_source_field_present {
                    return Vec::new();
                }
                value
                    .source_identifiers
                    .as_ref()
                    .map(|table| table.matching_rows(model))
                    .unwrap_or_default()
            }
            criteria => criteria.rows_in(model),
        }
    }

    /// Compute the selection set and run the applicable side effects in
    /// registration order
    fn dispatch_behaviour(
        &self,
        state: &mut EngineState,
        payload: &Payload,
        propagation: &PropagationInfo,
    ) -> (SelectionSet, Vec<String>) {
        let action = payload.action.as_str();
        let previous = state.targets.get(action).cloned().unwrap_or_default();
        let current = match &payload.criteria {
            Criteria::Clear => Vec::new(),
            Criteria::Unchanged => payload.target.clone().unwrap_or_else(|| previous.clone()),
            criteria => payload
                .target
                .clone()
                .unwrap_or_else(|| criteria.rows_in(&*self.context.data)),
        };

        let selection = SelectionSetBuilder::new(self.context.data.clone()).build(&current, &previous);
        state.targets.insert(action.to_string(), selection.merged_enter.uids.clone());

        let configured = state.config.bindings_for(action);
        if configured.is_empty() && payload.side_effects.is_none() {
            tracing::debug!("Behaviour '{}' is not mapped on unit {}", action, self.id());
            return (selection, Vec::new());
        }

        let bindings = ApplicabilityResolver::resolve(
            &state.side_effects,
            &configured,
            payload,
            propagation,
            &self.context,
        );

        let mut wanted: IndexMap<String, EffectOptions> = IndexMap::new();
        for entry in bindings.iter().flat_map(|binding| binding.effects.iter()) {
            if !state.side_effects.contains(&entry.name) {
                tracing::warn!("Skipping unregistered side effect '{}' for '{}'", entry.name, action);
                continue;
            }
            wanted.entry(entry.name.clone()).or_insert_with(|| entry.options.clone());
        }

        let mut applied = Vec::new();
        for (name, effect) in state.side_effects.iter_mut() {
            let Some(options) = wanted.get(name) else {
                continue;
            };
            let ctx = ApplyContext {
                unit: &self.context,
                propagation,
                options,
            };
            effect.apply(&selection, payload, &ctx);
            applied.push(name.to_string());
        }

        (selection, applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::StaticGeometry;
    use crate::side_effect::{SideEffect, SideEffectKind};
    use crate::testing::{cars, MemoryModel, RecordingEffect};
    use crate::unit::DrawingContext;
    use crate::data::{DataModel, FieldDef};
    use serde_json::json;
    use std::any::Any;
    use std::sync::Weak;

    fn origins() -> Arc<dyn DataModel> {
        Arc::new(MemoryModel::new(
            vec![FieldDef::dimension("Origin"), FieldDef::measure("Count")],
            vec![
                vec![json!("USA"), json!(2)],
                vec![json!("Japan"), json!(1)],
                vec![json!("Europe"), json!(1)],
            ],
        ))
    }

    fn planets() -> Arc<dyn DataModel> {
        Arc::new(MemoryModel::new(
            vec![FieldDef::dimension("Planet"), FieldDef::measure("Moons")],
            vec![vec![json!("Mars"), json!(2)]],
        ))
    }

    fn registry() -> SideEffectRegistry {
        let mut registry = SideEffectRegistry::new();
        for (name, kind) in [
            ("tooltip", SideEffectKind::Tooltip),
            ("highlighter", SideEffectKind::Highlighter),
            ("filter", SideEffectKind::Filter),
        ] {
            registry.register(Box::new(RecordingEffect::new(name, kind))).unwrap();
        }
        registry
    }

    fn config() -> InteractionConfig {
        let mut config = InteractionConfig::default();
        config.behaviours.clear();
        config.behaviours.insert(
            "highlight".into(),
            vec![SideEffectEntry::named("highlighter"), SideEffectEntry::named("tooltip")],
        );
        config.behaviours.insert(
            "filter".into(),
            vec![SideEffectEntry::named("filter").with_apply_on_source(false)],
        );
        config
    }

    fn engine(alias: &str, data: Arc<dyn DataModel>) -> Arc<PropagationEngine> {
        let context = UnitContext::new(alias, data, DrawingContext::default(), Arc::new(StaticGeometry::new()));
        PropagationEngine::with_config(context, registry(), config()).unwrap()
    }

    fn applied_rows(engine: &PropagationEngine, name: &str) -> Vec<Vec<RowId>> {
        engine
            .with_side_effect(name, |effect: &RecordingEffect| effect.applied.clone())
            .unwrap()
    }

    #[test]
    fn test_configure_rejects_unknown_side_effects() {
        let context = UnitContext::new("a", cars(), DrawingContext::default(), Arc::new(StaticGeometry::new()));
        let err = PropagationEngine::with_config(context, registry(), InteractionConfig::default())
            .err()
            .expect("anchors is not registered");
        assert!(matches!(err, InteractionError::UnknownSideEffect { .. }));
    }

    #[test]
    fn test_unmapped_behaviour_records_history_only() {
        let unit = engine("a", cars());
        let outcome = unit.dispatch("zoom", BehaviourEvent::rows(vec![1])).unwrap();

        assert!(outcome.applied.is_empty());
        assert_eq!(outcome.selection.merged_enter.uids, vec![1]);
        assert!(unit.history("zoom").is_some());
        assert!(applied_rows(&unit, "tooltip").is_empty());
    }

    #[test]
    fn test_side_effects_apply_in_registration_order() {
        let unit = engine("a", cars());
        let outcome = unit.dispatch("highlight", BehaviourEvent::rows(vec![0])).unwrap();

        assert_eq!(outcome.applied, vec!["tooltip", "highlighter"]);
        assert_eq!(applied_rows(&unit, "tooltip"), vec![vec![0]]);
    }

    #[test]
    fn test_clear_releases_all_targets() {
        let unit = engine("a", cars());
        unit.dispatch("highlight", BehaviourEvent::rows(vec![0, 2])).unwrap();
        let outcome = unit.dispatch("highlight", BehaviourEvent::clear()).unwrap();

        assert!(outcome.selection.merged_enter.is_empty());
        assert_eq!(outcome.selection.exit.uids, vec![0, 2]);
        assert!(unit.targets("highlight").is_empty());
        let hidden = unit
            .with_side_effect("tooltip", |effect: &RecordingEffect| effect.hidden)
            .unwrap();
        assert_eq!(hidden, 1);
    }

    #[test]
    fn test_unchanged_criteria_keeps_targets() {
        let unit = engine("a", cars());
        unit.dispatch("highlight", BehaviourEvent::rows(vec![3])).unwrap();
        let outcome = unit
            .dispatch("highlight", BehaviourEvent::new(Criteria::Unchanged))
            .unwrap();

        assert_eq!(outcome.selection.merged_enter.uids, vec![3]);
        assert!(outcome.selection.exit.is_empty());
    }

    #[test]
    fn test_unchanged_criteria_with_target_retargets() {
        fn pinned(_: &UnitContext, _: &[RowId], value: &PropagationValue) -> Payload {
            let mut payload = value.payload.clone();
            payload.target = Some(vec![2]);
            payload
        }

        let unit = engine("a", cars());
        unit.dispatch("highlight", BehaviourEvent::rows(vec![3])).unwrap();
        unit.register_payload_generator("highlight", pinned).unwrap();
        let outcome = unit
            .dispatch("highlight", BehaviourEvent::new(Criteria::Unchanged))
            .unwrap();

        assert_eq!(outcome.selection.merged_enter.uids, vec![2]);
        assert_eq!(outcome.selection.exit.uids, vec![3]);
        assert_eq!(unit.targets("highlight"), vec![2]);
    }

    #[test]
    fn test_repeated_dispatch_is_idempotent() {
        let unit = engine("a", cars());
        let first = unit.dispatch("highlight", BehaviourEvent::rows(vec![1])).unwrap();
        let second = unit.dispatch("highlight", BehaviourEvent::rows(vec![1])).unwrap();

        assert_eq!(first.selection, second.selection);
        assert_eq!(first.applied, second.applied);
    }

    #[test]
    fn test_propagates_to_related_rows_of_siblings() {
        let group = PropagationGroup::new("dashboard");
        let a = engine("canvas-a", cars());
        let b = engine("canvas-b", origins());
        a.join(&group);
        b.join(&group);

        let outcome = a
            .dispatch("highlight", BehaviourEvent::rows(vec![2]).propagating())
            .unwrap();

        assert_eq!(outcome.propagated_to, vec![b.id()]);
        assert_eq!(b.targets("highlight"), vec![1]);
        let entry = b.history("highlight").unwrap();
        assert_eq!(entry.payload.source_unit, Some(a.id()));
        assert_eq!(entry.payload.source_canvas.as_deref(), Some("canvas-a"));
        assert!(entry.propagation.is_source_field_present);
        assert!(!entry.propagation.propagate);
    }

    #[test]
    fn test_dispatch_without_propagation_stays_local() {
        let group = PropagationGroup::new("dashboard");
        let a = engine("canvas-a", cars());
        let b = engine("canvas-b", origins());
        a.join(&group);
        b.join(&group);

        a.dispatch("highlight", BehaviourEvent::rows(vec![2])).unwrap();
        assert!(b.history("highlight").is_none());
    }

    #[test]
    fn test_unrelated_schema_matches_nothing() {
        let group = PropagationGroup::new("dashboard");
        let a = engine("canvas-a", cars());
        let c = engine("canvas-c", planets());
        a.join(&group);
        c.join(&group);

        a.dispatch("highlight", BehaviourEvent::rows(vec![0]).propagating()).unwrap();

        let entry = c.history("highlight").unwrap();
        assert!(!entry.propagation.is_source_field_present);
        assert!(c.targets("highlight").is_empty());
    }

    #[test]
    fn test_mutability_is_decided_per_unit() {
        let group = PropagationGroup::new("dashboard");
        let a = engine("canvas-a", cars());
        let b = engine("canvas-b", origins());
        a.join(&group);
        b.join(&group);

        let outcome = a
            .dispatch("filter", BehaviourEvent::rows(vec![0]).propagating())
            .unwrap();

        assert!(!outcome.is_mutable_action);
        assert!(!a.history("filter").unwrap().is_mutable_action);
        assert!(b.history("filter").unwrap().is_mutable_action);
        // the filter opts out of the source unit
        assert!(outcome.applied.is_empty());
        assert_eq!(applied_rows(&b, "filter"), vec![vec![0]]);
    }

    #[test]
    fn test_leave_clears_through_physical_actions() {
        let group = PropagationGroup::new("dashboard");
        let a = engine("canvas-a", cars());
        let b = engine("canvas-b", origins());
        a.join(&group);
        b.join(&group);

        a.on_physical_action(PhysicalAction::Hover, BehaviourEvent::rows(vec![0])).unwrap();
        assert_eq!(b.targets("highlight"), vec![0]);

        let outcomes = a
            .on_physical_action(PhysicalAction::Leave, BehaviourEvent::rows(vec![0]))
            .unwrap();
        assert_eq!(outcomes.len(), 1);
        assert!(a.targets("highlight").is_empty());
        assert!(b.targets("highlight").is_empty());
    }

    #[test]
    fn test_removed_unit_leaves_group() {
        let group = PropagationGroup::new("dashboard");
        let a = engine("canvas-a", cars());
        let b = engine("canvas-b", origins());
        a.join(&group);
        b.join(&group);
        assert_eq!(group.len(), 2);

        b.remove();
        assert_eq!(group.len(), 1);
        assert!(b.with_side_effect("tooltip", |effect: &RecordingEffect| effect.removed).unwrap());

        let outcome = a
            .dispatch("highlight", BehaviourEvent::rows(vec![0]).propagating())
            .unwrap();
        assert!(outcome.propagated_to.is_empty());
    }

    #[test]
    fn test_dropped_units_are_pruned() {
        let group = PropagationGroup::new("dashboard");
        let a = engine("canvas-a", cars());
        {
            let b = engine("canvas-b", origins());
            b.join(&group);
        }
        a.join(&group);
        assert_eq!(group.members().len(), 1);
    }

    /// Tries to dispatch on its own unit from inside `apply`
    struct Reenter {
        engine: Arc<Mutex<Weak<PropagationEngine>>>,
        rejected: Arc<Mutex<Option<bool>>>,
    }

    impl SideEffect for Reenter {
        fn kind(&self) -> SideEffectKind {
            SideEffectKind::Highlighter
        }

        fn apply(&mut self, _selection: &SelectionSet, _payload: &Payload, _ctx: &ApplyContext<'_>) {
            if let Some(engine) = self.engine.lock().upgrade() {
                let result = engine.dispatch("highlight", BehaviourEvent::clear());
                *self.rejected.lock() = Some(matches!(result, Err(InteractionError::Reentrant(_))));
            }
        }

        fn hide(&mut self, _payload: &Payload) {}

        fn remove(&mut self) {}

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn test_reentrant_dispatch_is_rejected() {
        let handle = Arc::new(Mutex::new(Weak::new()));
        let rejected = Arc::new(Mutex::new(None));
        let mut registry = SideEffectRegistry::new();
        registry
            .register(Box::new(Reenter {
                engine: handle.clone(),
                rejected: rejected.clone(),
            }))
            .unwrap();

        let context = UnitContext::new("a", cars(), DrawingContext::default(), Arc::new(StaticGeometry::new()));
        let mut config = InteractionConfig::default();
        config.behaviours.clear();
        config
            .behaviours
            .insert("highlight".into(), vec![SideEffectEntry::named("highlighter")]);
        let unit = PropagationEngine::with_config(context, registry, config).unwrap();
        *handle.lock() = Arc::downgrade(&unit);

        unit.dispatch("highlight", BehaviourEvent::rows(vec![0])).unwrap();
        assert_eq!(*rejected.lock(), Some(true));
        assert_eq!(unit.targets("highlight"), vec![0]);
    }
}
