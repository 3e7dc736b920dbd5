use super::action_on_source;
use crate::payload::Payload;
use crate::propagation::PropagationInfo;
use crate::side_effect::{EffectBinding, SideEffectRegistry};
use crate::unit::UnitContext;

/// Filters which configured side effects run on a unit for one dispatch
pub struct ApplicabilityResolver;

impl ApplicabilityResolver {
    /// Return `configured` with every binding's effects filtered.
    ///
    /// An explicit `payload.side_effects` list replaces the configuration for
    /// this dispatch only, bound to `payload.action`. Each effect is then
    /// checked by the first matching rule:
    /// 1. on a unit other than the source, with non-clearing criteria, the
    ///    predicate registered under the effect name decides (allow if none);
    /// 2. when the propagation came from this unit's own canvas, the effect
    ///    runs unless it opts out of applying on source;
    /// 3. otherwise the effect runs.
    pub fn resolve(
        registry: &SideEffectRegistry,
        configured: &[EffectBinding],
        payload: &Payload,
        propagation: &PropagationInfo,
        unit: &UnitContext,
    ) -> Vec<EffectBinding> {
        let source = &propagation.prop_payload;
        let on_source = action_on_source(source.source_unit, unit.id);

        let mut bindings = match &payload.side_effects {
            Some(effects) => vec![EffectBinding {
                behaviours: vec![payload.action.clone()],
                effects: effects.clone(),
            }],
            None => configured.to_vec(),
        };

        for binding in &mut bindings {
            binding.effects.retain(|entry| {
                if !on_source && !payload.criteria.is_clear() {
                    return registry
                        .predicate(&entry.name)
                        .map_or(true, |predicate| predicate(source, propagation, unit));
                }
                if source.source_canvas.as_deref() == Some(unit.alias.as_str()) {
                    return entry.applies_on_source(registry.capabilities(&entry.name));
                }
                true
            });
        }

        bindings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::StaticGeometry;
    use crate::payload::Criteria;
    use crate::side_effect::{SideEffectEntry, SideEffectKind};
    use crate::testing::{cars, RecordingEffect};
    use crate::unit::{DrawingContext, UnitId};
    use std::sync::Arc;

    fn unit(alias: &str) -> UnitContext {
        UnitContext::new(alias, cars(), DrawingContext::default(), Arc::new(StaticGeometry::new()))
    }

    fn registry() -> SideEffectRegistry {
        let mut registry = SideEffectRegistry::new();
        registry
            .register(Box::new(RecordingEffect::new("tooltip", SideEffectKind::Tooltip)))
            .unwrap();
        registry
            .register(Box::new(RecordingEffect::new("highlighter", SideEffectKind::Highlighter)))
            .unwrap();
        registry
    }

    fn binding() -> Vec<EffectBinding> {
        vec![EffectBinding {
            behaviours: vec!["highlight".into()],
            effects: vec![
                SideEffectEntry::named("tooltip").with_apply_on_source(false),
                SideEffectEntry::named("highlighter"),
            ],
        }]
    }

    fn propagation(source: UnitId, canvas: &str, criteria: Criteria) -> (Payload, PropagationInfo) {
        let mut payload = Payload::new("highlight", criteria);
        payload.source_unit = Some(source);
        payload.source_canvas = Some(canvas.to_string());
        let info = PropagationInfo::new(payload.clone(), source);
        (payload, info)
    }

    fn names(bindings: &[EffectBinding]) -> Vec<&str> {
        bindings[0].effects.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_other_unit_without_predicate_allows_everything() {
        let unit = unit("canvas-b");
        let (payload, info) = propagation(UnitId::new_v4(), "canvas-a", Criteria::Rows(vec![0]));

        let out = ApplicabilityResolver::resolve(&registry(), &binding(), &payload, &info, &unit);
        assert_eq!(names(&out), vec!["tooltip", "highlighter"]);
    }

    #[test]
    fn test_other_unit_consults_predicate() {
        let unit = unit("canvas-b");
        let mut registry = registry();
        registry.register_predicate(
            "tooltip",
            Arc::new(|_: &Payload, info: &PropagationInfo, _: &UnitContext| info.is_source_field_present),
        );
        let (payload, mut info) = propagation(UnitId::new_v4(), "canvas-a", Criteria::Rows(vec![0]));
        info.is_source_field_present = false;

        let out = ApplicabilityResolver::resolve(&registry, &binding(), &payload, &info, &unit);
        assert_eq!(names(&out), vec!["highlighter"]);
    }

    #[test]
    fn test_same_canvas_respects_apply_on_source() {
        let unit = unit("canvas-a");
        let (payload, info) = propagation(unit.id, "canvas-a", Criteria::Rows(vec![0]));

        let out = ApplicabilityResolver::resolve(&registry(), &binding(), &payload, &info, &unit);
        assert_eq!(names(&out), vec!["highlighter"]);
    }

    #[test]
    fn test_clearing_on_other_unit_skips_predicates() {
        let unit = unit("canvas-b");
        let mut registry = registry();
        registry.register_predicate(
            "tooltip",
            Arc::new(|_: &Payload, _: &PropagationInfo, _: &UnitContext| false),
        );
        let (payload, info) = propagation(UnitId::new_v4(), "canvas-a", Criteria::Clear);

        let out = ApplicabilityResolver::resolve(&registry, &binding(), &payload, &info, &unit);
        assert_eq!(names(&out), vec!["tooltip", "highlighter"]);
    }

    #[test]
    fn test_payload_override_replaces_configuration() {
        let unit = unit("canvas-a");
        let (mut payload, info) = propagation(UnitId::new_v4(), "elsewhere", Criteria::Clear);
        payload.side_effects = Some(vec![SideEffectEntry::named("tooltip")]);

        let out = ApplicabilityResolver::resolve(&registry(), &binding(), &payload, &info, &unit);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].behaviours, vec!["highlight".to_string()]);
        assert_eq!(names(&out), vec!["tooltip"]);
    }
}
