use super::action_on_source;
use crate::side_effect::{SideEffectEntry, SideEffectRegistry};
use crate::unit::UnitId;

/// Decides whether a behaviour persists selection state on a unit
pub struct MutabilityResolver;

impl MutabilityResolver {
    /// A behaviour is mutable when one of its side effects mutates. On the
    /// unit that originated the behaviour, a mutating effect that opts out
    /// of applying on source downgrades it to non-mutable for that unit only.
    pub fn resolve(
        behaviour: &str,
        entries: &[SideEffectEntry],
        registry: &SideEffectRegistry,
        source_unit: Option<UnitId>,
        unit_id: UnitId,
    ) -> bool {
        let Some(mutating) = entries.iter().find(|entry| {
            registry
                .capabilities(&entry.name)
                .map_or(false, |caps| caps.mutates)
        }) else {
            return false;
        };

        let suppressed = action_on_source(source_unit, unit_id)
            && !mutating.applies_on_source(registry.capabilities(&mutating.name));
        if suppressed {
            tracing::debug!(
                "'{}' mutates via '{}' but not on its source unit {}",
                behaviour,
                mutating.name,
                unit_id
            );
        }
        !suppressed
    }
}
