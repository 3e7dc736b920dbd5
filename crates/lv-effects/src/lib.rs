//! Side effects for linked visual units
//!
//! Tooltips and anchors are spawnable: they own overlay elements tracked in an
//! [`OverlayArena`]. The highlighter and the filter only keep row state.

pub mod anchors;
pub mod config;
pub mod filter;
pub mod highlighter;
pub mod packing;
pub mod spawnable;
pub mod tooltip;

pub use anchors::{AnchorLayer, AnchorPoint, AnchorsEffect};
pub use config::{AnchorConfig, EffectsConfig, TooltipConfig, TooltipMode};
pub use filter::FilterEffect;
pub use highlighter::HighlighterEffect;
pub use packing::{BoxPacker, PackAxis};
pub use spawnable::{LifecyclePhase, Overlay, OverlayArena};
pub use tooltip::{TooltipEffect, TooltipKey, TooltipOverlay};

use lv_core::{InteractionError, SideEffectRegistry, UnitContext};

/// Registry holding one instance of every built-in side effect for a unit,
/// in the order tooltip, anchors, highlighter, filter
pub fn default_registry(
    unit: &UnitContext,
    config: &EffectsConfig,
) -> Result<SideEffectRegistry, InteractionError> {
    let mut registry = SideEffectRegistry::new();
    registry.register(Box::new(TooltipEffect::new(unit, config.tooltip.clone())))?;
    registry.register(Box::new(AnchorsEffect::new(unit, config.anchors.clone())))?;
    registry.register(Box::new(HighlighterEffect::new()))?;
    registry.register(Box::new(FilterEffect::new()))?;
    tracing::debug!("Built default side effects for unit '{}'", unit.alias);
    Ok(registry)
}
