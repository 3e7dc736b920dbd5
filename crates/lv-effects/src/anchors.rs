//! Anchor points drawn over the marks of targeted rows

use std::any::Any;

use lv_core::{
    ApplyContext, DrawingContext, Encoding, Payload, Point, RowId, SelectionSet, SideEffect,
    SideEffectKind, UnitContext,
};

use crate::config::AnchorConfig;
use crate::spawnable::{Overlay, OverlayArena};

/// A point drawn on top of one row's mark
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorPoint {
    pub row: RowId,
    pub center: Point,
    pub area: f64,
}

/// Point layer mirroring one data layer of the unit
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorLayer {
    pub name: String,
    pub mark: String,
    pub class_name: String,
    pub encoding: Encoding,
    pub area: f64,
    pub points: Vec<AnchorPoint>,
}

impl Overlay for AnchorLayer {
    fn clear_content(&mut self, _action: &str) {
        self.points.clear();
    }

    fn has_content(&self) -> bool {
        !self.points.is_empty()
    }
}

/// Anchors side effect; one anchor layer per data layer that asks for them
pub struct AnchorsEffect {
    drawing: DrawingContext,
    templates: Vec<(usize, AnchorLayer)>,
    layers: OverlayArena<usize, AnchorLayer>,
}

impl AnchorsEffect {
    /// Create the effect and spawn its anchor layers.
    ///
    /// Layers depend only on the unit's layer configuration, so they are
    /// built once here rather than on every apply.
    pub fn new(unit: &UnitContext, config: AnchorConfig) -> Self {
        let templates: Vec<(usize, AnchorLayer)> = unit
            .layers
            .iter()
            .enumerate()
            .filter(|(_, layer)| layer.draws_anchors)
            .map(|(idx, layer)| {
                let anchor = AnchorLayer {
                    name: format!("{}-{}-{}", layer.alias, SideEffectKind::Anchors.formal_name(), idx),
                    mark: "point".to_string(),
                    class_name: config.class_name.clone(),
                    encoding: Encoding {
                        size: None,
                        ..layer.encoding.clone()
                    },
                    area: config.point_area,
                    points: Vec::new(),
                };
                (idx, anchor)
            })
            .collect();

        let mut effect = Self {
            drawing: unit.drawing.clone(),
            templates,
            layers: OverlayArena::new(),
        };
        effect.spawn_layers();
        effect
    }

    fn spawn_layers(&mut self) {
        for (idx, template) in &self.templates {
            self.layers.spawn_or_get(*idx, || template.clone());
        }
    }

    pub fn layers(&self) -> &OverlayArena<usize, AnchorLayer> {
        &self.layers
    }

    /// Container the anchor layers are mounted in
    pub fn container(&self) -> &str {
        &self.drawing.svg_container
    }
}

impl SideEffect for AnchorsEffect {
    fn kind(&self) -> SideEffectKind {
        SideEffectKind::Anchors
    }

    fn apply(&mut self, selection: &SelectionSet, payload: &Payload, ctx: &ApplyContext<'_>) {
        if payload.criteria.is_clear() || selection.merged_enter.model.is_none() {
            self.hide(payload);
            return;
        }
        if selection.merged_enter.is_empty() {
            return;
        }

        let geometry = &ctx.unit.geometry;
        let centers: Vec<(RowId, Point)> = selection
            .merged_enter
            .uids
            .iter()
            .filter_map(|&row| geometry.plot_points(&[row]).first().map(|bbox| (row, bbox.center())))
            .collect();

        self.spawn_layers();
        for (idx, _) in &self.templates {
            if let Some(layer) = self.layers.get_mut(idx) {
                let area = layer.area;
                layer.points = centers
                    .iter()
                    .map(|&(row, center)| AnchorPoint { row, center, area })
                    .collect();
            }
            self.layers.mark_applied(idx);
        }
    }

    fn hide(&mut self, payload: &Payload) {
        self.layers.hide_all(&payload.action);
    }

    fn remove(&mut self) {
        self.layers.remove_all();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
