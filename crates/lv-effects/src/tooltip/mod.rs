//! Tooltip side effect
//!
//! Shows the targeted rows either in one consolidated tooltip or in one
//! tooltip per row. Fragmented tooltips are stacked with the [`BoxPacker`]
//! so they never overlap.

pub mod strategies;

use std::any::Any;
use std::sync::Arc;

use indexmap::IndexMap;
use lv_core::{
    behaviours, ApplyContext, BoundingBox, DrawingContext, Payload, Point, PropagationInfo, RowId,
    SelectionSet, SideEffect, SideEffectKind, Size, SourcePredicate, UnitContext,
};

use crate::config::{TooltipConfig, TooltipMode};
use crate::packing::{BoxPacker, PackAxis};
use crate::spawnable::{Overlay, OverlayArena};

/// Key of a tooltip overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TooltipKey {
    /// The single tooltip of consolidated mode
    Consolidated,
    /// The tooltip of one row in fragmented mode
    Row(RowId),
}

/// Where a tooltip goes relative to the box it describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Orientation {
    Beside,
    Above,
}

/// Content key of a behaviour; everything but highlight shares the brush slot
pub fn content_key(action: &str) -> &'static str {
    if action == behaviours::HIGHLIGHT {
        behaviours::HIGHLIGHT
    } else {
        behaviours::BRUSH
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Metrics {
    char_width: f64,
    line_height: f64,
    padding: f64,
}

impl Metrics {
    fn from_config(config: &TooltipConfig) -> Self {
        Self {
            char_width: config.char_width,
            line_height: config.line_height,
            padding: config.content_padding,
        }
    }
}

/// One rendered tooltip
#[derive(Debug, Clone)]
pub struct TooltipOverlay {
    container: String,
    contents: IndexMap<String, Vec<String>>,
    position: Point,
    size: Size,
    metrics: Metrics,
}

impl TooltipOverlay {
    fn new(container: &str, metrics: Metrics) -> Self {
        Self {
            container: container.to_string(),
            contents: IndexMap::new(),
            position: Point::default(),
            size: Size::default(),
            metrics,
        }
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    /// Lines shown for one content key
    pub fn content(&self, key: &str) -> Option<&[String]> {
        self.contents.get(key).map(Vec::as_slice)
    }

    /// All lines, grouped by content key in insertion order
    pub fn lines(&self) -> impl Iterator<Item = &String> {
        self.contents.values().flatten()
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::new(self.position.x, self.position.y, self.size.width, self.size.height)
    }

    fn set_content(&mut self, key: &str, lines: Vec<String>) {
        self.contents.insert(key.to_string(), lines);
        self.measure();
    }

    fn move_to(&mut self, position: Point) {
        self.position = position;
    }

    fn measure(&mut self) {
        let (count, widest) = self
            .lines()
            .fold((0usize, 0usize), |(count, widest), line| (count + 1, widest.max(line.chars().count())));

        self.size = if count == 0 {
            Size::default()
        } else {
            let Metrics { char_width, line_height, padding } = self.metrics;
            Size::new(
                widest as f64 * char_width + 2.0 * padding,
                count as f64 * line_height + 2.0 * padding,
            )
        };
    }
}

impl Overlay for TooltipOverlay {
    fn clear_content(&mut self, action: &str) {
        if self.contents.shift_remove(action).is_some() {
            self.measure();
        }
    }

    fn has_content(&self) -> bool {
        !self.contents.is_empty()
    }
}

/// Tooltip side effect of one unit
pub struct TooltipEffect {
    drawing: DrawingContext,
    config: TooltipConfig,
    tooltips: OverlayArena<TooltipKey, TooltipOverlay>,
}

impl TooltipEffect {
    /// Create a new tooltip effect drawing into the unit's containers
    pub fn new(unit: &UnitContext, config: TooltipConfig) -> Self {
        Self {
            drawing: unit.drawing.clone(),
            config,
            tooltips: OverlayArena::new(),
        }
    }

    pub fn config(&self) -> &TooltipConfig {
        &self.config
    }

    pub fn tooltips(&self) -> &OverlayArena<TooltipKey, TooltipOverlay> {
        &self.tooltips
    }

    fn extent(&self) -> Size {
        Size::new(self.drawing.width, self.drawing.height)
    }

    /// Drop the content of `action` everywhere, evicting tooltips left empty
    /// and hiding the rest
    fn clear(&mut self, action: &str) {
        let keys = self.tooltips.keys();
        let evicted = self.tooltips.retire(&keys, action);
        self.tooltips.hide_all(action);
        tracing::debug!("Cleared '{}' tooltips, evicted {}", action, evicted.len());
    }
}

impl SideEffect for TooltipEffect {
    fn kind(&self) -> SideEffectKind {
        SideEffectKind::Tooltip
    }

    /// Tooltips only follow propagations that relate to the unit's data
    fn source_predicate(&self) -> Option<SourcePredicate> {
        Some(Arc::new(|_: &Payload, propagation: &PropagationInfo, _: &UnitContext| {
            propagation.is_source_field_present
        }))
    }

    fn apply(&mut self, selection: &SelectionSet, payload: &Payload, ctx: &ApplyContext<'_>) {
        let action = content_key(&payload.action);
        let model = match &selection.merged_enter.model {
            Some(model) if !payload.criteria.is_clear() => {
                if model.is_empty() {
                    return;
                }
                model.clone()
            }
            _ => {
                self.clear(action);
                return;
            }
        };

        let unit = ctx.unit;
        let extent = self.extent();
        let pad = self.config.padding;
        let offset = self.config.offset;
        let fragmented = self.config.mode == TooltipMode::Fragmented;
        let show_vertically = unit.x_is_dimension();
        let orientation = if fragmented && !show_vertically {
            Orientation::Above
        } else {
            Orientation::Beside
        };
        let metrics = Metrics::from_config(&self.config);
        let content = strategies::strategy(ctx.options.strategy.as_deref());
        let order = ctx.options.order.as_deref();

        let uids = &selection.merged_enter.uids;
        let groups: Vec<(TooltipKey, Vec<RowId>)> = if fragmented {
            uids.iter().map(|&row| (TooltipKey::Row(row), vec![row])).collect()
        } else {
            vec![(TooltipKey::Consolidated, uids.clone())]
        };
        let anchors = if fragmented {
            Vec::new()
        } else {
            let target = payload.target.as_deref().filter(|rows| !rows.is_empty()).unwrap_or(uids.as_slice());
            unit.geometry.plot_points(target)
        };

        let mut entered = Vec::with_capacity(groups.len());
        let mut placed: Vec<(TooltipKey, BoundingBox)> = Vec::new();

        for (idx, (key, rows)) in groups.into_iter().enumerate() {
            let anchor = if fragmented {
                unit.geometry.plot_points(&rows).first().copied()
            } else {
                anchors.get(idx).copied()
            };
            entered.push(key);

            let lines = content(&*model.select(&|row| rows.contains(&row)), order);
            let container = &self.drawing.html_container;
            let tooltip = self.tooltips.spawn_or_get(key, || TooltipOverlay::new(container, metrics));
            tooltip.set_content(action, lines);
            let size = tooltip.size();

            let position = match (payload.show_in_position, payload.position, anchor) {
                (true, Some(pointer), _) => Point::new(pointer.x + pad, pointer.y + pad),
                (_, _, Some(anchor)) => place(&anchor, size, orientation, extent, offset),
                _ => {
                    // Rows after an unplaceable one are not shown either
                    self.tooltips.hide(&key);
                    tracing::debug!("No plot box for tooltip {:?}, abandoning the rest", key);
                    break;
                }
            };

            tooltip.move_to(position);
            self.tooltips.mark_applied(&key);
            if fragmented {
                placed.push((key, BoundingBox::new(position.x, position.y, size.width, size.height)));
            }
        }

        let stale = self.tooltips.reconcile(&entered).exit;
        self.tooltips.retire(&stale, action);

        if !placed.is_empty() {
            let axis = if show_vertically { PackAxis::Vertical } else { PackAxis::Horizontal };
            let boxes: Vec<BoundingBox> = placed.iter().map(|(_, bbox)| *bbox).collect();
            let packed = BoxPacker::new(pad).pack(&boxes, extent, axis);

            for (idx, (key, _)) in placed.iter().enumerate() {
                match (packed.get(idx), self.tooltips.get_mut(key)) {
                    (Some(bbox), Some(tooltip)) => tooltip.move_to(Point::new(bbox.x, bbox.y)),
                    _ => self.tooltips.hide(key),
                }
            }
        }
    }

    fn hide(&mut self, payload: &Payload) {
        self.tooltips.hide_all(content_key(&payload.action));
    }

    fn remove(&mut self) {
        self.tooltips.remove_all();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Position of a tooltip of `size` next to `anchor`, kept inside `extent`
fn place(anchor: &BoundingBox, size: Size, orientation: Orientation, extent: Size, offset: f64) -> Point {
    let center = anchor.center();
    let (x, y) = match orientation {
        Orientation::Beside => {
            let mut x = anchor.right() + offset;
            if x + size.width > extent.width {
                x = anchor.x - offset - size.width;
            }
            (x, center.y - size.height / 2.0)
        }
        Orientation::Above => {
            let mut y = anchor.y - offset - size.height;
            if y < 0.0 {
                y = anchor.bottom() + offset;
            }
            (center.x - size.width / 2.0, y)
        }
    };

    Point::new(
        x.min(extent.width - size.width).max(0.0),
        y.min(extent.height - size.height).max(0.0),
    )
}
