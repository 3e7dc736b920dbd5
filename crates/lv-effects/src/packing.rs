//! Stacking of overlay boxes along one axis

use lv_core::{BoundingBox, Size};

/// Axis along which boxes are stacked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackAxis {
    /// Stack downward, keeping each box's x
    Vertical,
    /// Stack rightward, keeping each box's y
    Horizontal,
}

impl PackAxis {
    fn extent(self, bounds: Size) -> f64 {
        match self {
            PackAxis::Vertical => bounds.height,
            PackAxis::Horizontal => bounds.width,
        }
    }

    fn length(self, bbox: &BoundingBox) -> f64 {
        match self {
            PackAxis::Vertical => bbox.height,
            PackAxis::Horizontal => bbox.width,
        }
    }

    fn offset(self, bbox: &BoundingBox) -> f64 {
        match self {
            PackAxis::Vertical => bbox.y,
            PackAxis::Horizontal => bbox.x,
        }
    }

    fn set_offset(self, bbox: &mut BoundingBox, value: f64) {
        match self {
            PackAxis::Vertical => bbox.y = value,
            PackAxis::Horizontal => bbox.x = value,
        }
    }
}

/// Lays boxes out one after another so that none overlap.
///
/// Boxes keep their input order. Each box takes its length plus the padding
/// out of the bound; the first box that does not fit and every box after it
/// are dropped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxPacker {
    padding: f64,
}

impl BoxPacker {
    pub fn new(padding: f64) -> Self {
        Self { padding }
    }

    pub fn padding(&self) -> f64 {
        self.padding
    }

    /// Number of leading boxes that fit within the bound
    pub fn capacity(&self, boxes: &[BoundingBox], bounds: Size, axis: PackAxis) -> usize {
        let bound = axis.extent(bounds);
        let mut total = 0.0;
        for (idx, bbox) in boxes.iter().enumerate() {
            total += axis.length(bbox) + self.padding;
            if total > bound {
                return idx;
            }
        }
        boxes.len()
    }

    /// Packed copies of the boxes that fit, in input order.
    ///
    /// The stack starts at the first box's anchor, pulled back toward 0 when
    /// needed so its far end stays within the bound.
    pub fn pack(&self, boxes: &[BoundingBox], bounds: Size, axis: PackAxis) -> Vec<BoundingBox> {
        let kept = self.capacity(boxes, bounds, axis);
        let Some(first) = boxes.first().filter(|_| kept > 0) else {
            return Vec::new();
        };

        if kept < boxes.len() {
            tracing::debug!("Dropping {} of {} packed boxes", boxes.len() - kept, boxes.len());
        }

        let used: f64 = boxes[..kept].iter().map(|bbox| axis.length(bbox)).sum::<f64>()
            + self.padding * (kept - 1) as f64;
        let mut cursor = axis.offset(first).min(axis.extent(bounds) - used).max(0.0);

        boxes[..kept]
            .iter()
            .map(|bbox| {
                let mut packed = *bbox;
                axis.set_offset(&mut packed, cursor);
                cursor += axis.length(bbox) + self.padding;
                packed
            })
            .collect()
    }
}

impl Default for BoxPacker {
    fn default() -> Self {
        Self::new(5.0)
    }
}
