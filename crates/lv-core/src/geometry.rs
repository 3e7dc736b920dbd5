//! Bounding-box geometry shared with the rendering layer

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::data::RowId;

/// A point in unit coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width and height of a container
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned box anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Maps row identifiers to their on-screen boxes.
///
/// Implemented by the rendering layer of each unit; rows without a drawn
/// mark are simply absent from the result.
pub trait PlotGeometry: Send + Sync {
    fn plot_points(&self, rows: &[RowId]) -> Vec<BoundingBox>;
}

/// Geometry backed by a precomputed row to box table
#[derive(Debug, Clone, Default)]
pub struct StaticGeometry {
    boxes: AHashMap<RowId, BoundingBox>,
}

impl StaticGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_box(mut self, row: RowId, bbox: BoundingBox) -> Self {
        self.boxes.insert(row, bbox);
        self
    }

    pub fn insert(&mut self, row: RowId, bbox: BoundingBox) {
        self.boxes.insert(row, bbox);
    }
}

impl PlotGeometry for StaticGeometry {
    fn plot_points(&self, rows: &[RowId]) -> Vec<BoundingBox> {
        rows.iter().filter_map(|row| self.boxes.get(row).copied()).collect()
    }
}
