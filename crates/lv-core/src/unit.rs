//! Everything a side effect may know about the unit it runs on

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::data::{DataModel, FieldType};
use crate::geometry::PlotGeometry;

/// Unique identifier for a visual unit
pub type UnitId = uuid::Uuid;

/// Drawing surface handed out by the rendering layer
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DrawingContext {
    pub width: f64,
    pub height: f64,
    pub html_container: String,
    pub svg_container: String,
}

/// Fields encoded on the unit's axes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AxisFields {
    pub x: Vec<String>,
    pub y: Vec<String>,
}

/// Encoding of a data layer
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Encoding {
    pub x: Option<String>,
    pub y: Option<String>,
    pub color: Option<String>,
    pub size: Option<String>,
}

/// A data layer drawn inside the unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerInfo {
    pub alias: String,
    pub mark: String,
    #[serde(default)]
    pub encoding: Encoding,
    /// Whether this layer opts into anchor annotations
    #[serde(default)]
    pub draws_anchors: bool,
}

/// Context of a single visual unit
#[derive(Clone)]
pub struct UnitContext {
    pub id: UnitId,
    /// Alias of the canvas the unit belongs to
    pub alias: String,
    pub data: Arc<dyn DataModel>,
    pub drawing: DrawingContext,
    pub fields: AxisFields,
    pub layers: Vec<LayerInfo>,
    pub geometry: Arc<dyn PlotGeometry>,
}

impl UnitContext {
    pub fn new(
        alias: impl Into<String>,
        data: Arc<dyn DataModel>,
        drawing: DrawingContext,
        geometry: Arc<dyn PlotGeometry>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            alias: alias.into(),
            data,
            drawing,
            fields: AxisFields::default(),
            layers: Vec::new(),
            geometry,
        }
    }

    pub fn with_fields(mut self, fields: AxisFields) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_layers(mut self, layers: Vec<LayerInfo>) -> Self {
        self.layers = layers;
        self
    }

    /// Whether the first x-axis field is a dimension of the unit's data
    pub fn x_is_dimension(&self) -> bool {
        self.fields
            .x
            .first()
            .and_then(|field| self.data.field_type(field))
            .map(|ty| ty == FieldType::Dimension)
            .unwrap_or(false)
    }
}

impl fmt::Debug for UnitContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnitContext")
            .field("id", &self.id)
            .field("alias", &self.alias)
            .field("drawing", &self.drawing)
            .field("fields", &self.fields)
            .field("layers", &self.layers)
            .finish()
    }
}
