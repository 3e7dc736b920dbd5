//! Side effect configuration

use serde::{Deserialize, Serialize};

/// Configuration of every built-in side effect
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    pub tooltip: TooltipConfig,
    pub anchors: AnchorConfig,
}

impl EffectsConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// One tooltip for all targeted rows, or one per row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TooltipMode {
    #[default]
    Consolidated,
    Fragmented,
}

/// Tooltip configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TooltipConfig {
    /// Gap between packed tooltips and from the pointer
    pub padding: f64,
    pub mode: TooltipMode,
    /// Width of one rendered character
    pub char_width: f64,
    /// Height of one rendered line
    pub line_height: f64,
    /// Inner padding of a tooltip box
    pub content_padding: f64,
    /// Distance between a tooltip and the box it is anchored to
    pub offset: f64,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            padding: 5.0,
            mode: TooltipMode::Consolidated,
            char_width: 7.0,
            line_height: 16.0,
            content_padding: 6.0,
            offset: 8.0,
        }
    }
}

/// Anchor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnchorConfig {
    pub class_name: String,
    /// Area of one anchor point
    pub point_area: f64,
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self {
            class_name: "lv-anchors-group".to_string(),
            point_area: 100.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EffectsConfig::default();
        assert_eq!(config.tooltip.padding, 5.0);
        assert_eq!(config.tooltip.mode, TooltipMode::Consolidated);
        assert_eq!(config.anchors.point_area, 100.0);
    }

    #[test]
    fn test_partial_json() {
        let config = EffectsConfig::from_json(r#"{"tooltip": {"mode": "fragmented", "padding": 3}}"#).unwrap();
        assert_eq!(config.tooltip.mode, TooltipMode::Fragmented);
        assert_eq!(config.tooltip.padding, 3.0);
        assert_eq!(config.tooltip.line_height, 16.0);
    }
}
