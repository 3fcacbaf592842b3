use serde::{Deserialize, Serialize};

use crate::core::Viewport;
use crate::error::{ChartError, ChartResult};

/// Per-painter presentation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PainterConfig {
    /// Label prefixed to the selection header, e.g. `"SMA(20)"`. Blank means none.
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_show_header")]
    pub show_header: bool,
}

impl Default for PainterConfig {
    fn default() -> Self {
        Self {
            description: String::new(),
            show_header: default_show_header(),
        }
    }
}

impl PainterConfig {
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_show_header(mut self, show_header: bool) -> Self {
        self.show_header = show_header;
        self
    }

    /// Description with surrounding whitespace removed; empty when blank.
    #[must_use]
    pub fn label(&self) -> &str {
        self.description.trim()
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidConfig(format!("failed to parse painter config: {e}")))
    }
}

/// Geometry settings of the drawing context painters render into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartViewConfig {
    pub viewport: Viewport,
    /// Share of each index slot covered by a bar, in `(0, 1]`.
    #[serde(default = "default_bar_width_ratio")]
    pub bar_width_ratio: f64,
    /// Extra price range added above and below the fitted extremes.
    #[serde(default = "default_price_padding_ratio")]
    pub price_padding_ratio: f64,
    #[serde(default = "default_header_font_size_px")]
    pub header_font_size_px: f64,
}

impl ChartViewConfig {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            bar_width_ratio: default_bar_width_ratio(),
            price_padding_ratio: default_price_padding_ratio(),
            header_font_size_px: default_header_font_size_px(),
        }
    }

    #[must_use]
    pub fn with_bar_width_ratio(mut self, bar_width_ratio: f64) -> Self {
        self.bar_width_ratio = bar_width_ratio;
        self
    }

    #[must_use]
    pub fn with_price_padding_ratio(mut self, price_padding_ratio: f64) -> Self {
        self.price_padding_ratio = price_padding_ratio;
        self
    }

    pub fn validate(self) -> ChartResult<Self> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }
        if !self.bar_width_ratio.is_finite()
            || self.bar_width_ratio <= 0.0
            || self.bar_width_ratio > 1.0
        {
            return Err(ChartError::InvalidConfig(
                "bar width ratio must be in (0, 1]".to_owned(),
            ));
        }
        if !self.price_padding_ratio.is_finite() || self.price_padding_ratio < 0.0 {
            return Err(ChartError::InvalidConfig(
                "price padding ratio must be finite and >= 0".to_owned(),
            ));
        }
        if !self.header_font_size_px.is_finite() || self.header_font_size_px <= 0.0 {
            return Err(ChartError::InvalidConfig(
                "header font size must be finite and > 0".to_owned(),
            ));
        }
        Ok(self)
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidConfig(format!("failed to parse chart view config: {e}"))
        })?;
        config.validate()
    }
}

fn default_show_header() -> bool {
    true
}

fn default_bar_width_ratio() -> f64 {
    0.8
}

fn default_price_padding_ratio() -> f64 {
    0.05
}

fn default_header_font_size_px() -> f64 {
    12.0
}
