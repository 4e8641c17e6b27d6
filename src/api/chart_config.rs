use serde::{Deserialize, Serialize};

use crate::core::DEFAULT_MAX_TICKS;
use crate::error::{ChartError, ChartResult};

/// Pixel metrics shared by the axis decorations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisStyle {
    #[serde(default = "default_line_thickness")]
    pub line_thickness: f64,
    #[serde(default = "default_axis_margin")]
    pub margin: f64,
    /// Label band width reserved by vertical axes.
    #[serde(default = "default_min_width")]
    pub min_width: f64,
    /// Label band height reserved by horizontal axes.
    #[serde(default = "default_min_height")]
    pub min_height: f64,
}

impl Default for AxisStyle {
    fn default() -> Self {
        Self {
            line_thickness: default_line_thickness(),
            margin: default_axis_margin(),
            min_width: default_min_width(),
            min_height: default_min_height(),
        }
    }
}

impl AxisStyle {
    /// Total extent an axis decoration claims perpendicular to its side.
    #[must_use]
    pub fn vertical_claim(self) -> f64 {
        self.margin + self.line_thickness + self.min_width
    }

    #[must_use]
    pub fn horizontal_claim(self) -> f64 {
        self.margin + self.line_thickness + self.min_height
    }

    pub fn validate(self) -> ChartResult<Self> {
        for (field, value) in [
            ("line_thickness", self.line_thickness),
            ("margin", self.margin),
            ("min_width", self.min_width),
            ("min_height", self.min_height),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidConfig(format!(
                    "axis style `{field}` must be finite and >= 0"
                )));
            }
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelStyle {
    #[serde(default = "default_font_size_px")]
    pub font_size_px: f64,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            font_size_px: default_font_size_px(),
        }
    }
}

impl LabelStyle {
    pub fn validate(self) -> ChartResult<Self> {
        if !self.font_size_px.is_finite() || self.font_size_px <= 0.0 {
            return Err(ChartError::InvalidConfig(
                "label font size must be finite and > 0".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// Chart-wide defaults.
///
/// Serializable so hosts can keep chart setup next to their own settings;
/// missing fields fall back to the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(default = "default_max_ticks")]
    pub max_ticks: usize,
    #[serde(default)]
    pub axis_style: AxisStyle,
    #[serde(default)]
    pub label_style: LabelStyle,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            max_ticks: default_max_ticks(),
            axis_style: AxisStyle::default(),
            label_style: LabelStyle::default(),
        }
    }
}

impl ChartConfig {
    #[must_use]
    pub fn with_max_ticks(mut self, max_ticks: usize) -> Self {
        self.max_ticks = max_ticks;
        self
    }

    #[must_use]
    pub fn with_axis_style(mut self, axis_style: AxisStyle) -> Self {
        self.axis_style = axis_style;
        self
    }

    #[must_use]
    pub fn with_label_style(mut self, label_style: LabelStyle) -> Self {
        self.label_style = label_style;
        self
    }

    pub fn validate(self) -> ChartResult<Self> {
        if self.max_ticks == 0 {
            return Err(ChartError::InvalidConfig(
                "max_ticks must be >= 1".to_owned(),
            ));
        }
        self.axis_style.validate()?;
        self.label_style.validate()?;
        Ok(self)
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidConfig(format!("failed to parse chart config: {e}"))
        })?;
        config.validate()
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ChartError::InvalidConfig(format!("failed to serialize chart config: {e}"))
        })
    }
}

fn default_max_ticks() -> usize {
    DEFAULT_MAX_TICKS
}

fn default_line_thickness() -> f64 {
    2.0
}

fn default_axis_margin() -> f64 {
    2.0
}

fn default_min_width() -> f64 {
    32.0
}

fn default_min_height() -> f64 {
    24.0
}

fn default_font_size_px() -> f64 {
    10.0
}
