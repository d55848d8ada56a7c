//! Render adapter boundary
//!
//! Everything a drawing backend needs to paint the wheel, computed without
//! touching any graphics API: one `WedgePaint` per segment plus the global
//! `WheelStyle`.

use crate::common::traits::ExclusionRule;
use crate::config::PresentationConfig;
use crate::wheel::segments::segments;
use serde::{Deserialize, Serialize};

pub use crate::wheel::segments::pointer_segment;

/// Segment fills, cycled by index
pub const PALETTE: [&str; 4] = [
    "#3B82F6", // blue
    "#22C55E", // green
    "#EF4444", // red
    "#F59E0B", // orange
];

/// Fill for entries the active filter excludes
pub const EXCLUDED_FILL: &str = "#808080";

pub const LABEL_COLOR: &str = "#FFFFFF";
pub const BORDER_COLOR: &str = "#000000";

/// Labels sit this far out along the wedge's mid-line, as a fraction of the radius
pub const LABEL_RADIUS_RATIO: f64 = 0.85;

/// Label size shrinks by half a point per entry beyond ten, never below `min`
pub fn label_font_size(segment_count: usize, base: f64, min: f64) -> f64 {
    let shrink = (segment_count as f64 - 10.0) * 0.5;
    (base - shrink).max(min)
}

pub fn fill_for(index: usize, excluded: bool) -> &'static str {
    if excluded {
        EXCLUDED_FILL
    } else {
        PALETTE[index % PALETTE.len()]
    }
}

/// Wheel-wide drawing options
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WheelStyle {
    /// Zero when borders are off
    pub border_thickness: f64,
    pub show_shadow: bool,
    /// Hub radius over wheel radius
    pub hub_radius_ratio: f64,
    pub arrow_offset: i32,
    pub base_font_size: f64,
    pub min_font_size: f64,
}

impl WheelStyle {
    pub fn from_config(config: &PresentationConfig) -> Self {
        Self {
            border_thickness: if config.show_border {
                config.border_thickness
            } else {
                0.0
            },
            show_shadow: config.show_shadow,
            hub_radius_ratio: f64::from(config.center_size_percent) / 100.0,
            arrow_offset: config.arrow_offset,
            base_font_size: config.base_font_size,
            min_font_size: config.min_font_size,
        }
    }

    pub fn has_border(&self) -> bool {
        self.border_thickness > 0.0
    }
}

impl Default for WheelStyle {
    fn default() -> Self {
        Self::from_config(&PresentationConfig::default())
    }
}

/// Paint instructions for one wedge, angles in degrees
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WedgePaint {
    pub index: usize,
    pub label: String,
    pub start_angle: f64,
    pub end_angle: f64,
    pub mid_angle: f64,
    pub fill: String,
    pub excluded: bool,
    pub font_size: f64,
}

/// Build the paint plan for `entries` at rest
pub fn paint_plan<S, R>(entries: &[S], rule: &R, style: &WheelStyle) -> Vec<WedgePaint>
where
    S: AsRef<str>,
    R: ExclusionRule + ?Sized,
{
    let font_size = label_font_size(entries.len(), style.base_font_size, style.min_font_size);

    segments(entries)
        .into_iter()
        .map(|segment| {
            let excluded = rule.is_excluded(&segment.label);
            WedgePaint {
                index: segment.index,
                mid_angle: segment.mid_angle(),
                start_angle: segment.start_angle,
                end_angle: segment.end_angle,
                fill: fill_for(segment.index, excluded).to_string(),
                excluded,
                font_size,
                label: segment.label,
            }
        })
        .collect()
}
