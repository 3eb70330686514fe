//! Page layout data model.
//!
//! [`PageLayout`] is always held in millimetres in memory. The stored record
//! uses a different unit mix; see [`crate::persistence::adapter`].

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::units::mm_to_px;

/// One side of a four-sided box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

/// Per-side spacing box, used for page margins (mm) and component margins (px).
///
/// Missing sides deserialize as `0.0` so partially written records load.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Spacing {
    #[serde(default)]
    pub top: f64,
    #[serde(default)]
    pub right: f64,
    #[serde(default)]
    pub bottom: f64,
    #[serde(default)]
    pub left: f64,
}

impl Spacing {
    pub const ZERO: Spacing = Spacing::uniform(0.0);

    pub const fn uniform(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    pub fn get(&self, side: Side) -> f64 {
        match side {
            Side::Top => self.top,
            Side::Right => self.right,
            Side::Bottom => self.bottom,
            Side::Left => self.left,
        }
    }

    /// Return a copy with one side replaced.
    pub fn with(mut self, side: Side, value: f64) -> Self {
        match side {
            Side::Top => self.top = value,
            Side::Right => self.right = value,
            Side::Bottom => self.bottom = value,
            Side::Left => self.left = value,
        }
        self
    }

    /// Reject negative or non-finite sides. `what` names the box in the error.
    pub fn validate(&self, what: &str) -> Result<(), AppError> {
        for (name, v) in [
            ("top", self.top),
            ("right", self.right),
            ("bottom", self.bottom),
            ("left", self.left),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(AppError::InvalidInput(format!(
                    "{what} {name} must be a non-negative number, got {v}"
                )));
            }
        }
        Ok(())
    }
}

/// Unit of the in-memory page layout. Only millimetres are supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageUnit {
    #[default]
    Mm,
}

/// Page size and margins, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub unit: PageUnit,
    #[serde(default)]
    pub margin: Spacing,
}

impl Default for PageLayout {
    /// The default preset (A4).
    fn default() -> Self {
        crate::presets::DEFAULT_PRESET.layout()
    }
}

impl PageLayout {
    /// Width of the area inside the left and right margins, in mm.
    pub fn printable_width(&self) -> f64 {
        self.width - self.margin.left - self.margin.right
    }

    /// Height of the area inside the top and bottom margins, in mm.
    pub fn printable_height(&self) -> f64 {
        self.height - self.margin.top - self.margin.bottom
    }

    /// Whether the printable area has a positive size in both directions.
    ///
    /// This is reported, not enforced: an unusable layout is still accepted.
    pub fn is_usable(&self) -> bool {
        self.printable_width() > 0.0 && self.printable_height() > 0.0
    }

    /// Offset of the printable-area origin from the page corner, in pixels.
    pub fn printable_origin_px(&self) -> (f64, f64) {
        (mm_to_px(self.margin.left), mm_to_px(self.margin.top))
    }

    /// Reject non-finite or negative dimensions and margins.
    pub fn validate(&self) -> Result<(), AppError> {
        for (name, v) in [("width", self.width), ("height", self.height)] {
            if !v.is_finite() || v < 0.0 {
                return Err(AppError::InvalidInput(format!(
                    "page {name} must be a non-negative number, got {v}"
                )));
            }
        }
        self.margin.validate("page margin")
    }
}
