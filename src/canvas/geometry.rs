//! Pointer → printable-area coordinate transform.

use serde::{Deserialize, Serialize};

use crate::models::PageLayout;

/// Top-left corner of the rendered page on screen, in client pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasOrigin {
    pub left: f64,
    pub top: f64,
}

/// Pointer position in client pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerPosition {
    pub client_x: f64,
    pub client_y: f64,
}

/// Position of `pointer` relative to the printable-area origin, clamped to
/// `≥ 0` on both axes.
///
/// No clamping happens at the far edges: a component may extend past the
/// printable area.
pub fn printable_offset(
    pointer: PointerPosition,
    canvas: CanvasOrigin,
    layout: &PageLayout,
) -> (f64, f64) {
    let (margin_left, margin_top) = layout.printable_origin_px();
    let x = pointer.client_x - canvas.left - margin_left;
    let y = pointer.client_y - canvas.top - margin_top;
    (x.max(0.0), y.max(0.0))
}
