//! Millimetre ↔ pixel conversion.
//!
//! The designer canvas, the stored `page_width`/`page_height` and every
//! component position use CSS pixels at 96 DPI. Page layout in memory is in
//! millimetres. Nothing here rounds; callers round for display or storage.

/// CSS pixels per millimetre (96 px per inch, 25.4 mm per inch).
pub const PX_PER_MM: f64 = 96.0 / 25.4;

/// Convert millimetres to pixels.
#[inline]
pub fn mm_to_px(mm: f64) -> f64 {
    mm * PX_PER_MM
}

/// Convert pixels to millimetres.
#[inline]
pub fn px_to_mm(px: f64) -> f64 {
    px / PX_PER_MM
}
