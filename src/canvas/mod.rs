//! Canvas interaction engine.
//!
//! - [`geometry`]: pointer position → printable-area coordinates
//! - [`interaction`]: drag-and-drop state machine, selection and nudging

pub mod geometry;
pub mod interaction;

pub use geometry::{printable_offset, CanvasOrigin, PointerPosition};
pub use interaction::{
    handle_event, ArrowKey, CanvasAction, CanvasEvent, DragSession, DragSource, NUDGE_STEP,
    NUDGE_STEP_LARGE,
};
