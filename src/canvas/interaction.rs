//! Canvas gesture handling.
//!
//! Pointer and keyboard callbacks from whatever surface renders the page are
//! translated into [`CanvasEvent`]s and fed to [`handle_event`], which mutates
//! the [`EditorState`] and reports what changed as a [`CanvasAction`].
//!
//! Drag-and-drop is a small state machine held in the editor:
//!
//! ```text
//! Idle ──PaletteDragStart(kind)──▶ Dragging(Palette)  ──Drop──▶ Idle (+ component added)
//! Idle ──ComponentDragStart(id)──▶ Dragging(Component) ──Drop──▶ Idle (+ component moved)
//!                                   Dragging(_)        ──DragCancel──▶ Idle
//! ```

use serde::{Deserialize, Serialize};

use super::geometry::{printable_offset, CanvasOrigin, PointerPosition};
use crate::error::AppError;
use crate::models::{CanvasComponent, ComponentId, ComponentKind};
use crate::state::EditorState;

/// Arrow-key nudge step without modifier, in pixels.
pub const NUDGE_STEP: f64 = 1.0;
/// Arrow-key nudge step with the modifier held, in pixels.
pub const NUDGE_STEP_LARGE: f64 = 10.0;

/// What is being dragged.
#[derive(Debug, Clone, PartialEq)]
pub enum DragSource {
    /// A new component of this type, dragged out of the palette.
    Palette(ComponentKind),
    /// An existing component.
    Component(ComponentId),
}

/// Drag-and-drop state.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragSession {
    #[default]
    Idle,
    Dragging(DragSource),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowKey {
    Up,
    Down,
    Left,
    Right,
}

/// Input delivered by the rendering surface.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasEvent {
    PaletteDragStart(ComponentKind),
    ComponentDragStart(ComponentId),
    Drop {
        pointer: PointerPosition,
        canvas: CanvasOrigin,
    },
    DragCancel,
    ComponentClick(ComponentId),
    ComponentFocus(ComponentId),
    ComponentBlur,
    /// Click on the page outside any component.
    CanvasClick,
    /// Arrow key pressed while a component has focus. `modifier` is Shift.
    Key { key: ArrowKey, modifier: bool },
}

/// Outcome of one event, for the host to re-render.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasAction {
    None,
    ComponentAdded(CanvasComponent),
    ComponentMoved { id: ComponentId, x: f64, y: f64 },
    SelectionChanged(ComponentId),
}

/// Apply one input event to the editor.
///
/// Errors (an unknown component id, a non-finite drop position) leave the
/// editor untouched apart from ending any drag in progress.
pub fn handle_event(
    editor: &mut EditorState,
    event: CanvasEvent,
) -> Result<CanvasAction, AppError> {
    match event {
        CanvasEvent::PaletteDragStart(kind) => {
            tracing::debug!(%kind, "palette drag started");
            editor.drag = DragSession::Dragging(DragSource::Palette(kind));
            Ok(CanvasAction::None)
        }
        CanvasEvent::ComponentDragStart(id) => {
            if editor.template().component(&id).is_none() {
                return Err(AppError::NotFound(format!("component {id} not found")));
            }
            tracing::debug!(%id, "component drag started");
            editor.drag = DragSession::Dragging(DragSource::Component(id));
            Ok(CanvasAction::None)
        }
        CanvasEvent::Drop { pointer, canvas } => drop_at(editor, pointer, canvas),
        CanvasEvent::DragCancel => {
            editor.drag = DragSession::Idle;
            Ok(CanvasAction::None)
        }
        CanvasEvent::ComponentClick(id) => {
            editor.select(&id)?;
            Ok(CanvasAction::SelectionChanged(id))
        }
        CanvasEvent::ComponentFocus(id) => {
            editor.set_focus(&id)?;
            Ok(CanvasAction::SelectionChanged(id))
        }
        CanvasEvent::ComponentBlur => {
            editor.clear_focus();
            Ok(CanvasAction::None)
        }
        // Selection persists until another component is selected or the
        // selected one is removed.
        CanvasEvent::CanvasClick => Ok(CanvasAction::None),
        CanvasEvent::Key { key, modifier } => nudge(editor, key, modifier),
    }
}

fn drop_at(
    editor: &mut EditorState,
    pointer: PointerPosition,
    canvas: CanvasOrigin,
) -> Result<CanvasAction, AppError> {
    let source = match std::mem::take(&mut editor.drag) {
        DragSession::Idle => {
            tracing::debug!("drop without an active drag ignored");
            return Ok(CanvasAction::None);
        }
        DragSession::Dragging(source) => source,
    };

    let coords = [pointer.client_x, pointer.client_y, canvas.left, canvas.top];
    if !coords.iter().all(|v| v.is_finite()) {
        return Err(AppError::InvalidInput(format!(
            "drop position is not finite: {pointer:?} on {canvas:?}"
        )));
    }

    let (x, y) = printable_offset(pointer, canvas, &editor.template().layout);
    match source {
        DragSource::Palette(kind) => {
            let component = CanvasComponent::new(kind, x, y);
            editor.add_component(component.clone())?;
            Ok(CanvasAction::ComponentAdded(component))
        }
        DragSource::Component(id) => {
            let moved = editor.move_component(&id, x, y)?;
            let (x, y) = (moved.x, moved.y);
            tracing::debug!(%id, x, y, "component moved");
            Ok(CanvasAction::ComponentMoved { id, x, y })
        }
    }
}

fn nudge(editor: &mut EditorState, key: ArrowKey, modifier: bool) -> Result<CanvasAction, AppError> {
    let Some(id) = editor.focus().cloned() else {
        return Ok(CanvasAction::None);
    };
    let component = editor
        .template()
        .component(&id)
        .ok_or_else(|| AppError::NotFound(format!("component {id} not found")))?;

    let step = if modifier { NUDGE_STEP_LARGE } else { NUDGE_STEP };
    let (mut x, mut y) = (component.x, component.y);
    match key {
        ArrowKey::Up => y -= step,
        ArrowKey::Down => y += step,
        ArrowKey::Left => x -= step,
        ArrowKey::Right => x += step,
    }

    let moved = editor.move_component(&id, x, y)?;
    let (x, y) = (moved.x, moved.y);
    Ok(CanvasAction::ComponentMoved { id, x, y })
}
