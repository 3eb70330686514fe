//! Editor-level commands: new template, snapshot and preview payload.

use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::{CanvasComponent, ComponentId, PageLayout, Template, TemplateId};
use crate::presets::active_preset;
use crate::state::EditorState;

use super::{read_editor, write_editor};

/// Serializable view of the editor for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorSnapshot {
    pub template_id: Option<TemplateId>,
    pub name: String,
    pub layout: PageLayout,
    pub components: Vec<CanvasComponent>,
    pub selection: Option<ComponentId>,
    pub focus: Option<ComponentId>,
    /// Preset name derived from the page size, or `"Custom"`.
    pub active_preset: &'static str,
    pub shows_custom_fields: bool,
    /// Printable width and height in mm; may be zero or negative.
    pub printable_width: f64,
    pub printable_height: f64,
}

impl From<&EditorState> for EditorSnapshot {
    fn from(editor: &EditorState) -> Self {
        let template = editor.template();
        Self {
            template_id: template.id.clone(),
            name: template.name.clone(),
            layout: template.layout,
            components: template.components.clone(),
            selection: editor.selection().cloned(),
            focus: editor.focus().cloned(),
            active_preset: active_preset(&template.layout).name(),
            shows_custom_fields: editor.shows_custom_fields(),
            printable_width: template.layout.printable_width(),
            printable_height: template.layout.printable_height(),
        }
    }
}

/// Input of the preview renderer: layout, components and a zoom factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewDocument {
    pub layout: PageLayout,
    pub components: Vec<CanvasComponent>,
    pub zoom: f64,
}

impl PreviewDocument {
    pub fn new(template: &Template, zoom: f64) -> Result<Self, AppError> {
        if !zoom.is_finite() || zoom <= 0.0 {
            return Err(AppError::InvalidInput(format!(
                "zoom must be a positive number, got {zoom}"
            )));
        }
        Ok(Self {
            layout: template.layout,
            components: template.components.clone(),
            zoom,
        })
    }
}

/// Replace the editor with a fresh template on the default preset.
pub fn new_template_inner(editor_lock: &RwLock<EditorState>) -> Result<EditorSnapshot, AppError> {
    let mut editor = write_editor(editor_lock)?;
    *editor = EditorState::new();
    tracing::info!("new template started");
    Ok(EditorSnapshot::from(&*editor))
}

pub fn get_editor_snapshot_inner(
    editor_lock: &RwLock<EditorState>,
) -> Result<EditorSnapshot, AppError> {
    let editor = read_editor(editor_lock)?;
    Ok(EditorSnapshot::from(&*editor))
}

/// Preview payload for the template being edited.
pub fn preview_document_inner(
    editor_lock: &RwLock<EditorState>,
    zoom: f64,
) -> Result<PreviewDocument, AppError> {
    let editor = read_editor(editor_lock)?;
    PreviewDocument::new(editor.template(), zoom)
}

/// Parse an editor-shape template (`{ name, layout, components }`) from JSON.
///
/// The layout is validated the same way the editor validates it, and
/// components must have non-negative positions and distinct ids.
pub fn template_from_json(json: &str) -> Result<Template, AppError> {
    let template: Template = serde_json::from_str(json)
        .map_err(|e| AppError::InvalidInput(format!("cannot parse template: {e}")))?;
    template.layout.validate()?;
    template.validate_components()?;
    Ok(template)
}
