//! Editor state.
//!
//! [`EditorState`] is the explicit editor context: the one in-memory
//! [`Template`] being designed plus the transient interaction state around it
//! (selection, keyboard focus, the drag session and the preset picker mode).
//! It is created on entry, replaced wholesale on load and discarded by
//! dropping it.
//!
//! [`AppState`] bundles the editor with the template library list and the
//! store handle for the `commands` layer.

use std::sync::{Arc, RwLock};

use crate::canvas::DragSession;
use crate::error::AppError;
use crate::library::TemplateLibrary;
use crate::models::{CanvasComponent, ComponentId, PageLayout, PropsPatch, Template};
use crate::persistence::TemplateStore;
use crate::presets::{active_preset, PresetChoice};

/// The designer's editing context.
#[derive(Debug, Default)]
pub struct EditorState {
    template: Template,
    /// At most one selected component.
    selection: Option<ComponentId>,
    /// Component holding keyboard focus; target of arrow-key nudges.
    focus: Option<ComponentId>,
    pub(crate) drag: DragSession,
    /// Custom width/height/margin fields are shown.
    custom_fields: bool,
}

impl EditorState {
    /// A fresh editor: empty template on the default preset layout.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn selection(&self) -> Option<&ComponentId> {
        self.selection.as_ref()
    }

    pub fn selected_component(&self) -> Option<&CanvasComponent> {
        self.selection
            .as_ref()
            .and_then(|id| self.template.component(id))
    }

    pub fn focus(&self) -> Option<&ComponentId> {
        self.focus.as_ref()
    }

    pub fn drag_session(&self) -> &DragSession {
        &self.drag
    }

    fn require(&self, id: &ComponentId) -> Result<usize, AppError> {
        self.template
            .position_of(id)
            .ok_or_else(|| AppError::NotFound(format!("component {id} not found")))
    }

    // ── Structural mutations ─────────────────────────────────────────────────

    /// Append `component` on top of the z-order and return its id.
    ///
    /// Rejects an id already on the canvas and a position that is negative or
    /// not finite.
    pub fn add_component(&mut self, component: CanvasComponent) -> Result<ComponentId, AppError> {
        let id = component.id.clone();
        if self.template.component(&id).is_some() {
            return Err(AppError::InvalidInput(format!("duplicate component id {id}")));
        }
        let (x, y) = (component.x, component.y);
        if !(x.is_finite() && y.is_finite()) || x < 0.0 || y < 0.0 {
            return Err(AppError::InvalidInput(format!(
                "component {id} has invalid position ({x}, {y})"
            )));
        }
        tracing::debug!(%id, kind = %component.kind(), x, y, "component added");
        self.template.components.push(component);
        Ok(id)
    }

    /// Merge `patch` into the props of component `id` and return the new value.
    ///
    /// The component is replaced as a whole; no other component is touched.
    pub fn update_component_props(
        &mut self,
        id: &ComponentId,
        patch: &PropsPatch,
    ) -> Result<&CanvasComponent, AppError> {
        let index = self.require(id)?;
        let current = &self.template.components[index];
        let updated = CanvasComponent {
            props: current.props.merged(patch)?,
            ..current.clone()
        };
        self.template.components[index] = updated;
        Ok(&self.template.components[index])
    }

    /// Replace the position of component `id`, clamping to `≥ 0`.
    pub fn move_component(
        &mut self,
        id: &ComponentId,
        x: f64,
        y: f64,
    ) -> Result<&CanvasComponent, AppError> {
        let index = self.require(id)?;
        let current = &self.template.components[index];
        let moved = CanvasComponent {
            x: x.max(0.0),
            y: y.max(0.0),
            ..current.clone()
        };
        self.template.components[index] = moved;
        Ok(&self.template.components[index])
    }

    /// Remove component `id`, clearing selection and focus if they pointed at it.
    pub fn remove_component(&mut self, id: &ComponentId) -> Result<CanvasComponent, AppError> {
        let index = self.require(id)?;
        let removed = self.template.components.remove(index);
        if self.selection.as_ref() == Some(id) {
            self.selection = None;
        }
        if self.focus.as_ref() == Some(id) {
            self.focus = None;
        }
        tracing::debug!(%id, "component removed");
        Ok(removed)
    }

    /// Replace the page layout.
    ///
    /// Negative margins and non-finite sizes are rejected. A layout whose
    /// printable area is empty is accepted with a warning.
    pub fn set_layout(&mut self, layout: PageLayout) -> Result<(), AppError> {
        layout.validate()?;
        if !layout.is_usable() {
            tracing::warn!(
                width = layout.width,
                height = layout.height,
                "margins leave no printable area"
            );
        }
        self.template.layout = layout;
        Ok(())
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.template.name = name.into();
    }

    /// Replace the whole template (load). Clears selection, focus and any
    /// drag in progress.
    pub fn replace_template(&mut self, template: Template) {
        self.custom_fields = matches!(active_preset(&template.layout), PresetChoice::Custom);
        self.template = template;
        self.selection = None;
        self.focus = None;
        self.drag = DragSession::Idle;
    }

    // ── Selection ────────────────────────────────────────────────────────────

    /// Make component `id` the sole selection.
    pub fn select(&mut self, id: &ComponentId) -> Result<(), AppError> {
        self.require(id)?;
        self.selection = Some(id.clone());
        Ok(())
    }

    /// Give component `id` keyboard focus. Focusing also selects.
    pub fn set_focus(&mut self, id: &ComponentId) -> Result<(), AppError> {
        self.select(id)?;
        self.focus = Some(id.clone());
        Ok(())
    }

    /// Drop keyboard focus. Selection is kept.
    pub fn clear_focus(&mut self) {
        self.focus = None;
    }

    // ── Preset picker ────────────────────────────────────────────────────────

    pub(crate) fn set_custom_fields(&mut self, shown: bool) {
        self.custom_fields = shown;
    }

    /// Whether the width/height/margin inputs are visible.
    ///
    /// They are shown after choosing custom, and whenever the layout matches
    /// no preset.
    pub fn shows_custom_fields(&self) -> bool {
        self.custom_fields || matches!(active_preset(&self.template.layout), PresetChoice::Custom)
    }
}

/// Root state handed to the `commands` layer.
///
/// The editor and the library list are behind separate [`RwLock`]s. Command
/// functions copy what they need out of a guard before awaiting the store, so
/// no lock is held across a suspension point.
pub struct AppState {
    pub editor: RwLock<EditorState>,
    pub library: RwLock<TemplateLibrary>,
    pub store: Arc<dyn TemplateStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn TemplateStore>) -> Self {
        Self {
            editor: RwLock::new(EditorState::new()),
            library: RwLock::new(TemplateLibrary::default()),
            store,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ComponentKind, Spacing};
    use crate::persistence::MemoryTemplateStore;
    use crate::presets::{A4, A5};

    fn editor_with(kinds: &[ComponentKind]) -> (EditorState, Vec<ComponentId>) {
        let mut editor = EditorState::new();
        let ids = kinds
            .iter()
            .map(|k| {
                editor
                    .add_component(CanvasComponent::new(*k, 10.0, 10.0))
                    .expect("add")
            })
            .collect();
        (editor, ids)
    }

    #[test]
    fn new_editor_has_empty_template_on_default_preset() {
        let editor = EditorState::new();
        assert!(editor.template().components.is_empty());
        assert_eq!(editor.template().layout, A4.layout());
        assert!(editor.selection().is_none());
        assert!(!editor.shows_custom_fields());
    }

    #[test]
    fn add_component_appends_in_z_order() {
        let (editor, ids) = editor_with(&[ComponentKind::Logo, ComponentKind::Notes]);
        let order: Vec<_> = editor.template().components.iter().map(|c| &c.id).collect();
        assert_eq!(order, ids.iter().collect::<Vec<_>>());
    }

    #[test]
    fn add_component_rejects_an_id_already_on_the_canvas() {
        let (mut editor, ids) = editor_with(&[ComponentKind::Logo]);
        let twin = CanvasComponent {
            id: ids[0].clone(),
            ..CanvasComponent::new(ComponentKind::Notes, 40.0, 40.0)
        };
        let result = editor.add_component(twin);
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
        assert_eq!(editor.template().components.len(), 1);
    }

    #[test]
    fn add_component_rejects_unplaceable_positions() {
        let mut editor = EditorState::new();
        for (x, y) in [(-1.0, 0.0), (0.0, f64::INFINITY), (f64::NAN, 3.0)] {
            let component = CanvasComponent {
                x,
                y,
                ..CanvasComponent::new(ComponentKind::Totals, 0.0, 0.0)
            };
            assert!(
                matches!(editor.add_component(component), Err(AppError::InvalidInput(_))),
                "({x}, {y}) accepted"
            );
        }
        assert!(editor.template().components.is_empty());
    }

    #[test]
    fn removing_selected_component_clears_selection() {
        let (mut editor, ids) = editor_with(&[ComponentKind::Logo, ComponentKind::Notes]);
        editor.set_focus(&ids[0]).expect("focus");
        editor.remove_component(&ids[0]).expect("remove");
        assert!(editor.selection().is_none());
        assert!(editor.focus().is_none());
        assert_eq!(editor.template().components.len(), 1);
    }

    #[test]
    fn removing_other_component_keeps_selection() {
        let (mut editor, ids) = editor_with(&[ComponentKind::Logo, ComponentKind::Notes]);
        editor.select(&ids[1]).expect("select");
        editor.remove_component(&ids[0]).expect("remove");
        assert_eq!(editor.selection(), Some(&ids[1]));
    }

    #[test]
    fn remove_unknown_component_is_not_found() {
        let mut editor = EditorState::new();
        let result = editor.remove_component(&ComponentId::from("ghost"));
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn select_is_exclusive() {
        let (mut editor, ids) = editor_with(&[ComponentKind::Logo, ComponentKind::Notes]);
        editor.select(&ids[0]).expect("select");
        editor.select(&ids[1]).expect("select");
        assert_eq!(editor.selection(), Some(&ids[1]));
        assert_eq!(editor.selected_component().map(|c| c.kind()), Some(ComponentKind::Notes));
    }

    #[test]
    fn font_size_patch_changes_only_that_field() {
        let (mut editor, ids) = editor_with(&[
            ComponentKind::CompanyInfo,
            ComponentKind::Totals,
            ComponentKind::Logo,
        ]);
        let before = editor.template().clone();
        let patch = PropsPatch {
            font_size: Some(20.0),
            ..PropsPatch::default()
        };
        editor.update_component_props(&ids[1], &patch).expect("update");

        let after = editor.template();
        assert_eq!(after.components[0], before.components[0]);
        assert_eq!(after.components[2], before.components[2]);

        let (old, new) = (&before.components[1], &after.components[1]);
        assert_eq!(new.props.style().font_size, Some(20.0));
        assert_eq!((new.id.clone(), new.x, new.y), (old.id.clone(), old.x, old.y));
        assert_eq!(new.props.text(), old.props.text());
        let mut old_style = old.props.style().clone();
        old_style.font_size = Some(20.0);
        assert_eq!(new.props.style(), &old_style);
    }

    #[test]
    fn rejected_patch_leaves_component_unchanged() {
        let (mut editor, ids) = editor_with(&[ComponentKind::Logo]);
        let before = editor.template().clone();
        let patch = PropsPatch {
            text: Some("logo text".to_string()),
            ..PropsPatch::default()
        };
        assert!(editor.update_component_props(&ids[0], &patch).is_err());
        assert_eq!(editor.template(), &before);
    }

    #[test]
    fn move_component_clamps_and_keeps_props() {
        let (mut editor, ids) = editor_with(&[ComponentKind::Notes]);
        let props = editor.template().components[0].props.clone();
        let moved = editor.move_component(&ids[0], -5.0, 33.0).expect("move");
        assert_eq!((moved.x, moved.y), (0.0, 33.0));
        assert_eq!(moved.props, props);
    }

    #[test]
    fn set_layout_rejects_negative_margin_without_change() {
        let mut editor = EditorState::new();
        let mut layout = A5.layout();
        layout.margin = Spacing::uniform(-1.0);
        assert!(matches!(editor.set_layout(layout), Err(AppError::InvalidInput(_))));
        assert_eq!(editor.template().layout, A4.layout());
    }

    #[test]
    fn set_layout_accepts_unusable_printable_area() {
        let mut editor = EditorState::new();
        let mut layout = A5.layout();
        layout.margin = Spacing::uniform(200.0);
        editor.set_layout(layout).expect("accepted");
        assert!(!editor.template().layout.is_usable());
    }

    #[test]
    fn replace_template_clears_interaction_state() {
        let (mut editor, ids) = editor_with(&[ComponentKind::Logo]);
        editor.set_focus(&ids[0]).expect("focus");
        let mut loaded = Template::default();
        loaded.name = "Loaded".to_string();
        loaded.layout.height = 250.0;
        editor.replace_template(loaded);
        assert_eq!(editor.template().name, "Loaded");
        assert!(editor.selection().is_none());
        assert!(editor.focus().is_none());
        assert!(editor.shows_custom_fields());
    }

    #[test]
    fn app_state_starts_with_fresh_editor_and_empty_library() {
        let state = AppState::new(Arc::new(MemoryTemplateStore::new()));
        let editor = state.editor.read().expect("read editor lock");
        assert!(editor.template().components.is_empty());
        let library = state.library.read().expect("read library lock");
        assert!(library.is_empty());
    }
}
