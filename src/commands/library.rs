//! Template library commands: talking to the store.
//!
//! # Error contract
//! A failed store call leaves the editor and the library list exactly as
//! they were. Each function copies what it needs out of the locks, releases
//! them, awaits the store, and only then writes the result back.

use std::path::Path;
use std::sync::RwLock;

use crate::error::AppError;
use crate::library::TemplateLibrary;
use crate::models::TemplateId;
use crate::persistence::{
    archive, from_record, to_record, TemplateRecord, TemplateStore, TemplateSummary,
};
use crate::state::{AppState, EditorState};

use super::template::{EditorSnapshot, PreviewDocument};
use super::{read_editor, read_library, write_editor, write_library};

/// Fetch every stored template and replace the library list.
pub async fn refresh_library_inner(
    store: &dyn TemplateStore,
    library_lock: &RwLock<TemplateLibrary>,
) -> Result<Vec<TemplateSummary>, AppError> {
    let records = store.list().await.map_err(|e| {
        tracing::warn!("template library refresh failed: {e}");
        e
    })?;
    tracing::info!(count = records.len(), "template library refreshed");
    let mut library = write_library(library_lock)?;
    library.replace_all(records);
    Ok(library.summaries())
}

/// Save the editor template under `name` as a new stored template.
///
/// The name is trimmed; an empty name is rejected before anything is sent.
/// The editor template is not changed by a save, successful or not.
pub async fn save_template_inner(
    name: &str,
    store: &dyn TemplateStore,
    editor_lock: &RwLock<EditorState>,
    library_lock: &RwLock<TemplateLibrary>,
) -> Result<TemplateSummary, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::InvalidInput("template name is required".to_string()));
    }

    let record = {
        let editor = read_editor(editor_lock)?;
        TemplateRecord {
            name: name.to_string(),
            ..to_record(editor.template())
        }
    };

    let stored = store.create(&record).await.map_err(|e| {
        tracing::warn!(name, "template save failed: {e}");
        e
    })?;
    tracing::info!(id = ?stored.id, name, "template saved");

    let summary = TemplateSummary::from(&stored);
    write_library(library_lock)?.push(stored);
    Ok(summary)
}

/// Load a template from the library list into the editor.
///
/// Selection, focus and any drag in progress are cleared.
pub fn load_template_inner(
    id: &TemplateId,
    editor_lock: &RwLock<EditorState>,
    library_lock: &RwLock<TemplateLibrary>,
) -> Result<EditorSnapshot, AppError> {
    let record = read_library(library_lock)?
        .get(id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("template {id} is not in the library")))?;

    let template = from_record(record);
    let mut editor = write_editor(editor_lock)?;
    editor.replace_template(template);
    tracing::info!(%id, "template loaded into editor");
    Ok(EditorSnapshot::from(&*editor))
}

/// Fetch one stored template and build its preview payload.
pub async fn fetch_template_inner(
    id: &TemplateId,
    zoom: f64,
    store: &dyn TemplateStore,
) -> Result<PreviewDocument, AppError> {
    let record = store.get(id).await?;
    PreviewDocument::new(&from_record(record), zoom)
}

/// Delete a stored template, then drop it from the library list.
///
/// The editor is not touched, even when it holds the deleted template.
pub async fn delete_template_inner(
    id: &TemplateId,
    store: &dyn TemplateStore,
    library_lock: &RwLock<TemplateLibrary>,
) -> Result<(), AppError> {
    store.delete(id).await?;
    write_library(library_lock)?.remove(id);
    tracing::info!(%id, "template deleted");
    Ok(())
}

/// Export a stored template to a `.invtpl` archive at `path`.
pub async fn export_template_inner(
    id: &TemplateId,
    path: &Path,
    store: &dyn TemplateStore,
) -> Result<archive::ArchiveManifest, AppError> {
    let record = store.get(id).await?;
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || archive::export(&record, &path))
        .await
        .map_err(|e| AppError::TemplateSave(format!("export task panicked: {e}")))?
}

/// Import a `.invtpl` archive as a new stored template.
pub async fn import_template_inner(
    path: &Path,
    store: &dyn TemplateStore,
    library_lock: &RwLock<TemplateLibrary>,
) -> Result<TemplateSummary, AppError> {
    let path = path.to_path_buf();
    let record = tokio::task::spawn_blocking(move || archive::import(&path))
        .await
        .map_err(|e| AppError::TemplateLoad(format!("import task panicked: {e}")))??;

    let stored = store.create(&record).await?;
    let summary = TemplateSummary::from(&stored);
    write_library(library_lock)?.push(stored);
    Ok(summary)
}

impl AppState {
    pub async fn refresh_library(&self) -> Result<Vec<TemplateSummary>, AppError> {
        refresh_library_inner(self.store.as_ref(), &self.library).await
    }

    pub async fn save_template(&self, name: &str) -> Result<TemplateSummary, AppError> {
        save_template_inner(name, self.store.as_ref(), &self.editor, &self.library).await
    }

    pub fn load_template(&self, id: &TemplateId) -> Result<EditorSnapshot, AppError> {
        load_template_inner(id, &self.editor, &self.library)
    }

    pub async fn delete_template(&self, id: &TemplateId) -> Result<(), AppError> {
        delete_template_inner(id, self.store.as_ref(), &self.library).await
    }
}
