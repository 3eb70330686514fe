//! Logo image sources read from local files.
//!
//! A chosen file is embedded as a `data:` URI so the template stays
//! self-contained when it is stored or exported.

use std::path::Path;
use std::sync::RwLock;

use base64::Engine as _;

use crate::error::AppError;
use crate::models::CanvasComponent;
use crate::properties::{apply_edit, FieldEdit};
use crate::state::EditorState;

use super::write_editor;

/// Read `path` and return it as a `data:<mime>;base64,<payload>` URI.
///
/// The MIME type is guessed from the file extension and must be `image/*`.
pub async fn load_logo_source(path: &Path) -> Result<String, AppError> {
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    if mime.type_() != mime_guess::mime::IMAGE {
        return Err(AppError::Image(format!(
            "{} is not an image ({mime})",
            path.display()
        )));
    }

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| AppError::Image(format!("cannot read {}: {e}", path.display())))?;
    if bytes.is_empty() {
        return Err(AppError::Image(format!("{} is empty", path.display())));
    }

    let payload = base64::engine::general_purpose::STANDARD.encode(&bytes);
    tracing::debug!(path = %path.display(), %mime, size = bytes.len(), "logo source loaded");
    Ok(format!("data:{mime};base64,{payload}"))
}

/// Load `path` and set it as the image source of the selected logo.
///
/// Returns `Ok(None)` when nothing is selected. The file is read before the
/// editor lock is taken.
pub async fn set_logo_from_file_inner(
    path: &Path,
    editor_lock: &RwLock<EditorState>,
) -> Result<Option<CanvasComponent>, AppError> {
    let source = load_logo_source(path).await?;
    let mut editor = write_editor(editor_lock)?;
    apply_edit(&mut editor, FieldEdit::ImageSource(source))
}
