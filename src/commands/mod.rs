//! Designer operations that cross the editor state, the library list and the
//! store.
//!
//! Sub-modules are grouped by concern:
//! - [`template`]: new template, editor snapshot, preview payload
//! - [`library`]: refresh, save, load, delete, archive export/import
//! - [`logo`]: logo image sources from local files
//!
//! Every function takes the pieces of [`crate::state::AppState`] it needs so
//! it can be driven from tests without a UI shell. Lock guards are always
//! released before a store call is awaited.

pub mod library;
pub mod logo;
pub mod template;

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::AppError;
use crate::library::TemplateLibrary;
use crate::state::EditorState;

pub(crate) fn read_editor(
    lock: &RwLock<EditorState>,
) -> Result<RwLockReadGuard<'_, EditorState>, AppError> {
    lock.read()
        .map_err(|_| AppError::Io("editor lock poisoned".to_string()))
}

pub(crate) fn write_editor(
    lock: &RwLock<EditorState>,
) -> Result<RwLockWriteGuard<'_, EditorState>, AppError> {
    lock.write()
        .map_err(|_| AppError::Io("editor lock poisoned".to_string()))
}

pub(crate) fn read_library(
    lock: &RwLock<TemplateLibrary>,
) -> Result<RwLockReadGuard<'_, TemplateLibrary>, AppError> {
    lock.read()
        .map_err(|_| AppError::Io("library lock poisoned".to_string()))
}

pub(crate) fn write_library(
    lock: &RwLock<TemplateLibrary>,
) -> Result<RwLockWriteGuard<'_, TemplateLibrary>, AppError> {
    lock.write()
        .map_err(|_| AppError::Io("library lock poisoned".to_string()))
}
