//! Directory-backed template store: one `<id>.json` file per record.
//!
//! Writes go to `<id>.json.tmp` first and are renamed into place, so a
//! crash mid-write never leaves a truncated record behind.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::TemplateId;

use super::record::TemplateRecord;
use super::store::TemplateStore;

const RECORD_EXT: &str = "json";

#[derive(Debug, Clone)]
pub struct FileTemplateStore {
    dir: PathBuf,
}

impl FileTemplateStore {
    /// Store records under `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, id: &TemplateId) -> Result<PathBuf, AppError> {
        let raw = id.as_str();
        if raw.is_empty() || raw.contains(['/', '\\']) || raw.contains("..") {
            return Err(AppError::InvalidInput(format!("invalid template id {raw:?}")));
        }
        Ok(self.dir.join(format!("{raw}.{RECORD_EXT}")))
    }
}

async fn read_record(path: &Path) -> Result<TemplateRecord, AppError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| AppError::TemplateLoad(format!("cannot read {}: {e}", path.display())))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| AppError::TemplateLoad(format!("cannot parse {}: {e}", path.display())))
}

async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), AppError> {
    let file_name = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .into_owned();
    let tmp_path = path.with_file_name(format!("{file_name}.tmp"));

    if let Err(e) = tokio::fs::write(&tmp_path, bytes).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(AppError::TemplateSave(format!("cannot write temp file: {e}")));
    }
    if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(AppError::TemplateSave(format!(
            "rename to final path failed: {e}"
        )));
    }
    Ok(())
}

#[async_trait]
impl TemplateStore for FileTemplateStore {
    async fn list(&self) -> Result<Vec<TemplateRecord>, AppError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(AppError::TemplateLoad(format!("cannot list templates: {e}"))),
        };

        let mut records = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(RECORD_EXT) {
                continue;
            }
            match read_record(&path).await {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!(path = %path.display(), "skipping unreadable template: {e}"),
            }
        }
        // Oldest first; records without a timestamp sort by name.
        records.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(records)
    }

    async fn get(&self, id: &TemplateId) -> Result<TemplateRecord, AppError> {
        let path = self.path_for(id)?;
        if !tokio::fs::try_exists(&path).await? {
            return Err(AppError::NotFound(format!("template {id} not found")));
        }
        read_record(&path).await
    }

    async fn create(&self, record: &TemplateRecord) -> Result<TemplateRecord, AppError> {
        let id = TemplateId::new(uuid::Uuid::new_v4().to_string());
        let stored = TemplateRecord {
            id: Some(id.clone()),
            created_at: Some(
                chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            ),
            ..record.clone()
        };
        let json = serde_json::to_vec_pretty(&stored)
            .map_err(|e| AppError::TemplateSave(format!("cannot serialize template: {e}")))?;

        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            AppError::TemplateSave(format!("cannot create {}: {e}", self.dir.display()))
        })?;
        write_atomic(&self.path_for(&id)?, &json).await?;
        tracing::info!(%id, dir = %self.dir.display(), "template written");
        Ok(stored)
    }

    async fn delete(&self, id: &TemplateId) -> Result<(), AppError> {
        let path = self.path_for(id)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::NotFound(format!("template {id} not found")))
            }
            Err(e) => Err(e.into()),
        }
    }
}
