//! In-process template store.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::TemplateId;

use super::record::TemplateRecord;
use super::store::TemplateStore;

/// Keeps records in a `Vec` in creation order.
///
/// [`set_offline`](Self::set_offline) makes every call fail with
/// [`AppError::Transport`], which is how tests exercise an unreachable store.
#[derive(Debug, Default)]
pub struct MemoryTemplateStore {
    records: Mutex<Vec<TemplateRecord>>,
    offline: AtomicBool,
}

impl MemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `records` already stored. Records without an id get one.
    pub fn with_records(records: impl IntoIterator<Item = TemplateRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|mut r| {
                r.id.get_or_insert_with(new_id);
                r
            })
            .collect();
        Self {
            records: Mutex::new(records),
            offline: AtomicBool::new(false),
        }
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), AppError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(AppError::Transport("template store is unreachable".to_string()));
        }
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<TemplateRecord>>, AppError> {
        self.records
            .lock()
            .map_err(|_| AppError::Io("memory store lock poisoned".to_string()))
    }
}

fn new_id() -> TemplateId {
    TemplateId::new(uuid::Uuid::new_v4().to_string())
}

fn not_found(id: &TemplateId) -> AppError {
    AppError::NotFound(format!("template {id} not found"))
}

#[async_trait]
impl TemplateStore for MemoryTemplateStore {
    async fn list(&self) -> Result<Vec<TemplateRecord>, AppError> {
        self.check_online()?;
        Ok(self.lock()?.clone())
    }

    async fn get(&self, id: &TemplateId) -> Result<TemplateRecord, AppError> {
        self.check_online()?;
        self.lock()?
            .iter()
            .find(|r| r.id.as_ref() == Some(id))
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    async fn create(&self, record: &TemplateRecord) -> Result<TemplateRecord, AppError> {
        self.check_online()?;
        let stored = TemplateRecord {
            id: Some(new_id()),
            created_at: Some(chrono::Utc::now().to_rfc3339()),
            ..record.clone()
        };
        self.lock()?.push(stored.clone());
        Ok(stored)
    }

    async fn delete(&self, id: &TemplateId) -> Result<(), AppError> {
        self.check_online()?;
        let mut records = self.lock()?;
        let index = records
            .iter()
            .position(|r| r.id.as_ref() == Some(id))
            .ok_or_else(|| not_found(id))?;
        records.remove(index);
        Ok(())
    }
}
