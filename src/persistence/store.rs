//! The template store seam.

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::TemplateId;

use super::record::TemplateRecord;

/// A collection of stored templates.
///
/// Saving is create-only: `create` always produces a new record with a
/// store-assigned id. There is no update.
#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// Every stored template.
    async fn list(&self) -> Result<Vec<TemplateRecord>, AppError>;

    /// One stored template. [`AppError::NotFound`] for an unknown id.
    async fn get(&self, id: &TemplateId) -> Result<TemplateRecord, AppError>;

    /// Store `record` as a new template and return it with its assigned id.
    async fn create(&self, record: &TemplateRecord) -> Result<TemplateRecord, AppError>;

    /// Remove a stored template. [`AppError::NotFound`] for an unknown id.
    async fn delete(&self, id: &TemplateId) -> Result<(), AppError>;
}
