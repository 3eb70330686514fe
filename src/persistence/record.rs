//! Serializable shape of a template as held by the remote store.
//!
//! This is the **stored** representation. The **in-memory** representation
//! is [`crate::models::Template`]; conversion between the two is done in
//! [`super::adapter`].
//!
//! The record mixes units: `page_width`/`page_height` and element positions
//! are pixels, `margins` are millimetres. Consumers such as the PDF renderer
//! depend on exactly this mix.

use serde::{Deserialize, Serialize};

use crate::models::{CanvasComponent, Spacing, TemplateId};

/// `paper_size` value for a page matching the A4 preset.
pub const PAPER_A4: &str = "A4";
/// `paper_size` value for every other page size.
pub const PAPER_CUSTOM: &str = "Custom";

fn default_paper_size() -> String {
    PAPER_CUSTOM.to_string()
}

/// One stored template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateRecord {
    /// Assigned by the store; absent on a record about to be created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TemplateId>,
    pub name: String,
    /// Components with pixel positions, in z-order.
    #[serde(default)]
    pub elements: Vec<CanvasComponent>,
    /// Page width in pixels.
    pub page_width: f64,
    /// Page height in pixels.
    pub page_height: f64,
    /// `"A4"` or `"Custom"`.
    #[serde(default = "default_paper_size")]
    pub paper_size: String,
    /// Page margins in millimetres (not converted). Missing on old records.
    #[serde(default)]
    pub margins: Spacing,
    /// RFC 3339 creation time, when the store provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Lightweight view of a stored template for the library list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSummary {
    pub id: Option<TemplateId>,
    pub name: String,
    pub paper_size: String,
    pub component_count: usize,
    pub created_at: Option<String>,
}

impl From<&TemplateRecord> for TemplateSummary {
    fn from(r: &TemplateRecord) -> Self {
        Self {
            id: r.id.clone(),
            name: r.name.clone(),
            paper_size: r.paper_size.clone(),
            component_count: r.elements.len(),
            created_at: r.created_at.clone(),
        }
    }
}
