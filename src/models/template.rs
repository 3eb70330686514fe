//! Template data model: page layout plus an ordered list of components.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use super::component::{CanvasComponent, ComponentId};
use super::layout::PageLayout;
use crate::error::AppError;

/// Store-assigned template identifier.
///
/// Opaque to the designer. Remote stores may hand out numeric ids, so both
/// JSON strings and integers are accepted; the id always serializes as a
/// string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TemplateId(String);

impl TemplateId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TemplateId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Signed(i64),
            Unsigned(u64),
        }
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => Self(s),
            Raw::Signed(n) => Self(n.to_string()),
            Raw::Unsigned(n) => Self(n.to_string()),
        })
    }
}

/// One invoice layout definition, as held by the editor.
///
/// `components` order is z-order: later entries render on top.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Template {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TemplateId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub layout: PageLayout,
    #[serde(default)]
    pub components: Vec<CanvasComponent>,
}

impl Template {
    pub fn component(&self, id: &ComponentId) -> Option<&CanvasComponent> {
        self.components.iter().find(|c| &c.id == id)
    }

    pub fn position_of(&self, id: &ComponentId) -> Option<usize> {
        self.components.iter().position(|c| &c.id == id)
    }

    /// Check that every component sits at a finite, non-negative position and
    /// that component ids are unique.
    pub fn validate_components(&self) -> Result<(), AppError> {
        let mut seen = HashSet::new();
        for c in &self.components {
            if !(c.x.is_finite() && c.y.is_finite()) || c.x < 0.0 || c.y < 0.0 {
                return Err(AppError::InvalidInput(format!(
                    "component {} has invalid position ({}, {})",
                    c.id, c.x, c.y
                )));
            }
            if !seen.insert(&c.id) {
                return Err(AppError::InvalidInput(format!(
                    "duplicate component id {}",
                    c.id
                )));
            }
        }
        Ok(())
    }

    /// Bring components read from storage back within the position and id
    /// rules: positions are clamped to `≥ 0` (non-finite becomes 0) and every
    /// repeated id after the first gets a fresh one.
    ///
    /// Returns the number of components that were changed.
    pub fn repair_components(&mut self) -> usize {
        let mut seen = HashSet::new();
        let mut repaired = 0;
        for c in &mut self.components {
            let (x, y) = (clamp_coord(c.x), clamp_coord(c.y));
            let mut changed = x != c.x || y != c.y;
            c.x = x;
            c.y = y;
            if !seen.insert(c.id.clone()) {
                c.id = ComponentId::generate();
                seen.insert(c.id.clone());
                changed = true;
            }
            if changed {
                repaired += 1;
            }
        }
        repaired
    }
}

fn clamp_coord(v: f64) -> f64 {
    if v.is_finite() {
        v.max(0.0)
    } else {
        0.0
    }
}
