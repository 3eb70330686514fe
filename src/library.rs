//! The template library: the list of stored templates last fetched from the
//! store.

use crate::models::TemplateId;
use crate::persistence::{TemplateRecord, TemplateSummary};

#[derive(Debug, Default)]
pub struct TemplateLibrary {
    records: Vec<TemplateRecord>,
}

impl TemplateLibrary {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Replace the whole list with a fresh fetch.
    pub fn replace_all(&mut self, records: Vec<TemplateRecord>) {
        self.records = records;
    }

    /// Add a newly created record.
    pub fn push(&mut self, record: TemplateRecord) {
        self.records.push(record);
    }

    /// Drop the entry with `id`. Returns whether anything was removed.
    pub fn remove(&mut self, id: &TemplateId) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id.as_ref() != Some(id));
        self.records.len() != before
    }

    pub fn get(&self, id: &TemplateId) -> Option<&TemplateRecord> {
        self.records.iter().find(|r| r.id.as_ref() == Some(id))
    }

    pub fn summaries(&self) -> Vec<TemplateSummary> {
        self.records.iter().map(TemplateSummary::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Spacing;

    fn record(id: &str, name: &str) -> TemplateRecord {
        TemplateRecord {
            id: Some(TemplateId::new(id)),
            name: name.to_string(),
            elements: vec![],
            page_width: 100.0,
            page_height: 100.0,
            paper_size: "Custom".to_string(),
            margins: Spacing::ZERO,
            created_at: None,
        }
    }

    #[test]
    fn remove_only_drops_matching_entry() {
        let mut library = TemplateLibrary::default();
        library.replace_all(vec![record("1", "One"), record("2", "Two")]);
        assert!(library.remove(&TemplateId::new("1")));
        assert!(!library.remove(&TemplateId::new("1")));
        assert_eq!(library.len(), 1);
        assert_eq!(library.summaries()[0].name, "Two");
    }

    #[test]
    fn get_finds_by_id() {
        let mut library = TemplateLibrary::default();
        library.push(record("a", "Alpha"));
        assert_eq!(
            library.get(&TemplateId::new("a")).map(|r| r.name.as_str()),
            Some("Alpha")
        );
        assert!(library.get(&TemplateId::new("b")).is_none());
    }
}
