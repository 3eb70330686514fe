//! Conversion between the in-memory [`Template`] and the stored
//! [`TemplateRecord`].
//!
//! # Save
//! - `layout.width`/`layout.height` (mm) → `page_width`/`page_height` (px)
//! - `layout.margin` (mm) → `margins` (mm, unchanged)
//! - components → `elements` as-is (positions already px)
//! - `paper_size` is `"A4"` only when width and height equal the A4 preset
//!
//! # Load
//! The reverse. Component margins and page margins missing from older
//! records come back as all-zero (serde defaults on the record types).
//! Negative component positions are clamped to zero and repeated component
//! ids get fresh ones.

use crate::models::{PageLayout, PageUnit, Template};
use crate::presets::A4;
use crate::units::{mm_to_px, px_to_mm};

use super::record::{TemplateRecord, PAPER_A4, PAPER_CUSTOM};

/// Loaded millimetre values are snapped to this precision so that a
/// px → mm conversion lands back on the exact preset size.
const MM_PRECISION: f64 = 1e6;

fn snap_mm(mm: f64) -> f64 {
    (mm * MM_PRECISION).round() / MM_PRECISION
}

/// `paper_size` label for a layout.
pub fn paper_size_for(layout: &PageLayout) -> &'static str {
    if layout.width == A4.width && layout.height == A4.height {
        PAPER_A4
    } else {
        PAPER_CUSTOM
    }
}

/// Build the record to send to the store.
///
/// The id is left empty: saving always creates a new stored template.
pub fn to_record(template: &Template) -> TemplateRecord {
    TemplateRecord {
        id: None,
        name: template.name.clone(),
        elements: template.components.clone(),
        page_width: mm_to_px(template.layout.width),
        page_height: mm_to_px(template.layout.height),
        paper_size: paper_size_for(&template.layout).to_string(),
        margins: template.layout.margin,
        created_at: None,
    }
}

/// Rebuild an in-memory template from a stored record.
///
/// Component positions are clamped to `≥ 0` and repeated component ids are
/// replaced, so whatever the store hands back satisfies the editor's rules.
pub fn from_record(record: TemplateRecord) -> Template {
    let mut template = Template {
        id: record.id,
        name: record.name,
        layout: PageLayout {
            width: snap_mm(px_to_mm(record.page_width)),
            height: snap_mm(px_to_mm(record.page_height)),
            unit: PageUnit::Mm,
            margin: record.margins,
        },
        components: record.elements,
    };
    let repaired = template.repair_components();
    if repaired > 0 {
        tracing::debug!(name = %template.name, repaired, "stored components normalised");
    }
    template
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CanvasComponent, ComponentKind, Spacing, TemplateId};
    use crate::presets::{active_preset, A5};
    use pretty_assertions::assert_eq;

    fn template(width: f64, height: f64, margin: f64) -> Template {
        Template {
            id: None,
            name: "Wedding Package".to_string(),
            layout: PageLayout {
                width,
                height,
                unit: PageUnit::Mm,
                margin: Spacing::uniform(margin),
            },
            components: vec![
                CanvasComponent::new(ComponentKind::Logo, 12.0, 8.0),
                CanvasComponent::new(ComponentKind::ItemsTable, 0.0, 140.0),
            ],
        }
    }

    #[test]
    fn save_converts_page_size_but_not_margins() {
        let record = to_record(&template(210.0, 250.0, 10.0));
        assert!((record.page_width - mm_to_px(210.0)).abs() < 1e-9);
        assert!((record.page_height - mm_to_px(250.0)).abs() < 1e-9);
        assert_eq!(record.margins, Spacing::uniform(10.0));
        assert_eq!(record.paper_size, PAPER_CUSTOM);
        assert!(record.id.is_none());
    }

    #[test]
    fn save_keeps_element_positions_in_pixels() {
        let t = template(210.0, 297.0, 10.0);
        let record = to_record(&t);
        assert_eq!(record.elements, t.components);
    }

    #[test]
    fn only_exact_a4_is_labelled_a4() {
        assert_eq!(paper_size_for(&A4.layout()), PAPER_A4);
        assert_eq!(paper_size_for(&A5.layout()), PAPER_CUSTOM);
        let mut almost = A4.layout();
        almost.width = 210.5;
        assert_eq!(paper_size_for(&almost), PAPER_CUSTOM);
    }

    #[test]
    fn load_converts_page_size_back_and_keeps_margins() {
        let mut record = to_record(&template(210.0, 250.0, 10.0));
        record.id = Some(TemplateId::new("7"));
        let loaded = from_record(record.clone());

        assert!((loaded.layout.width - px_to_mm(record.page_width)).abs() < 1e-6);
        assert!((loaded.layout.height - 250.0).abs() < 1e-9);
        assert_eq!(loaded.layout.margin, Spacing::uniform(10.0));
        assert_eq!(loaded.id, Some(TemplateId::new("7")));
        assert_eq!(loaded.components, record.elements);
    }

    #[test]
    fn round_trip_restores_template() {
        let original = template(148.0, 210.0, 8.0);
        let loaded = from_record(to_record(&original));
        assert_eq!(loaded, original);
    }

    #[test]
    fn loaded_preset_page_is_recognised_as_preset() {
        for preset in [A4, A5] {
            let t = Template {
                layout: preset.layout(),
                ..Template::default()
            };
            let loaded = from_record(to_record(&t));
            assert_eq!(active_preset(&loaded.layout).name(), preset.name);
        }
    }

    #[test]
    fn legacy_record_fills_component_and_page_margins() {
        let json = r#"{
            "id": 3,
            "name": "Legacy",
            "page_width": 793.7007874015748,
            "page_height": 1122.5196850393702,
            "paper_size": "A4",
            "elements": [
                { "id": "c1", "type": "notes", "x": 4, "y": 9,
                  "props": { "text": "Thanks", "fontSize": 12 } },
                { "id": "c2", "type": "logo", "x": 0, "y": 0,
                  "props": { "imageUrl": "data:image/png;base64,AA==", "width": 120 } }
            ]
        }"#;
        let record: TemplateRecord = serde_json::from_str(json).expect("legacy record");
        let loaded = from_record(record);
        assert_eq!(loaded.layout.margin, Spacing::ZERO);
        assert_eq!(loaded.components.len(), 2);
        for c in &loaded.components {
            assert_eq!(c.props.style().margin, Spacing::ZERO);
        }
        assert_eq!(loaded.components[0].props.text(), Some("Thanks"));
        assert_eq!(loaded.components[1].props.style().width, Some(120.0));
    }

    #[test]
    fn load_clamps_negative_positions() {
        let json = r#"{
            "id": 4,
            "name": "Drifted",
            "page_width": 793.7007874015748,
            "page_height": 1122.5196850393702,
            "elements": [
                { "id": "n1", "type": "notes", "x": -40, "y": -5, "props": { "text": "Hi" } },
                { "id": "n2", "type": "totals", "x": 30, "y": -1, "props": { "text": "Due" } }
            ]
        }"#;
        let record: TemplateRecord = serde_json::from_str(json).expect("record");
        let loaded = from_record(record);
        let positions: Vec<_> = loaded.components.iter().map(|c| (c.x, c.y)).collect();
        assert_eq!(positions, vec![(0.0, 0.0), (30.0, 0.0)]);
        assert_eq!(loaded.components[0].props.text(), Some("Hi"));
    }

    #[test]
    fn load_gives_repeated_component_ids_fresh_ones() {
        let json = r#"{
            "id": 5,
            "name": "Twins",
            "page_width": 793.7007874015748,
            "page_height": 1122.5196850393702,
            "elements": [
                { "id": "a", "type": "notes", "x": 0, "y": 0, "props": { "text": "one" } },
                { "id": "a", "type": "totals", "x": 5, "y": 5, "props": { "text": "two" } }
            ]
        }"#;
        let record: TemplateRecord = serde_json::from_str(json).expect("record");
        let loaded = from_record(record);
        assert_eq!(loaded.components[0].id.as_str(), "a");
        assert_ne!(loaded.components[1].id.as_str(), "a");
        assert_eq!(loaded.components[1].props.text(), Some("two"));
        assert!(loaded.validate_components().is_ok());
    }
}
