//! Canvas component data model.
//!
//! A [`CanvasComponent`] is one placed element of a template. Its type and
//! property bag are carried together in [`ComponentProps`], a sum type keyed
//! by the component type: a logo carries an image reference, every other
//! type carries text. Both share the optional [`BoxStyle`] fields.
//!
//! The JSON representation flattens the adjacently-tagged props enum into the
//! component so that `"type"` and `"props"` sit next to `id`, `x` and `y`:
//!
//! ```json
//! { "id": "…", "type": "notes", "x": 12, "y": 40,
//!   "props": { "text": "Thank you!", "fontSize": 12, "margin": { … } } }
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::layout::Spacing;
use crate::error::AppError;

/// Client-generated component identifier, unique within a template.
///
/// Fresh ids are random UUIDs, so an id is never reused after deletion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(String);

impl ComponentId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ComponentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ComponentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The closed set of component types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ComponentKind {
    Logo,
    CompanyInfo,
    CustomerInfo,
    ItemsTable,
    Totals,
    Notes,
}

impl ComponentKind {
    /// Palette order.
    pub const ALL: [ComponentKind; 6] = [
        ComponentKind::Logo,
        ComponentKind::CompanyInfo,
        ComponentKind::CustomerInfo,
        ComponentKind::ItemsTable,
        ComponentKind::Totals,
        ComponentKind::Notes,
    ];

    /// Wire name, as used in the `"type"` field.
    pub fn as_str(self) -> &'static str {
        match self {
            ComponentKind::Logo => "logo",
            ComponentKind::CompanyInfo => "companyInfo",
            ComponentKind::CustomerInfo => "customerInfo",
            ComponentKind::ItemsTable => "itemsTable",
            ComponentKind::Totals => "totals",
            ComponentKind::Notes => "notes",
        }
    }

    /// Human-readable palette label.
    pub fn label(self) -> &'static str {
        match self {
            ComponentKind::Logo => "Logo",
            ComponentKind::CompanyInfo => "Company Info",
            ComponentKind::CustomerInfo => "Customer Info",
            ComponentKind::ItemsTable => "Items Table",
            ComponentKind::Totals => "Totals",
            ComponentKind::Notes => "Notes",
        }
    }

    pub fn is_text_bearing(self) -> bool {
        self != ComponentKind::Logo
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ComponentKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| AppError::InvalidInput(format!("unknown component type '{s}'")))
    }
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Optional typography and box fields shared by every component type.
///
/// Sizes are in pixels. `margin` defaults to all-zero, including for stored
/// records written before the field existed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<f64>,
    #[serde(default)]
    pub margin: Spacing,
}

/// Properties of a logo: a self-contained image reference (e.g. a data URI).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoProps {
    #[serde(default)]
    pub image_url: String,
    #[serde(flatten)]
    pub style: BoxStyle,
}

/// Properties of every text-bearing component type.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextProps {
    #[serde(default)]
    pub text: String,
    #[serde(flatten)]
    pub style: BoxStyle,
}

/// Type-discriminated property bag.
///
/// The variant is the component type, so it cannot change after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "props", rename_all = "camelCase")]
pub enum ComponentProps {
    Logo(LogoProps),
    CompanyInfo(TextProps),
    CustomerInfo(TextProps),
    ItemsTable(TextProps),
    Totals(TextProps),
    Notes(TextProps),
}

impl ComponentProps {
    /// Default property bag for a freshly dropped component of `kind`.
    pub fn default_for(kind: ComponentKind) -> Self {
        let text = |text: &str| TextProps {
            text: text.to_string(),
            style: BoxStyle {
                font_size: Some(14.0),
                alignment: Some(Alignment::Left),
                ..BoxStyle::default()
            },
        };
        match kind {
            ComponentKind::Logo => ComponentProps::Logo(LogoProps {
                image_url: String::new(),
                style: BoxStyle {
                    width: Some(150.0),
                    height: Some(80.0),
                    ..BoxStyle::default()
                },
            }),
            ComponentKind::CompanyInfo => {
                ComponentProps::CompanyInfo(text("Company Name\nAddress Line\nPhone | Email"))
            }
            ComponentKind::CustomerInfo => {
                ComponentProps::CustomerInfo(text("Bill To:\nCustomer Name\nCustomer Address"))
            }
            ComponentKind::ItemsTable => {
                ComponentProps::ItemsTable(text("Item | Qty | Rate | Amount"))
            }
            ComponentKind::Totals => ComponentProps::Totals(text("Subtotal\nTax\nTotal")),
            ComponentKind::Notes => ComponentProps::Notes(text("Thank you for your business!")),
        }
    }

    pub fn kind(&self) -> ComponentKind {
        match self {
            ComponentProps::Logo(_) => ComponentKind::Logo,
            ComponentProps::CompanyInfo(_) => ComponentKind::CompanyInfo,
            ComponentProps::CustomerInfo(_) => ComponentKind::CustomerInfo,
            ComponentProps::ItemsTable(_) => ComponentKind::ItemsTable,
            ComponentProps::Totals(_) => ComponentKind::Totals,
            ComponentProps::Notes(_) => ComponentKind::Notes,
        }
    }

    pub fn style(&self) -> &BoxStyle {
        match self {
            ComponentProps::Logo(p) => &p.style,
            ComponentProps::CompanyInfo(p)
            | ComponentProps::CustomerInfo(p)
            | ComponentProps::ItemsTable(p)
            | ComponentProps::Totals(p)
            | ComponentProps::Notes(p) => &p.style,
        }
    }

    fn style_mut(&mut self) -> &mut BoxStyle {
        match self {
            ComponentProps::Logo(p) => &mut p.style,
            ComponentProps::CompanyInfo(p)
            | ComponentProps::CustomerInfo(p)
            | ComponentProps::ItemsTable(p)
            | ComponentProps::Totals(p)
            | ComponentProps::Notes(p) => &mut p.style,
        }
    }

    fn text_props_mut(&mut self) -> Option<&mut TextProps> {
        match self {
            ComponentProps::Logo(_) => None,
            ComponentProps::CompanyInfo(p)
            | ComponentProps::CustomerInfo(p)
            | ComponentProps::ItemsTable(p)
            | ComponentProps::Totals(p)
            | ComponentProps::Notes(p) => Some(p),
        }
    }

    /// Text content, or `None` for a logo.
    pub fn text(&self) -> Option<&str> {
        match self {
            ComponentProps::Logo(_) => None,
            ComponentProps::CompanyInfo(p)
            | ComponentProps::CustomerInfo(p)
            | ComponentProps::ItemsTable(p)
            | ComponentProps::Totals(p)
            | ComponentProps::Notes(p) => Some(&p.text),
        }
    }

    /// Image reference, or `None` for a text-bearing component.
    pub fn image_url(&self) -> Option<&str> {
        match self {
            ComponentProps::Logo(p) => Some(&p.image_url),
            _ => None,
        }
    }

    /// Merge `patch` into a copy of these props.
    ///
    /// Fields absent from the patch keep their current value. A patch that
    /// targets the wrong variant (text on a logo, image on a text type) or
    /// carries an invalid number is rejected and nothing is applied.
    pub fn merged(&self, patch: &PropsPatch) -> Result<Self, AppError> {
        patch.validate()?;
        let mut next = self.clone();

        if let Some(image_url) = &patch.image_url {
            match &mut next {
                ComponentProps::Logo(p) => p.image_url = image_url.clone(),
                other => {
                    return Err(AppError::InvalidInput(format!(
                        "{} components have no image source",
                        other.kind()
                    )))
                }
            }
        }
        if let Some(text) = &patch.text {
            let kind = next.kind();
            let props = next.text_props_mut().ok_or_else(|| {
                AppError::InvalidInput(format!("{kind} components have no text"))
            })?;
            props.text = text.clone();
        }

        let style = next.style_mut();
        if let Some(v) = patch.font_size {
            style.font_size = Some(v);
        }
        if let Some(v) = patch.alignment {
            style.alignment = Some(v);
        }
        if let Some(v) = patch.width {
            style.width = Some(v);
        }
        if let Some(v) = patch.height {
            style.height = Some(v);
        }
        if let Some(v) = &patch.background {
            style.background = Some(v.clone());
        }
        if let Some(v) = patch.padding {
            style.padding = Some(v);
        }
        if let Some(v) = patch.margin {
            style.margin = v;
        }
        Ok(next)
    }
}

/// Partial update of a component's property bag.
///
/// Every field is optional; only the present ones are merged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin: Option<Spacing>,
}

impl PropsPatch {
    fn validate(&self) -> Result<(), AppError> {
        if let Some(v) = self.font_size {
            if !v.is_finite() || v <= 0.0 {
                return Err(AppError::InvalidInput(format!(
                    "font size must be a positive number, got {v}"
                )));
            }
        }
        for (name, value) in [
            ("width", self.width),
            ("height", self.height),
            ("padding", self.padding),
        ] {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(AppError::InvalidInput(format!(
                        "{name} must be a non-negative number, got {v}"
                    )));
                }
            }
        }
        if let Some(margin) = &self.margin {
            margin.validate("component margin")?;
        }
        Ok(())
    }
}

/// One placed component. `x`/`y` are pixels from the printable-area origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasComponent {
    pub id: ComponentId,
    pub x: f64,
    pub y: f64,
    #[serde(flatten)]
    pub props: ComponentProps,
}

impl CanvasComponent {
    /// Create a component of `kind` with default props, clamping the position
    /// to the printable area's top-left quadrant.
    pub fn new(kind: ComponentKind, x: f64, y: f64) -> Self {
        Self {
            id: ComponentId::generate(),
            x: x.max(0.0),
            y: y.max(0.0),
            props: ComponentProps::default_for(kind),
        }
    }

    pub fn kind(&self) -> ComponentKind {
        self.props.kind()
    }
}
