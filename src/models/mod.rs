pub mod component;
pub mod layout;
pub mod template;

pub use component::{
    Alignment, BoxStyle, CanvasComponent, ComponentId, ComponentKind, ComponentProps, LogoProps,
    PropsPatch, TextProps,
};
pub use layout::{PageLayout, PageUnit, Side, Spacing};
pub use template::{Template, TemplateId};
