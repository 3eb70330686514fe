//! Template persistence: the stored record shape, the adapter to and from
//! the in-memory model, and the store backends.

pub mod adapter;
pub mod archive;
pub mod file;
pub mod http;
pub mod memory;
pub mod record;
pub mod store;

pub use adapter::{from_record, to_record};
pub use file::FileTemplateStore;
pub use http::HttpTemplateStore;
pub use memory::MemoryTemplateStore;
pub use record::{TemplateRecord, TemplateSummary};
pub use store::TemplateStore;
