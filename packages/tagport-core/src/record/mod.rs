//! In-memory record instances, field values and weak tag references.

pub mod instance;
pub mod tag_ref;
pub mod value;

pub use instance::{FieldValue, RecordInstance};
pub use tag_ref::{MemoryTagCache, TagCache, TagGroup, TagReference};
pub use value::Value;
