//! Translation of record instances between schema revisions.

mod batch;
pub mod diagnostics;
pub mod enum_translate;
pub mod structure;

pub use diagnostics::{CollectingSink, DiagnosticSink, NullSink, TracingSink, TranslationEvent};
pub use enum_translate::{translate_enum, translate_flag_string, EnumTranslation};
pub use structure::StructureTranslator;
