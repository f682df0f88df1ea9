//! Core of the tag porting pipeline.
//!
//! Provides the versioned field metadata registry, the structure and
//! enumerated-value translators, the chunked container codec with the
//! resource fixup model built on it, and the shader variant matcher.

pub mod chunk;
pub mod config;
pub mod error;
pub mod record;
pub mod resource;
pub mod schema;
pub mod shader;
pub mod translate;

pub use config::PortConfig;
pub use error::{PortError, Result};
