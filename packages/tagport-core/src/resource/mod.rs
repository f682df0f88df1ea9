//! Resource fixup model parsed from chunk containers.

pub mod address;
pub mod fixup;
pub mod header;
pub mod xsync;

pub use address::{CacheAddress, CacheAddressType};
pub use fixup::{InteropTypeId, ResourceFixupLocation};
pub use header::XSyncStateHeader;
pub use xsync::{load_resource_file, ResourceXSyncState};
