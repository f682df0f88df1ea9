//! Porting configuration.

use crate::chunk::ByteOrder;
use crate::shader::FallbackPolicy;

/// Porting configuration.
#[derive(Debug, Clone)]
pub struct PortConfig {
    /// Maximum nesting depth of chunk containers
    pub max_chunk_depth: usize,
    /// Byte order of chunk container streams
    pub byte_order: ByteOrder,
    /// Policy when no variant scores at or above the target
    pub variant_fallback: FallbackPolicy,
    /// Report source fields without a destination counterpart
    pub report_unmatched: bool,
    /// Batch size above which translation fans out across threads
    pub parallel_threshold: usize,
}

impl Default for PortConfig {
    fn default() -> Self {
        Self {
            max_chunk_depth: 8,
            byte_order: ByteOrder::Little,
            variant_fallback: FallbackPolicy::NoMatch,
            report_unmatched: false,
            parallel_threshold: 64,
        }
    }
}
