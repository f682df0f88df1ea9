//! Nearest-match selection of shader template variants.
//!
//! A variant is an option vector over categorical dimensions. Curated
//! priorities turn each vector into a single mixed-radix score; the chosen
//! substitute is the smallest known score at or above the target's.

pub mod families;
pub mod matcher;
pub mod options;
pub mod ordering;
pub mod table;

pub use families::{builtin_table, shader_table, SHADER_FAMILY};
pub use matcher::{select_nearest, FallbackPolicy, VariantMatcher};
pub use options::OptionVector;
pub use ordering::{encode, VariantOrdering, VariantScore, MAX_RANKED_OPTIONS, SCORE_BASE};
pub use table::{DimensionDefinition, PriorityTable, PriorityTableBuilder, TableDefinition};
