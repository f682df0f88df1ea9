//! Versioned field metadata: descriptors, layouts, enumerations and the
//! registry that resolves a (type, version, platform) key to its fields.

pub mod catalog;
pub mod enums;
pub mod field;
pub mod layout;
pub mod registry;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use catalog::{load_catalog, parse_catalog};
pub use enums::{EnumDefinition, EnumMember};
pub use field::{FieldDescriptor, FieldFlags, FieldKind, ScalarKind};
pub use layout::RecordLayout;
pub use registry::{FieldList, SchemaRegistry};

/// Ordinal schema revision. Later revisions compare greater.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SchemaVersion(pub u32);

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Target platform of a cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    /// Matches every platform
    #[default]
    Any,
    Xbox360,
    Pc32,
    Pc64,
    MccPc64,
}

impl Platform {
    /// Returns true if a descriptor restricted to `self` applies on `other`.
    pub fn matches(self, other: Platform) -> bool {
        self == Platform::Any || other == Platform::Any || self == other
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "any" => Ok(Platform::Any),
            "xbox360" => Ok(Platform::Xbox360),
            "pc32" => Ok(Platform::Pc32),
            "pc64" => Ok(Platform::Pc64),
            "mcc_pc64" | "mccpc64" => Ok(Platform::MccPc64),
            other => Err(format!("unknown platform '{}'", other)),
        }
    }
}

/// Identifies one field layout: record type, schema revision and platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchemaKey {
    pub type_name: String,
    pub version: SchemaVersion,
    pub platform: Platform,
}

impl SchemaKey {
    pub fn new(type_name: impl Into<String>, version: SchemaVersion, platform: Platform) -> Self {
        Self {
            type_name: type_name.into(),
            version,
            platform,
        }
    }

    /// Key for another record type under the same revision and platform.
    pub fn with_type(&self, type_name: &str) -> Self {
        Self {
            type_name: type_name.to_string(),
            version: self.version,
            platform: self.platform,
        }
    }
}

impl fmt::Display for SchemaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}/{:?}", self.type_name, self.version, self.platform)
    }
}
