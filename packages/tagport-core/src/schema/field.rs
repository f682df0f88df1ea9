//! Field descriptors within a record layout.

use std::fmt;
use std::str::FromStr;

use super::{Platform, SchemaVersion};

/// Primitive value kinds a field can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    String,
    /// Index into the cache string table
    StringId,
    /// Weak tag reference (group + index)
    TagReference,
}

impl ScalarKind {
    pub fn name(self) -> &'static str {
        match self {
            ScalarKind::Bool => "bool",
            ScalarKind::I8 => "i8",
            ScalarKind::I16 => "i16",
            ScalarKind::I32 => "i32",
            ScalarKind::I64 => "i64",
            ScalarKind::U8 => "u8",
            ScalarKind::U16 => "u16",
            ScalarKind::U32 => "u32",
            ScalarKind::U64 => "u64",
            ScalarKind::F32 => "f32",
            ScalarKind::F64 => "f64",
            ScalarKind::String => "string",
            ScalarKind::StringId => "string_id",
            ScalarKind::TagReference => "tag_reference",
        }
    }
}

impl FromStr for ScalarKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s {
            "bool" => ScalarKind::Bool,
            "i8" => ScalarKind::I8,
            "i16" => ScalarKind::I16,
            "i32" => ScalarKind::I32,
            "i64" => ScalarKind::I64,
            "u8" => ScalarKind::U8,
            "u16" => ScalarKind::U16,
            "u32" => ScalarKind::U32,
            "u64" => ScalarKind::U64,
            "f32" => ScalarKind::F32,
            "f64" => ScalarKind::F64,
            "string" => ScalarKind::String,
            "string_id" => ScalarKind::StringId,
            "tag_reference" | "tag" => ScalarKind::TagReference,
            other => return Err(format!("unknown scalar kind '{}'", other)),
        };
        Ok(kind)
    }
}

/// Declared kind of a field.
///
/// The textual form used by schema catalogs is `u32`, `struct:<type>`,
/// `block:<type>`, `array:<scalar>`, `enum:<name>` or `bytes:<length>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Scalar(ScalarKind),
    /// Owned nested record
    Struct(String),
    /// Ordered sequence of owned nested records
    Block(String),
    /// Ordered sequence of scalars
    Array(ScalarKind),
    /// Enumerated or flag value of the named enumeration
    Enum(String),
    /// Raw bytes of fixed length
    Bytes(usize),
}

impl FieldKind {
    /// Nested record type for struct and block kinds.
    pub fn record_type(&self) -> Option<&str> {
        match self {
            FieldKind::Struct(name) | FieldKind::Block(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Scalar(kind) => f.write_str(kind.name()),
            FieldKind::Struct(name) => write!(f, "struct:{}", name),
            FieldKind::Block(name) => write!(f, "block:{}", name),
            FieldKind::Array(kind) => write!(f, "array:{}", kind.name()),
            FieldKind::Enum(name) => write!(f, "enum:{}", name),
            FieldKind::Bytes(length) => write!(f, "bytes:{}", length),
        }
    }
}

impl FromStr for FieldKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((prefix, rest)) = s.split_once(':') else {
            return s.parse().map(FieldKind::Scalar);
        };
        if rest.is_empty() {
            return Err(format!("field kind '{}' is missing its argument", s));
        }
        match prefix {
            "struct" => Ok(FieldKind::Struct(rest.to_string())),
            "block" => Ok(FieldKind::Block(rest.to_string())),
            "array" => rest.parse().map(FieldKind::Array),
            "enum" | "flags" => Ok(FieldKind::Enum(rest.to_string())),
            "bytes" => rest
                .parse()
                .map(FieldKind::Bytes)
                .map_err(|_| format!("invalid byte length in '{}'", s)),
            other => Err(format!("unknown field kind prefix '{}'", other)),
        }
    }
}

/// Applicability flags of a field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FieldFlags {
    /// Alignment filler with no meaning
    pub padding: bool,
    /// Computed at runtime, never stored
    pub runtime: bool,
}

/// Field descriptor within a record layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Field name, unique case-insensitively within a layout revision
    pub name: String,
    /// Declared kind
    pub kind: FieldKind,
    /// Padding/runtime flags
    pub flags: FieldFlags,
    /// First revision carrying the field (inclusive)
    pub min_version: Option<SchemaVersion>,
    /// Last revision carrying the field (inclusive)
    pub max_version: Option<SchemaVersion>,
    /// Platforms carrying the field; empty means all
    pub platforms: Vec<Platform>,
    /// Group codes a tag reference may point at (informational)
    pub valid_groups: Vec<String>,
}

impl FieldDescriptor {
    /// Creates a descriptor present in every revision on every platform.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            flags: FieldFlags::default(),
            min_version: None,
            max_version: None,
            platforms: Vec::new(),
            valid_groups: Vec::new(),
        }
    }

    pub fn scalar(name: impl Into<String>, kind: ScalarKind) -> Self {
        Self::new(name, FieldKind::Scalar(kind))
    }

    pub fn padding(mut self) -> Self {
        self.flags.padding = true;
        self
    }

    pub fn runtime(mut self) -> Self {
        self.flags.runtime = true;
        self
    }

    pub fn since(mut self, version: SchemaVersion) -> Self {
        self.min_version = Some(version);
        self
    }

    pub fn until(mut self, version: SchemaVersion) -> Self {
        self.max_version = Some(version);
        self
    }

    pub fn on_platforms(mut self, platforms: &[Platform]) -> Self {
        self.platforms = platforms.to_vec();
        self
    }

    /// Returns true if the field exists at `version` on `platform`.
    pub fn applies_to(&self, version: SchemaVersion, platform: Platform) -> bool {
        if self.min_version.is_some_and(|min| version < min) {
            return false;
        }
        if self.max_version.is_some_and(|max| version > max) {
            return false;
        }
        self.platforms.is_empty() || self.platforms.iter().any(|p| p.matches(platform))
    }

    /// Padding and runtime fields take no part in translation.
    pub fn is_translatable(&self) -> bool {
        !self.flags.padding && !self.flags.runtime
    }

    /// Returns true if both descriptors can exist in one revision.
    pub(crate) fn overlaps(&self, other: &FieldDescriptor) -> bool {
        let starts_before_other_ends = match (self.min_version, other.max_version) {
            (Some(min), Some(max)) => min <= max,
            _ => true,
        };
        let other_starts_before_end = match (other.min_version, self.max_version) {
            (Some(min), Some(max)) => min <= max,
            _ => true,
        };
        let platforms_overlap = self.platforms.is_empty()
            || other.platforms.is_empty()
            || self
                .platforms
                .iter()
                .any(|p| other.platforms.iter().any(|q| p.matches(*q)));
        starts_before_other_ends && other_starts_before_end && platforms_overlap
    }
}
