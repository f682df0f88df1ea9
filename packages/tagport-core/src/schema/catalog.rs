//! JSON schema catalogs registered at startup.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{classify_io_error, PortError, Result};

use super::enums::{EnumDefinition, EnumMember};
use super::field::{FieldDescriptor, FieldFlags, FieldKind};
use super::layout::RecordLayout;
use super::registry::SchemaRegistry;
use super::{Platform, SchemaVersion};

/// Catalog format version understood by this crate.
pub const CATALOG_VERSION: u32 = 1;

/// Schema catalog file format.
#[derive(Debug, Serialize, Deserialize)]
pub struct CatalogFile {
    /// Catalog format version
    pub version: u32,
    /// Record layouts
    #[serde(default)]
    pub records: Vec<RecordSchema>,
    /// Enumerations and flag sets
    #[serde(default)]
    pub enums: Vec<EnumSchema>,
}

/// Record layout entry.
#[derive(Debug, Serialize, Deserialize)]
pub struct RecordSchema {
    /// Record type name
    pub name: String,
    /// Field definitions in declaration order
    pub fields: Vec<FieldSchema>,
}

/// Field entry.
#[derive(Debug, Serialize, Deserialize)]
pub struct FieldSchema {
    /// Field name
    pub name: String,
    /// Field kind in textual form (e.g. "u32", "block:terminal_page")
    pub r#type: String,
    #[serde(default)]
    pub padding: bool,
    #[serde(default)]
    pub runtime: bool,
    #[serde(default)]
    pub min_version: Option<SchemaVersion>,
    #[serde(default)]
    pub max_version: Option<SchemaVersion>,
    #[serde(default)]
    pub platforms: Vec<Platform>,
    #[serde(default)]
    pub valid_groups: Vec<String>,
}

/// Enumeration entry.
#[derive(Debug, Serialize, Deserialize)]
pub struct EnumSchema {
    pub name: String,
    #[serde(default)]
    pub flags: bool,
    pub members: Vec<EnumMemberSchema>,
}

/// Enumeration member entry. Without an explicit value, members take their
/// index (plain enumerations) or the bit at their index (flag sets).
#[derive(Debug, Serialize, Deserialize)]
pub struct EnumMemberSchema {
    pub name: String,
    #[serde(default)]
    pub value: Option<i64>,
}

impl FieldSchema {
    fn into_descriptor(self, record: &str) -> Result<FieldDescriptor> {
        let kind: FieldKind = self.r#type.parse().map_err(|message| PortError::InvalidLayout {
            type_name: record.to_string(),
            message: format!("field '{}': {}", self.name, message),
        })?;

        Ok(FieldDescriptor {
            name: self.name,
            kind,
            flags: FieldFlags {
                padding: self.padding,
                runtime: self.runtime,
            },
            min_version: self.min_version,
            max_version: self.max_version,
            platforms: self.platforms,
            valid_groups: self.valid_groups,
        })
    }
}

impl EnumSchema {
    fn into_definition(self) -> EnumDefinition {
        let flags = self.flags;
        let members = self
            .members
            .into_iter()
            .enumerate()
            .map(|(i, member)| EnumMember {
                name: member.name,
                value: member
                    .value
                    .unwrap_or(if flags { 1i64 << i } else { i as i64 }),
            })
            .collect();

        EnumDefinition {
            name: self.name,
            flags,
            members,
        }
    }
}

/// Parses a catalog and registers its enumerations and layouts.
///
/// # Returns
/// Number of record layouts registered.
pub fn parse_catalog(contents: &str, registry: &SchemaRegistry) -> Result<usize> {
    let catalog: CatalogFile = serde_json::from_str(contents)
        .map_err(|e| PortError::SerializationError(format!("Failed to parse catalog: {}", e)))?;

    if catalog.version != CATALOG_VERSION {
        return Err(PortError::SerializationError(format!(
            "Unsupported catalog version: {}",
            catalog.version
        )));
    }

    for definition in catalog.enums {
        registry.register_enum(definition.into_definition())?;
    }

    let record_count = catalog.records.len();
    for record in catalog.records {
        let fields = record
            .fields
            .into_iter()
            .map(|field| field.into_descriptor(&record.name))
            .collect::<Result<Vec<_>>>()?;
        registry.register(RecordLayout::new(record.name, fields))?;
    }

    tracing::info!("Registered {} record layouts from catalog", record_count);
    Ok(record_count)
}

/// Reads a catalog file and registers its contents.
pub fn load_catalog(path: &Path, registry: &SchemaRegistry) -> Result<usize> {
    let mut file = File::open(path).map_err(|e| classify_io_error(e, "Failed to open catalog"))?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| classify_io_error(e, "Failed to read catalog"))?;
    parse_catalog(&contents, registry)
}
