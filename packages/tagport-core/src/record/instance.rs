use serde::{Deserialize, Serialize};

use crate::error::{PortError, Result};
use crate::schema::{FieldKind, SchemaKey, SchemaRegistry};

use super::value::Value;

/// Nesting guard for default construction of cyclic catalogs.
const MAX_NESTING: usize = 64;

/// One named field slot of a record instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldValue {
    pub name: String,
    pub value: Value,
}

/// Materialized record: an ordered list of named field values.
///
/// Nested records and sequences are owned; tag references are weak.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordInstance {
    type_name: String,
    fields: Vec<FieldValue>,
}

impl RecordInstance {
    /// Creates an instance with no fields.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }

    /// Creates an instance of `key` with every field at its default:
    /// numeric zero, empty string, null reference, empty sequence, zeroed
    /// bytes, enum value 0, nested records instantiated recursively.
    pub fn instantiate(registry: &SchemaRegistry, key: &SchemaKey) -> Result<Self> {
        Self::instantiate_nested(registry, key, 0)
    }

    fn instantiate_nested(registry: &SchemaRegistry, key: &SchemaKey, depth: usize) -> Result<Self> {
        if depth > MAX_NESTING {
            return Err(PortError::InvalidLayout {
                type_name: key.type_name.clone(),
                message: format!("nested records exceed depth {}", MAX_NESTING),
            });
        }

        let descriptors = registry.fields_for(key)?;
        let mut fields = Vec::with_capacity(descriptors.len());
        for descriptor in descriptors.iter() {
            let value = match &descriptor.kind {
                FieldKind::Scalar(kind) => Value::default_scalar(*kind),
                FieldKind::Struct(type_name) => Value::Struct(Box::new(Self::instantiate_nested(
                    registry,
                    &key.with_type(type_name),
                    depth + 1,
                )?)),
                FieldKind::Block(_) => Value::Block(Vec::new()),
                FieldKind::Array(_) => Value::Array(Vec::new()),
                FieldKind::Enum(_) => Value::Enum(0),
                FieldKind::Bytes(length) => Value::Bytes(vec![0; *length]),
            };
            fields.push(FieldValue {
                name: descriptor.name.clone(),
                value,
            });
        }

        Ok(Self {
            type_name: key.type_name.clone(),
            fields,
        })
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn fields(&self) -> &[FieldValue] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the value of a field by exact name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| &field.value)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.fields
            .iter_mut()
            .find(|field| field.name == name)
            .map(|field| &mut field.value)
    }

    /// Replaces the value of an existing field.
    pub fn set(&mut self, name: &str, value: Value) -> Result<()> {
        match self.get_mut(name) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(PortError::FieldNotFound {
                type_name: self.type_name.clone(),
                field: name.to_string(),
            }),
        }
    }

    /// Appends a field slot. Builder used by tests and importers.
    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.fields.push(FieldValue {
            name: name.into(),
            value,
        });
        self
    }

    /// Checks every value against the descriptors of `key`, recursing into
    /// nested records and block elements.
    ///
    /// Fields missing from the instance are allowed; fields unknown to the
    /// schema are not.
    pub fn validate(&self, registry: &SchemaRegistry, key: &SchemaKey) -> Result<()> {
        let descriptors = registry.fields_for(key)?;

        for field in &self.fields {
            let descriptor = descriptors
                .iter()
                .find(|d| d.name == field.name)
                .ok_or_else(|| PortError::FieldNotFound {
                    type_name: key.type_name.clone(),
                    field: field.name.clone(),
                })?;

            if !field.value.conforms_to(&descriptor.kind) {
                return Err(PortError::TypeMismatch {
                    field: field.name.clone(),
                    expected: descriptor.kind.to_string(),
                    got: field.value.type_name().to_string(),
                });
            }

            match &field.value {
                Value::Struct(record) => record.validate(registry, &key.with_type(record.type_name()))?,
                Value::Block(records) => {
                    for record in records {
                        record.validate(registry, &key.with_type(record.type_name()))?;
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }
}
