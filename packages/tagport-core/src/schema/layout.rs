use crate::error::{PortError, Result};

use super::field::FieldDescriptor;

/// Every field a record type declares across all revisions and platforms.
///
/// The registry filters this list down to one revision on query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordLayout {
    /// Record type name (e.g. "device_terminal")
    pub type_name: String,
    /// Fields in declaration order
    pub fields: Vec<FieldDescriptor>,
}

impl RecordLayout {
    pub fn new(type_name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            type_name: type_name.into(),
            fields,
        }
    }

    /// Validates that the layout is consistent.
    ///
    /// Field names must be non-empty and unique case-insensitively among
    /// fields that can coexist in one revision, and version ranges must not
    /// be inverted.
    pub fn validate(&self) -> Result<()> {
        if self.type_name.is_empty() {
            return Err(self.invalid("type name is empty".to_string()));
        }

        for (i, field) in self.fields.iter().enumerate() {
            if field.name.is_empty() {
                return Err(self.invalid(format!("field {} has an empty name", i)));
            }

            if let (Some(min), Some(max)) = (field.min_version, field.max_version) {
                if min > max {
                    return Err(self.invalid(format!(
                        "field '{}' has inverted version range {}..={}",
                        field.name, min, max
                    )));
                }
            }

            let duplicate = self.fields[..i]
                .iter()
                .find(|earlier| earlier.name.eq_ignore_ascii_case(&field.name) && earlier.overlaps(field));
            if let Some(earlier) = duplicate {
                return Err(self.invalid(format!(
                    "field '{}' collides with '{}'",
                    field.name, earlier.name
                )));
            }
        }

        Ok(())
    }

    fn invalid(&self, message: String) -> PortError {
        PortError::InvalidLayout {
            type_name: self.type_name.clone(),
            message,
        }
    }
}
