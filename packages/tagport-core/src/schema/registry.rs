use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;

use crate::error::{PortError, Result};
use crate::record::RecordInstance;

use super::enums::EnumDefinition;
use super::field::FieldDescriptor;
use super::layout::RecordLayout;
use super::{Platform, SchemaKey, SchemaVersion};

/// Field descriptors of one (type, version, platform) key, in declaration order.
pub type FieldList = Arc<[FieldDescriptor]>;

/// Registry of record layouts and enumerations.
///
/// Layouts and enumerations are append-only. Filtered field lists are
/// computed on first query and cached for the lifetime of the registry,
/// with a single-initialization guard per key so concurrent first queries
/// compute the list once.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    layouts: RwLock<HashMap<String, Arc<RecordLayout>>>,
    enums: RwLock<HashMap<String, Arc<EnumDefinition>>>,
    cache: RwLock<HashMap<SchemaKey, Arc<OnceLock<FieldList>>>>,
}

impl SchemaRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry shared by tools that do not manage their own.
    pub fn global() -> &'static SchemaRegistry {
        static GLOBAL: OnceLock<SchemaRegistry> = OnceLock::new();
        GLOBAL.get_or_init(SchemaRegistry::new)
    }

    /// Registers a record layout.
    ///
    /// # Returns
    /// `Ok(())` if successful, `Err(PortError)` if the layout is invalid or
    /// the type is already registered.
    pub fn register(&self, layout: RecordLayout) -> Result<()> {
        layout.validate()?;

        let mut layouts = self.layouts.write();
        if layouts.contains_key(&layout.type_name) {
            return Err(PortError::AlreadyRegistered {
                type_name: layout.type_name,
            });
        }

        tracing::debug!(
            "Registered layout '{}' with {} fields",
            layout.type_name,
            layout.fields.len()
        );
        layouts.insert(layout.type_name.clone(), Arc::new(layout));
        Ok(())
    }

    /// Registers an enumeration or flag set.
    pub fn register_enum(&self, definition: EnumDefinition) -> Result<()> {
        definition.validate()?;

        let mut enums = self.enums.write();
        if enums.contains_key(&definition.name) {
            return Err(PortError::AlreadyRegistered {
                type_name: definition.name,
            });
        }
        enums.insert(definition.name.clone(), Arc::new(definition));
        Ok(())
    }

    /// Checks if a record type is registered.
    pub fn contains(&self, type_name: &str) -> bool {
        self.layouts.read().contains_key(type_name)
    }

    /// Returns all registered record type names, sorted.
    pub fn type_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.layouts.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Retrieves the full layout of a record type.
    pub fn layout(&self, type_name: &str) -> Result<Arc<RecordLayout>> {
        self.layouts
            .read()
            .get(type_name)
            .cloned()
            .ok_or_else(|| PortError::SchemaNotFound {
                type_name: type_name.to_string(),
            })
    }

    /// Retrieves an enumeration by name.
    pub fn enum_definition(&self, enum_name: &str) -> Result<Arc<EnumDefinition>> {
        self.enums
            .read()
            .get(enum_name)
            .cloned()
            .ok_or_else(|| PortError::EnumNotFound {
                enum_name: enum_name.to_string(),
            })
    }

    /// Returns the ordered fields of `type_name` present at `version` on
    /// `platform`.
    ///
    /// Repeated calls with the same key return the same list.
    ///
    /// # Returns
    /// `Err(PortError::SchemaNotFound)` if the type has no layout at all.
    pub fn fields_of(
        &self,
        type_name: &str,
        version: SchemaVersion,
        platform: Platform,
    ) -> Result<FieldList> {
        self.fields_for(&SchemaKey::new(type_name, version, platform))
    }

    /// Same as [`SchemaRegistry::fields_of`] for an existing key.
    pub fn fields_for(&self, key: &SchemaKey) -> Result<FieldList> {
        let cached = self.cache.read().get(key).cloned();
        if let Some(fields) = cached.as_ref().and_then(|cell| cell.get()) {
            return Ok(fields.clone());
        }

        // Layouts are never replaced, so resolving it outside the guard is safe.
        let layout = self.layout(&key.type_name)?;

        let cell = match cached {
            Some(cell) => cell,
            None => self.cache.write().entry(key.clone()).or_default().clone(),
        };

        let fields = cell.get_or_init(|| {
            tracing::debug!("Computing field list for {}", key);
            layout
                .fields
                .iter()
                .filter(|field| field.applies_to(key.version, key.platform))
                .cloned()
                .collect()
        });
        Ok(fields.clone())
    }

    /// Number of keys with a computed field list.
    pub fn cached_key_count(&self) -> usize {
        self.cache
            .read()
            .values()
            .filter(|cell| cell.get().is_some())
            .count()
    }

    /// Creates a fresh instance of `key` with every field at its default.
    pub fn instantiate(&self, key: &SchemaKey) -> Result<RecordInstance> {
        RecordInstance::instantiate(self, key)
    }
}
