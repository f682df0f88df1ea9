//! Best-effort field-by-field translation between schema revisions.

use crate::config::PortConfig;
use crate::error::Result;
use crate::record::{RecordInstance, Value};
use crate::schema::{FieldDescriptor, FieldKind, SchemaKey, SchemaRegistry};

use super::diagnostics::{DiagnosticSink, NullSink, TranslationEvent};
use super::enum_translate::translate_enum;

static NULL_SINK: NullSink = NullSink;

/// Translates record instances from one schema key to another.
///
/// Fields are matched by case-insensitive name. Destination fields without
/// a qualifying source counterpart keep their default value; nothing about
/// an unmatched field is ever an error.
pub struct StructureTranslator<'a> {
    registry: &'a SchemaRegistry,
    sink: &'a dyn DiagnosticSink,
    report_unmatched: bool,
    pub(crate) parallel_threshold: usize,
}

/// Destination lookup entry: uppercased name and descriptor.
type LookupEntry<'f> = (String, &'f FieldDescriptor);

impl<'a> StructureTranslator<'a> {
    /// Creates a translator with default configuration and no diagnostics.
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self::from_config(registry, &NULL_SINK, &PortConfig::default())
    }

    /// Creates a translator reporting skip decisions to `sink`.
    pub fn with_sink(registry: &'a SchemaRegistry, sink: &'a dyn DiagnosticSink) -> Self {
        Self::from_config(registry, sink, &PortConfig::default())
    }

    pub fn from_config(
        registry: &'a SchemaRegistry,
        sink: &'a dyn DiagnosticSink,
        config: &PortConfig,
    ) -> Self {
        Self {
            registry,
            sink,
            report_unmatched: config.report_unmatched,
            parallel_threshold: config.parallel_threshold,
        }
    }

    pub fn registry(&self) -> &'a SchemaRegistry {
        self.registry
    }

    /// Translates `source`, laid out per `source_key`, into a fresh
    /// instance of `destination_key`.
    ///
    /// # Returns
    /// The fully allocated destination instance, or
    /// `Err(PortError::SchemaNotFound)`/`Err(PortError::EnumNotFound)` when
    /// either schema graph references something unregistered.
    pub fn translate(
        &self,
        source: &RecordInstance,
        source_key: &SchemaKey,
        destination_key: &SchemaKey,
    ) -> Result<RecordInstance> {
        let mut destination = self.registry.instantiate(destination_key)?;
        self.translate_fields(
            source,
            source_key,
            &mut destination,
            destination_key,
            &source_key.type_name,
        )?;
        Ok(destination)
    }

    fn translate_fields(
        &self,
        source: &RecordInstance,
        source_key: &SchemaKey,
        destination: &mut RecordInstance,
        destination_key: &SchemaKey,
        path: &str,
    ) -> Result<()> {
        let source_fields = self.registry.fields_for(source_key)?;
        let destination_fields = self.registry.fields_for(destination_key)?;

        let mut lookup: Vec<LookupEntry<'_>> = destination_fields
            .iter()
            .filter(|field| field.is_translatable())
            .map(|field| (field.name.to_ascii_uppercase(), field))
            .collect();
        lookup.sort_by(|a, b| a.0.cmp(&b.0));

        for source_field in source_fields.iter() {
            if !source_field.is_translatable() {
                continue;
            }
            let Some(value) = source.get(&source_field.name) else {
                continue;
            };
            if value.is_absent() {
                continue;
            }

            let name = source_field.name.to_ascii_uppercase();
            let position = match lookup.binary_search_by(|(entry, _)| entry.as_str().cmp(&name)) {
                Ok(position) => position,
                Err(_) => {
                    tracing::debug!("{}: no destination for '{}'", path, source_field.name);
                    if self.report_unmatched {
                        self.sink.record(TranslationEvent::Unmatched {
                            path: path.to_string(),
                            field: source_field.name.clone(),
                        });
                    }
                    continue;
                }
            };

            // A destination field is a match target at most once.
            let (_, destination_field) = lookup.remove(position);

            let translated = self.translate_value(
                value,
                source_field,
                source_key,
                destination_field,
                destination_key,
                path,
            )?;
            if let Some(translated) = translated {
                destination.set(&destination_field.name, translated)?;
            }
        }
        Ok(())
    }

    fn translate_value(
        &self,
        value: &Value,
        source_field: &FieldDescriptor,
        source_key: &SchemaKey,
        destination_field: &FieldDescriptor,
        destination_key: &SchemaKey,
        path: &str,
    ) -> Result<Option<Value>> {
        match (&source_field.kind, &destination_field.kind, value) {
            (FieldKind::Struct(source_type), FieldKind::Struct(destination_type), Value::Struct(record)) => {
                let nested_source = source_key.with_type(source_type);
                let nested_destination = destination_key.with_type(destination_type);
                let nested_path = format!("{}.{}", path, source_field.name);

                let mut translated = self.registry.instantiate(&nested_destination)?;
                self.translate_fields(
                    record,
                    &nested_source,
                    &mut translated,
                    &nested_destination,
                    &nested_path,
                )?;
                Ok(Some(Value::Struct(Box::new(translated))))
            }
            (FieldKind::Block(source_type), FieldKind::Block(destination_type), Value::Block(records)) => {
                let nested_source = source_key.with_type(source_type);
                let nested_destination = destination_key.with_type(destination_type);

                let mut translated = Vec::with_capacity(records.len());
                for (i, record) in records.iter().enumerate() {
                    let element_path = format!("{}.{}[{}]", path, source_field.name, i);
                    let mut element = self.registry.instantiate(&nested_destination)?;
                    self.translate_fields(
                        record,
                        &nested_source,
                        &mut element,
                        &nested_destination,
                        &element_path,
                    )?;
                    translated.push(element);
                }
                Ok(Some(Value::Block(translated)))
            }
            (FieldKind::Enum(source_enum), FieldKind::Enum(destination_enum), Value::Enum(raw))
                if source_enum != destination_enum =>
            {
                let source_definition = self.registry.enum_definition(source_enum)?;
                let destination_definition = self.registry.enum_definition(destination_enum)?;
                let outcome = translate_enum(Some(*raw), &source_definition, &destination_definition);

                if !outcome.dropped.is_empty() {
                    tracing::debug!(
                        "{}: '{}' dropped tokens {:?}",
                        path,
                        source_field.name,
                        outcome.dropped
                    );
                    self.sink.record(TranslationEvent::EnumTokensDropped {
                        path: path.to_string(),
                        field: source_field.name.clone(),
                        tokens: outcome.dropped,
                    });
                }
                if outcome.matched {
                    Ok(Some(Value::Enum(outcome.value)))
                } else {
                    self.sink.record(TranslationEvent::EnumUnmatched {
                        path: path.to_string(),
                        field: source_field.name.clone(),
                    });
                    Ok(None)
                }
            }
            (source_kind, destination_kind, value)
                if source_kind == destination_kind && value.conforms_to(destination_kind) =>
            {
                Ok(Some(value.clone()))
            }
            (source_kind, destination_kind, _) => {
                tracing::warn!(
                    "{}: field '{}' changed kind from {} to {}, value dropped",
                    path,
                    source_field.name,
                    source_kind,
                    destination_kind
                );
                self.sink.record(TranslationEvent::KindMismatch {
                    path: path.to_string(),
                    field: source_field.name.clone(),
                    source: source_kind.to_string(),
                    destination: destination_kind.to_string(),
                });
                Ok(None)
            }
        }
    }
}
