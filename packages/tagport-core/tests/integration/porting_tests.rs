//! Registry, structure translator and enumerated-value translator tests.

use anyhow::Context;
use ntest::timeout;
use std::sync::Arc;
use std::thread;

use tagport_core::record::Value;
use tagport_core::schema::{load_catalog, Platform, SchemaRegistry};
use tagport_core::translate::{
    translate_flag_string, CollectingSink, StructureTranslator, TranslationEvent,
};
use tagport_core::{PortConfig, PortError};

use super::helpers::{sample_weapon, tag, weapon_key, weapon_registry, WEAPON_CATALOG};

#[test]
fn test_fields_of_per_revision_and_platform() {
    let registry = weapon_registry();

    let names = |version: u32, platform: Platform| -> Vec<String> {
        registry
            .fields_for(&weapon_key(version, platform))
            .unwrap()
            .iter()
            .map(|field| field.name.clone())
            .collect()
    };

    let v1_xbox = names(1, Platform::Xbox360);
    assert!(v1_xbox.contains(&"legacy_tracer".to_string()));
    assert!(v1_xbox.contains(&"xbox_pad".to_string()));
    assert!(!v1_xbox.contains(&"overheat_sound".to_string()));

    let v2_pc = names(2, Platform::MccPc64);
    assert!(v2_pc.contains(&"overheat_sound".to_string()));
    assert!(!v2_pc.contains(&"xbox_pad".to_string()));
    assert!(!v2_pc.contains(&"legacy_tracer".to_string()));
    assert_eq!(v2_pc.first().map(String::as_str), Some("name"));
}

#[test]
fn test_identical_schema_round_trip() {
    let registry = weapon_registry();
    let source = sample_weapon(&registry, 3);
    let key = weapon_key(1, Platform::Xbox360);

    let ported = StructureTranslator::new(&registry)
        .translate(&source, &key, &key)
        .unwrap();

    for field in ["name", "flags", "multiplayer_object_type", "zoom", "heat_recovery", "legacy_tracer"] {
        assert_eq!(ported.get(field), source.get(field), "{}", field);
    }
    // Padding and runtime fields come back as defaults, not the source bytes
    assert_eq!(ported.get("runtime_index"), Some(&Value::U32(0)));
    assert_eq!(ported.get("xbox_pad"), Some(&Value::Bytes(vec![0; 8])));

    let Some(Value::Block(barrels)) = ported.get("barrels") else {
        panic!("barrels should be a block");
    };
    assert_eq!(barrels.len(), 3);
    for (i, barrel) in barrels.iter().enumerate() {
        assert_eq!(barrel.get("firing_noise"), Some(&tag("snd!", 0x40 + i as u32)));
        assert_eq!(barrel.get("pad"), Some(&Value::Bytes(vec![0; 4])));
    }
    assert!(ported.validate(&registry, &key).is_ok());
}

#[test]
fn test_cross_revision_port() {
    let registry = weapon_registry();
    let source = sample_weapon(&registry, 2);
    let sink = CollectingSink::new();
    let config = PortConfig {
        report_unmatched: true,
        ..PortConfig::default()
    };
    let translator = StructureTranslator::from_config(&registry, &sink, &config);

    let destination_key = weapon_key(2, Platform::MccPc64);
    let ported = translator
        .translate(&source, &weapon_key(1, Platform::Xbox360), &destination_key)
        .unwrap();

    // Same three tokens, new bit positions
    // must_be_readied=1, vertical_heat_display=2, attacks_automatically_on_bump=8
    assert_eq!(ported.get("flags"), Some(&Value::Enum(0b1011)));
    assert_eq!(ported.get("multiplayer_object_type"), Some(&Value::Enum(2)));

    // Unmatched destination fields hold fresh defaults
    assert_eq!(ported.get("overheat_sound"), Some(&Value::TagRef(None)));
    // f32 -> u16 is a kind change: left at default and reported
    assert_eq!(ported.get("heat_recovery"), Some(&Value::U16(0)));
    assert!(ported.get("xbox_pad").is_none());

    let events = sink.events();
    assert!(events.iter().any(|event| matches!(
        event,
        TranslationEvent::KindMismatch { field, .. } if field == "heat_recovery"
    )));
    assert!(events.contains(&TranslationEvent::Unmatched {
        path: "weapon".to_string(),
        field: "legacy_tracer".to_string(),
    }));
    assert!(ported.validate(&registry, &destination_key).is_ok());
}

#[test]
fn test_nested_paths_in_diagnostics() {
    let registry = SchemaRegistry::new();
    tagport_core::schema::parse_catalog(
        r#"{
            "version": 1,
            "records": [
                { "name": "child", "fields": [
                    { "name": "scale", "type": "f32", "max_version": 1 },
                    { "name": "scale", "type": "array:f32", "min_version": 2 }
                ] },
                { "name": "parent", "fields": [{ "name": "children", "type": "block:child" }] }
            ]
        }"#,
        &registry,
    )
    .unwrap();

    let v1 = tagport_core::schema::SchemaKey::new(
        "parent",
        tagport_core::schema::SchemaVersion(1),
        Platform::Any,
    );
    let v2 = tagport_core::schema::SchemaKey::new(
        "parent",
        tagport_core::schema::SchemaVersion(2),
        Platform::Any,
    );

    let child = tagport_core::record::RecordInstance::new("child").with_field("scale", Value::F32(2.0));
    let source = tagport_core::record::RecordInstance::new("parent")
        .with_field("children", Value::Block(vec![child.clone(), child]));

    let sink = CollectingSink::new();
    let ported = StructureTranslator::with_sink(&registry, &sink)
        .translate(&source, &v1, &v2)
        .unwrap();

    let Some(Value::Block(children)) = ported.get("children") else {
        panic!("children should be a block");
    };
    assert_eq!(children[1].get("scale"), Some(&Value::Array(Vec::new())));

    let paths: Vec<String> = sink
        .events()
        .into_iter()
        .filter_map(|event| match event {
            TranslationEvent::KindMismatch { path, .. } => Some(path),
            _ => None,
        })
        .collect();
    assert_eq!(paths, vec!["parent.children[0]", "parent.children[1]"]);
}

#[test]
fn test_flag_string_partial_match() {
    let registry = weapon_registry();
    let destination = registry.enum_definition("weapon_flags_v2").unwrap();

    let result = translate_flag_string(
        "vertical_heat_display, not_a_real_flag, ATTACKS_AUTOMATICALLY_ON_BUMP",
        &destination,
    );

    assert!(result.matched);
    assert_eq!(
        destination.tokens(result.value),
        vec!["vertical_heat_display", "attacks_automatically_on_bump"]
    );
    assert_eq!(result.dropped, vec!["not_a_real_flag".to_string()]);
}

#[test]
fn test_missing_schema_is_fatal() {
    let registry = weapon_registry();
    let source = sample_weapon(&registry, 1);
    let result = StructureTranslator::new(&registry).translate(
        &source,
        &weapon_key(1, Platform::Any),
        &weapon_key(1, Platform::Any).with_type("vehicle"),
    );
    assert_eq!(
        result.unwrap_err(),
        PortError::SchemaNotFound {
            type_name: "vehicle".to_string()
        }
    );
}

#[test]
fn test_catalog_file_loading() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("weapon.json");
    std::fs::write(&path, WEAPON_CATALOG).context("Failed to write catalog")?;

    let registry = SchemaRegistry::new();
    let count = load_catalog(&path, &registry)?;
    anyhow::ensure!(count == 3, "expected 3 record layouts, loaded {}", count);
    assert_eq!(registry.type_names(), vec!["barrel", "weapon", "zoom_levels"]);

    // Registering the same catalog twice is a configuration error
    assert!(matches!(
        load_catalog(&path, &registry),
        Err(PortError::AlreadyRegistered { .. })
    ));
    Ok(())
}

/// Destination keys start cold and are first queried from many threads at once
#[timeout(10000)]
#[test]
fn test_concurrent_translation() {
    let registry = Arc::new(weapon_registry());
    let source = Arc::new(sample_weapon(&registry, 4));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let registry = Arc::clone(&registry);
            let source = Arc::clone(&source);
            thread::spawn(move || {
                let translator = StructureTranslator::new(&registry);
                let platform = if i % 2 == 0 {
                    Platform::Pc64
                } else {
                    Platform::MccPc64
                };
                for _ in 0..50 {
                    let ported = translator
                        .translate(&source, &weapon_key(1, Platform::Xbox360), &weapon_key(2, platform))
                        .unwrap();
                    assert_eq!(ported.get("name"), source.get("name"));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    // One list per distinct key: weapon/barrel/zoom_levels at the source key
    // and at each of the two destination keys
    assert_eq!(registry.cached_key_count(), 9);
}

#[timeout(10000)]
#[test]
fn test_batch_translation_order() {
    let registry = weapon_registry();
    let records: Vec<_> = (0..150).map(|i| sample_weapon(&registry, i % 5)).collect();
    let config = PortConfig {
        parallel_threshold: 8,
        ..PortConfig::default()
    };
    let sink = CollectingSink::new();
    let translator = StructureTranslator::from_config(&registry, &sink, &config);

    let results = translator.translate_batch(
        &records,
        &weapon_key(1, Platform::Xbox360),
        &weapon_key(2, Platform::Pc64),
    );

    assert_eq!(results.len(), records.len());
    for (i, result) in results.into_iter().enumerate() {
        let ported = result.unwrap();
        let Some(Value::Block(barrels)) = ported.get("barrels") else {
            panic!("barrels should be a block");
        };
        assert_eq!(barrels.len(), i % 5);
    }
    // Every record reports its heat_recovery kind change
    let mismatches = sink
        .events()
        .iter()
        .filter(|event| matches!(event, TranslationEvent::KindMismatch { .. }))
        .count();
    assert_eq!(mismatches, records.len());
}
