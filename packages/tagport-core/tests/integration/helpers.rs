//! Shared fixtures for integration tests.

use tagport_core::chunk::{ByteOrder, ChunkWriter, Signature};
use tagport_core::record::{RecordInstance, TagReference, Value};
use tagport_core::resource::XSyncStateHeader;
use tagport_core::schema::{parse_catalog, Platform, SchemaKey, SchemaRegistry, SchemaVersion};

/// Two revisions of a weapon definition.
pub const WEAPON_CATALOG: &str = r#"{
    "version": 1,
    "records": [
        {
            "name": "zoom_levels",
            "fields": [
                { "name": "magnification_min", "type": "f32" },
                { "name": "magnification_max", "type": "f32" }
            ]
        },
        {
            "name": "barrel",
            "fields": [
                { "name": "rounds_per_second", "type": "f32" },
                { "name": "pad", "type": "bytes:4", "padding": true },
                { "name": "firing_noise", "type": "tag_reference", "valid_groups": ["snd!"] },
                { "name": "magazine_index", "type": "i16" }
            ]
        },
        {
            "name": "weapon",
            "fields": [
                { "name": "name", "type": "string" },
                { "name": "flags", "type": "flags:weapon_flags_v1", "max_version": 1 },
                { "name": "flags", "type": "flags:weapon_flags_v2", "min_version": 2 },
                { "name": "multiplayer_object_type", "type": "enum:multiplayer_object_type" },
                { "name": "barrels", "type": "block:barrel" },
                { "name": "zoom", "type": "struct:zoom_levels" },
                { "name": "heat_recovery", "type": "f32", "max_version": 1 },
                { "name": "heat_recovery", "type": "u16", "min_version": 2 },
                { "name": "runtime_index", "type": "u32", "runtime": true },
                { "name": "legacy_tracer", "type": "tag_reference", "max_version": 1 },
                { "name": "overheat_sound", "type": "tag_reference", "min_version": 2 },
                { "name": "xbox_pad", "type": "bytes:8", "padding": true, "platforms": ["xbox360"] }
            ]
        }
    ],
    "enums": [
        {
            "name": "weapon_flags_v1",
            "flags": true,
            "members": [
                { "name": "vertical_heat_display" },
                { "name": "mutually_exclusive_triggers" },
                { "name": "attacks_automatically_on_bump" },
                { "name": "must_be_readied" }
            ]
        },
        {
            "name": "weapon_flags_v2",
            "flags": true,
            "members": [
                { "name": "must_be_readied" },
                { "name": "vertical_heat_display" },
                { "name": "prevents_crouching" },
                { "name": "attacks_automatically_on_bump" }
            ]
        },
        {
            "name": "multiplayer_object_type",
            "members": [{ "name": "none" }, { "name": "flag" }, { "name": "ball" }]
        }
    ]
}"#;

pub fn weapon_registry() -> SchemaRegistry {
    let registry = SchemaRegistry::new();
    parse_catalog(WEAPON_CATALOG, &registry).unwrap();
    registry
}

pub fn weapon_key(version: u32, platform: Platform) -> SchemaKey {
    SchemaKey::new("weapon", SchemaVersion(version), platform)
}

pub fn tag(group: &str, index: u32) -> Value {
    Value::TagRef(Some(TagReference::new(group.parse().unwrap(), index)))
}

/// Fully populated revision 1 weapon with `barrel_count` barrels.
pub fn sample_weapon(registry: &SchemaRegistry, barrel_count: usize) -> RecordInstance {
    let key = weapon_key(1, Platform::Xbox360);
    let mut weapon = registry.instantiate(&key).unwrap();

    let barrels = (0..barrel_count)
        .map(|i| {
            let mut barrel = registry.instantiate(&key.with_type("barrel")).unwrap();
            barrel.set("rounds_per_second", Value::F32(8.0 + i as f32)).unwrap();
            barrel.set("pad", Value::Bytes(vec![0xCD; 4])).unwrap();
            barrel.set("firing_noise", tag("snd!", 0x40 + i as u32)).unwrap();
            barrel.set("magazine_index", Value::I16(i as i16)).unwrap();
            barrel
        })
        .collect();

    let mut zoom = registry.instantiate(&key.with_type("zoom_levels")).unwrap();
    zoom.set("magnification_min", Value::F32(1.5)).unwrap();
    zoom.set("magnification_max", Value::F32(4.0)).unwrap();

    weapon.set("name", Value::String("assault_rifle".into())).unwrap();
    // vertical_heat_display | attacks_automatically_on_bump | must_be_readied
    weapon.set("flags", Value::Enum(0b1101)).unwrap();
    weapon.set("multiplayer_object_type", Value::Enum(2)).unwrap();
    weapon.set("barrels", Value::Block(barrels)).unwrap();
    weapon.set("zoom", Value::Struct(Box::new(zoom))).unwrap();
    weapon.set("heat_recovery", Value::F32(0.25)).unwrap();
    weapon.set("runtime_index", Value::U32(77)).unwrap();
    weapon.set("legacy_tracer", tag("proj", 3)).unwrap();
    weapon.set("xbox_pad", Value::Bytes(vec![0xFF; 8])).unwrap();
    weapon
}

/// Serialized xsync header followed by chunks produced by `chunks`.
pub fn resource_blob<F>(header: XSyncStateHeader, byte_order: ByteOrder, chunks: F) -> Vec<u8>
where
    F: FnOnce(&mut ChunkWriter),
{
    let mut writer = ChunkWriter::new(byte_order);
    writer.write_record(&header);
    chunks(&mut writer);
    writer.finish().unwrap()
}

/// Writes a leaf chunk holding `payload`.
pub fn leaf(writer: &mut ChunkWriter, code: &[u8; 4], payload: &[u8]) {
    writer.begin_chunk(Signature::from_bytes(code));
    writer.write_bytes(payload);
    writer.end_chunk().unwrap();
}
