//! Chunk container and resource fixup tests.

use std::io::Cursor;

use anyhow::Context;

use tagport_core::chunk::{ByteOrder, ChunkReader, ChunkWriter, Signature};
use tagport_core::resource::{
    load_resource_file, CacheAddress, CacheAddressType, InteropTypeId, ResourceFixupLocation,
    ResourceXSyncState, XSyncStateHeader,
};
use tagport_core::{PortConfig, PortError};

use super::helpers::{leaf, resource_blob};

fn fixup(block_offset: u32, kind: CacheAddressType, offset: u32) -> ResourceFixupLocation {
    ResourceFixupLocation {
        block_offset,
        address: CacheAddress::new(kind, offset),
    }
}

fn sample_state() -> ResourceXSyncState {
    let mut state = ResourceXSyncState {
        owner: 0xE1A2_0042,
        control_fixups: vec![
            fixup(0x00, CacheAddressType::Definition, 0x40),
            fixup(0x10, CacheAddressType::Data, 0x1_0000),
        ],
        pageable_fixups: vec![fixup(0x20, CacheAddressType::Data, 0x800)],
        optional_fixups: vec![fixup(0x30, CacheAddressType::SecondaryData, 0x80)],
        interop_types: vec![
            InteropTypeId::from_guid_bytes([0x11; 16]),
            InteropTypeId::from_guid_bytes([0x22; 16]),
        ],
        control_data: (0u8..48).collect(),
        ..ResourceXSyncState::default()
    };
    state.header.control_alignment_bits = 4;
    state.header.root_address = CacheAddress::new(CacheAddressType::Definition, 0);
    state.header = state.synced_header().unwrap();
    state
}

fn config(byte_order: ByteOrder) -> PortConfig {
    PortConfig {
        byte_order,
        ..PortConfig::default()
    }
}

#[test]
fn test_round_trip_both_byte_orders() {
    let state = sample_state();
    for byte_order in [ByteOrder::Little, ByteOrder::Big] {
        let bytes = state.to_bytes(byte_order).unwrap();
        let parsed =
            ResourceXSyncState::from_bytes(state.owner, &bytes, &config(byte_order)).unwrap();
        assert_eq!(parsed, state, "{:?}", byte_order);
        assert!(parsed.validate().is_ok());
    }
}

#[test]
fn test_page_chunk_stride_mismatch() {
    let bytes = resource_blob(XSyncStateHeader::default(), ByteOrder::Little, |w| {
        w.begin_chunk(Signature::from_bytes(b"xsrc"));
        leaf(w, b"page", &[0u8; 13]);
        w.end_chunk().unwrap();
    });

    let result = ResourceXSyncState::from_bytes(1, &bytes, &PortConfig::default());
    assert_eq!(
        result.unwrap_err(),
        PortError::StrideMismatch {
            signature: "page".to_string(),
            size: 13,
            stride: 8,
        }
    );
}

#[test]
fn test_header_count_limits_interop_types() {
    let header = XSyncStateHeader {
        interop_usage_count: 3,
        ..XSyncStateHeader::default()
    };
    let ids: Vec<u8> = (0u8..64).collect();
    let bytes = resource_blob(header, ByteOrder::Big, |w| {
        w.begin_chunk(Signature::from_bytes(b"xsrc"));
        w.begin_chunk(Signature::from_bytes(b"inrc"));
        leaf(w, b"inus", &ids);
        w.end_chunk().unwrap();
        w.end_chunk().unwrap();
    });

    let state = ResourceXSyncState::from_bytes(7, &bytes, &config(ByteOrder::Big)).unwrap();
    assert_eq!(state.interop_types.len(), 3);
    let mut third = [0u8; 16];
    third.copy_from_slice(&ids[32..48]);
    assert_eq!(state.interop_types[2].guid_bytes(), third);
}

#[test]
fn test_interop_count_exceeding_chunk() {
    let header = XSyncStateHeader {
        interop_usage_count: 5,
        ..XSyncStateHeader::default()
    };
    let bytes = resource_blob(header, ByteOrder::Little, |w| {
        w.begin_chunk(Signature::from_bytes(b"xsrc"));
        w.begin_chunk(Signature::from_bytes(b"inrc"));
        leaf(w, b"inus", &[0u8; 64]);
        w.end_chunk().unwrap();
        w.end_chunk().unwrap();
    });

    assert_eq!(
        ResourceXSyncState::from_bytes(7, &bytes, &PortConfig::default()).unwrap_err(),
        PortError::TruncatedHeader {
            needed: 80,
            remaining: 64,
        }
    );
}

#[test]
fn test_unknown_chunks_skipped() {
    let fixups = [fixup(4, CacheAddressType::Data, 0x100)];
    let bytes = resource_blob(XSyncStateHeader::default(), ByteOrder::Little, |w| {
        leaf(w, b"zzzz", b"ignored payload");
        w.begin_chunk(Signature::from_bytes(b"xsrc"));
        leaf(w, b"blob", &[0xAA; 3]);
        w.write_chunk(Signature::from_bytes(b"page"), |w| {
            w.write_records(&fixups);
            Ok(())
        })
        .unwrap();
        w.end_chunk().unwrap();
    });

    let state = ResourceXSyncState::from_bytes(2, &bytes, &PortConfig::default()).unwrap();
    assert_eq!(state.pageable_fixups, fixups.to_vec());
    assert!(state.control_fixups.is_empty());
    assert!(state.interop_types.is_empty());
}

#[test]
fn test_chunk_overrun() {
    let mut bytes = resource_blob(XSyncStateHeader::default(), ByteOrder::Little, |w| {
        leaf(w, b"page", &[0u8; 16]);
    });
    // Drop the last four payload bytes
    bytes.truncate(bytes.len() - 4);

    assert_eq!(
        ResourceXSyncState::from_bytes(1, &bytes, &PortConfig::default()).unwrap_err(),
        PortError::ChunkOverrun {
            signature: "page".to_string(),
            declared: 16,
            remaining: 12,
        }
    );
}

#[test]
fn test_nested_regions_bound_reads() {
    let mut writer = ChunkWriter::new(ByteOrder::Little);
    writer.write_u32(0xDEAD_BEEF);
    writer.begin_chunk(Signature::from_bytes(b"outr"));
    leaf(&mut writer, b"innr", &[1, 2, 3, 4]);
    writer.end_chunk().unwrap();
    leaf(&mut writer, b"tail", &[9]);
    let bytes = writer.finish().unwrap();

    let mut cursor = Cursor::new(bytes);
    let mut reader = ChunkReader::new(&mut cursor, ByteOrder::Little).unwrap();
    assert_eq!(reader.read_u32().unwrap(), 0xDEAD_BEEF);

    let outer = reader.next_chunk().unwrap().unwrap();
    assert_eq!(outer.signature(), Signature::from_bytes(b"outr"));
    {
        let mut nested = reader.chunk_reader(&outer).unwrap();
        let inner = nested.next_chunk().unwrap().unwrap();
        assert_eq!(inner.signature().to_string(), "innr");
        let mut payload = nested.chunk_reader(&inner).unwrap();
        assert_eq!(payload.read_u16().unwrap(), 0x0201);
        assert_eq!(payload.read_u16().unwrap(), 0x0403);
        assert!(matches!(payload.read_u8(), Err(PortError::TruncatedHeader { .. })));
        assert!(nested.next_chunk().unwrap().is_none());
    }

    let tail = reader.next_chunk().unwrap().unwrap();
    assert_eq!(reader.chunk_bytes(&tail).unwrap(), vec![9]);
    assert!(reader.next_chunk().unwrap().is_none());
}

#[test]
fn test_load_resource_file() -> anyhow::Result<()> {
    let state = sample_state();
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("resource.xsync");
    std::fs::write(&path, state.to_bytes(ByteOrder::Big)?).context("Failed to write blob")?;

    let loaded = load_resource_file(&path, state.owner, &config(ByteOrder::Big))
        .with_context(|| format!("Failed to load {}", path.display()))?;
    assert_eq!(loaded, state);
    assert_eq!(
        loaded.control_fixups[1].address.kind(),
        CacheAddressType::Data
    );
    assert_eq!(loaded.control_fixups[1].address.offset(), 0x1_0000);

    let missing = dir.path().join("missing.xsync");
    assert!(matches!(
        load_resource_file(&missing, 0, &PortConfig::default()),
        Err(PortError::Io(_))
    ));
    Ok(())
}
