use std::fmt;

use uuid::Uuid;

use crate::chunk::{ChunkReader, ChunkRecord, ChunkWriter};
use crate::error::Result;

use super::address::CacheAddress;

/// Address relocation applied when staged resource bytes are mapped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ResourceFixupLocation {
    /// Offset of the pointer within the control data
    pub block_offset: u32,
    /// Address the pointer must resolve to
    pub address: CacheAddress,
}

impl ChunkRecord for ResourceFixupLocation {
    const SIZE: usize = 8;

    fn read(reader: &mut ChunkReader<'_>) -> Result<Self> {
        Ok(Self {
            block_offset: reader.read_u32()?,
            address: reader.read_record()?,
        })
    }

    fn write(&self, writer: &mut ChunkWriter) {
        writer.write_u32(self.block_offset);
        writer.write_record(&self.address);
    }
}

/// Interop type identifier, stored as a 16-byte GUID in its mixed-endian
/// layout regardless of the stream byte order.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InteropTypeId(pub Uuid);

impl InteropTypeId {
    pub fn from_guid_bytes(bytes: [u8; 16]) -> Self {
        InteropTypeId(Uuid::from_bytes_le(bytes))
    }

    pub fn guid_bytes(&self) -> [u8; 16] {
        self.0.to_bytes_le()
    }
}

impl fmt::Display for InteropTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for InteropTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InteropTypeId({})", self.0)
    }
}

impl ChunkRecord for InteropTypeId {
    const SIZE: usize = 16;

    fn read(reader: &mut ChunkReader<'_>) -> Result<Self> {
        let bytes = reader.read_bytes(Self::SIZE)?;
        let mut guid = [0u8; 16];
        guid.copy_from_slice(&bytes);
        Ok(Self::from_guid_bytes(guid))
    }

    fn write(&self, writer: &mut ChunkWriter) {
        writer.write_bytes(&self.guid_bytes());
    }
}
