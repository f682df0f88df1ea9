use std::fmt;

use serde::{Deserialize, Serialize};

use crate::chunk::{ChunkReader, ChunkRecord, ChunkWriter};
use crate::error::Result;

const TYPE_SHIFT: u32 = 29;
const OFFSET_MASK: u32 = (1 << TYPE_SHIFT) - 1;

/// Region an address points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheAddressType {
    Memory,
    Definition,
    Data,
    SecondaryData,
    Unknown(u8),
}

impl CacheAddressType {
    fn from_bits(bits: u8) -> Self {
        match bits {
            0 => CacheAddressType::Memory,
            1 => CacheAddressType::Definition,
            2 => CacheAddressType::Data,
            3 => CacheAddressType::SecondaryData,
            other => CacheAddressType::Unknown(other),
        }
    }

    fn bits(self) -> u8 {
        match self {
            CacheAddressType::Memory => 0,
            CacheAddressType::Definition => 1,
            CacheAddressType::Data => 2,
            CacheAddressType::SecondaryData => 3,
            CacheAddressType::Unknown(bits) => bits & 0x7,
        }
    }
}

/// Packed address: 3-bit region type over a 29-bit offset.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheAddress(pub u32);

impl CacheAddress {
    pub fn new(kind: CacheAddressType, offset: u32) -> Self {
        CacheAddress(((kind.bits() as u32) << TYPE_SHIFT) | (offset & OFFSET_MASK))
    }

    pub fn kind(self) -> CacheAddressType {
        CacheAddressType::from_bits((self.0 >> TYPE_SHIFT) as u8)
    }

    pub fn offset(self) -> u32 {
        self.0 & OFFSET_MASK
    }
}

impl fmt::Debug for CacheAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CacheAddress({:?}, {:#x})", self.kind(), self.offset())
    }
}

impl ChunkRecord for CacheAddress {
    const SIZE: usize = 4;

    fn read(reader: &mut ChunkReader<'_>) -> Result<Self> {
        Ok(CacheAddress(reader.read_u32()?))
    }

    fn write(&self, writer: &mut ChunkWriter) {
        writer.write_u32(self.0);
    }
}
