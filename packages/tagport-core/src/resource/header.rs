use crate::chunk::{ChunkReader, ChunkRecord, ChunkWriter};
use crate::error::Result;

use super::address::CacheAddress;

/// Fixed 0x24-byte header preceding the chunks of a resource xsync state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct XSyncStateHeader {
    pub cache_location_offset: u32,
    pub cache_location_size: u32,
    pub optional_location_offset: u32,
    pub optional_location_size: u32,
    pub control_alignment_bits: u32,
    /// Length of the `data` chunk payload
    pub control_data_size: u32,
    /// Number of `ctrl` entries
    pub control_fixup_count: u32,
    /// Number of `inus` identifiers
    pub interop_usage_count: u32,
    pub root_address: CacheAddress,
}

impl ChunkRecord for XSyncStateHeader {
    const SIZE: usize = 0x24;

    fn read(reader: &mut ChunkReader<'_>) -> Result<Self> {
        Ok(Self {
            cache_location_offset: reader.read_u32()?,
            cache_location_size: reader.read_u32()?,
            optional_location_offset: reader.read_u32()?,
            optional_location_size: reader.read_u32()?,
            control_alignment_bits: reader.read_u32()?,
            control_data_size: reader.read_u32()?,
            control_fixup_count: reader.read_u32()?,
            interop_usage_count: reader.read_u32()?,
            root_address: reader.read_record()?,
        })
    }

    fn write(&self, writer: &mut ChunkWriter) {
        writer.write_u32(self.cache_location_offset);
        writer.write_u32(self.cache_location_size);
        writer.write_u32(self.optional_location_offset);
        writer.write_u32(self.optional_location_size);
        writer.write_u32(self.control_alignment_bits);
        writer.write_u32(self.control_data_size);
        writer.write_u32(self.control_fixup_count);
        writer.write_u32(self.interop_usage_count);
        writer.write_record(&self.root_address);
    }
}
