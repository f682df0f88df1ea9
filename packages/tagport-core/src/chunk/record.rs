use crate::error::Result;

use super::reader::ChunkReader;
use super::writer::ChunkWriter;

/// Fixed-stride record stored in a leaf chunk.
pub trait ChunkRecord: Sized {
    /// Serialized size in bytes
    const SIZE: usize;

    fn read(reader: &mut ChunkReader<'_>) -> Result<Self>;

    fn write(&self, writer: &mut ChunkWriter);
}

impl ChunkRecord for u32 {
    const SIZE: usize = 4;

    fn read(reader: &mut ChunkReader<'_>) -> Result<Self> {
        reader.read_u32()
    }

    fn write(&self, writer: &mut ChunkWriter) {
        writer.write_u32(*self);
    }
}
