use crate::error::{PortError, Result};

use super::record::ChunkRecord;
use super::{ByteOrder, ChunkHeader, Signature};

/// Builds a chunk stream in memory.
///
/// Sizes are written as placeholders by [`ChunkWriter::begin_chunk`] and
/// patched by the matching [`ChunkWriter::end_chunk`].
#[derive(Debug, Default)]
pub struct ChunkWriter {
    buffer: Vec<u8>,
    byte_order: ByteOrder,
    open: Vec<(Signature, usize)>,
}

impl ChunkWriter {
    pub fn new(byte_order: ByteOrder) -> Self {
        Self {
            buffer: Vec::new(),
            byte_order,
            open: Vec::new(),
        }
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    pub fn position(&self) -> usize {
        self.buffer.len()
    }

    /// Writes a chunk header with a placeholder size.
    pub fn begin_chunk(&mut self, signature: Signature) {
        self.write_u32(signature.0);
        self.open.push((signature, self.buffer.len()));
        self.write_u32(0);
    }

    /// Closes the innermost open chunk and patches its size.
    pub fn end_chunk(&mut self) -> Result<()> {
        let (signature, size_at) = self.open.pop().ok_or_else(|| {
            PortError::SerializationError("end_chunk called without an open chunk".to_string())
        })?;

        let payload = self.buffer.len() - size_at - 4;
        let size = u32::try_from(payload).map_err(|_| {
            PortError::SerializationError(format!(
                "chunk '{}' payload of {} bytes exceeds the size field",
                signature, payload
            ))
        })?;
        let bytes = self.byte_order.u32_bytes(size);
        self.buffer[size_at..size_at + 4].copy_from_slice(&bytes);
        Ok(())
    }

    /// Writes a complete chunk whose payload is produced by `body`.
    pub fn write_chunk<F>(&mut self, signature: Signature, body: F) -> Result<()>
    where
        F: FnOnce(&mut ChunkWriter) -> Result<()>,
    {
        self.begin_chunk(signature);
        body(self)?;
        self.end_chunk()
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    pub fn write_u16(&mut self, value: u16) {
        let bytes = self.byte_order.u16_bytes(value);
        self.buffer.extend_from_slice(&bytes);
    }

    pub fn write_u32(&mut self, value: u32) {
        let bytes = self.byte_order.u32_bytes(value);
        self.buffer.extend_from_slice(&bytes);
    }

    pub fn write_i32(&mut self, value: i32) {
        self.write_u32(value as u32);
    }

    pub fn write_u64(&mut self, value: u64) {
        let bytes = self.byte_order.u64_bytes(value);
        self.buffer.extend_from_slice(&bytes);
    }

    pub fn write_record<T: ChunkRecord>(&mut self, record: &T) {
        record.write(self);
    }

    pub fn write_records<T: ChunkRecord>(&mut self, records: &[T]) {
        self.buffer.reserve(records.len() * T::SIZE);
        for record in records {
            record.write(self);
        }
    }

    /// Returns the finished stream.
    ///
    /// # Returns
    /// `Err(PortError::SerializationError)` if a chunk is still open.
    pub fn finish(self) -> Result<Vec<u8>> {
        if let Some((signature, _)) = self.open.last() {
            return Err(PortError::SerializationError(format!(
                "chunk '{}' was never closed",
                signature
            )));
        }
        Ok(self.buffer)
    }
}

/// Header plus payload size of a chunk holding `payload` bytes.
pub fn chunk_len(payload: usize) -> usize {
    ChunkHeader::SIZE as usize + payload
}
