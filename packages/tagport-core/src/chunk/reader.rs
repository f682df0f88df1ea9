use std::io::SeekFrom;

use crate::config::PortConfig;
use crate::error::{classify_io_error, PortError, Result};

use super::record::ChunkRecord;
use super::{ByteOrder, ChunkHeader, ReadSeek, Signature};

/// Chunk located by [`ChunkReader::next_chunk`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    pub header: ChunkHeader,
    /// Absolute stream offset of the payload
    pub offset: u64,
}

impl Chunk {
    pub fn signature(&self) -> Signature {
        self.header.signature
    }

    pub fn size(&self) -> u64 {
        self.header.size as u64
    }
}

/// Reader over one bounded region of a chunk stream.
///
/// Positions are absolute, so a nested reader and its parent share the
/// underlying stream. Each call to [`ChunkReader::next_chunk`] seeks to the
/// next header, whether or not the previous payload was consumed. Values
/// read before the first chunk (a fixed header) are skipped by the chunk
/// walk.
pub struct ChunkReader<'a> {
    stream: &'a mut dyn ReadSeek,
    byte_order: ByteOrder,
    end: u64,
    next: u64,
    depth: usize,
    max_depth: usize,
}

impl<'a> ChunkReader<'a> {
    /// Creates a reader over the rest of `stream`.
    pub fn new(stream: &'a mut dyn ReadSeek, byte_order: ByteOrder) -> Result<Self> {
        Self::with_limits(stream, byte_order, PortConfig::default().max_chunk_depth)
    }

    pub fn with_config(stream: &'a mut dyn ReadSeek, config: &PortConfig) -> Result<Self> {
        Self::with_limits(stream, config.byte_order, config.max_chunk_depth)
    }

    fn with_limits(stream: &'a mut dyn ReadSeek, byte_order: ByteOrder, max_depth: usize) -> Result<Self> {
        let start = stream
            .stream_position()
            .map_err(|e| classify_io_error(e, "Failed to query stream position"))?;
        let end = stream
            .seek(SeekFrom::End(0))
            .map_err(|e| classify_io_error(e, "Failed to seek chunk stream"))?;
        stream
            .seek(SeekFrom::Start(start))
            .map_err(|e| classify_io_error(e, "Failed to seek chunk stream"))?;

        Ok(Self {
            stream,
            byte_order,
            end,
            next: start,
            depth: 0,
            max_depth,
        })
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Nesting depth; the outermost reader is at depth 0.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn position(&mut self) -> Result<u64> {
        self.stream
            .stream_position()
            .map_err(|e| classify_io_error(e, "Failed to query stream position"))
    }

    /// Bytes left between the current position and the end of the region.
    pub fn remaining(&mut self) -> Result<u64> {
        let position = self.position()?;
        Ok(self.end.saturating_sub(position))
    }

    /// Advances to the next chunk header of this region.
    ///
    /// The walk is sequential and forward only: call this until it yields
    /// `Ok(None)`. Walking a region again needs a fresh reader.
    ///
    /// # Returns
    /// `Ok(None)` at the end of the region, `Err(PortError::ChunkOverrun)`
    /// if the declared size runs past it.
    pub fn next_chunk(&mut self) -> Result<Option<Chunk>> {
        if self.next >= self.end {
            return Ok(None);
        }

        let remaining = self.end - self.next;
        if remaining < ChunkHeader::SIZE {
            return Err(PortError::TruncatedHeader {
                needed: ChunkHeader::SIZE,
                remaining,
            });
        }

        self.seek(self.next)?;
        let signature = Signature(self.read_u32()?);
        let size = self.read_u32()?;

        let available = remaining - ChunkHeader::SIZE;
        if size as u64 > available {
            return Err(PortError::ChunkOverrun {
                signature: signature.to_string(),
                declared: size as u64,
                remaining: available,
            });
        }

        let chunk = Chunk {
            header: ChunkHeader { signature, size },
            offset: self.next + ChunkHeader::SIZE,
        };
        self.next = chunk.offset + size as u64;

        tracing::trace!(
            "Chunk '{}' ({} bytes) at {:#x}, depth {}",
            signature,
            size,
            chunk.offset,
            self.depth
        );
        Ok(Some(chunk))
    }

    /// Opens the payload of `chunk` as a nested region.
    pub fn chunk_reader(&mut self, chunk: &Chunk) -> Result<ChunkReader<'_>> {
        let depth = self.depth + 1;
        if depth > self.max_depth {
            return Err(PortError::ChunkDepthExceeded { depth });
        }

        self.seek(chunk.offset)?;
        Ok(ChunkReader {
            stream: &mut *self.stream,
            byte_order: self.byte_order,
            end: chunk.offset + chunk.size(),
            next: chunk.offset,
            depth,
            max_depth: self.max_depth,
        })
    }

    /// Reads the whole payload of `chunk`.
    pub fn chunk_bytes(&mut self, chunk: &Chunk) -> Result<Vec<u8>> {
        self.seek(chunk.offset)?;
        let size = chunk.size() as usize;
        self.read_bytes(size)
    }

    fn seek(&mut self, position: u64) -> Result<()> {
        self.stream
            .seek(SeekFrom::Start(position))
            .map_err(|e| classify_io_error(e, "Failed to seek chunk stream"))?;
        Ok(())
    }

    /// Bytes read directly from the region move the chunk cursor past
    /// them, so a fixed header may precede the chunks.
    fn mark_consumed(&mut self) -> Result<()> {
        let position = self.position()?;
        if position > self.next {
            self.next = position;
        }
        Ok(())
    }

    fn ensure_available(&mut self, needed: u64) -> Result<()> {
        let remaining = self.remaining()?;
        if needed > remaining {
            return Err(PortError::TruncatedHeader { needed, remaining });
        }
        Ok(())
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        self.ensure_available(N as u64)?;
        let mut bytes = [0u8; N];
        self.stream
            .read_exact(&mut bytes)
            .map_err(|e| classify_io_error(e, "Failed to read chunk stream"))?;
        self.mark_consumed()?;
        Ok(bytes)
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        self.ensure_available(len as u64)?;
        let mut bytes = vec![0u8; len];
        self.stream
            .read_exact(&mut bytes)
            .map_err(|e| classify_io_error(e, "Failed to read chunk stream"))?;
        self.mark_consumed()?;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        let bytes = self.read_array()?;
        Ok(self.byte_order.u16_from(bytes))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.read_array()?;
        Ok(self.byte_order.u32_from(bytes))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(self.read_u32()? as i32)
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        let bytes = self.read_array()?;
        Ok(self.byte_order.u64_from(bytes))
    }

    pub fn read_record<T: ChunkRecord>(&mut self) -> Result<T> {
        T::read(self)
    }

    /// Reads exactly `count` records, failing before any allocation if they
    /// cannot fit in the region.
    pub fn read_records<T: ChunkRecord>(&mut self, count: usize) -> Result<Vec<T>> {
        self.ensure_available(count as u64 * T::SIZE as u64)?;
        (0..count).map(|_| T::read(self)).collect()
    }

    /// Reads the rest of the region as a record array whose count is
    /// derived from its length.
    ///
    /// # Returns
    /// `Err(PortError::StrideMismatch)` if the length is not an exact
    /// multiple of the record stride.
    pub fn read_remaining_records<T: ChunkRecord>(&mut self, signature: Signature) -> Result<Vec<T>> {
        let size = self.remaining()?;
        if T::SIZE == 0 || size % T::SIZE as u64 != 0 {
            return Err(PortError::StrideMismatch {
                signature: signature.to_string(),
                size,
                stride: T::SIZE,
            });
        }
        self.read_records((size / T::SIZE as u64) as usize)
    }
}
