use std::fs::File;
use std::io::Cursor;
use std::path::Path;

#[cfg(feature = "persist")]
use memmap2::Mmap;
#[cfg(not(feature = "persist"))]
use std::io::Read;

use crate::chunk::{ByteOrder, ChunkReader, ChunkWriter, Signature};
use crate::config::PortConfig;
use crate::error::{classify_io_error, PortError, Result};

use super::fixup::{InteropTypeId, ResourceFixupLocation};
use super::header::XSyncStateHeader;

/// Resource xsync state container
pub const XSRC: Signature = Signature::from_bytes(b"xsrc");
/// Resource interop state container
pub const INRC: Signature = Signature::from_bytes(b"inrc");
/// Interop usage identifiers
pub const INUS: Signature = Signature::from_bytes(b"inus");
/// Control fixups
pub const CTRL: Signature = Signature::from_bytes(b"ctrl");
/// Control data
pub const DATA: Signature = Signature::from_bytes(b"data");
/// Pageable fixups
pub const PAGE: Signature = Signature::from_bytes(b"page");
/// Optional fixups
pub const OPTI: Signature = Signature::from_bytes(b"opti");

/// Relocation tables, interop identifiers and control data accompanying
/// one resource.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceXSyncState {
    /// Index of the tag owning the resource
    pub owner: u32,
    pub header: XSyncStateHeader,
    pub control_fixups: Vec<ResourceFixupLocation>,
    pub pageable_fixups: Vec<ResourceFixupLocation>,
    pub optional_fixups: Vec<ResourceFixupLocation>,
    pub interop_types: Vec<InteropTypeId>,
    pub control_data: Vec<u8>,
}

impl ResourceXSyncState {
    /// Reads the fixed header, then walks the chunks that follow it.
    ///
    /// Unknown signatures are skipped. Container chunks are walked with the
    /// same reader rules as the top level.
    pub fn read(owner: u32, reader: &mut ChunkReader<'_>) -> Result<Self> {
        let header: XSyncStateHeader = reader.read_record()?;
        let mut state = Self {
            owner,
            header,
            ..Self::default()
        };
        state.read_chunks(reader)?;
        Ok(state)
    }

    fn read_chunks(&mut self, reader: &mut ChunkReader<'_>) -> Result<()> {
        while let Some(chunk) = reader.next_chunk()? {
            let mut payload = match chunk.signature() {
                XSRC | INRC | INUS | CTRL | DATA | PAGE | OPTI => reader.chunk_reader(&chunk)?,
                other => {
                    tracing::debug!("Skipping chunk '{}' ({} bytes)", other, chunk.size());
                    continue;
                }
            };

            match chunk.signature() {
                XSRC | INRC => self.read_chunks(&mut payload)?,
                INUS => {
                    self.interop_types =
                        payload.read_records(self.header.interop_usage_count as usize)?;
                }
                CTRL => {
                    self.control_fixups =
                        payload.read_records(self.header.control_fixup_count as usize)?;
                }
                DATA => {
                    self.control_data =
                        payload.read_bytes(self.header.control_data_size as usize)?;
                }
                PAGE => self.pageable_fixups = payload.read_remaining_records(PAGE)?,
                OPTI => self.optional_fixups = payload.read_remaining_records(OPTI)?,
                _ => {}
            }
        }
        Ok(())
    }

    /// Header with counts and sizes recomputed from the model.
    pub fn synced_header(&self) -> Result<XSyncStateHeader> {
        let count = |len: usize, what: &str| {
            u32::try_from(len).map_err(|_| {
                PortError::SerializationError(format!("{} of {} does not fit the header", what, len))
            })
        };

        Ok(XSyncStateHeader {
            control_data_size: count(self.control_data.len(), "control data size")?,
            control_fixup_count: count(self.control_fixups.len(), "control fixup count")?,
            interop_usage_count: count(self.interop_types.len(), "interop usage count")?,
            ..self.header
        })
    }

    /// Writes the header followed by an `xsrc` container holding `ctrl`,
    /// `data`, `page`, `opti` and an `inrc` container holding `inus`.
    pub fn write(&self, writer: &mut ChunkWriter) -> Result<()> {
        let header = self.synced_header()?;
        writer.write_record(&header);

        writer.write_chunk(XSRC, |w| {
            w.write_chunk(CTRL, |w| {
                w.write_records(&self.control_fixups);
                Ok(())
            })?;
            w.write_chunk(DATA, |w| {
                w.write_bytes(&self.control_data);
                Ok(())
            })?;
            w.write_chunk(PAGE, |w| {
                w.write_records(&self.pageable_fixups);
                Ok(())
            })?;
            w.write_chunk(OPTI, |w| {
                w.write_records(&self.optional_fixups);
                Ok(())
            })?;
            w.write_chunk(INRC, |w| {
                w.write_chunk(INUS, |w| {
                    w.write_records(&self.interop_types);
                    Ok(())
                })
            })
        })
    }

    /// Checks that the header agrees with the parsed tables.
    ///
    /// # Returns
    /// `Err(PortError::SerializationError)` naming the first disagreement.
    pub fn validate(&self) -> Result<()> {
        let synced = self.synced_header()?;
        let checks = [
            ("control data size", self.header.control_data_size, synced.control_data_size),
            ("control fixup count", self.header.control_fixup_count, synced.control_fixup_count),
            ("interop usage count", self.header.interop_usage_count, synced.interop_usage_count),
        ];
        for (what, declared, actual) in checks {
            if declared != actual {
                return Err(PortError::SerializationError(format!(
                    "Header declares {} {} but {} were read",
                    what, declared, actual
                )));
            }
        }
        Ok(())
    }

    pub fn to_bytes(&self, byte_order: ByteOrder) -> Result<Vec<u8>> {
        let mut writer = ChunkWriter::new(byte_order);
        self.write(&mut writer)?;
        writer.finish()
    }

    pub fn from_bytes(owner: u32, bytes: &[u8], config: &PortConfig) -> Result<Self> {
        let mut cursor = Cursor::new(bytes);
        let mut reader = ChunkReader::with_config(&mut cursor, config)?;
        Self::read(owner, &mut reader)
    }
}

/// Loads a resource xsync state from a file.
#[cfg(feature = "persist")]
pub fn load_resource_file(path: &Path, owner: u32, config: &PortConfig) -> Result<ResourceXSyncState> {
    let file = File::open(path).map_err(|e| classify_io_error(e, "Failed to open resource file"))?;

    // Memory map the file
    let mmap = unsafe {
        Mmap::map(&file).map_err(|e| classify_io_error(e, "Failed to memory map file"))?
    };

    tracing::debug!("Mapped resource file {} ({} bytes)", path.display(), mmap.len());
    ResourceXSyncState::from_bytes(owner, &mmap, config)
}

/// Loads a resource xsync state from a file.
#[cfg(not(feature = "persist"))]
pub fn load_resource_file(path: &Path, owner: u32, config: &PortConfig) -> Result<ResourceXSyncState> {
    let mut file =
        File::open(path).map_err(|e| classify_io_error(e, "Failed to open resource file"))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|e| classify_io_error(e, "Failed to read resource file"))?;

    tracing::debug!("Read resource file {} ({} bytes)", path.display(), bytes.len());
    ResourceXSyncState::from_bytes(owner, &bytes, config)
}
