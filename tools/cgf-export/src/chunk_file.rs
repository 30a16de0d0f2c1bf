//! Standalone bones chunk files
//!
//! A chunk file holds exactly one compiled-bones chunk: the 16-byte chunk
//! header followed by its payload.

use std::path::Path;

use anyhow::{Context, Result};
use cgf_common::{
    BoneHierarchy, BoneRecordVersion, ChunkHeader, SkeletonError, SkinningInfo,
    COMPILED_BONES_CHUNK_TYPE,
};

/// Why a file is not a usable bones chunk
#[derive(Debug, thiserror::Error)]
pub enum ChunkFileError {
    #[error("file is {0} bytes, shorter than a chunk header")]
    TooShort(usize),

    #[error("chunk type {0:#010x} is not a compiled-bones chunk")]
    WrongChunkType(u32),

    #[error("unsupported compiled-bones version {0:#x} (expected 0x800 or 0x801)")]
    UnsupportedVersion(u32),
}

/// One compiled-bones chunk loaded from disk
#[derive(Debug, Clone)]
pub struct ChunkFile {
    pub header: ChunkHeader,
    pub version: BoneRecordVersion,
    /// Bytes after the chunk header
    pub payload: Vec<u8>,
}

impl ChunkFile {
    /// Parse a chunk from raw file bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ChunkFileError> {
        let header =
            ChunkHeader::from_bytes(bytes).ok_or(ChunkFileError::TooShort(bytes.len()))?;
        if header.chunk_type != COMPILED_BONES_CHUNK_TYPE {
            return Err(ChunkFileError::WrongChunkType(header.chunk_type));
        }
        let version = BoneRecordVersion::from_chunk_version(header.version)
            .ok_or(ChunkFileError::UnsupportedVersion(header.version))?;

        Ok(Self {
            header,
            version,
            payload: bytes[ChunkHeader::SIZE..].to_vec(),
        })
    }

    /// Build the bone hierarchy of this chunk
    pub fn hierarchy(&self) -> Result<BoneHierarchy, SkeletonError> {
        BoneHierarchy::read(
            self.header.chunk_id,
            self.header.size as usize,
            self.version,
            &self.payload,
        )
    }

    /// Decode the chunk and hand the hierarchy to the model's aggregate
    pub fn decode_into(&self, skin: &mut SkinningInfo) -> Result<(), SkeletonError> {
        skin.accept_hierarchy(self.hierarchy()?);
        Ok(())
    }
}

/// Load a chunk file from disk
pub fn read_chunk_file(path: &Path) -> Result<ChunkFile> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read chunk file: {:?}", path))?;
    let chunk = ChunkFile::from_bytes(&bytes)
        .with_context(|| format!("Invalid bones chunk file: {:?}", path))?;
    tracing::debug!(
        "Loaded bones chunk {:#x} ({:?}, {} bytes declared) from {:?}",
        chunk.header.chunk_id,
        chunk.version,
        chunk.header.size,
        path
    );
    Ok(chunk)
}
