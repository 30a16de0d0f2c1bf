//! Compiled-bones chunk header and per-version layout
//!
//! # Layout
//! ```text
//! 0x00: chunk_type u32 (0xACDC0000 for compiled bones)
//! 0x04: version u32 (0x800 legacy, 0x801 current)
//! 0x08: chunk_id u32
//! 0x0C: size u32 (declared total size, header included)
//! 0x10: leading padding (32 bytes)
//! 0x30: bone records (bone_count × stride)
//! ```

/// Chunk type tag of a compiled-bones chunk
pub const COMPILED_BONES_CHUNK_TYPE: u32 = 0xACDC_0000;

/// Generic chunk header (16 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct ChunkHeader {
    pub chunk_type: u32,
    pub version: u32,
    pub chunk_id: u32,
    /// Declared total chunk size in bytes, this header included
    pub size: u32,
}

impl ChunkHeader {
    pub const SIZE: usize = 16;

    pub fn new(chunk_type: u32, version: u32, chunk_id: u32, size: u32) -> Self {
        Self {
            chunk_type,
            version,
            chunk_id,
            size,
        }
    }

    /// Write header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&self.chunk_type.to_le_bytes());
        bytes[4..8].copy_from_slice(&self.version.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.chunk_id.to_le_bytes());
        bytes[12..16].copy_from_slice(&self.size.to_le_bytes());
        bytes
    }

    /// Read header from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            chunk_type: u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            version: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
            chunk_id: u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]),
            size: u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]),
        })
    }
}

/// Serialized bone record layout, selected by chunk version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoneRecordVersion {
    /// 0x800: 584-byte records with physics limits and a 4×4 transform
    Legacy,
    /// 0x801: 324-byte records with a 3×4 transform
    Current,
}

impl BoneRecordVersion {
    pub const LEGACY_CHUNK_VERSION: u32 = 0x800;
    pub const CURRENT_CHUNK_VERSION: u32 = 0x801;

    pub fn from_chunk_version(version: u32) -> Option<Self> {
        match version {
            Self::LEGACY_CHUNK_VERSION => Some(Self::Legacy),
            Self::CURRENT_CHUNK_VERSION => Some(Self::Current),
            _ => None,
        }
    }

    pub fn chunk_version(self) -> u32 {
        match self {
            Self::Legacy => Self::LEGACY_CHUNK_VERSION,
            Self::Current => Self::CURRENT_CHUNK_VERSION,
        }
    }

    /// Size of one serialized bone record
    pub fn stride(self) -> usize {
        match self {
            Self::Legacy => super::LEGACY_BONE_RECORD_SIZE,
            Self::Current => super::CURRENT_BONE_RECORD_SIZE,
        }
    }

    pub fn layout(self) -> ChunkLayout {
        ChunkLayout {
            header_size: BONES_CHUNK_HEADER_SIZE,
            stride: self.stride(),
        }
    }
}

/// Bytes before the first record, chunk header and padding combined
pub const BONES_CHUNK_HEADER_SIZE: usize = 48;

/// Fixed header size and record stride for one chunk version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkLayout {
    pub header_size: usize,
    pub stride: usize,
}

impl ChunkLayout {
    /// Padding between the generic chunk header and the first record.
    ///
    /// The payload handed to the decoder starts right after [`ChunkHeader`],
    /// so this is what must be skipped before record 0.
    pub fn leading_padding(&self) -> usize {
        self.header_size.saturating_sub(ChunkHeader::SIZE)
    }

    /// Number of whole records in a chunk of `chunk_size` bytes.
    ///
    /// Returns `None` when the size is smaller than the header or leaves a
    /// partial record.
    pub fn bone_count(&self, chunk_size: usize) -> Option<usize> {
        let body = chunk_size.checked_sub(self.header_size)?;
        if body % self.stride != 0 {
            return None;
        }
        Some(body / self.stride)
    }

    /// Declared chunk size holding exactly `bone_count` records
    pub fn chunk_size(&self, bone_count: usize) -> usize {
        self.header_size + bone_count * self.stride
    }
}
