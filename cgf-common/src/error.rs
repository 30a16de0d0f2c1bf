//! Skeleton reconstruction errors
//!
//! Every error aborts the model it belongs to and carries the chunk id (and
//! bone index where one exists) so the offending bytes can be found.

use crate::formats::ReadError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SkeletonError {
    /// A record ran past the end of the chunk payload
    #[error(
        "bones chunk {chunk_id:#x}, bone {bone_index}: truncated input (needed {needed} bytes at payload offset {offset}, {available} available)"
    )]
    TruncatedInput {
        chunk_id: u32,
        bone_index: usize,
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// Declared size is not a whole number of records
    #[error(
        "bones chunk {chunk_id:#x}: size {size} does not hold whole {stride}-byte records after a {header_size}-byte header"
    )]
    MalformedChunk {
        chunk_id: u32,
        size: usize,
        header_size: usize,
        stride: usize,
    },

    /// Parent offset resolves outside the already-decoded bones
    #[error(
        "bones chunk {chunk_id:#x}, bone {bone_index}: parent offset {offset_parent} does not point at an earlier bone"
    )]
    InvalidParentOffset {
        chunk_id: u32,
        bone_index: usize,
        offset_parent: i32,
    },

    /// A bone other than the first has no parent
    #[error("bones chunk {chunk_id:#x}, bone {bone_index}: second root bone '{name}'")]
    MultipleRoots {
        chunk_id: u32,
        bone_index: usize,
        name: String,
    },

    /// A bind transform cannot be inverted
    #[error("bones chunk {chunk_id:#x}, bone {bone_index}: bind transform of '{name}' is singular")]
    SingularBindMatrix {
        chunk_id: u32,
        bone_index: usize,
        name: String,
    },

    /// Skin binding requested before any bones chunk was accepted
    #[error("model has no bone hierarchy")]
    MissingHierarchy,
}

impl SkeletonError {
    pub(crate) fn from_read(err: ReadError, chunk_id: u32, bone_index: usize) -> Self {
        match err {
            ReadError::TruncatedInput {
                offset,
                needed,
                available,
            } => Self::TruncatedInput {
                chunk_id,
                bone_index,
                offset,
                needed,
                available,
            },
        }
    }

    /// True when only the skin export is lost; the hierarchy itself is fine
    pub fn is_skin_only(&self) -> bool {
        matches!(self, Self::SingularBindMatrix { .. })
    }

    /// Chunk that triggered the error, if any
    pub fn chunk_id(&self) -> Option<u32> {
        match self {
            Self::TruncatedInput { chunk_id, .. }
            | Self::MalformedChunk { chunk_id, .. }
            | Self::InvalidParentOffset { chunk_id, .. }
            | Self::MultipleRoots { chunk_id, .. }
            | Self::SingularBindMatrix { chunk_id, .. } => Some(*chunk_id),
            Self::MissingHierarchy => None,
        }
    }

    /// Bone that triggered the error, if any
    pub fn bone_index(&self) -> Option<usize> {
        match self {
            Self::TruncatedInput { bone_index, .. }
            | Self::InvalidParentOffset { bone_index, .. }
            | Self::MultipleRoots { bone_index, .. }
            | Self::SingularBindMatrix { bone_index, .. } => Some(*bone_index),
            Self::MalformedChunk { .. } | Self::MissingHierarchy => None,
        }
    }
}
