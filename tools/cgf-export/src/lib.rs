//! cgf-export library
//!
//! Provides skeleton conversion functions for use by other tools.

pub mod chunk_file;
pub mod formats;
pub mod manifest;
pub mod skeleton;

// Re-export the core types the converters hand out
pub use cgf_common::{BoneHierarchy, SceneNode, SkeletonError, SkinBinding, SkinningInfo};

pub use chunk_file::{read_chunk_file, ChunkFile, ChunkFileError};

// Re-export skeleton conversion types
pub use skeleton::{convert_chunk_skeleton_to_memory, ConvertedSkeleton};
