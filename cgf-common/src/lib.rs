//! Compiled-bones decoding for CryEngine geometry files
//!
//! This crate turns the raw payload of a compiled-bones chunk into a rooted
//! bone tree with bind-pose transforms, and derives the skin controller data
//! an exporter needs.
//!
//! # Modules
//!
//! - [`formats`] - Record reader, chunk header and bone record layouts
//! - [`skeleton`] - Hierarchy builder, skinning aggregate, skin binding
//! - [`math`] - Bone matrix conversion, inversion and text formatting

pub mod error;
pub mod formats;
pub mod math;
pub mod skeleton;

pub use error::SkeletonError;

pub use formats::{
    BONES_CHUNK_HEADER_SIZE, BoneRecordVersion, COMPILED_BONES_CHUNK_TYPE, CURRENT_BONE_RECORD_SIZE,
    ChunkHeader, ChunkLayout, LEGACY_BONE_RECORD_SIZE, ReadError, RecordReader, decode_bone_record,
};

pub use skeleton::{
    Bone, BoneHierarchy, BonePhysics, Inconsistency, MorphTarget, PhysicsGeometry, SceneNode,
    SkinBinding, SkinningInfo, VertexInfluence,
};

pub use math::{
    BoneMatrix3x4, format_matrix_values, invert_transform, mat4_from_rows, mat4_to_rows,
};
