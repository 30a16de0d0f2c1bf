//! Compiled-bones binary formats
//!
//! Everything here is little-endian and fixed-layout. The chunk table itself
//! is read elsewhere; these decoders start from a chunk's payload.

pub mod bone_record;
pub mod chunk;
pub mod reader;

pub use bone_record::*;
pub use chunk::*;
pub use reader::{ReadError, ReadResult, RecordReader};
