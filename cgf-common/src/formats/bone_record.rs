//! Compiled bone record decoder
//!
//! # Current layout (0x801, 324 bytes)
//! ```text
//! 0x000: controller_id u32
//! 0x004: limb_id i32
//! 0x008: physics (2 × 104 bytes, skipped)
//! 0x0D8: name (48 bytes, NUL padded)
//! 0x108: offset_parent i32
//! 0x10C: num_children i32
//! 0x110: offset_child i32
//! 0x114: local_transform (12 × f32, 3×4 row-major)
//! ```
//!
//! # Legacy layout (0x800, 584 bytes)
//! ```text
//! 0x000: controller_id u32
//! 0x004: physics alive (104 bytes)
//! 0x06C: physics dead (104 bytes)
//! 0x0D4: mass f32
//! 0x0D8: name (256 bytes, NUL padded)
//! 0x1D8: limb_id i32
//! 0x1DC: offset_parent i32
//! 0x1E0: num_children i32
//! 0x1E4: offset_child i32
//! 0x1E8: local_transform (16 × f32, 4×4 row-major)
//! 0x228: reserved (32 bytes)
//! ```

use super::BoneRecordVersion;
use super::reader::{ReadResult, RecordReader};
use crate::math::{BoneMatrix3x4, mat4_from_rows};
use crate::skeleton::{Bone, BonePhysics, PhysicsGeometry};

/// Size of one current-layout record
pub const CURRENT_BONE_RECORD_SIZE: usize = 324;
/// Size of one legacy-layout record
pub const LEGACY_BONE_RECORD_SIZE: usize = 584;

pub const CURRENT_NAME_LENGTH: usize = 48;
pub const LEGACY_NAME_LENGTH: usize = 256;
pub const LEGACY_RESERVED_SIZE: usize = 32;

impl PhysicsGeometry {
    fn read(reader: &mut RecordReader) -> ReadResult<Self> {
        Ok(Self {
            physics_geom: reader.read_u32()?,
            flags: reader.read_u32()?,
            min: reader.read_f32_array()?,
            max: reader.read_f32_array()?,
            spring_angle: reader.read_f32_array()?,
            spring_tension: reader.read_f32_array()?,
            damping: reader.read_f32_array()?,
            frame_matrix: reader.read_f32_array()?,
        })
    }
}

/// Decode one bone record at the reader's position.
///
/// Returns the bone with its serialized fields set and the number of bytes
/// consumed, which always equals `version.stride()`.
pub fn decode_bone_record(
    reader: &mut RecordReader,
    version: BoneRecordVersion,
) -> ReadResult<(Bone, usize)> {
    let start = reader.position();
    // Take the whole record first so a short record fails before any field
    // is decoded and reports the record start.
    let mut record = RecordReader::new(reader.take(version.stride())?);

    let bone = match version {
        BoneRecordVersion::Current => decode_current(&mut record)?,
        BoneRecordVersion::Legacy => decode_legacy(&mut record)?,
    };

    let consumed = reader.position() - start;
    debug_assert_eq!(
        record.position(),
        version.stride(),
        "{:?} decoder consumed {} bytes of a {}-byte record",
        version,
        record.position(),
        version.stride()
    );
    Ok((bone, consumed))
}

fn decode_current(r: &mut RecordReader) -> ReadResult<Bone> {
    let controller_id = r.read_u32()?;
    let limb_id = r.read_i32()?;
    r.skip(2 * PhysicsGeometry::SIZE)?;
    let name = r.read_fixed_string(CURRENT_NAME_LENGTH)?;
    let offset_parent = r.read_i32()?;
    let num_children = r.read_i32()?;
    let offset_child = r.read_i32()?;
    let local_transform = BoneMatrix3x4::from_array(r.read_f32_array()?).to_mat4();

    let mut bone = Bone::unlinked(name, controller_id, offset_parent, local_transform);
    bone.limb_id = limb_id;
    bone.num_children = num_children;
    bone.offset_child = offset_child;
    Ok(bone)
}

fn decode_legacy(r: &mut RecordReader) -> ReadResult<Bone> {
    let controller_id = r.read_u32()?;
    let alive = PhysicsGeometry::read(r)?;
    let dead = PhysicsGeometry::read(r)?;
    let mass = r.read_f32()?;
    let name = r.read_fixed_string(LEGACY_NAME_LENGTH)?;
    let limb_id = r.read_i32()?;
    let offset_parent = r.read_i32()?;
    let num_children = r.read_i32()?;
    let offset_child = r.read_i32()?;
    let local_transform = mat4_from_rows(r.read_f32_array()?);
    r.skip(LEGACY_RESERVED_SIZE)?;

    let mut bone = Bone::unlinked(name, controller_id, offset_parent, local_transform);
    bone.limb_id = limb_id;
    bone.num_children = num_children;
    bone.offset_child = offset_child;
    bone.physics = Some(BonePhysics { mass, alive, dead });
    Ok(bone)
}
