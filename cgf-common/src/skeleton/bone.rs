//! Bone descriptor shared by the decoder and the hierarchy

use glam::Mat4;

/// Physics limits of one bone state (104 bytes serialized)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PhysicsGeometry {
    pub physics_geom: u32,
    pub flags: u32,
    pub min: [f32; 3],
    pub max: [f32; 3],
    pub spring_angle: [f32; 3],
    pub spring_tension: [f32; 3],
    pub damping: [f32; 3],
    /// 3×3 frame matrix, row-major
    pub frame_matrix: [f32; 9],
}

impl PhysicsGeometry {
    pub const SIZE: usize = 104;
}

/// Per-bone physics data carried by legacy records
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BonePhysics {
    pub mass: f32,
    /// Limits for the living body
    pub alive: PhysicsGeometry,
    /// Limits for the ragdoll
    pub dead: PhysicsGeometry,
}

/// One skeletal joint.
///
/// The serialized fields come from the bone record decoder. `parent`,
/// `children`, `parent_controller_id` and `bind_pose_world_transform` are
/// filled in by [`BoneHierarchy`](super::BoneHierarchy); parent and children
/// are indices into the hierarchy's bone list.
#[derive(Debug, Clone, PartialEq)]
pub struct Bone {
    pub name: String,
    pub controller_id: u32,
    pub limb_id: i32,
    /// Relative index of the parent record, 0 for the root
    pub offset_parent: i32,
    /// Child count as serialized; `children` is authoritative once built
    pub num_children: i32,
    pub offset_child: i32,
    pub local_transform: Mat4,
    pub physics: Option<BonePhysics>,

    pub parent: Option<usize>,
    pub children: Vec<usize>,
    /// Controller id of the parent, 0 for the root
    pub parent_controller_id: u32,
    pub bind_pose_world_transform: Mat4,
}

impl Bone {
    /// A bone with only its serialized fields populated
    pub fn unlinked(
        name: impl Into<String>,
        controller_id: u32,
        offset_parent: i32,
        local_transform: Mat4,
    ) -> Self {
        Self {
            name: name.into(),
            controller_id,
            limb_id: -1,
            offset_parent,
            num_children: 0,
            offset_child: 0,
            local_transform,
            physics: None,
            parent: None,
            children: Vec::new(),
            parent_controller_id: 0,
            bind_pose_world_transform: local_transform,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}
