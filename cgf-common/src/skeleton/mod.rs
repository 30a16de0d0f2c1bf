//! Skeleton reconstruction and skin binding
//!
//! Data flows bone records → [`BoneHierarchy`] → [`SkinningInfo`] →
//! [`SkinBinding`], one model at a time.

mod binding;
mod bone;
mod hierarchy;
mod skinning;

pub use binding::SkinBinding;
pub use bone::{Bone, BonePhysics, PhysicsGeometry};
pub use hierarchy::{BoneHierarchy, Inconsistency, SceneNode};
pub use skinning::{MorphTarget, SkinningInfo, VertexInfluence};
