//! Skin binding assembly
//!
//! The data a skin controller needs: joint names, one inverse bind matrix per
//! joint, and the bind-shape matrix.

use glam::Mat4;
use serde::Serialize;

use super::BoneHierarchy;
use crate::error::SkeletonError;
use crate::math::{format_matrix_values, invert_transform, mat4_to_rows};

/// Joint list and bind matrices of one skinned model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkinBinding {
    /// Bone names in decode order, root first
    pub joint_names: Vec<String>,
    /// Inverse bind-pose world transforms, aligned with `joint_names`
    pub inverse_bind_matrices: Vec<[f32; 16]>,
    pub bind_shape_matrix: [f32; 16],
}

impl SkinBinding {
    /// Derive the binding from a built hierarchy.
    ///
    /// Inverse bind matrices are kept exactly as computed; negative zeros
    /// are not normalized.
    pub fn assemble(hierarchy: &BoneHierarchy, bind_shape: Mat4) -> Result<Self, SkeletonError> {
        let mut joint_names = Vec::with_capacity(hierarchy.len());
        let mut inverse_bind_matrices = Vec::with_capacity(hierarchy.len());

        for (i, bone) in hierarchy.bones().iter().enumerate() {
            let inverse = invert_transform(&bone.bind_pose_world_transform).ok_or_else(|| {
                SkeletonError::SingularBindMatrix {
                    chunk_id: hierarchy.chunk_id(),
                    bone_index: i,
                    name: bone.name.clone(),
                }
            })?;
            joint_names.push(bone.name.clone());
            inverse_bind_matrices.push(mat4_to_rows(&inverse));
        }

        Ok(Self {
            joint_names,
            inverse_bind_matrices,
            bind_shape_matrix: mat4_to_rows(&bind_shape),
        })
    }

    pub fn joint_count(&self) -> usize {
        self.joint_names.len()
    }

    /// All inverse bind matrices as one flat float list
    pub fn bind_pose_values(&self) -> Vec<f32> {
        self.inverse_bind_matrices.iter().flatten().copied().collect()
    }

    /// Text rendering of the inverse bind matrices, signs preserved
    pub fn bind_pose_text(&self) -> String {
        format_matrix_values(&self.bind_pose_values())
    }
}
