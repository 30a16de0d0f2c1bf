//! Bone hierarchy reconstruction
//!
//! Bones are stored flat, parents before children, each naming its parent by
//! a relative offset. The hierarchy owns the bones in decode order; parent
//! and child links are indices into that list.

use glam::Mat4;
use hashbrown::HashSet;
use serde::Serialize;

use super::Bone;
use crate::error::SkeletonError;
use crate::formats::{BoneRecordVersion, RecordReader, decode_bone_record};
use crate::math::{invert_transform, mat4_to_rows};

/// Full ordered bone list of one model
#[derive(Debug, Clone, PartialEq)]
pub struct BoneHierarchy {
    chunk_id: u32,
    version: BoneRecordVersion,
    bones: Vec<Bone>,
}

/// Serialized bookkeeping that disagrees with the decoded tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inconsistency {
    /// Bone reuses a controller id seen on an earlier bone
    DuplicateControllerId { bone_index: usize, controller_id: u32 },
    /// Serialized child count differs from the linked children
    ChildCountMismatch {
        bone_index: usize,
        declared: i32,
        found: usize,
    },
}

/// Exporter-facing scene node, one per bone
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneNode {
    pub name: String,
    pub controller_id: u32,
    /// Parent-relative transform, 16 floats row-major
    pub matrix: [f32; 16],
    pub children: Vec<SceneNode>,
}

impl BoneHierarchy {
    /// Decode a compiled-bones chunk.
    ///
    /// `payload` starts right after the 16-byte chunk header and `chunk_size`
    /// is the declared total size of the chunk. Any failure discards the
    /// whole skeleton.
    pub fn read(
        chunk_id: u32,
        chunk_size: usize,
        version: BoneRecordVersion,
        payload: &[u8],
    ) -> Result<Self, SkeletonError> {
        let layout = version.layout();
        let bone_count = layout
            .bone_count(chunk_size)
            .ok_or(SkeletonError::MalformedChunk {
                chunk_id,
                size: chunk_size,
                header_size: layout.header_size,
                stride: layout.stride,
            })?;

        let mut reader = RecordReader::new(payload);
        reader
            .skip(layout.leading_padding())
            .map_err(|e| SkeletonError::from_read(e, chunk_id, 0))?;

        // The declared size is untrusted; a short payload fails on its first
        // missing record below.
        let mut bones: Vec<Bone> =
            Vec::with_capacity(bone_count.min(reader.remaining() / layout.stride));
        for i in 0..bone_count {
            let (mut bone, consumed) = decode_bone_record(&mut reader, version)
                .map_err(|e| SkeletonError::from_read(e, chunk_id, i))?;
            debug_assert_eq!(consumed, layout.stride);

            if bone.offset_parent != 0 {
                let parent_index = i as i64 + bone.offset_parent as i64;
                if parent_index < 0 || parent_index >= i as i64 {
                    return Err(SkeletonError::InvalidParentOffset {
                        chunk_id,
                        bone_index: i,
                        offset_parent: bone.offset_parent,
                    });
                }
                let parent_index = parent_index as usize;
                bone.parent = Some(parent_index);
                bone.parent_controller_id = bones[parent_index].controller_id;
            } else if i != 0 {
                return Err(SkeletonError::MultipleRoots {
                    chunk_id,
                    bone_index: i,
                    name: bone.name,
                });
            }

            tracing::trace!(
                "bone {}: '{}' controller {:#010x} parent {:?}",
                i,
                bone.name,
                bone.controller_id,
                bone.parent
            );
            bones.push(bone);
        }

        link_children(&mut bones);
        compose_world_transforms(&mut bones);

        let hierarchy = Self {
            chunk_id,
            version,
            bones,
        };
        hierarchy.warn_on_inconsistencies();

        tracing::debug!(
            "Decoded bones chunk {:#x} ({:?}): {} bones",
            chunk_id,
            version,
            hierarchy.bones.len()
        );
        Ok(hierarchy)
    }

    pub fn chunk_id(&self) -> u32 {
        self.chunk_id
    }

    pub fn version(&self) -> BoneRecordVersion {
        self.version
    }

    /// Bones in decode order, root first
    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    pub fn root(&self) -> Option<&Bone> {
        self.bones.first()
    }

    pub fn get(&self, index: usize) -> Option<&Bone> {
        self.bones.get(index)
    }

    pub fn parent_of(&self, bone: &Bone) -> Option<&Bone> {
        bone.parent.map(|i| &self.bones[i])
    }

    pub fn children_of<'a>(&'a self, bone: &'a Bone) -> impl Iterator<Item = &'a Bone> + 'a {
        bone.children.iter().map(move |&i| &self.bones[i])
    }

    pub fn find_by_controller_id(&self, controller_id: u32) -> Option<usize> {
        self.bones
            .iter()
            .position(|b| b.controller_id == controller_id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<usize> {
        self.bones.iter().position(|b| b.name == name)
    }

    /// Bone indices in depth-first pre-order, children in decode order
    pub fn depth_first(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.bones.len());
        if self.bones.is_empty() {
            return order;
        }
        let mut stack = vec![0usize];
        while let Some(index) = stack.pop() {
            order.push(index);
            stack.extend(self.bones[index].children.iter().rev());
        }
        order
    }

    /// Parent-relative transform of one bone, as the exporter writes it.
    ///
    /// `inverse(parent world) × world`; the root gets its world transform.
    pub fn node_transform(&self, index: usize) -> Result<Mat4, SkeletonError> {
        let bone = &self.bones[index];
        let Some(parent_index) = bone.parent else {
            return Ok(bone.bind_pose_world_transform);
        };
        let parent = &self.bones[parent_index];
        let parent_inverse = invert_transform(&parent.bind_pose_world_transform).ok_or_else(|| {
            SkeletonError::SingularBindMatrix {
                chunk_id: self.chunk_id,
                bone_index: parent_index,
                name: parent.name.clone(),
            }
        })?;
        Ok(parent_inverse * bone.bind_pose_world_transform)
    }

    /// Nested scene nodes rooted at bone 0, or `None` for an empty skeleton
    pub fn node_tree(&self) -> Result<Option<SceneNode>, SkeletonError> {
        if self.bones.is_empty() {
            return Ok(None);
        }
        self.build_node(0).map(Some)
    }

    fn build_node(&self, index: usize) -> Result<SceneNode, SkeletonError> {
        let bone = &self.bones[index];
        let matrix = mat4_to_rows(&self.node_transform(index)?);
        let children = bone
            .children
            .iter()
            .map(|&child| self.build_node(child))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(SceneNode {
            name: bone.name.clone(),
            controller_id: bone.controller_id,
            matrix,
            children,
        })
    }

    /// Duplicate controller ids and child-count mismatches, in bone order.
    ///
    /// Neither stops decoding; the tree is built from parent offsets alone.
    pub fn inconsistencies(&self) -> Vec<Inconsistency> {
        let mut found = Vec::new();
        let mut seen = HashSet::with_capacity(self.bones.len());
        for (i, bone) in self.bones.iter().enumerate() {
            if !seen.insert(bone.controller_id) {
                found.push(Inconsistency::DuplicateControllerId {
                    bone_index: i,
                    controller_id: bone.controller_id,
                });
            }
            if usize::try_from(bone.num_children).ok() != Some(bone.children.len()) {
                found.push(Inconsistency::ChildCountMismatch {
                    bone_index: i,
                    declared: bone.num_children,
                    found: bone.children.len(),
                });
            }
        }
        found
    }

    fn warn_on_inconsistencies(&self) {
        for inconsistency in self.inconsistencies() {
            match inconsistency {
                Inconsistency::DuplicateControllerId {
                    bone_index,
                    controller_id,
                } => tracing::warn!(
                    "bones chunk {:#x}: bone {} '{}' reuses controller id {:#010x}",
                    self.chunk_id,
                    bone_index,
                    self.bones[bone_index].name,
                    controller_id
                ),
                Inconsistency::ChildCountMismatch {
                    bone_index,
                    declared,
                    found,
                } => tracing::warn!(
                    "bones chunk {:#x}: bone {} '{}' declares {} children, found {}",
                    self.chunk_id,
                    bone_index,
                    self.bones[bone_index].name,
                    declared,
                    found
                ),
            }
        }
    }
}

/// Register each bone with its parent, in decode order
fn link_children(bones: &mut [Bone]) {
    for i in 0..bones.len() {
        if let Some(parent) = bones[i].parent {
            bones[parent].children.push(i);
        }
    }
}

/// World transform = parent world × local, resolved front to back.
///
/// Parents always precede their children, so one forward pass sees every
/// parent finished before its children.
fn compose_world_transforms(bones: &mut [Bone]) {
    for i in 0..bones.len() {
        let world = match bones[i].parent {
            Some(parent) => bones[parent].bind_pose_world_transform * bones[i].local_transform,
            None => bones[i].local_transform,
        };
        bones[i].bind_pose_world_transform = world;
    }
}
