//! Per-model skinning aggregate
//!
//! One [`SkinningInfo`] lives for the conversion of one model. Chunk decoders
//! feed it independently (bones, vertex weights, morphs), in any order, and
//! the exporter finally asks it for a [`SkinBinding`].

use glam::Mat4;

use super::{BoneHierarchy, SkinBinding};
use crate::error::SkeletonError;

/// Bone influences on one vertex
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VertexInfluence {
    /// Indices into the hierarchy's bone list
    pub bone_ids: [u16; 4],
    pub weights: [f32; 4],
}

impl VertexInfluence {
    pub fn new(bone_ids: [u16; 4], weights: [f32; 4]) -> Self {
        Self { bone_ids, weights }
    }
}

/// Morph target displacement of one vertex
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MorphTarget {
    pub vertex_id: u32,
    pub position: [f32; 3],
}

/// Skinning accumulation target for one model
#[derive(Debug, Clone, Default)]
pub struct SkinningInfo {
    hierarchy: Option<BoneHierarchy>,
    has_skinning_info: bool,
    vertex_influences: Vec<VertexInfluence>,
    morph_targets: Vec<MorphTarget>,
    bind_shape: Option<Mat4>,
}

impl SkinningInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the model's bone hierarchy, replacing any earlier one
    pub fn accept_hierarchy(&mut self, hierarchy: BoneHierarchy) {
        if let Some(previous) = &self.hierarchy {
            tracing::warn!(
                "bones chunk {:#x} replaces hierarchy from chunk {:#x}",
                hierarchy.chunk_id(),
                previous.chunk_id()
            );
        }
        self.hierarchy = Some(hierarchy);
        self.has_skinning_info = true;
    }

    /// Attach per-vertex bone influences from a weights chunk
    pub fn accept_weights(&mut self, influences: Vec<VertexInfluence>) {
        self.vertex_influences = influences;
    }

    /// Attach morph target displacements from a morphs chunk
    pub fn accept_morphs(&mut self, morphs: Vec<MorphTarget>) {
        self.morph_targets = morphs;
    }

    /// Explicit mesh-to-bind-pose offset from the model chunk
    pub fn set_bind_shape(&mut self, bind_shape: Mat4) {
        self.bind_shape = Some(bind_shape);
    }

    pub fn has_skinning_info(&self) -> bool {
        self.has_skinning_info
    }

    pub fn hierarchy(&self) -> Option<&BoneHierarchy> {
        self.hierarchy.as_ref()
    }

    pub fn vertex_influences(&self) -> &[VertexInfluence] {
        &self.vertex_influences
    }

    pub fn morph_targets(&self) -> &[MorphTarget] {
        &self.morph_targets
    }

    /// Bind-shape matrix, identity unless the model supplied one
    pub fn bind_shape(&self) -> Mat4 {
        self.bind_shape.unwrap_or(Mat4::IDENTITY)
    }

    /// Assemble the skin controller data
    pub fn skin_binding(&self) -> Result<SkinBinding, SkeletonError> {
        let hierarchy = self
            .hierarchy
            .as_ref()
            .ok_or(SkeletonError::MissingHierarchy)?;
        SkinBinding::assemble(hierarchy, self.bind_shape())
    }

    /// Influences that reference a bone the hierarchy does not have
    pub fn dangling_influences(&self) -> usize {
        let bone_count = self.hierarchy.as_ref().map_or(0, BoneHierarchy::len);
        self.vertex_influences
            .iter()
            .filter(|v| {
                v.bone_ids
                    .iter()
                    .zip(&v.weights)
                    .any(|(&id, &w)| w > 0.0 && id as usize >= bone_count)
            })
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::{BoneRecordVersion, ChunkHeader};

    fn hierarchy(chunk_id: u32, names: &[&str]) -> BoneHierarchy {
        let mut data = vec![0u8; 32];
        for (i, name) in names.iter().enumerate() {
            data.extend_from_slice(&(i as u32 + 1).to_le_bytes());
            data.extend_from_slice(&0i32.to_le_bytes());
            data.extend_from_slice(&[0u8; 208]);
            let mut field = [0u8; 48];
            field[..name.len()].copy_from_slice(name.as_bytes());
            data.extend_from_slice(&field);
            let offset_parent: i32 = if i == 0 { 0 } else { -1 };
            data.extend_from_slice(&offset_parent.to_le_bytes());
            data.extend_from_slice(&[0u8; 8]);
            for f in [1.0f32, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0] {
                data.extend_from_slice(&f.to_le_bytes());
            }
        }
        BoneHierarchy::read(
            chunk_id,
            ChunkHeader::SIZE + data.len(),
            BoneRecordVersion::Current,
            &data,
        )
        .unwrap()
    }

    #[test]
    fn test_new_has_no_skin() {
        let skin = SkinningInfo::new();
        assert!(!skin.has_skinning_info());
        assert!(skin.hierarchy().is_none());
        assert_eq!(skin.skin_binding(), Err(SkeletonError::MissingHierarchy));
    }

    #[test]
    fn test_later_hierarchy_replaces_earlier() {
        let mut skin = SkinningInfo::new();
        skin.accept_hierarchy(hierarchy(1, &["a", "b"]));
        skin.accept_hierarchy(hierarchy(2, &["x", "y", "z"]));
        assert!(skin.has_skinning_info());
        let h = skin.hierarchy().unwrap();
        assert_eq!(h.chunk_id(), 2);
        assert_eq!(h.len(), 3);
    }

    #[test]
    fn test_accept_order_does_not_matter() {
        let weights = vec![
            VertexInfluence::new([0, 1, 0, 0], [0.75, 0.25, 0.0, 0.0]),
            VertexInfluence::new([1, 0, 0, 0], [1.0, 0.0, 0.0, 0.0]),
        ];
        let morphs = vec![MorphTarget {
            vertex_id: 1,
            position: [0.0, 0.1, 0.0],
        }];

        let mut first = SkinningInfo::new();
        first.accept_hierarchy(hierarchy(3, &["root", "arm"]));
        first.accept_weights(weights.clone());
        first.accept_morphs(morphs.clone());

        let mut second = SkinningInfo::new();
        second.accept_morphs(morphs);
        second.accept_weights(weights);
        second.accept_hierarchy(hierarchy(3, &["root", "arm"]));

        assert_eq!(first.skin_binding(), second.skin_binding());
        assert_eq!(first.vertex_influences(), second.vertex_influences());
        assert_eq!(first.morph_targets(), second.morph_targets());
        assert_eq!(first.dangling_influences(), 0);
    }

    #[test]
    fn test_dangling_influences() {
        let mut skin = SkinningInfo::new();
        skin.accept_weights(vec![
            VertexInfluence::new([0, 5, 0, 0], [0.5, 0.5, 0.0, 0.0]),
            VertexInfluence::new([0, 9, 0, 0], [1.0, 0.0, 0.0, 0.0]),
        ]);
        skin.accept_hierarchy(hierarchy(4, &["root", "arm"]));
        // Zero-weight slots do not count
        assert_eq!(skin.dangling_influences(), 1);
    }

    #[test]
    fn test_bind_shape_defaults_to_identity() {
        let mut skin = SkinningInfo::new();
        skin.accept_hierarchy(hierarchy(5, &["root"]));
        assert_eq!(skin.bind_shape(), Mat4::IDENTITY);

        let offset = Mat4::from_translation(glam::Vec3::X);
        skin.set_bind_shape(offset);
        let binding = skin.skin_binding().unwrap();
        assert_eq!(binding.bind_shape_matrix[3], 1.0);
    }
}
