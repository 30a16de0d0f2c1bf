//! Skeleton converter (bones chunk -> skin report)
//!
//! Rebuilds the bone tree of one model and derives its skin controller data.

use anyhow::{Context, Result};
use glam::Mat4;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use cgf_common::{mat4_from_rows, SceneNode, SkinBinding, SkinningInfo};

use crate::chunk_file::read_chunk_file;
use crate::formats::write_skin_report;

/// Result of in-memory skeleton conversion
#[derive(Debug, Clone, Serialize)]
pub struct ConvertedSkeleton {
    pub chunk_id: u32,
    /// Chunk version the records were decoded with
    pub version: u32,
    pub bone_count: u32,
    /// Scene node tree with parent-relative matrices
    pub nodes: Option<SceneNode>,
    /// Skin controller data; `None` when a bind transform was singular
    pub binding: Option<SkinBinding>,
    /// Inverse bind matrices as a text float array, signs preserved
    pub bind_poses: Option<String>,
}

/// Convert a bones chunk file to in-memory form
///
/// # Arguments
/// * `input` - Path to the chunk file
/// * `bind_shape` - Optional 16 row-major floats overriding the identity bind shape
pub fn convert_chunk_skeleton_to_memory(
    input: &Path,
    bind_shape: Option<[f32; 16]>,
) -> Result<ConvertedSkeleton> {
    let chunk = read_chunk_file(input)?;

    // One aggregate per model; nothing is shared between conversions.
    let mut skin = SkinningInfo::new();
    chunk
        .decode_into(&mut skin)
        .with_context(|| format!("Failed to rebuild skeleton from {:?}", input))?;
    if let Some(values) = bind_shape {
        skin.set_bind_shape(mat4_from_rows(values));
    }

    let hierarchy = skin
        .hierarchy()
        .context("Bones chunk produced no hierarchy")?;
    let nodes = hierarchy
        .node_tree()
        .with_context(|| format!("Failed to build node tree for {:?}", input))?;

    let binding = match skin.skin_binding() {
        Ok(binding) => Some(binding),
        Err(err) if err.is_skin_only() => {
            tracing::warn!("Skipping skin controller for {:?}: {}", input, err);
            None
        }
        Err(err) => return Err(err).context("Failed to assemble skin binding"),
    };

    Ok(ConvertedSkeleton {
        chunk_id: chunk.header.chunk_id,
        version: chunk.version.chunk_version(),
        bone_count: hierarchy.len() as u32,
        nodes,
        bind_poses: binding.as_ref().map(SkinBinding::bind_pose_text),
        binding,
    })
}

/// Convert a bones chunk file and write the skin report
pub fn convert_chunk_skeleton(
    input: &Path,
    output: &Path,
    bind_shape: Option<[f32; 16]>,
) -> Result<()> {
    let converted = convert_chunk_skeleton_to_memory(input, bind_shape)?;

    let file =
        File::create(output).with_context(|| format!("Failed to create output: {:?}", output))?;
    let mut writer = BufWriter::new(file);
    write_skin_report(&mut writer, &converted)?;

    tracing::info!(
        "Exported skeleton: {} bones from chunk {:#x}{}",
        converted.bone_count,
        converted.chunk_id,
        if converted.binding.is_some() {
            ""
        } else {
            " (no skin controller)"
        }
    );

    Ok(())
}

/// Log the bone tree of a chunk file
pub fn list_bones(input: &Path) -> Result<()> {
    let chunk = read_chunk_file(input)?;
    let hierarchy = chunk
        .hierarchy()
        .with_context(|| format!("Failed to rebuild skeleton from {:?}", input))?;

    if hierarchy.is_empty() {
        tracing::info!("No bones in {:?}", input);
        return Ok(());
    }

    tracing::info!("Bones in {:?}:", input);
    let bones = hierarchy.bones();
    for index in hierarchy.depth_first() {
        let bone = &bones[index];
        let mut depth = 0;
        let mut cursor = bone.parent;
        while let Some(parent) = cursor {
            depth += 1;
            cursor = bones[parent].parent;
        }
        tracing::info!(
            "  {:indent$}[{}] '{}' controller {:#010x} parent {:#010x}",
            "",
            index,
            bone.name,
            bone.controller_id,
            bone.parent_controller_id,
            indent = depth * 2
        );
    }

    Ok(())
}

/// Parse a bind-shape override given as 16 row-major floats
pub fn parse_bind_shape(values: &[f32]) -> Result<[f32; 16]> {
    let matrix: [f32; 16] = values
        .try_into()
        .map_err(|_| anyhow::anyhow!("Bind shape needs 16 values, got {}", values.len()))?;
    if mat4_from_rows(matrix) == Mat4::ZERO {
        anyhow::bail!("Bind shape matrix is all zeros");
    }
    Ok(matrix)
}
