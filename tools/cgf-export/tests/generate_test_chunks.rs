//! Generators for compiled-bones chunk files used by the integration tests
#![allow(dead_code)]

use std::path::Path;

use cgf_common::{ChunkHeader, BONES_CHUNK_HEADER_SIZE, COMPILED_BONES_CHUNK_TYPE};

/// One bone as written into a test chunk
#[derive(Clone, Debug)]
pub struct TestBone {
    pub name: String,
    pub controller_id: u32,
    pub offset_parent: i32,
    /// 3×4 row-major
    pub transform: [f32; 12],
}

impl TestBone {
    pub fn new(name: &str, controller_id: u32, offset_parent: i32, translation: [f32; 3]) -> Self {
        Self {
            name: name.to_string(),
            controller_id,
            offset_parent,
            transform: [
                1.0, 0.0, 0.0, translation[0], //
                0.0, 1.0, 0.0, translation[1], //
                0.0, 0.0, 1.0, translation[2],
            ],
        }
    }
}

/// 64 joints: a root, a pelvis, and two 31-bone chains hanging off it
pub fn biped_64() -> Vec<TestBone> {
    let mut bones = vec![
        TestBone {
            name: "Bip01".into(),
            controller_id: 0x1000,
            offset_parent: 0,
            transform: [
                -0.0, -1.0, 0.0, 0.0, //
                1.0, -0.0, 0.0, 0.0, //
                0.0, 0.0, 1.0, 0.0,
            ],
        },
        TestBone::new("Bip01_Pelvis", 0x1001, -1, [0.0, 0.0, 8.346858]),
    ];
    for side in ["L", "R"] {
        for i in 0..31 {
            let index = bones.len() as i32;
            // The first bone of each chain hangs off the pelvis (index 1)
            let offset_parent = if i == 0 { 1 - index } else { -1 };
            let x = if side == "L" { 0.25 } else { -0.25 };
            bones.push(TestBone::new(
                &format!("Bip01_{}_Bone{:02}", side, i),
                0x2000 + index as u32,
                offset_parent,
                [x, 0.0, -0.25],
            ));
        }
    }
    bones
}

/// Serialize bones into a current-layout (0x801) chunk file
pub fn current_chunk_bytes(chunk_id: u32, bones: &[TestBone]) -> Vec<u8> {
    let size = BONES_CHUNK_HEADER_SIZE + bones.len() * 324;
    let mut out = ChunkHeader::new(COMPILED_BONES_CHUNK_TYPE, 0x801, chunk_id, size as u32)
        .to_bytes()
        .to_vec();
    out.resize(BONES_CHUNK_HEADER_SIZE, 0);
    for bone in bones {
        out.extend_from_slice(&bone.controller_id.to_le_bytes());
        out.extend_from_slice(&(-1i32).to_le_bytes());
        out.extend_from_slice(&[0u8; 208]);
        let mut name = [0u8; 48];
        name[..bone.name.len()].copy_from_slice(bone.name.as_bytes());
        out.extend_from_slice(&name);
        out.extend_from_slice(&bone.offset_parent.to_le_bytes());
        out.extend_from_slice(&0i32.to_le_bytes());
        out.extend_from_slice(&0i32.to_le_bytes());
        for f in bone.transform {
            out.extend_from_slice(&f.to_le_bytes());
        }
    }
    out
}

/// Serialize bones into a legacy-layout (0x800) chunk file
pub fn legacy_chunk_bytes(chunk_id: u32, bones: &[TestBone]) -> Vec<u8> {
    let size = BONES_CHUNK_HEADER_SIZE + bones.len() * 584;
    let mut out = ChunkHeader::new(COMPILED_BONES_CHUNK_TYPE, 0x800, chunk_id, size as u32)
        .to_bytes()
        .to_vec();
    out.resize(BONES_CHUNK_HEADER_SIZE, 0);
    for bone in bones {
        out.extend_from_slice(&bone.controller_id.to_le_bytes());
        out.extend_from_slice(&[0u8; 208]);
        out.extend_from_slice(&1.0f32.to_le_bytes());
        let mut name = [0u8; 256];
        name[..bone.name.len()].copy_from_slice(bone.name.as_bytes());
        out.extend_from_slice(&name);
        out.extend_from_slice(&0i32.to_le_bytes());
        out.extend_from_slice(&bone.offset_parent.to_le_bytes());
        out.extend_from_slice(&0i32.to_le_bytes());
        out.extend_from_slice(&0i32.to_le_bytes());
        for f in bone.transform {
            out.extend_from_slice(&f.to_le_bytes());
        }
        for f in [0.0f32, 0.0, 0.0, 1.0] {
            out.extend_from_slice(&f.to_le_bytes());
        }
        out.extend_from_slice(&[0u8; 32]);
    }
    out
}

pub fn write_chunk(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    std::fs::write(path, bytes)
}
