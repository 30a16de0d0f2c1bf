//! Manifest parsing and batch conversion
//!
//! Parses skeletons.toml and converts every listed model. Models convert in
//! parallel and independently: one broken skeleton does not stop the rest.

use anyhow::{Context, Result};
use hashbrown::HashMap;
use rayon::prelude::*;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::formats::SKIN_REPORT_EXT;
use crate::skeleton::{convert_chunk_skeleton, parse_bind_shape};

/// Root manifest structure
#[derive(Debug, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub skeletons: HashMap<String, SkeletonEntry>,
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("skins/")
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SkeletonEntry {
    Simple(PathBuf),
    Detailed {
        path: PathBuf,
        /// Mesh-to-bind-pose offset, 16 floats row-major
        #[serde(default)]
        bind_shape: Option<Vec<f32>>,
    },
}

impl SkeletonEntry {
    pub fn path(&self) -> &Path {
        match self {
            SkeletonEntry::Simple(p) => p,
            SkeletonEntry::Detailed { path, .. } => path,
        }
    }

    pub fn bind_shape(&self) -> Option<&[f32]> {
        match self {
            SkeletonEntry::Simple(_) => None,
            SkeletonEntry::Detailed { bind_shape, .. } => bind_shape.as_deref(),
        }
    }
}

/// Outcome of a batch build
#[derive(Debug, Default)]
pub struct BuildReport {
    pub converted: Vec<String>,
    /// Model name and the error that stopped it
    pub failed: Vec<(String, String)>,
}

impl BuildReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Load and parse a manifest file
pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {:?}", path))?;
    parse_manifest(&content).with_context(|| format!("Failed to parse manifest: {:?}", path))
}

/// Parse manifest text, resolving nothing
pub fn parse_manifest(content: &str) -> Result<Manifest> {
    Ok(toml::from_str(content)?)
}

/// Validate a manifest without building
pub fn validate(manifest: &Manifest) -> Result<()> {
    for (name, entry) in &manifest.skeletons {
        if !entry.path().exists() {
            anyhow::bail!("Skeleton '{}' source not found: {:?}", name, entry.path());
        }
        if let Some(values) = entry.bind_shape() {
            parse_bind_shape(values)
                .with_context(|| format!("Skeleton '{}' has an invalid bind_shape", name))?;
        }
    }
    Ok(())
}

/// Convert every skeleton in a manifest.
///
/// Per-model failures are logged and collected in the report; only setup
/// failures (output directory) return an error.
pub fn build_all(manifest: &Manifest, output_override: Option<&Path>) -> Result<BuildReport> {
    let output_dir = output_override.unwrap_or(&manifest.output.dir);
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;

    let mut entries: Vec<_> = manifest.skeletons.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    let results: Vec<(String, Result<()>)> = entries
        .par_iter()
        .map(|(name, entry)| {
            let output = output_dir.join(format!("{}.{}", name, SKIN_REPORT_EXT));
            tracing::info!("Converting skeleton: {} -> {:?}", name, output);
            let result = entry
                .bind_shape()
                .map(parse_bind_shape)
                .transpose()
                .and_then(|bind_shape| convert_chunk_skeleton(entry.path(), &output, bind_shape));
            (name.to_string(), result)
        })
        .collect();

    let mut report = BuildReport::default();
    for (name, result) in results {
        match result {
            Ok(()) => report.converted.push(name),
            Err(err) => {
                tracing::error!("Skeleton '{}' failed: {:#}", name, err);
                report.failed.push((name, format!("{:#}", err)));
            }
        }
    }

    Ok(report)
}
