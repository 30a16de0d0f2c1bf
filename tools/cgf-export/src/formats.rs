//! Skin report output
//!
//! The report is JSON: node tree, joint names, inverse bind matrices (both as
//! numbers and as a text float array) and the bind-shape matrix.

use anyhow::Result;
use std::io::Write;

use crate::skeleton::ConvertedSkeleton;

/// Default extension of a written skin report
pub const SKIN_REPORT_EXT: &str = "skin.json";

/// Write a complete skin report
pub fn write_skin_report<W: Write>(w: &mut W, skeleton: &ConvertedSkeleton) -> Result<()> {
    serde_json::to_writer_pretty(&mut *w, skeleton)?;
    w.write_all(b"\n")?;
    w.flush()?;
    Ok(())
}
