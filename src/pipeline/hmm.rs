use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;
use thiserror::Error;

use crate::naming;
use crate::proc::ProcessSpec;

#[derive(Error, Debug)]
#[error("no alignment files found for {family} under {out_dir}")]
pub struct NoAlignmentsError {
    family: String,
    out_dir: String,
}

/// Find every alignment artifact belonging to the family.
///
/// Paths are sorted lexicographically rather than returned in directory
/// order, so the model order in the aggregate output is reproducible from
/// an identical file-system snapshot.
pub fn discover_alignments(out_dir: &Path, family: &str) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(out_dir).with_context(|| {
        format!(
            "failed to read output directory: {}",
            out_dir.to_string_lossy()
        )
    })?;

    let mut paths = vec![];
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            continue;
        };
        if naming::is_family_alignment(file_name, family) {
            paths.push(entry.path());
        }
    }
    paths.sort();
    Ok(paths)
}

pub fn generate_spec(
    hmm_path: &Path,
    alignments: &[PathBuf],
    gathering_cutoff: Option<f64>,
    ascii: bool,
) -> ProcessSpec {
    let mut spec = ProcessSpec::new("generate_hmms").arg(hmm_path);
    for alignment in alignments {
        spec = spec.arg(alignment);
    }
    if let Some(cutoff) = gathering_cutoff {
        spec = spec.args(["--set-ga", &cutoff.to_string()]);
    }
    if ascii {
        spec = spec.arg("--ascii-hmm");
    }
    spec
}

/// Build one model per discovered alignment into a single aggregate file.
pub fn generate(
    hmm_path: &Path,
    out_dir: &Path,
    family: &str,
    gathering_cutoff: Option<f64>,
    ascii: bool,
) -> Result<()> {
    let alignments = discover_alignments(out_dir, family)?;
    if alignments.is_empty() {
        return Err(NoAlignmentsError {
            family: family.to_string(),
            out_dir: out_dir.to_string_lossy().to_string(),
        }
        .into());
    }

    info!(
        "building {} models into {}",
        alignments.len(),
        hmm_path.to_string_lossy()
    );
    generate_spec(hmm_path, &alignments, gathering_cutoff, ascii).run()
}
