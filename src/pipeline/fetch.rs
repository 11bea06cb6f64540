use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use log::debug;
use thiserror::Error;

use crate::extension_traits::PathBufExt;

/// The annotation endpoint serving gzip-compressed family alignments.
pub const ALIGNMENT_ENDPOINT: &str = "https://www.ebi.ac.uk/interpro/wwwapi/entry/pfam";

/// Which of the two remote alignments to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignmentKind {
    Seed,
    Full,
}

impl fmt::Display for AlignmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlignmentKind::Seed => write!(f, "seed"),
            AlignmentKind::Full => write!(f, "full"),
        }
    }
}

#[derive(Error, Debug)]
#[error("fetching the {kind} alignment of {accession} failed with HTTP status {status}")]
pub struct RemoteFetchError {
    accession: String,
    kind: AlignmentKind,
    status: u16,
}

/// Produce the download URL for one alignment of one family.
pub fn alignment_url(accession: &str, kind: AlignmentKind) -> String {
    format!("{ALIGNMENT_ENDPOINT}/{accession}/?annotation=alignment:{kind}")
}

/// Download one alignment, gunzip it, and write it to `dest`.
///
/// The decompressed stream goes to `{dest}.part` first and is renamed into
/// place once the copy completes, so a failed transfer never leaves a
/// truncated file at `dest`.
pub fn fetch_alignment(accession: &str, kind: AlignmentKind, dest: &Path) -> Result<()> {
    let url = alignment_url(accession, kind);
    debug!("GET {url}");

    let response = reqwest::blocking::get(&url)
        .with_context(|| format!("failed to request {url}"))?;
    if !response.status().is_success() {
        return Err(RemoteFetchError {
            accession: accession.to_string(),
            kind,
            status: response.status().as_u16(),
        }
        .into());
    }

    let part = dest.with_extension("part");
    let mut writer = part.open(true)?;
    let mut decoder = GzDecoder::new(response);
    if let Err(error) = io::copy(&mut decoder, &mut writer) {
        // don't leave the partial download behind
        let _ = fs::remove_file(&part);
        return Err(error).with_context(|| format!("failed to download {url}"));
    }

    fs::rename(&part, dest).with_context(|| {
        format!(
            "failed to move download into place: {}",
            dest.to_string_lossy()
        )
    })
}
