use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

/// The arguments that are passed throughout the pipeline.
///
/// This is the validated form of the command-line surface; it is built by
/// `Cli::args` and nothing downstream re-checks what validation already
/// established.
#[derive(Debug)]
pub struct Args {
    /// The family name: the accession, or the input file stem in --msa-file mode
    pub family: String,
    /// The input alignment, when the pipeline runs on a local file
    pub msa_path: Option<PathBuf>,
    /// The directory under which every alignment artifact is placed
    pub out_dir: PathBuf,
    /// The path the aggregate HMM file is written to
    pub hmm_path: PathBuf,
    /// Databases for the profile search
    pub databases: Vec<PathBuf>,
    pub disable_enrichment: bool,
    /// Present when clustering is disabled; the value is reserved
    pub disable_clustering: Option<f64>,
    /// Write the aggregate HMM in ASCII instead of the binary format
    pub ascii_hmm: bool,
    /// Gathering cutoff applied to every generated model
    pub gathering_cutoff: Option<f64>,
    pub verbose: u8,
}

impl Args {
    pub fn file_mode(&self) -> bool {
        self.msa_path.is_some()
    }

    pub fn enrichment_enabled(&self) -> bool {
        !self.disable_enrichment
    }

    pub fn clustering_enabled(&self) -> bool {
        self.disable_clustering.is_none()
    }

    /// Whether external tool chatter is passed through to the terminal
    pub fn stream_tool_output(&self) -> bool {
        self.verbose >= 2
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Fasta,
    Stockholm,
}

impl FileFormat {
    /// The format token the conversion tool expects
    pub fn as_convert_token(&self) -> &'static str {
        match self {
            FileFormat::Fasta => "fasta",
            FileFormat::Stockholm => "stockholm",
        }
    }
}

#[derive(Error, Debug)]
#[error("can't guess alignment file format")]
pub struct UnrecognizedFileFormatError;

/// Guess an alignment's format from its first line.
pub fn guess_alignment_format(path: &Path) -> Result<FileFormat> {
    let file = File::open(path).with_context(|| {
        format!("failed to open alignment file: {}", path.to_string_lossy())
    })?;

    let mut reader = BufReader::new(file);
    let mut first_line = String::new();
    reader.read_line(&mut first_line)?;

    if first_line.starts_with('>') {
        Ok(FileFormat::Fasta)
    } else if first_line.starts_with("# STOCKHOLM") {
        Ok(FileFormat::Stockholm)
    } else {
        Err(UnrecognizedFileFormatError).with_context(|| {
            format!(
                "couldn't guess the format of alignment file: {}",
                path.to_string_lossy()
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        write!(file, "{content}").unwrap();
        path
    }

    #[test]
    fn fasta_is_guessed_from_the_first_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "a.afa", ">seq1\nMKV-LA\n");
        assert_eq!(guess_alignment_format(&path).unwrap(), FileFormat::Fasta);
    }

    #[test]
    fn stockholm_is_guessed_from_the_first_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "a.sto", "# STOCKHOLM 1.0\nseq1 MKVLA\n//\n");
        assert_eq!(
            guess_alignment_format(&path).unwrap(),
            FileFormat::Stockholm
        );
    }

    #[test]
    fn anything_else_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "a.txt", "CLUSTAL W (1.82)\n");
        assert!(guess_alignment_format(&path).is_err());
    }
}
