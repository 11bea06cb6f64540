use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use thiserror::Error;

use crate::args::Args;

#[derive(Error, Debug)]
pub enum UsageError {
    #[error("input alignment file not found: {0}")]
    MsaFileNotFound(String),
    #[error("input alignment file has no usable file stem: {0}")]
    BadMsaFileName(String),
    #[error("enrichment requires at least one database (-d); pass --disable-enrichment to run without one")]
    NoDatabase,
    #[error("databases were supplied but enrichment is disabled")]
    UnusedDatabases,
}

#[derive(Debug, Parser)]
#[command(name = "pfamdiv")]
#[command(
    about = "Diversify a protein family's alignment and build one aggregate profile HMM over every variant"
)]
pub struct Cli {
    /// Pfam family accession, or an alignment file when --msa-file is set
    #[arg(value_name = "FAMILY|MSA")]
    pub input: String,
    /// Directory under which alignment artifacts are placed
    #[arg(value_name = "OUT_DIR")]
    pub out_dir: PathBuf,
    /// Where to write the aggregate HMM file
    #[arg(value_name = "OUT.hmm")]
    pub hmm_path: PathBuf,
    /// Treat the input as a multiple sequence alignment file instead of an accession
    #[arg(long, action)]
    pub msa_file: bool,
    /// A database for the profile search; may be given more than once
    #[arg(short = 'd', long = "database", value_name = "DB")]
    pub databases: Vec<PathBuf>,
    /// Skip the homology enrichment stage
    #[arg(long, action)]
    pub disable_enrichment: bool,
    /// Skip the clustering stage; the value is reserved for a future similarity threshold
    #[arg(long, value_name = "t")]
    pub disable_clustering: Option<f64>,
    /// Write the aggregate HMM in ASCII instead of the binary format
    #[arg(long, action)]
    pub ascii_hmm: bool,
    /// Set the gathering cutoff on every generated model
    #[arg(long = "set-ga", value_name = "x")]
    pub gathering_cutoff: Option<f64>,
    /// Print progress messages; give twice to also stream external tool output
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Validate the surface-level arguments and produce the pipeline
    /// configuration.
    ///
    /// Everything rejected here is a usage error: the pipeline has had no
    /// side effects yet, and main exits with code 1.
    pub fn args(self) -> Result<Args> {
        if !self.disable_enrichment && self.databases.is_empty() {
            return Err(UsageError::NoDatabase.into());
        }
        if self.disable_enrichment && !self.databases.is_empty() {
            return Err(UsageError::UnusedDatabases.into());
        }

        let (family, msa_path) = match self.msa_file {
            true => {
                let path = PathBuf::from(&self.input);
                if !path.is_file() {
                    return Err(UsageError::MsaFileNotFound(self.input).into());
                }
                let stem = path
                    .file_stem()
                    .and_then(|stem| stem.to_str())
                    .ok_or_else(|| UsageError::BadMsaFileName(self.input.clone()))?
                    .to_string();
                (stem, Some(path))
            }
            false => (self.input, None),
        };

        Ok(Args {
            family,
            msa_path,
            out_dir: self.out_dir,
            hmm_path: self.hmm_path,
            databases: self.databases,
            disable_enrichment: self.disable_enrichment,
            disable_clustering: self.disable_clustering,
            ascii_hmm: self.ascii_hmm,
            gathering_cutoff: self.gathering_cutoff,
            verbose: self.verbose,
        })
    }
}
