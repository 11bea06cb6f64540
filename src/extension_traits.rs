use std::fs::{File, OpenOptions};
use std::path::PathBuf;

use anyhow::{Context, Result};

/// An extension trait that is intended to add convenience methods to the
/// std::path::PathBuf struct.
pub trait PathBufExt {
    fn open(&self, allow_overwrite: bool) -> Result<File>;
}

impl PathBufExt for PathBuf {
    /// Open the file for writing, creating it if it doesn't exist.
    fn open(&self, allow_overwrite: bool) -> Result<File> {
        let mut options = OpenOptions::new();
        options.write(true);
        match allow_overwrite {
            true => options.create(true).truncate(true),
            false => options.create_new(true),
        };
        options
            .open(self)
            .with_context(|| format!("failed to create file: {}", self.to_string_lossy()))
    }
}
