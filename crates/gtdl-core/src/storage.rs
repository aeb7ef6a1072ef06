//! Atomic download target: stream into a `.part` file, rename on completion.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Open temp file for a download in progress. Bytes land in `<final>.part`;
/// `finalize` renames onto the final path, so a partial download is never
/// visible under the final name. A crash leaves only the `.part` artifact.
pub struct PartFile {
    file: File,
    temp_path: PathBuf,
    final_path: PathBuf,
}

impl PartFile {
    /// Creates `<final_path>.part`, truncating a stale one from an earlier
    /// interrupted run.
    pub fn create(final_path: &Path) -> Result<Self> {
        let temp_path = part_path(final_path);
        let file = File::create(&temp_path)
            .with_context(|| format!("failed to create temp file: {}", temp_path.display()))?;
        Ok(PartFile {
            file,
            temp_path,
            final_path: final_path.to_path_buf(),
        })
    }

    pub fn write_all(&mut self, data: &[u8]) -> std::io::Result<()> {
        self.file.write_all(data)
    }

    /// Atomically rename the temp file to the final path. Consumes the
    /// writer and closes the file first.
    pub fn finalize(self) -> Result<()> {
        drop(self.file);
        std::fs::rename(&self.temp_path, &self.final_path).with_context(|| {
            format!(
                "failed to rename {} to {}",
                self.temp_path.display(),
                self.final_path.display()
            )
        })
    }
}

fn part_path(final_path: &Path) -> PathBuf {
    let mut name = final_path.as_os_str().to_os_string();
    name.push(".part");
    PathBuf::from(name)
}
