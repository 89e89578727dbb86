//! Host filesystem adapter implementing `HostFiles`.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::application::ports::HostFiles;

/// Production filesystem access via `std::fs`.
pub struct LocalFiles;

impl HostFiles for LocalFiles {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        std::fs::write(path, content).with_context(|| format!("writing {}", path.display()))
    }

    fn append(&self, path: &Path, content: &str) -> Result<()> {
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("opening {} for append", path.display()))?;
        file.write_all(content.as_bytes())
            .with_context(|| format!("appending to {}", path.display()))
    }
}
