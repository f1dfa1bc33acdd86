//! JSON fixture files in the `[{"model", "pk", "fields"}]` layout.

use crate::core::{Attributes, FactoryError, Result};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// One persisted row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureRecord {
    pub model: String,
    pub pk: i64,
    pub fields: Attributes,
}

pub struct FixtureFile {
    path: PathBuf,
}

impl FixtureFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `records` through a temp file in the target directory, then rename.
    pub fn save(&self, records: &[FixtureRecord]) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let temp = NamedTempFile::new_in(&dir)?;
        {
            let mut writer = BufWriter::new(temp.as_file());
            serde_json::to_writer_pretty(&mut writer, records)?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;
        temp.persist(&self.path)
            .map_err(|e| FactoryError::Io(format!("Failed to write fixture: {}", e)))?;
        Ok(())
    }

    pub fn load(&self) -> Result<Vec<FixtureRecord>> {
        let file = File::open(&self.path)?;
        let records = serde_json::from_reader(BufReader::new(file))?;
        Ok(records)
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}
