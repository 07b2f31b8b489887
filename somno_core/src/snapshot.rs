//! Snapshot persistence with file locking.
//!
//! The `{entries, goals}` snapshot is the core's entire contract with durable
//! storage. Reads take a shared lock; writes go through an exclusively locked
//! temp file that is fsynced and atomically renamed over the original.

use crate::{Error, Result, Snapshot};
use fs2::FileExt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

impl Snapshot {
    /// Load a snapshot from a file with shared locking.
    ///
    /// Returns the default (empty) snapshot if the file doesn't exist.
    /// If the file is unreadable or corrupted, logs a warning and returns the
    /// default rather than failing startup.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No snapshot found, starting with empty state");
            return Ok(Self::default());
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!("Unable to open snapshot {:?}: {}. Using defaults.", path, e);
                return Ok(Self::default());
            }
        };

        if let Err(e) = file.lock_shared() {
            tracing::warn!("Unable to lock snapshot {:?}: {}. Using defaults.", path, e);
            return Ok(Self::default());
        }

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        if let Err(e) = reader.read_to_string(&mut contents) {
            let _ = file.unlock();
            tracing::warn!("Failed to read snapshot {:?}: {}. Using defaults.", path, e);
            return Ok(Self::default());
        }

        file.unlock()?;

        match serde_json::from_str::<Snapshot>(&contents) {
            Ok(snapshot) => {
                tracing::debug!(
                    "Loaded snapshot with {} entries from {:?}",
                    snapshot.entries.len(),
                    path
                );
                Ok(snapshot)
            }
            Err(e) => {
                tracing::warn!("Failed to parse snapshot {:?}: {}. Using defaults.", path, e);
                Ok(Self::default())
            }
        }
    }

    /// Save the snapshot with exclusive locking.
    ///
    /// Atomically writes by:
    /// 1. Writing to a temp file in the same directory
    /// 2. Syncing to disk
    /// 3. Renaming over the original
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let temp = NamedTempFile::new_in(path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "snapshot path missing parent")
        })?)?;

        // Exclusive lock on the temp file serializes concurrent writers
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved snapshot with {} entries to {:?}", self.entries.len(), path);
        Ok(())
    }

    /// Load the snapshot, modify it, and save it back atomically.
    pub fn update<F>(path: &Path, f: F) -> Result<Self>
    where
        F: FnOnce(&mut Snapshot) -> Result<()>,
    {
        let mut snapshot = Self::load(path)?;
        f(&mut snapshot)?;
        snapshot.save(path)?;
        Ok(snapshot)
    }
}
