//! CSV export of the entry collection.

use crate::{Result, SleepEntry};
use std::fs::File;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    id: String,
    date: String,
    bedtime: String,
    wake_time: String,
    duration: f64,
    quality: u8,
    notes: Option<String>,
}

impl From<&SleepEntry> for CsvRow {
    fn from(entry: &SleepEntry) -> Self {
        CsvRow {
            id: entry.id.to_string(),
            date: entry.date.to_string(),
            bedtime: entry.bedtime.format("%H:%M").to_string(),
            wake_time: entry.wake_time.format("%H:%M").to_string(),
            duration: entry.duration,
            quality: entry.quality,
            notes: entry.notes.clone(),
        }
    }
}

/// Write all entries to a CSV file, replacing any existing file.
///
/// The CSV is fsynced before returning. Returns the number of rows written.
pub fn export_entries(path: &Path, entries: &[SleepEntry]) -> Result<usize> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);

    for entry in entries {
        writer.serialize(CsvRow::from(entry))?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    file.sync_all()?;

    tracing::info!("Exported {} entries to {:?}", entries.len(), path);
    Ok(entries.len())
}
