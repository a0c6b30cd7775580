use crate::error::AppError;
use crate::models::MatchRecord;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// JSON file holding the newest-first match log.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        RecordStore { path: path.into() }
    }

    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".next_opponent")
            .join("records.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing or unreadable data is treated as an empty log.
    pub fn load(&self) -> Vec<MatchRecord> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no match log yet");
                return Vec::new();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to read match log, starting empty");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<MatchRecord>>(&content) {
            Ok(records) => {
                let loaded = records.len();
                let records: Vec<MatchRecord> = records
                    .into_iter()
                    .filter_map(|mut record| {
                        let trimmed = record.opponent_name.trim().to_string();
                        if trimmed.is_empty() {
                            return None;
                        }
                        record.opponent_name = trimmed;
                        Some(record)
                    })
                    .collect();

                if records.len() < loaded {
                    warn!(
                        path = %self.path.display(),
                        dropped = loaded - records.len(),
                        "skipped records with a blank opponent name"
                    );
                }
                debug!(path = %self.path.display(), records = records.len(), "loaded match log");
                records
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "match log is malformed, starting empty");
                Vec::new()
            }
        }
    }

    pub fn save(&self, records: &[MatchRecord]) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    AppError::IoError(format!("Failed to create {}: {}", parent.display(), e))
                })?;
            }
        }

        let json = serde_json::to_string_pretty(records).map_err(|e| {
            AppError::JsonError(format!("Failed to serialize match log: {}", e))
        })?;

        fs::write(&self.path, json).map_err(|e| {
            AppError::IoError(format!("Failed to write {}: {}", self.path.display(), e))
        })?;

        debug!(path = %self.path.display(), records = records.len(), "saved match log");
        Ok(())
    }

    pub fn clear(&self) -> Result<(), AppError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::IoError(format!(
                "Failed to remove {}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::opponent_stats::tests::record;
    use crate::models::MatchResult;
    use tempfile::TempDir;

    #[test]
    fn missing_file_loads_empty() {
        let temp = TempDir::new().expect("temp dir");
        let store = RecordStore::new(temp.path().join("records.json"));
        assert!(store.load().is_empty());
    }

    #[test]
    fn save_then_load_keeps_order() {
        let temp = TempDir::new().expect("temp dir");
        let store = RecordStore::new(temp.path().join("nested").join("records.json"));
        let records = vec![
            record("Layla", MatchResult::Loss, 0),
            record("Miya", MatchResult::Draw, 3),
        ];

        store.save(&records).expect("save");
        assert_eq!(store.load(), records);
    }

    #[test]
    fn malformed_file_loads_empty() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("records.json");
        fs::write(&path, "{ not json").expect("write");

        assert!(RecordStore::new(path).load().is_empty());
    }

    #[test]
    fn blank_names_are_dropped_and_names_trimmed_on_load() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("records.json");
        fs::write(
            &path,
            r#"[
                {"id":"1","name":"   ","result":"loss","note":"","timestamp":"2024-06-01T10:00:00Z"},
                {"id":"2","name":" Layla ","result":"win","note":"","timestamp":"2024-05-30T10:00:00Z"}
            ]"#,
        )
        .expect("write");

        let records = RecordStore::new(path).load();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "2");
        assert_eq!(records[0].opponent_name, "Layla");
    }

    #[test]
    fn clear_removes_file_and_tolerates_missing() {
        let temp = TempDir::new().expect("temp dir");
        let store = RecordStore::new(temp.path().join("records.json"));
        store.save(&[record("Layla", MatchResult::Win, 0)]).expect("save");

        store.clear().expect("clear");
        assert!(!store.path().exists());
        store.clear().expect("second clear");
    }
}
