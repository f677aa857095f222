use super::messages::{AlertMessage, DigestMessage, LogEntry};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{info, warn};

/// Outbound hook for HIGH priority alerts (chat webhooks and similar).
pub trait AlertChannel: Send + Sync {
    fn send_alert(&self, message: &AlertMessage) -> Result<(), ChannelError>;
}

/// Outbound hook for the MEDIUM priority digest (e-mail and similar).
pub trait DigestChannel: Send + Sync {
    fn send_digest(&self, digest: &DigestMessage) -> Result<(), ChannelError>;
}

/// Durable sink for LOW priority records.
pub trait LogChannel: Send + Sync {
    fn append(&self, entry: &LogEntry) -> Result<(), ChannelError>;

    /// Where appended entries end up, for reports.
    fn target(&self) -> String;
}

#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("channel transport unavailable: {0}")]
    Transport(String),
    #[error("channel io failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("channel payload encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),
}

fn poisoned<T>(_: PoisonError<T>) -> ChannelError {
    ChannelError::Transport("channel state poisoned".to_string())
}

/// Emits alerts as structured log events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAlertChannel;

impl AlertChannel for TracingAlertChannel {
    fn send_alert(&self, message: &AlertMessage) -> Result<(), ChannelError> {
        let payload = serde_json::to_string(message)?;
        info!(
            target: "docintel::alerts",
            document = %message.document_name,
            payload = %payload,
            "{}",
            message.text
        );
        Ok(())
    }
}

/// Emits digests as structured log events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDigestChannel;

impl DigestChannel for TracingDigestChannel {
    fn send_digest(&self, digest: &DigestMessage) -> Result<(), ChannelError> {
        info!(
            target: "docintel::digest",
            subject = %digest.subject,
            recipients = %digest.recipients.join(","),
            documents = digest.document_count(),
            "digest prepared"
        );
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryAlertChannel {
    messages: Arc<Mutex<Vec<AlertMessage>>>,
}

impl MemoryAlertChannel {
    pub fn messages(&self) -> Vec<AlertMessage> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl AlertChannel for MemoryAlertChannel {
    fn send_alert(&self, message: &AlertMessage) -> Result<(), ChannelError> {
        self.messages.lock().map_err(poisoned)?.push(message.clone());
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryDigestChannel {
    digests: Arc<Mutex<Vec<DigestMessage>>>,
}

impl MemoryDigestChannel {
    pub fn digests(&self) -> Vec<DigestMessage> {
        self.digests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl DigestChannel for MemoryDigestChannel {
    fn send_digest(&self, digest: &DigestMessage) -> Result<(), ChannelError> {
        self.digests.lock().map_err(poisoned)?.push(digest.clone());
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryLog {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl MemoryLog {
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl LogChannel for MemoryLog {
    fn append(&self, entry: &LogEntry) -> Result<(), ChannelError> {
        self.entries.lock().map_err(poisoned)?.push(entry.clone());
        Ok(())
    }

    fn target(&self) -> String {
        "in-memory log".to_string()
    }
}

/// Appends entries to a JSON array on disk.
///
/// A missing file starts a new array. A file that does not parse as an array
/// of entries is replaced, with a warning, rather than failing the append.
#[derive(Debug)]
pub struct JsonFileLog {
    path: PathBuf,
    guard: Mutex<()>,
}

impl JsonFileLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads back every entry currently on disk.
    pub fn read_entries(&self) -> Result<Vec<LogEntry>, ChannelError> {
        let _lock = self.guard.lock().map_err(poisoned)?;
        self.load_existing()
    }

    fn load_existing(&self) -> Result<Vec<LogEntry>, ChannelError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        match serde_json::from_str::<Vec<LogEntry>>(&raw) {
            Ok(entries) => Ok(entries),
            Err(err) => {
                warn!(
                    path = %self.path.display(),
                    error = %err,
                    "automation log unreadable; starting a new log"
                );
                Ok(Vec::new())
            }
        }
    }
}

impl LogChannel for JsonFileLog {
    fn append(&self, entry: &LogEntry) -> Result<(), ChannelError> {
        let _lock = self.guard.lock().map_err(poisoned)?;

        let mut entries = self.load_existing()?;
        entries.push(entry.clone());

        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_vec_pretty(&entries)?)?;
        Ok(())
    }

    fn target(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn entry(count: usize) -> LogEntry {
        LogEntry {
            timestamp: Utc
                .with_ymd_and_hms(2025, 1, 15, 12, 0, 0)
                .single()
                .expect("valid time"),
            action: "low_priority_log".to_string(),
            document_count: count,
            documents: Vec::new(),
        }
    }

    #[test]
    fn file_log_appends_to_existing_array() {
        let dir = tempfile::tempdir().expect("temp dir");
        let log = JsonFileLog::new(dir.path().join("automation_log.json"));

        log.append(&entry(1)).expect("first append");
        log.append(&entry(2)).expect("second append");

        let entries = log.read_entries().expect("read log");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].document_count, 2);
    }

    #[test]
    fn file_log_replaces_corrupt_content() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("automation_log.json");
        fs::write(&path, "{ not json").expect("seed corrupt log");

        let log = JsonFileLog::new(&path);
        log.append(&entry(3)).expect("append over corrupt log");

        let entries = log.read_entries().expect("read log");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].document_count, 3);
    }

    #[test]
    fn file_log_creates_missing_directories() {
        let dir = tempfile::tempdir().expect("temp dir");
        let log = JsonFileLog::new(dir.path().join("logs").join("automation_log.json"));

        log.append(&entry(1)).expect("append");
        assert!(log.path().exists());
        assert!(log.target().ends_with("automation_log.json"));
    }

    #[test]
    fn memory_log_keeps_entries_in_order() {
        let log = MemoryLog::default();
        log.append(&entry(1)).expect("append");
        log.append(&entry(5)).expect("append");

        let counts: Vec<usize> = log.entries().iter().map(|e| e.document_count).collect();
        assert_eq!(counts, vec![1, 5]);
    }
}
