//! Append-only record of every answer shown.

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use crossbeam_channel::{bounded, Sender, TrySendError};
use serde::Serialize;

use crate::log_debug;

/// Reveals queued for the writer thread before appends start failing.
const LOG_QUEUE_CAPACITY: usize = 256;

/// One revealed answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Interaction {
    pub sequence: u64,
    pub outcome: String,
    pub prompt: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
struct InteractionRow<'a> {
    timestamp_utc: String,
    count: u64,
    outcome: &'a str,
    prompt: &'a str,
}

pub trait InteractionSink {
    fn append(&mut self, interaction: &Interaction) -> Result<()>;
}

/// CSV file sink: `timestamp_utc,count,outcome,prompt`, header written on creation.
///
/// The file is opened on the first append and kept open; a failed write drops
/// the handle so the next append reopens it.
pub struct CsvInteractionLog {
    path: PathBuf,
    writer: Option<csv::Writer<fs::File>>,
}

impl CsvInteractionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writer: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> Result<csv::Writer<fs::File>> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
        }
        let needs_header = fs::metadata(&self.path).map(|m| m.len() == 0).unwrap_or(true);
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open {}", self.path.display()))?;
        Ok(csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file))
    }
}

impl InteractionSink for CsvInteractionLog {
    fn append(&mut self, interaction: &Interaction) -> Result<()> {
        let mut writer = match self.writer.take() {
            Some(writer) => writer,
            None => self.open()?,
        };
        writer.serialize(InteractionRow {
            timestamp_utc: interaction
                .timestamp
                .to_rfc3339_opts(SecondsFormat::Secs, true),
            count: interaction.sequence,
            outcome: interaction.outcome.trim(),
            prompt: interaction.prompt.trim(),
        })?;
        writer.flush()?;
        self.writer = Some(writer);
        Ok(())
    }
}

enum LogMessage {
    Append(Interaction),
    Shutdown,
}

/// Hands interactions to a writer thread so file I/O never runs on the tick loop.
///
/// `append` only enqueues; write failures are logged by the writer thread.
/// Dropping the log drains the queue and joins the thread.
pub struct BackgroundInteractionLog {
    tx: Sender<LogMessage>,
    handle: Option<thread::JoinHandle<()>>,
}

impl BackgroundInteractionLog {
    pub fn spawn<S: InteractionSink + Send + 'static>(mut inner: S) -> Self {
        let (tx, rx) = bounded(LOG_QUEUE_CAPACITY);
        let handle = thread::spawn(move || {
            for message in rx.iter() {
                match message {
                    LogMessage::Append(interaction) => {
                        if let Err(err) = inner.append(&interaction) {
                            log_debug(&format!("interaction log append failed: {err:#}"));
                            tracing::warn!(
                                error = %format!("{err:#}"),
                                "interaction log append failed"
                            );
                        }
                    }
                    LogMessage::Shutdown => break,
                }
            }
        });
        Self {
            tx,
            handle: Some(handle),
        }
    }
}

impl InteractionSink for BackgroundInteractionLog {
    fn append(&mut self, interaction: &Interaction) -> Result<()> {
        match self.tx.try_send(LogMessage::Append(interaction.clone())) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => bail!("interaction log queue is full"),
            Err(TrySendError::Disconnected(_)) => bail!("interaction log writer has stopped"),
        }
    }
}

impl Drop for BackgroundInteractionLog {
    fn drop(&mut self) {
        // Blocking send: queued rows are written before the thread exits.
        let _ = self.tx.send(LogMessage::Shutdown);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log_debug("interaction log writer panicked");
            }
        }
    }
}

/// Keeps interactions in memory, in order. Handy for driving the state machine
/// without touching the filesystem.
#[derive(Debug, Default, Clone)]
pub struct MemoryInteractionLog {
    pub entries: Vec<Interaction>,
}

impl InteractionSink for MemoryInteractionLog {
    fn append(&mut self, interaction: &Interaction) -> Result<()> {
        self.entries.push(interaction.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_csv_path(label: &str) -> PathBuf {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        env::temp_dir()
            .join(format!("magic7ball_{label}_{unique}"))
            .join("interactions.csv")
    }

    fn interaction(sequence: u64, outcome: &str) -> Interaction {
        Interaction {
            sequence,
            outcome: outcome.to_string(),
            prompt: "Will it rain?".to_string(),
            timestamp: DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
                .expect("timestamp")
                .with_timezone(&Utc),
        }
    }

    #[test]
    fn writes_header_once_and_appends_rows() {
        let path = temp_csv_path("rows");
        let mut log = CsvInteractionLog::new(&path);
        log.append(&interaction(1, "Yes")).expect("first append");
        log.append(&interaction(2, "Reply hazy, try again"))
            .expect("second append");
        let contents = fs::read_to_string(&path).expect("log contents");
        if let Some(dir) = path.parent() {
            let _ = fs::remove_dir_all(dir);
        }
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "timestamp_utc,count,outcome,prompt");
        assert_eq!(lines[1], "2024-05-01T12:00:00Z,1,Yes,Will it rain?");
        assert_eq!(
            lines[2],
            "2024-05-01T12:00:00Z,2,\"Reply hazy, try again\",Will it rain?"
        );
    }

    #[test]
    fn reopens_after_the_handle_is_dropped() {
        let path = temp_csv_path("reopen");
        let mut log = CsvInteractionLog::new(&path);
        log.append(&interaction(1, "Yes")).expect("first append");
        drop(log);
        let mut log = CsvInteractionLog::new(&path);
        log.append(&interaction(2, "No")).expect("append after reopen");
        let contents = fs::read_to_string(&path).expect("log contents");
        if let Some(dir) = path.parent() {
            let _ = fs::remove_dir_all(dir);
        }
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3, "header must not be repeated: {contents}");
        assert!(lines[2].contains(",2,No,"));
    }

    #[test]
    fn background_log_writes_every_row_before_drop_returns() {
        let path = temp_csv_path("background");
        let mut log = BackgroundInteractionLog::spawn(CsvInteractionLog::new(&path));
        for sequence in 1..=5 {
            log.append(&interaction(sequence, "Yes"))
                .expect("enqueue never blocks");
        }
        drop(log);
        let contents = fs::read_to_string(&path).expect("log contents");
        if let Some(dir) = path.parent() {
            let _ = fs::remove_dir_all(dir);
        }
        let counts: Vec<&str> = contents
            .lines()
            .skip(1)
            .map(|line| line.split(',').nth(1).unwrap_or(""))
            .collect();
        assert_eq!(counts, vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn background_log_reports_a_stopped_writer() {
        let mut log = BackgroundInteractionLog::spawn(MemoryInteractionLog::default());
        log.tx.send(LogMessage::Shutdown).expect("shutdown queued");
        if let Some(handle) = log.handle.take() {
            handle.join().expect("writer exits");
        }
        assert!(log.append(&interaction(1, "Yes")).is_err());
    }

    #[test]
    fn memory_log_keeps_entries_in_order() {
        let mut log = MemoryInteractionLog::default();
        log.append(&interaction(1, "Yes")).expect("append");
        log.append(&interaction(2, "No")).expect("append");
        let outcomes: Vec<&str> = log.entries.iter().map(|e| e.outcome.as_str()).collect();
        assert_eq!(outcomes, vec!["Yes", "No"]);
    }
}
