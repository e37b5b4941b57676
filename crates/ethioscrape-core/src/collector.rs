use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::source::{FetchedMessage, MessageSource, SourceError};

pub const DEFAULT_MESSAGE_LIMIT: usize = 30;
pub const DEFAULT_RAW_DIR: &str = "data/raw";
pub const CAPTURE_PREFIX: &str = "telegram_messages_";
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const CAPTURE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

#[derive(Debug, Error)]
pub enum CollectorError {
    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to create {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("failed to flush {path}: {source}")]
    Flush {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid capture pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

/// One row of the raw capture table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub channel: String,
    pub date: String,
    pub sender_id: Option<i64>,
    pub message: String,
}

impl MessageRecord {
    pub const COLUMNS: [&'static str; 4] = ["channel", "date", "sender_id", "message"];

    /// Flattens a fetched message onto a single line. Messages without text
    /// (media, service messages) yield `None`.
    pub fn from_fetched(channel: &str, message: FetchedMessage) -> Option<Self> {
        let text = message.text.replace(['\r', '\n'], " ");
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        Some(Self {
            channel: channel.to_string(),
            date: message.date.format(DATE_FORMAT).to_string(),
            sender_id: message.sender_id,
            message: text.to_string(),
        })
    }
}

#[derive(Debug)]
pub enum ChannelResult {
    Fetched(Vec<MessageRecord>),
    Failed(String),
}

/// What happened to a single configured channel during a run.
#[derive(Debug)]
pub struct ChannelOutcome {
    pub channel: String,
    pub result: ChannelResult,
}

impl ChannelOutcome {
    pub fn fetched(channel: impl Into<String>, records: Vec<MessageRecord>) -> Self {
        Self {
            channel: channel.into(),
            result: ChannelResult::Fetched(records),
        }
    }

    pub fn failed(channel: impl Into<String>, error: &SourceError) -> Self {
        Self {
            channel: channel.into(),
            result: ChannelResult::Failed(error.to_string()),
        }
    }

    pub fn records(&self) -> &[MessageRecord] {
        match &self.result {
            ChannelResult::Fetched(records) => records,
            ChannelResult::Failed(_) => &[],
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.result, ChannelResult::Failed(_))
    }
}

#[derive(Debug)]
pub struct CollectionReport {
    pub outcomes: Vec<ChannelOutcome>,
    pub output_path: PathBuf,
    pub record_count: usize,
}

impl CollectionReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &ChannelOutcome> {
        self.outcomes.iter().filter(|outcome| !outcome.is_failure())
    }

    pub fn failed(&self) -> impl Iterator<Item = &ChannelOutcome> {
        self.outcomes.iter().filter(|outcome| outcome.is_failure())
    }
}

#[derive(Debug, Clone)]
pub struct CollectorConfig {
    pub channels: Vec<String>,
    pub message_limit: usize,
    pub output_dir: PathBuf,
}

impl CollectorConfig {
    pub fn from_app(config: &AppConfig, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            channels: config.channels.clone(),
            message_limit: config.message_limit,
            output_dir: output_dir.into(),
        }
    }
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            channels: Vec::new(),
            message_limit: DEFAULT_MESSAGE_LIMIT,
            output_dir: PathBuf::from(DEFAULT_RAW_DIR),
        }
    }
}

pub struct Collector {
    source: Arc<dyn MessageSource>,
    config: CollectorConfig,
}

impl Collector {
    pub fn new(config: CollectorConfig, source: Arc<dyn MessageSource>) -> Self {
        Self { source, config }
    }

    /// Fetches every configured channel in order. A failing channel is logged
    /// and recorded; it never stops the remaining channels.
    pub async fn collect(&self) -> Vec<ChannelOutcome> {
        let mut outcomes = Vec::with_capacity(self.config.channels.len());

        for channel in &self.config.channels {
            info!(channel = %channel, "Fetching from channel");
            let outcome = match self
                .source
                .fetch_recent(channel, self.config.message_limit)
                .await
            {
                Ok(messages) => {
                    let records: Vec<MessageRecord> = messages
                        .into_iter()
                        .filter_map(|message| MessageRecord::from_fetched(channel, message))
                        .collect();
                    info!(channel = %channel, messages = records.len(), "Fetched channel");
                    ChannelOutcome::fetched(channel.as_str(), records)
                }
                Err(err) => {
                    warn!(channel = %channel, error = %err, "Failed to fetch from channel");
                    ChannelOutcome::failed(channel.as_str(), &err)
                }
            };
            outcomes.push(outcome);
        }

        outcomes
    }

    /// Collects all channels, closes the session and writes one new timestamped
    /// capture file.
    pub async fn run(&self) -> Result<CollectionReport, CollectorError> {
        let outcomes = self.collect().await;

        match self.source.close().await {
            Ok(()) => info!("Session closed"),
            Err(err) => warn!(error = %err, "Failed to close session cleanly"),
        }

        let records: Vec<&MessageRecord> = outcomes
            .iter()
            .flat_map(|outcome| outcome.records())
            .collect();
        let output_path = write_capture(&self.config.output_dir, Local::now(), &records)?;
        info!(path = %output_path.display(), rows = records.len(), "Data saved");

        Ok(CollectionReport {
            record_count: records.len(),
            outcomes,
            output_path,
        })
    }
}

/// `<dir>/telegram_messages_<YYYYMMDD_HHMMSS>.csv`
pub fn capture_path(dir: &Path, captured_at: DateTime<Local>) -> PathBuf {
    numbered_capture_path(dir, captured_at, 0)
}

/// Same as [`capture_path`], with `_<n>` appended to the stem for `n > 0`.
fn numbered_capture_path(dir: &Path, captured_at: DateTime<Local>, n: u32) -> PathBuf {
    let stamp = captured_at.format(CAPTURE_TIMESTAMP_FORMAT);
    if n == 0 {
        dir.join(format!("{CAPTURE_PREFIX}{stamp}.csv"))
    } else {
        dir.join(format!("{CAPTURE_PREFIX}{stamp}_{n}.csv"))
    }
}

/// Writes a new capture into `dir` and returns its path. An existing capture
/// with the same timestamp is never replaced; the new file gets the next free
/// `_<n>` suffix instead.
pub fn write_capture(
    dir: &Path,
    captured_at: DateTime<Local>,
    records: &[&MessageRecord],
) -> Result<PathBuf, CollectorError> {
    create_parent(dir)?;

    let mut n = 0;
    loop {
        let path = numbered_capture_path(dir, captured_at, n);
        match open_new(&path) {
            Ok(file) => {
                write_to(file, &path, records)?;
                return Ok(path);
            }
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => n += 1,
            Err(source) => return Err(CollectorError::Create { path, source }),
        }
    }
}

/// Writes the capture table, header included even when there are no rows.
/// Fails if `path` already exists.
pub fn write_records(path: &Path, records: &[&MessageRecord]) -> Result<(), CollectorError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_parent(parent)?;
    }
    let file = open_new(path).map_err(|source| CollectorError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    write_to(file, path, records)
}

fn create_parent(dir: &Path) -> Result<(), CollectorError> {
    fs::create_dir_all(dir).map_err(|source| CollectorError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

fn open_new(path: &Path) -> io::Result<File> {
    OpenOptions::new().write(true).create_new(true).open(path)
}

fn write_to(file: File, path: &Path, records: &[&MessageRecord]) -> Result<(), CollectorError> {
    let csv_err = |source| CollectorError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    writer
        .write_record(MessageRecord::COLUMNS)
        .map_err(csv_err)?;
    for record in records {
        writer.serialize(record).map_err(csv_err)?;
    }
    writer.flush().map_err(|source| CollectorError::Flush {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(())
}

/// The newest capture in `dir`, ordered by the timestamp in its file name and
/// then by its `_<n>` suffix.
pub fn latest_capture(dir: &Path) -> Result<Option<PathBuf>, CollectorError> {
    let pattern = dir.join(format!("{CAPTURE_PREFIX}*.csv"));
    let latest = glob::glob(&pattern.to_string_lossy())?
        .filter_map(Result::ok)
        .max_by_key(|path| capture_order(path));
    Ok(latest)
}

fn capture_order(path: &Path) -> (String, u32) {
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or_default();
    let stamp = stem.strip_prefix(CAPTURE_PREFIX).unwrap_or(stem);
    match stamp.rsplit_once('_') {
        Some((base, n)) if base.contains('_') => match n.parse() {
            Ok(n) => (base.to_string(), n),
            Err(_) => (stamp.to_string(), 0),
        },
        _ => (stamp.to_string(), 0),
    }
}
