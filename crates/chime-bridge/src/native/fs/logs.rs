//! On-disk chat logs.
//!
//! `<logs>/<key>/name` holds the conversation's display name and
//! `<logs>/<key>/<YYYY-MM-DD>.jsonl` one [`LogMessage`] per line.

use std::fs::{self, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chime_common::{BridgeError, ConversationKey};
use chrono::NaiveDate;
use tracing::warn;

use crate::native::{LogIndex, LogIndexEntry, LogMessage};

const NAME_FILE: &str = "name";
const EXTENSION: &str = "jsonl";

fn day_file(conversation: &Path, date: NaiveDate) -> PathBuf {
    conversation.join(format!("{}.{EXTENSION}", date.format("%Y-%m-%d")))
}

/// Every conversation under `logs`, creating the directory if needed.
pub(super) fn index(logs: &Path) -> Result<LogIndex, BridgeError> {
    fs::create_dir_all(logs)?;
    let mut index = LogIndex::new();
    for entry in fs::read_dir(logs)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let Some(key) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        let dir = entry.path();
        let name = match fs::read_to_string(dir.join(NAME_FILE)) {
            Ok(name) if !name.trim().is_empty() => name.trim().to_string(),
            _ => key.clone(),
        };
        index.insert(
            ConversationKey::new(key),
            LogIndexEntry {
                name,
                dates: dates(&dir)?,
            },
        );
    }
    Ok(index)
}

/// Days with logs for one conversation, oldest first.
fn dates(conversation: &Path) -> Result<Vec<NaiveDate>, BridgeError> {
    let entries = match fs::read_dir(conversation) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };
    let mut dates = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
            continue;
        }
        if let Some(date) = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
        {
            dates.push(date);
        }
    }
    dates.sort();
    Ok(dates)
}

/// All messages logged on `date`. A day without logs is empty.
pub(super) fn read_day(conversation: &Path, date: NaiveDate) -> Result<Vec<LogMessage>, BridgeError> {
    let path = day_file(conversation, date);
    let file = match fs::File::open(&path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut messages = Vec::new();
    for (number, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str(&line) {
            Ok(message) => messages.push(message),
            Err(e) => warn!(
                path = %path.display(),
                line = number + 1,
                error = %e,
                "skipping malformed log line"
            ),
        }
    }
    Ok(messages)
}

/// The newest `limit` messages, oldest first.
pub(super) fn backlog(conversation: &Path, limit: usize) -> Result<Vec<LogMessage>, BridgeError> {
    let mut chunks = Vec::new();
    let mut collected = 0;
    for date in dates(conversation)?.into_iter().rev() {
        if collected >= limit {
            break;
        }
        let day = read_day(conversation, date)?;
        collected += day.len();
        chunks.push(day);
    }

    let mut messages: Vec<LogMessage> = chunks.into_iter().rev().flatten().collect();
    if messages.len() > limit {
        messages.drain(..messages.len() - limit);
    }
    Ok(messages)
}

/// Append `message` to its day's file and record the display name.
pub(super) fn append(conversation: &Path, name: &str, message: &LogMessage) -> Result<(), BridgeError> {
    fs::create_dir_all(conversation)?;

    let name_file = conversation.join(NAME_FILE);
    if fs::read_to_string(&name_file).ok().as_deref() != Some(name) {
        fs::write(&name_file, name)?;
    }

    let line = serde_json::to_string(message).map_err(|e| BridgeError::NativeCall {
        method: "logMessage",
        message: e.to_string(),
    })?;
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(day_file(conversation, message.time.date_naive()))?;
    writeln!(file, "{line}")?;
    Ok(())
}
