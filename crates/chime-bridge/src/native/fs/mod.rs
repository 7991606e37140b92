//! [`NativeHost`] backed by the local data directory.

mod files;
mod logs;

use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use chime_common::BridgeError;
use serde::Serialize;
use tracing::info;

use super::{NativeCall, NativeHost};

pub struct FsNativeHost {
    root: PathBuf,
    backlog_limit: usize,
    character: Mutex<Option<String>>,
    keep_alive: AtomicBool,
}

impl FsNativeHost {
    pub fn new(root: impl Into<PathBuf>, backlog_limit: usize) -> Self {
        Self {
            root: root.into(),
            backlog_limit,
            character: Mutex::new(None),
            keep_alive: AtomicBool::new(false),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether the page asked to keep the session alive while hidden.
    pub fn keep_alive(&self) -> bool {
        self.keep_alive.load(Ordering::Acquire)
    }

    fn character(&self, method: &'static str) -> Result<String, BridgeError> {
        self.character
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or_else(|| BridgeError::NativeCall {
                method,
                message: "logs not initialized".into(),
            })
    }

    fn logs_dir(&self, character: &str) -> PathBuf {
        self.root.join(character).join("logs")
    }

    fn dispatch(&self, call: &NativeCall) -> Result<String, BridgeError> {
        let method = call.method();
        match call {
            NativeCall::ListFiles { path } => encode(method, &files::list(&self.root, path, false)?),
            NativeCall::ListDirectories { path } => {
                encode(method, &files::list(&self.root, path, true)?)
            }
            NativeCall::Init { character } => {
                let character = segment(method, character)?;
                let index = logs::index(&self.logs_dir(character))?;
                *self.character.lock().unwrap_or_else(PoisonError::into_inner) =
                    Some(character.to_string());
                info!(character, conversations = index.len(), "logs opened");
                encode(method, &index)
            }
            NativeCall::GetBacklog { key } => {
                let dir = self.logs_dir(&self.character(method)?);
                let key = segment(method, key.as_str())?;
                encode(method, &logs::backlog(&dir.join(key), self.backlog_limit)?)
            }
            NativeCall::GetLogs { key, date } => {
                let dir = self.logs_dir(&self.character(method)?);
                let key = segment(method, key.as_str())?;
                encode(method, &logs::read_day(&dir.join(key), *date)?)
            }
            NativeCall::LogMessage { key, name, message } => {
                let dir = self.logs_dir(&self.character(method)?);
                let key = segment(method, key.as_str())?;
                logs::append(&dir.join(key), name, message)?;
                encode(method, &())
            }
            NativeCall::SetBackground { enabled } => {
                let was = self.keep_alive.swap(*enabled, Ordering::AcqRel);
                if was != *enabled {
                    info!(enabled, "background keep-alive changed");
                }
                encode(method, &())
            }
        }
    }
}

impl NativeHost for FsNativeHost {
    fn invoke(&self, call: &NativeCall) -> Result<String, BridgeError> {
        self.dispatch(call)
    }

    fn release(&self) {
        self.keep_alive.store(false, Ordering::Release);
        *self.character.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

fn encode<T: Serialize + ?Sized>(method: &'static str, value: &T) -> Result<String, BridgeError> {
    serde_json::to_string(value).map_err(|e| BridgeError::NativeCall {
        method,
        message: e.to_string(),
    })
}

/// Accept `name` only if it is a single plain path component.
fn segment<'a>(method: &'static str, name: &'a str) -> Result<&'a str, BridgeError> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !name.contains(['/', '\\']) => Ok(name),
        _ => Err(BridgeError::NativeCall {
            method,
            message: format!("invalid name: {name:?}"),
        }),
    }
}
