// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Incremental reading of a growing job event log.

use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::{parse_banner, JobEvent};

/// Terminator line between events.
const TERMINATOR: &str = "...";

#[derive(Debug, Error)]
pub enum JelReadError {
    #[error("job event log deleted: {0}")]
    Deleted(PathBuf),
    #[error("i/o error reading job event log: {0}")]
    Io(#[from] std::io::Error),
}

/// Reads complete events appended since the last drain.
///
/// Only fully written events are consumed: the byte offset advances at
/// event terminators (and past junk lines), never into a partial tail, so
/// an event the scheduler is mid-write simply shows up on the next drain.
/// A shrunken file means truncation; the reader starts over from the top
/// (replaying a JEL from an empty state reproduces the same final state).
#[derive(Debug)]
pub struct JelReader {
    path: PathBuf,
    offset: u64,
}

impl JelReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            offset: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the log still exists on disk.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read all complete events appended since the last call.
    pub fn drain(&mut self) -> Result<Vec<JobEvent>, JelReadError> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(JelReadError::Deleted(self.path.clone()));
            }
            Err(e) => return Err(e.into()),
        };

        let file_len = file.metadata()?.len();
        if file_len < self.offset {
            tracing::warn!(path = %self.path.display(), "job event log shrank, re-reading from the top");
            self.offset = 0;
        }
        if file_len == self.offset {
            return Ok(Vec::new());
        }

        let mut reader = BufReader::new(file);
        reader.seek(SeekFrom::Start(self.offset))?;

        let mut events = Vec::new();
        let mut consumed = self.offset;
        let mut line_end = self.offset;
        let mut open_event: Option<JobEvent> = None;
        let mut line = String::new();

        loop {
            line.clear();
            let n = reader.read_line(&mut line)?;
            if n == 0 {
                break;
            }
            if !line.ends_with('\n') {
                // partial tail; picked up next drain
                break;
            }
            line_end += n as u64;
            let trimmed = line.trim_end_matches(['\n', '\r']);

            if open_event.is_none() {
                if let Some(event) = parse_banner(trimmed) {
                    open_event = Some(event);
                } else {
                    // junk outside an event will never parse; skip it
                    if !trimmed.is_empty() {
                        tracing::debug!(path = %self.path.display(), line = %trimmed, "skipping unparsable line");
                    }
                    consumed = line_end;
                }
            } else if trimmed == TERMINATOR {
                if let Some(finished) = open_event.take() {
                    events.push(finished);
                }
                consumed = line_end;
            } else if let Some(next_event) = parse_banner(trimmed) {
                // unterminated previous event; drop it and move on
                if let Some(dropped) = open_event.replace(next_event) {
                    tracing::debug!(
                        path = %self.path.display(),
                        cluster_id = %dropped.cluster_id,
                        "dropping unterminated event"
                    );
                }
            } else if let Some(event) = open_event.as_mut() {
                event.body.push(trimmed.trim_start().to_string());
            }
        }

        self.offset = consumed;
        Ok(events)
    }
}

#[cfg(test)]
#[path = "reader_tests.rs"]
mod tests;
