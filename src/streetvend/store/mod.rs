//! # Storage Layer
//!
//! Every data file the vendor keeps is small, flat text. This module holds the
//! handful of file primitives the command modules share, so that each command
//! only deals with its own record format.
//!
//! ## Reading: absent vs. empty vs. present
//!
//! Reads go through [`read_state`], which returns a [`FileState`] instead of
//! surfacing a raw `io::ErrorKind::NotFound`. Callers pick their own policy:
//! the inventory reader turns `Absent` into [`VendorError::NotFound`], the
//! feedback search turns it into "no results", the report treats it as an empty
//! ledger.
//!
//! ## Writing
//!
//! - [`write_atomic`]: full rewrites (inventory, daily report). Content is built
//!   in memory, written to a hidden temp file next to the target and renamed
//!   over it, so a failed write never leaves a half-written file behind.
//! - [`append_record`]: append-only files (sales ledger, feedback). One call
//!   writes one complete, pre-encoded record.

use crate::error::{Result, VendorError};
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::Path;
use uuid::Uuid;

/// What was found at a data file path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileState {
    Absent,
    /// The file exists but holds nothing except whitespace.
    Empty,
    Present(String),
}

impl FileState {
    /// Contents, with `Absent` and `Empty` both mapped to `""`.
    pub fn contents(&self) -> &str {
        match self {
            FileState::Present(content) => content,
            FileState::Absent | FileState::Empty => "",
        }
    }

    /// Contents, or `NotFound` if the file does not exist.
    pub fn require(self, path: &Path) -> Result<String> {
        match self {
            FileState::Absent => Err(VendorError::NotFound(path.to_path_buf())),
            FileState::Empty => Ok(String::new()),
            FileState::Present(content) => Ok(content),
        }
    }
}

pub fn read_state(path: &Path) -> Result<FileState> {
    match fs::read_to_string(path) {
        Ok(content) if content.trim().is_empty() => {
            tracing::debug!(path = %path.display(), "file is empty");
            Ok(FileState::Empty)
        }
        Ok(content) => {
            tracing::debug!(path = %path.display(), bytes = content.len(), "read file");
            Ok(FileState::Present(content))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "file is absent");
            Ok(FileState::Absent)
        }
        Err(e) => Err(VendorError::Io(e)),
    }
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path).map_err(VendorError::Io)?;
    }
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir(parent),
        _ => Ok(()),
    }
}

/// Replaces `path` with `content` via a temp file in the same directory.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    ensure_parent(path)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::path::PathBuf::from("."),
    };
    let tmp_file = dir.join(format!(".streetvend-{}.tmp", Uuid::new_v4()));

    fs::write(&tmp_file, content).map_err(VendorError::Io)?;
    if let Err(e) = fs::rename(&tmp_file, path) {
        let _ = fs::remove_file(&tmp_file);
        return Err(VendorError::Io(e));
    }

    tracing::debug!(path = %path.display(), bytes = content.len(), "rewrote file");
    Ok(())
}

/// Appends one complete record, creating the file if needed.
///
/// `header` is written first when the file is new or has no content yet.
/// A file whose last line is unterminated gets a line break before the
/// record, so the previous record stays intact. Returns whether the header
/// was written.
pub fn append_record(path: &Path, header: Option<&str>, record: &str) -> Result<bool> {
    ensure_parent(path)?;

    let existing_len = match fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(e) if e.kind() == ErrorKind::NotFound => 0,
        Err(e) => return Err(VendorError::Io(e)),
    };
    let needs_header = existing_len == 0;

    let mut buf = String::with_capacity(record.len() + 64);
    if existing_len > 0 && !ends_with_newline(path)? {
        tracing::debug!(path = %path.display(), "terminating unfinished last line");
        buf.push('\n');
    }
    let wrote_header = match header {
        Some(header) if needs_header => {
            buf.push_str(header);
            true
        }
        _ => false,
    };
    buf.push_str(record);

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(VendorError::Io)?;
    file.write_all(buf.as_bytes()).map_err(VendorError::Io)?;
    file.flush().map_err(VendorError::Io)?;

    tracing::debug!(path = %path.display(), wrote_header, "appended record");
    Ok(wrote_header)
}

fn ends_with_newline(path: &Path) -> Result<bool> {
    let mut file = File::open(path)?;
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}
