//! Saving the document to disk
//!
//! The download action hands the markdown source to a [`FileSaver`]. Empty
//! documents are never written; the saver reports [`SaveOutcome::Empty`]
//! instead so the caller can tell the user.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::error::{Error, Result};
use crate::files::dialogs::save_markdown_dialog;

/// File name suggested for downloads.
pub const DEFAULT_FILE_NAME: &str = "prevued.md";

/// Result of a save request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The content was written to this path
    Saved(PathBuf),
    /// Nothing to save, the content was empty or whitespace
    Empty,
    /// The user dismissed the save dialog
    Cancelled,
}

/// Something that can persist the document.
pub trait FileSaver {
    /// Save `content`, suggesting `filename` as the target name.
    fn save(&mut self, content: &str, filename: &str) -> Result<SaveOutcome>;
}

/// Write `content` to `path`.
fn write_file(path: &Path, content: &str) -> Result<SaveOutcome> {
    fs::write(path, content).map_err(|source| Error::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Saved document to {}", path.display());
    Ok(SaveOutcome::Saved(path.to_path_buf()))
}

// ─────────────────────────────────────────────────────────────────────────────
// Savers
// ─────────────────────────────────────────────────────────────────────────────

/// Asks for a target with the native save dialog.
#[derive(Debug, Default)]
pub struct DialogFileSaver {
    /// Directory of the last successful save, used as the dialog start
    last_dir: Option<PathBuf>,
}

impl DialogFileSaver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FileSaver for DialogFileSaver {
    fn save(&mut self, content: &str, filename: &str) -> Result<SaveOutcome> {
        if content.trim().is_empty() {
            return Ok(SaveOutcome::Empty);
        }

        let Some(path) = save_markdown_dialog(self.last_dir.as_ref(), filename) else {
            return Ok(SaveOutcome::Cancelled);
        };

        let outcome = write_file(&path, content)?;
        self.last_dir = path.parent().map(Path::to_path_buf);
        Ok(outcome)
    }
}

/// Writes straight into a fixed directory.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct DirectoryFileSaver {
    dir: PathBuf,
}

impl DirectoryFileSaver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl FileSaver for DirectoryFileSaver {
    fn save(&mut self, content: &str, filename: &str) -> Result<SaveOutcome> {
        if content.trim().is_empty() {
            return Ok(SaveOutcome::Empty);
        }
        write_file(&self.dir.join(filename), content)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
