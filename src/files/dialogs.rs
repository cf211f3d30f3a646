//! Native file dialog integration using the rfd crate
//!
//! This module provides the native save dialog used by the download action.

use rfd::FileDialog;
use std::path::PathBuf;

/// File extension filters for markdown documents.
const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown", "mdown", "mkd", "mkdn"];

/// Opens a native save dialog for a markdown document.
///
/// Returns `Some(PathBuf)` if a location was selected, `None` if cancelled.
pub fn save_markdown_dialog(initial_dir: Option<&PathBuf>, default_name: &str) -> Option<PathBuf> {
    let mut dialog = FileDialog::new()
        .set_title("Download Markdown")
        .add_filter("Markdown Files", MARKDOWN_EXTENSIONS)
        .add_filter("All Files", &["*"])
        .set_file_name(default_name);

    if let Some(dir) = initial_dir {
        dialog = dialog.set_directory(dir);
    }

    dialog.save_file()
}
