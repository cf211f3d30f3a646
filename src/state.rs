//! Application state for PrevueMD
//!
//! This module holds the document being edited (`DocumentStore`), which panes
//! are visible (`PaneLayout`), and the confirmation state that guards closing
//! the window while the document has unsaved changes (`ExitGuard`).

use log::{debug, info};

use crate::error::Result;
use crate::export::{ClipboardWriter, FileSaver, SaveOutcome, DEFAULT_FILE_NAME};

// ─────────────────────────────────────────────────────────────────────────────
// Document Store
// ─────────────────────────────────────────────────────────────────────────────

/// The markdown source and its most recent rendering.
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    /// Raw markdown typed by the user
    markdown: String,
    /// Last rendered markup, `None` until a render completes
    markup: Option<String>,
    /// Whether the markdown changed since the last save or reset
    unsaved: bool,
}

impl DocumentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current markdown source.
    pub fn markdown(&self) -> &str {
        &self.markdown
    }

    /// Mutable access for text widgets that edit in place.
    ///
    /// Callers must follow up with [`DocumentStore::touch`] when the widget
    /// reports a change.
    pub fn markdown_mut(&mut self) -> &mut String {
        &mut self.markdown
    }

    /// Last rendered markup, or an empty string before the first render.
    pub fn markup(&self) -> &str {
        self.markup.as_deref().unwrap_or_default()
    }

    /// Whether any render has completed since creation or the last reset.
    pub fn has_markup(&self) -> bool {
        self.markup.is_some()
    }

    /// Replace the markdown source.
    #[allow(dead_code)]
    pub fn set_markdown(&mut self, markdown: impl Into<String>) {
        self.markdown = markdown.into();
        self.touch();
    }

    /// Record that the markdown was edited in place.
    pub fn touch(&mut self) {
        self.unsaved = !self.markdown.is_empty();
    }

    /// Store a rendered result.
    pub fn set_markup(&mut self, markup: impl Into<String>) {
        self.markup = Some(markup.into());
    }

    /// Reset to an empty document with no markup.
    pub fn clear(&mut self) {
        self.markdown.clear();
        self.markup = None;
        self.unsaved = false;
        debug!("Document cleared");
    }

    /// Whether closing now would lose typed text.
    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    /// Mark the current markdown as saved.
    pub fn mark_saved(&mut self) {
        self.unsaved = false;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Actions
    // ─────────────────────────────────────────────────────────────────────────

    /// Copy the markdown source to the clipboard.
    pub fn copy_to_clipboard(&self, clipboard: &mut dyn ClipboardWriter) -> Result<()> {
        clipboard.write(&self.markdown)?;
        debug!("Copied {} bytes of markdown", self.markdown.len());
        Ok(())
    }

    /// Save the markdown source, suggesting [`DEFAULT_FILE_NAME`].
    ///
    /// A successful save clears the unsaved flag.
    pub fn download(&mut self, saver: &mut dyn FileSaver) -> Result<SaveOutcome> {
        let outcome = saver.save(&self.markdown, DEFAULT_FILE_NAME)?;
        if let SaveOutcome::Saved(path) = &outcome {
            info!("Document downloaded to {}", path.display());
            self.mark_saved();
        }
        Ok(outcome)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Pane Layout
// ─────────────────────────────────────────────────────────────────────────────

/// Which panes are on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaneLayout {
    /// Editor on the left, preview on the right
    #[default]
    Split,
    /// Preview maximized over the full window width
    PreviewMaximized,
}

impl PaneLayout {
    /// Switch between the split view and the maximized preview.
    pub fn toggled(&self) -> Self {
        match self {
            PaneLayout::Split => PaneLayout::PreviewMaximized,
            PaneLayout::PreviewMaximized => PaneLayout::Split,
        }
    }

    /// Whether the editor pane is drawn.
    pub fn shows_editor(&self) -> bool {
        *self == PaneLayout::Split
    }

    /// Whether the preview takes the whole window.
    pub fn is_preview_maximized(&self) -> bool {
        *self == PaneLayout::PreviewMaximized
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Exit Guard
// ─────────────────────────────────────────────────────────────────────────────

/// Tracks the "discard unsaved changes?" confirmation on window close.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExitGuard {
    /// Confirmation dialog is showing
    confirming: bool,
    /// User chose to discard; the next close request goes through
    confirmed: bool,
}

impl ExitGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request application exit.
    ///
    /// Returns `true` if exit can proceed immediately, `false` if confirmation is needed.
    pub fn request_exit(&mut self, document: &DocumentStore) -> bool {
        if self.confirmed || !document.has_unsaved_changes() {
            return true;
        }
        self.confirming = true;
        false
    }

    /// Whether the confirmation dialog should be shown.
    pub fn is_confirming(&self) -> bool {
        self.confirming
    }

    /// The user chose to discard their changes.
    pub fn confirm(&mut self) {
        debug!("Exit confirmed");
        self.confirming = false;
        self.confirmed = true;
    }

    /// The user chose to keep editing.
    pub fn cancel(&mut self) {
        self.confirming = false;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::export::ClipboardError;
    use std::path::PathBuf;

    #[derive(Default)]
    struct FakeClipboard {
        contents: Option<String>,
        fail: bool,
    }

    impl ClipboardWriter for FakeClipboard {
        fn write(&mut self, text: &str) -> std::result::Result<(), ClipboardError> {
            if self.fail {
                return Err(ClipboardError::AccessError("no display".to_string()));
            }
            self.contents = Some(text.to_string());
            Ok(())
        }
    }

    /// Records requests and applies the same empty-content rule as real savers.
    #[derive(Default)]
    struct FakeSaver {
        requests: Vec<(String, String)>,
        cancel: bool,
    }

    impl FileSaver for FakeSaver {
        fn save(&mut self, content: &str, filename: &str) -> Result<SaveOutcome> {
            self.requests.push((content.to_string(), filename.to_string()));
            if content.trim().is_empty() {
                Ok(SaveOutcome::Empty)
            } else if self.cancel {
                Ok(SaveOutcome::Cancelled)
            } else {
                Ok(SaveOutcome::Saved(PathBuf::from("/tmp").join(filename)))
            }
        }
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = DocumentStore::new();
        assert_eq!(store.markdown(), "");
        assert_eq!(store.markup(), "");
        assert!(!store.has_markup());
        assert!(!store.has_unsaved_changes());
    }

    #[test]
    fn test_set_markdown_marks_unsaved() {
        let mut store = DocumentStore::new();
        store.set_markdown("# Title");
        assert_eq!(store.markdown(), "# Title");
        assert!(store.has_unsaved_changes());

        store.set_markdown("");
        assert!(!store.has_unsaved_changes());
    }

    #[test]
    fn test_in_place_edit_then_touch() {
        let mut store = DocumentStore::new();
        store.markdown_mut().push_str("typed");
        store.touch();
        assert!(store.has_unsaved_changes());
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut store = DocumentStore::new();
        store.set_markdown("# Title");
        store.set_markup("<h1>Title</h1>");
        assert_eq!(store.markup(), "<h1>Title</h1>");

        store.clear();
        assert_eq!(store.markdown(), "");
        assert_eq!(store.markup(), "");
        assert!(!store.has_markup());
        assert!(!store.has_unsaved_changes());
    }

    #[test]
    fn test_copy_writes_markdown() {
        let mut store = DocumentStore::new();
        store.set_markdown("**bold**");
        let mut clipboard = FakeClipboard::default();

        store.copy_to_clipboard(&mut clipboard).unwrap();
        assert_eq!(clipboard.contents.as_deref(), Some("**bold**"));
    }

    #[test]
    fn test_copy_of_empty_document_writes_empty_string() {
        let store = DocumentStore::new();
        let mut clipboard = FakeClipboard::default();
        store.copy_to_clipboard(&mut clipboard).unwrap();
        assert_eq!(clipboard.contents.as_deref(), Some(""));
    }

    #[test]
    fn test_copy_failure_is_reported() {
        let store = DocumentStore::new();
        let mut clipboard = FakeClipboard {
            fail: true,
            ..Default::default()
        };
        let err = store.copy_to_clipboard(&mut clipboard).unwrap_err();
        assert!(matches!(err, Error::Clipboard(_)));
    }

    #[test]
    fn test_download_uses_default_name_and_marks_saved() {
        let mut store = DocumentStore::new();
        store.set_markdown("# Notes");
        let mut saver = FakeSaver::default();

        let outcome = store.download(&mut saver).unwrap();
        assert_eq!(outcome, SaveOutcome::Saved(PathBuf::from("/tmp/prevued.md")));
        assert_eq!(
            saver.requests,
            vec![("# Notes".to_string(), DEFAULT_FILE_NAME.to_string())]
        );
        assert!(!store.has_unsaved_changes());
    }

    #[test]
    fn test_download_whitespace_is_empty() {
        let mut store = DocumentStore::new();
        store.set_markdown("  \n\t");
        let mut saver = FakeSaver::default();

        assert_eq!(store.download(&mut saver).unwrap(), SaveOutcome::Empty);
        assert!(store.has_unsaved_changes());
    }

    #[test]
    fn test_cancelled_download_keeps_unsaved() {
        let mut store = DocumentStore::new();
        store.set_markdown("text");
        let mut saver = FakeSaver {
            cancel: true,
            ..Default::default()
        };
        assert_eq!(store.download(&mut saver).unwrap(), SaveOutcome::Cancelled);
        assert!(store.has_unsaved_changes());
    }

    #[test]
    fn test_layout_starts_split() {
        let layout = PaneLayout::default();
        assert!(layout.shows_editor());
        assert!(!layout.is_preview_maximized());
    }

    #[test]
    fn test_maximized_preview_hides_editor() {
        let layout = PaneLayout::Split.toggled();
        assert_eq!(layout, PaneLayout::PreviewMaximized);
        assert!(!layout.shows_editor());
        assert!(layout.is_preview_maximized());

        assert_eq!(layout.toggled(), PaneLayout::Split);
    }

    #[test]
    fn test_exit_without_changes_proceeds() {
        let mut guard = ExitGuard::new();
        assert!(guard.request_exit(&DocumentStore::new()));
        assert!(!guard.is_confirming());
    }

    #[test]
    fn test_exit_with_changes_needs_confirmation() {
        let mut store = DocumentStore::new();
        store.set_markdown("draft");
        let mut guard = ExitGuard::new();

        assert!(!guard.request_exit(&store));
        assert!(guard.is_confirming());

        guard.cancel();
        assert!(!guard.is_confirming());
        assert!(!guard.request_exit(&store));

        guard.confirm();
        assert!(!guard.is_confirming());
        assert!(guard.request_exit(&store));
    }
}
