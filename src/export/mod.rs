//! Document Export Module for PrevueMD
//!
//! This module moves the document out of the editor: copying the markdown to
//! the clipboard, saving it to a file, and wrapping the rendered preview in a
//! standalone themed HTML page.
//!
//! # Architecture
//!
//! - `clipboard.rs` - Platform clipboard operations
//! - `download.rs` - Saving the markdown source to disk
//! - `html.rs` - HTML document generation with theme styling

pub mod clipboard;
pub mod download;
pub mod html;

pub use clipboard::{ClipboardError, ClipboardWriter, SystemClipboard};
pub use download::{DialogFileSaver, FileSaver, SaveOutcome, DEFAULT_FILE_NAME};
pub use html::{generate_html_document, write_preview_file};
