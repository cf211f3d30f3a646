//! Markdown rendering module for PrevueMD
//!
//! This module converts markdown source to HTML using the comrak library, a
//! CommonMark + GFM compatible parser.
//!
//! # Features
//! - GitHub Flavored Markdown (tables, strikethrough, autolinks, task lists)
//! - Raw HTML passthrough
//! - Indented, deterministic HTML output
//! - A cached pipeline, constructed once per renderer
//! - Debounced rendering on a background thread
//!
//! # Example
//! ```ignore
//! use crate::markdown::{MarkdownRenderer, RenderWorker};
//!
//! let renderer = Arc::new(MarkdownRenderer::new());
//! let html = renderer.render("# Hello\n\nThis is **bold** text.")?;
//!
//! let mut worker = RenderWorker::spawn(renderer, Duration::from_millis(250), || {})?;
//! worker.schedule("# Hello", Instant::now());
//! ```

mod format;
mod renderer;
mod worker;

pub use renderer::{MarkdownRenderer, RenderError};
pub use worker::RenderWorker;
