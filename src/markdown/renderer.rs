//! Markdown to HTML rendering with a cached pipeline
//!
//! The renderer owns a lazily constructed [`Pipeline`]. The pipeline is built
//! by a [`PipelineFactory`] on the first call to [`MarkdownRenderer::render`]
//! and reused for every call after that. A failed build leaves the cache
//! empty, so the next render retries construction.
//!
//! # Example
//!
//! ```ignore
//! let renderer = MarkdownRenderer::new();
//! let html = renderer.render("# Hello")?;
//! assert!(html.contains("<h1>Hello</h1>"));
//! ```

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use comrak::{format_html, parse_document, Arena, Options};
use log::{debug, info, warn};
use once_cell::sync::OnceCell;

use super::format::HtmlFormatter;

/// Boxed error produced by a pipeline stage.
pub type StageError = Box<dyn std::error::Error + Send + Sync>;

// ─────────────────────────────────────────────────────────────────────────────
// Render Error
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur while rendering markdown.
///
/// Both variants carry the description of the underlying failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The pipeline could not be constructed
    Build(String),
    /// The pipeline failed while transforming the input
    Transform(String),
}

impl RenderError {
    /// Description of the original failure.
    pub fn cause(&self) -> &str {
        match self {
            RenderError::Build(cause) | RenderError::Transform(cause) => cause,
        }
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failed to parse markdown: {}", self.cause())
    }
}

impl std::error::Error for RenderError {}

// ─────────────────────────────────────────────────────────────────────────────
// Pipeline Seams
// ─────────────────────────────────────────────────────────────────────────────

/// A constructed markdown-to-HTML transformation chain.
pub trait Pipeline: Send + Sync {
    /// Transform markdown source into an HTML string.
    fn process(&self, markdown: &str) -> Result<String, StageError>;
}

/// Builds pipelines for a [`MarkdownRenderer`].
pub trait PipelineFactory: Send + Sync {
    /// Construct a new pipeline instance.
    fn build(&self) -> Result<Box<dyn Pipeline>, StageError>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Comrak Pipeline
// ─────────────────────────────────────────────────────────────────────────────

/// The fixed comrak-based chain: parse, GFM extensions, HTML conversion with
/// raw HTML passthrough, pretty-format, serialize.
pub struct ComrakPipeline {
    options: Options<'static>,
    formatter: HtmlFormatter,
}

impl ComrakPipeline {
    /// Compile the formatter and fix the comrak options for the pipeline's
    /// lifetime.
    pub fn new() -> Result<Self, StageError> {
        Ok(Self {
            options: Self::comrak_options(),
            formatter: HtmlFormatter::new()?,
        })
    }

    /// Comrak options for parsing and HTML generation.
    fn comrak_options() -> Options<'static> {
        let mut options = Options::default();

        // GitHub Flavored Markdown extensions
        options.extension.strikethrough = true;
        options.extension.table = true;
        options.extension.autolink = true;
        options.extension.tasklist = true;
        options.extension.footnotes = true;

        // Raw HTML survives conversion unescaped
        options.render.unsafe_ = true;

        options
    }
}

impl Pipeline for ComrakPipeline {
    fn process(&self, markdown: &str) -> Result<String, StageError> {
        let arena = Arena::new();
        let root = parse_document(&arena, markdown, &self.options);

        let mut buffer = Vec::with_capacity(markdown.len() * 2);
        format_html(root, &self.options, &mut buffer)?;
        let html = String::from_utf8(buffer)?;

        Ok(self.formatter.format(&html))
    }
}

/// Factory for the default [`ComrakPipeline`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ComrakPipelineFactory;

impl PipelineFactory for ComrakPipelineFactory {
    fn build(&self) -> Result<Box<dyn Pipeline>, StageError> {
        Ok(Box::new(ComrakPipeline::new()?))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Markdown Renderer
// ─────────────────────────────────────────────────────────────────────────────

/// Converts markdown to HTML, constructing its pipeline once.
///
/// Construction is single-flight: concurrent first calls from several
/// threads build the pipeline at most once.
pub struct MarkdownRenderer {
    factory: Box<dyn PipelineFactory>,
    pipeline: OnceCell<Box<dyn Pipeline>>,
    builds: AtomicUsize,
}

impl MarkdownRenderer {
    /// Create a renderer using the default comrak pipeline.
    pub fn new() -> Self {
        Self::with_factory(ComrakPipelineFactory)
    }

    /// Create a renderer that builds its pipeline with `factory`.
    pub fn with_factory(factory: impl PipelineFactory + 'static) -> Self {
        Self {
            factory: Box::new(factory),
            pipeline: OnceCell::new(),
            builds: AtomicUsize::new(0),
        }
    }

    /// Render markdown to HTML.
    ///
    /// The first call constructs the pipeline. Failures are wrapped in
    /// [`RenderError`] and never poison the cache.
    pub fn render(&self, markdown: &str) -> Result<String, RenderError> {
        let pipeline = self.pipeline.get_or_try_init(|| {
            let attempt = self.builds.fetch_add(1, Ordering::SeqCst) + 1;
            debug!("Constructing markdown pipeline (attempt {})", attempt);
            match self.factory.build() {
                Ok(pipeline) => {
                    info!("Markdown pipeline constructed");
                    Ok(pipeline)
                }
                Err(e) => {
                    warn!("Markdown pipeline construction failed: {}", e);
                    Err(RenderError::Build(e.to_string()))
                }
            }
        })?;

        pipeline
            .process(markdown)
            .map_err(|e| RenderError::Transform(e.to_string()))
    }

    /// Whether the pipeline has been constructed.
    pub fn is_ready(&self) -> bool {
        self.pipeline.get().is_some()
    }

    /// Number of pipeline construction attempts made so far.
    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MarkdownRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkdownRenderer")
            .field("ready", &self.is_ready())
            .field("builds", &self.builds())
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;

    /// Pipeline that returns a fixed string or fails on demand.
    struct ScriptedPipeline {
        fail: Arc<AtomicBool>,
    }

    impl Pipeline for ScriptedPipeline {
        fn process(&self, _markdown: &str) -> Result<String, StageError> {
            if self.fail.swap(false, Ordering::SeqCst) {
                return Err("Test error".into());
            }
            Ok("<h1>Test</h1>".to_string())
        }
    }

    /// Factory whose builds fail while `fail_builds` is positive.
    struct ScriptedFactory {
        fail_builds: Arc<AtomicUsize>,
        fail_process: Arc<AtomicBool>,
    }

    impl PipelineFactory for ScriptedFactory {
        fn build(&self) -> Result<Box<dyn Pipeline>, StageError> {
            let remaining = self.fail_builds.load(Ordering::SeqCst);
            if remaining > 0 {
                self.fail_builds.store(remaining - 1, Ordering::SeqCst);
                return Err("stage module unavailable".into());
            }
            Ok(Box::new(ScriptedPipeline {
                fail: Arc::clone(&self.fail_process),
            }))
        }
    }

    fn scripted(fail_builds: usize) -> (MarkdownRenderer, Arc<AtomicBool>) {
        let fail_process = Arc::new(AtomicBool::new(false));
        let renderer = MarkdownRenderer::with_factory(ScriptedFactory {
            fail_builds: Arc::new(AtomicUsize::new(fail_builds)),
            fail_process: Arc::clone(&fail_process),
        });
        (renderer, fail_process)
    }

    #[test]
    fn test_pipeline_is_cached() {
        let (renderer, _) = scripted(0);
        assert!(!renderer.is_ready());

        assert_eq!(renderer.render("# Test").unwrap(), "<h1>Test</h1>");
        assert_eq!(renderer.render("# Test").unwrap(), "<h1>Test</h1>");

        assert!(renderer.is_ready());
        assert_eq!(renderer.builds(), 1);
    }

    #[test]
    fn test_transform_failure_wraps_cause() {
        let (renderer, fail_process) = scripted(0);
        fail_process.store(true, Ordering::SeqCst);

        let err = renderer.render("# Test").unwrap_err();
        assert_eq!(err, RenderError::Transform("Test error".to_string()));
        assert_eq!(err.to_string(), "Failed to parse markdown: Test error");
    }

    #[test]
    fn test_transform_failure_keeps_pipeline() {
        let (renderer, fail_process) = scripted(0);
        fail_process.store(true, Ordering::SeqCst);

        assert!(renderer.render("# Test").is_err());
        assert!(renderer.render("# Test").is_ok());
        assert_eq!(renderer.builds(), 1);
    }

    #[test]
    fn test_build_failure_is_retried() {
        let (renderer, _) = scripted(1);

        let err = renderer.render("# Test").unwrap_err();
        assert!(matches!(err, RenderError::Build(_)));
        assert!(err.to_string().contains("stage module unavailable"));
        assert!(!renderer.is_ready());

        assert_eq!(renderer.render("# Test").unwrap(), "<h1>Test</h1>");
        assert_eq!(renderer.builds(), 2);
    }

    #[test]
    fn test_independent_renderers_do_not_share_cache() {
        let (first, _) = scripted(0);
        let (second, _) = scripted(0);

        first.render("a").unwrap();
        assert!(first.is_ready());
        assert!(!second.is_ready());
        assert_eq!(second.builds(), 0);
    }

    #[test]
    fn test_concurrent_first_calls_build_once() {
        let (renderer, _) = scripted(0);
        let renderer = Arc::new(renderer);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let renderer = Arc::clone(&renderer);
                std::thread::spawn(move || renderer.render("# Test").unwrap())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), "<h1>Test</h1>");
        }

        assert_eq!(renderer.builds(), 1);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Comrak pipeline
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_render_empty_input() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("").unwrap();
        assert!(html.trim().is_empty());
    }

    #[test]
    fn test_render_heading() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("# Hello").unwrap();
        assert!(html.contains("<h1>Hello</h1>"));
    }

    #[test]
    fn test_render_bold() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("# Hello\n\nThis is **bold**").unwrap();
        assert!(html.contains("<h1>Hello</h1>"));
        assert!(html.contains("<strong>bold</strong>"));
    }

    #[test]
    fn test_render_raw_html_passthrough() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("<div>x</div>").unwrap();
        assert!(html.contains("<div>x</div>"));
        assert!(!html.contains("&lt;div&gt;"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let renderer = MarkdownRenderer::new();
        let source = "# Title\n\n- one\n- two\n\n| a | b |\n|---|---|\n| 1 | 2 |\n";
        let first = renderer.render(source).unwrap();
        let second = renderer.render(source).unwrap();
        assert_eq!(first, second);
        assert_eq!(renderer.builds(), 1);
    }

    #[test]
    fn test_pipeline_holds_configured_options() {
        let pipeline = ComrakPipeline::new().unwrap();
        assert!(pipeline.options.extension.table);
        assert!(pipeline.options.extension.footnotes);
        assert!(pipeline.options.render.unsafe_);

        let first = pipeline.process("Text[^1]\n\n[^1]: Note").unwrap();
        let second = pipeline.process("Text[^1]\n\n[^1]: Note").unwrap();
        assert!(first.contains("footnote"));
        assert_eq!(first, second);
    }

    #[test]
    fn test_render_gfm_extensions() {
        let renderer = MarkdownRenderer::new();

        let html = renderer.render("~~gone~~").unwrap();
        assert!(html.contains("<del>gone</del>"));

        let html = renderer.render("| a | b |\n|---|---|\n| 1 | 2 |").unwrap();
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>1</td>"));

        let html = renderer.render("- [x] done\n- [ ] todo").unwrap();
        assert!(html.contains("type=\"checkbox\""));
        assert!(html.contains("checked"));

        let html = renderer.render("see https://example.com now").unwrap();
        assert!(html.contains("<a href=\"https://example.com\">"));
    }

    #[test]
    fn test_render_code_block_untouched() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("```\n- [ ] not a list\n  indented\n```").unwrap();
        assert!(html.contains("- [ ] not a list\n  indented\n</code></pre>"));
    }
}
