//! Standalone HTML Documents
//!
//! This module wraps rendered markup in a complete HTML document with inlined
//! theme CSS, so the preview can be opened in the system browser.

use std::fs;
use std::path::{Path, PathBuf};

use eframe::egui::Color32;
use log::info;

use crate::config::PreviewFont;
use crate::error::{Error, Result};
use crate::theme::ThemeColors;

/// File name of the browser preview in the temp directory.
const PREVIEW_FILE_NAME: &str = "prevuemd-preview.html";

// ─────────────────────────────────────────────────────────────────────────────
// HTML Generation
// ─────────────────────────────────────────────────────────────────────────────

/// Generate a complete HTML document around rendered markup.
///
/// # Arguments
///
/// * `body_html` - Rendered markdown, inserted verbatim
/// * `title` - Document title, escaped
/// * `colors` - Theme colors for styling
/// * `font` - Body typeface
pub fn generate_html_document(
    body_html: &str,
    title: &str,
    colors: &ThemeColors,
    font: PreviewFont,
) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta name="generator" content="PrevueMD">
    <title>{title}</title>
    <style>
{base_css}
{font_css}
{theme_css}
    </style>
</head>
<body>
    <article class="markdown-body">
{body}
    </article>
</body>
</html>
"#,
        title = html_escape(title),
        base_css = BASE_CSS,
        font_css = generate_font_css(font),
        theme_css = generate_theme_css(colors),
        body = body_html,
    )
}

/// Write a preview document into `dir`, returning its path.
pub fn write_preview_file(dir: &Path, document: &str) -> Result<PathBuf> {
    let path = dir.join(PREVIEW_FILE_NAME);
    fs::write(&path, document).map_err(|source| Error::FileWrite {
        path: path.clone(),
        source,
    })?;
    info!("Wrote browser preview to {}", path.display());
    Ok(path)
}

// ─────────────────────────────────────────────────────────────────────────────
// CSS Generation
// ─────────────────────────────────────────────────────────────────────────────

/// Base CSS for markdown rendering (layout, typography).
const BASE_CSS: &str = r#"
*, *::before, *::after {
    box-sizing: border-box;
}

body {
    margin: 0;
    font-size: 16px;
    line-height: 1.6;
}

.markdown-body {
    max-width: 860px;
    margin: 0 auto;
    padding: 32px 24px;
}

.markdown-body h1, .markdown-body h2 {
    border-bottom: 1px solid;
    padding-bottom: 0.3em;
}

.markdown-body pre {
    padding: 16px;
    overflow: auto;
    border-radius: 6px;
}

.markdown-body code {
    font-family: ui-monospace, SFMono-Regular, Menlo, Consolas, monospace;
    font-size: 0.9em;
    padding: 0.2em 0.4em;
    border-radius: 4px;
}

.markdown-body pre code {
    padding: 0;
}

.markdown-body blockquote {
    margin: 0 0 16px;
    padding: 0 1em;
    border-left: 4px solid;
}

.markdown-body table {
    border-collapse: collapse;
}

.markdown-body th, .markdown-body td {
    padding: 6px 13px;
    border: 1px solid;
}

.markdown-body li:has(> input[type="checkbox"]) {
    list-style-type: none;
}

.markdown-body img {
    max-width: 100%;
}
"#;

/// Font stack for the document body.
fn generate_font_css(font: PreviewFont) -> String {
    let stack = match font {
        PreviewFont::Sans => {
            "-apple-system, BlinkMacSystemFont, 'Segoe UI', 'Noto Sans', Helvetica, Arial, sans-serif"
        }
        PreviewFont::Serif => "Georgia, Cambria, 'Times New Roman', Times, serif",
    };
    format!("\nbody {{\n    font-family: {};\n}}\n", stack)
}

/// Generate theme-specific CSS from ThemeColors.
fn generate_theme_css(colors: &ThemeColors) -> String {
    format!(
        r#"
:root {{
    color-scheme: {color_scheme};
}}

body {{
    background-color: {bg};
    color: {text};
}}

.markdown-body h1, .markdown-body h2, .markdown-body h3,
.markdown-body h4, .markdown-body h5, .markdown-body h6 {{
    color: {heading};
}}

.markdown-body h1, .markdown-body h2, .markdown-body th, .markdown-body td {{
    border-color: {border};
}}

.markdown-body a {{
    color: {link};
}}

.markdown-body blockquote {{
    color: {muted};
    border-left-color: {border};
}}

.markdown-body code, .markdown-body pre {{
    background-color: {code_bg};
}}
"#,
        color_scheme = if colors.dark { "dark" } else { "light" },
        bg = color32_to_css(colors.background),
        text = color32_to_css(colors.text),
        heading = color32_to_css(colors.heading),
        border = color32_to_css(colors.border),
        link = color32_to_css(colors.link),
        muted = color32_to_css(colors.muted),
        code_bg = color32_to_css(colors.code_background),
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Utility Functions
// ─────────────────────────────────────────────────────────────────────────────

/// Convert Color32 to CSS color string.
fn color32_to_css(color: Color32) -> String {
    format!("rgb({}, {}, {})", color.r(), color.g(), color.b())
}

/// HTML-escape a string.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_generate_html_document() {
        let html = generate_html_document(
            "<h1>Test</h1>",
            "Test Doc",
            &ThemeColors::light(),
            PreviewFont::Sans,
        );

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Test Doc</title>"));
        assert!(html.contains("<article class=\"markdown-body\">\n<h1>Test</h1>\n    </article>"));
    }

    #[test]
    fn test_title_is_escaped_body_is_not() {
        let html =
            generate_html_document("<div>x</div>", "<b>", &ThemeColors::light(), PreviewFont::Sans);
        assert!(html.contains("<title>&lt;b&gt;</title>"));
        assert!(html.contains("<div>x</div>"));
    }

    #[test]
    fn test_document_uses_preview_font() {
        let sans =
            generate_html_document("<p>x</p>", "Doc", &ThemeColors::dark(), PreviewFont::Sans);
        assert!(sans.contains("sans-serif;"));
        assert!(!sans.contains("Georgia"));

        let serif =
            generate_html_document("<p>x</p>", "Doc", &ThemeColors::dark(), PreviewFont::Serif);
        assert!(serif.contains("font-family: Georgia, Cambria, 'Times New Roman', Times, serif;"));
        assert!(!serif.contains("sans-serif"));
    }

    #[test]
    fn test_theme_css_follows_palette() {
        assert!(generate_theme_css(&ThemeColors::light()).contains("color-scheme: light"));
        assert!(generate_theme_css(&ThemeColors::dark()).contains("color-scheme: dark"));
    }

    #[test]
    fn test_color32_to_css() {
        assert_eq!(color32_to_css(Color32::from_rgb(255, 128, 64)), "rgb(255, 128, 64)");
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("a & b"), "a &amp; b");
        assert_eq!(html_escape("\"quoted\""), "&quot;quoted&quot;");
    }

    #[test]
    fn test_write_preview_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = write_preview_file(temp_dir.path(), "<html></html>").unwrap();
        assert!(path.ends_with(PREVIEW_FILE_NAME));
        assert_eq!(fs::read_to_string(path).unwrap(), "<html></html>");
    }
}
