//! Cosmetic formatting of rendered HTML
//!
//! Children of block containers are indented two spaces per nesting level.
//! Only leading whitespace is added; content inside whitespace-sensitive
//! elements is copied verbatim.

use regex::Regex;

/// Elements whose children get one level of indentation.
const CONTAINER_TAGS: &[&str] = &[
    "ul",
    "ol",
    "li",
    "blockquote",
    "table",
    "thead",
    "tbody",
    "tr",
    "section",
];

/// Elements whose content must never be re-indented.
const VERBATIM_TAGS: &[&str] = &["pre", "textarea", "script", "style"];

const INDENT: &str = "  ";

/// Line-oriented HTML indenter.
#[derive(Debug, Clone)]
pub struct HtmlFormatter {
    container: Regex,
    verbatim_open: Regex,
    verbatim_close: Regex,
}

impl HtmlFormatter {
    /// Compile the tag patterns.
    pub fn new() -> Result<Self, regex::Error> {
        let container = Regex::new(&format!(
            r"<(/?)(?:{})(?:\s[^>]*)?>",
            CONTAINER_TAGS.join("|")
        ))?;
        let verbatim_open = Regex::new(&format!(r"<(?:{})[\s>]", VERBATIM_TAGS.join("|")))?;
        let verbatim_close = Regex::new(&format!(r"</(?:{})>", VERBATIM_TAGS.join("|")))?;

        Ok(Self {
            container,
            verbatim_open,
            verbatim_close,
        })
    }

    /// Indent `html` by container depth.
    pub fn format(&self, html: &str) -> String {
        let mut output = String::with_capacity(html.len() + html.len() / 4);
        let mut depth: usize = 0;
        let mut in_verbatim = false;

        for line in html.split_inclusive('\n') {
            if in_verbatim {
                output.push_str(line);
                if self.verbatim_close.is_match(line) {
                    in_verbatim = false;
                }
                continue;
            }

            let (opens, closes, leading_close) = self.count_containers(line);
            let line_depth = if leading_close {
                depth.saturating_sub(1)
            } else {
                depth
            };

            if !line.trim().is_empty() {
                for _ in 0..line_depth {
                    output.push_str(INDENT);
                }
            }
            output.push_str(line);

            depth = (depth + opens).saturating_sub(closes);

            if let Some(open) = self.verbatim_open.find(line) {
                let rest = &line[open.start()..];
                in_verbatim = !self.verbatim_close.is_match(rest);
            }
        }

        output
    }

    /// Count container opens and closes on a line and whether it starts
    /// with a closing container tag.
    fn count_containers(&self, line: &str) -> (usize, usize, bool) {
        let mut opens = 0;
        let mut closes = 0;
        for captures in self.container.captures_iter(line) {
            if captures.get(1).is_some_and(|slash| !slash.as_str().is_empty()) {
                closes += 1;
            } else {
                opens += 1;
            }
        }

        let leading_close = self
            .container
            .find(line.trim_start())
            .is_some_and(|m| m.start() == 0 && m.as_str().starts_with("</"));

        (opens, closes, leading_close)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn formatter() -> HtmlFormatter {
        HtmlFormatter::new().unwrap()
    }

    #[test]
    fn test_flat_blocks_unchanged() {
        let html = "<h1>Hello</h1>\n<p>World</p>\n";
        assert_eq!(formatter().format(html), html);
    }

    #[test]
    fn test_list_items_indented() {
        let html = "<ul>\n<li>a</li>\n<li>b</li>\n</ul>\n";
        assert_eq!(
            formatter().format(html),
            "<ul>\n  <li>a</li>\n  <li>b</li>\n</ul>\n"
        );
    }

    #[test]
    fn test_nested_list_indented() {
        let html = "<ul>\n<li>a\n<ul>\n<li>b</li>\n</ul>\n</li>\n</ul>\n";
        assert_eq!(
            formatter().format(html),
            "<ul>\n  <li>a\n    <ul>\n      <li>b</li>\n    </ul>\n  </li>\n</ul>\n"
        );
    }

    #[test]
    fn test_pre_content_verbatim() {
        let html = "<blockquote>\n<pre><code>x\n  y\n</code></pre>\n</blockquote>\n";
        assert_eq!(
            formatter().format(html),
            "<blockquote>\n  <pre><code>x\n  y\n</code></pre>\n</blockquote>\n"
        );
    }

    #[test]
    fn test_single_line_pre_does_not_stick() {
        let html = "<pre><code>one</code></pre>\n<ul>\n<li>a</li>\n</ul>\n";
        assert_eq!(
            formatter().format(html),
            "<pre><code>one</code></pre>\n<ul>\n  <li>a</li>\n</ul>\n"
        );
    }

    #[test]
    fn test_unbalanced_close_saturates() {
        let html = "</ul>\n<p>x</p>\n";
        assert_eq!(formatter().format(html), html);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(formatter().format(""), "");
    }
}
