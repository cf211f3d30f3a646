//! User settings for PrevueMD
//!
//! This module defines the `Settings` struct that holds the user-configurable
//! behavior of the editor, with serde support for JSON persistence.

use serde::{Deserialize, Serialize};
use std::time::Duration;

// ─────────────────────────────────────────────────────────────────────────────
// Window Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Window dimensions and position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowSize {
    /// Window width in pixels
    pub width: f32,
    /// Window height in pixels
    pub height: f32,
    /// Window X position (optional, for restoring position)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    /// Window Y position (optional, for restoring position)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
    /// Whether the window was maximized
    #[serde(default)]
    pub maximized: bool,
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            x: None,
            y: None,
            maximized: false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Preview Font
// ─────────────────────────────────────────────────────────────────────────────

/// Typeface family for the preview pane and the browser preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PreviewFont {
    #[default]
    Sans,
    Serif,
}

impl PreviewFont {
    /// The other font.
    pub fn toggled(&self) -> Self {
        match self {
            PreviewFont::Sans => PreviewFont::Serif,
            PreviewFont::Serif => PreviewFont::Sans,
        }
    }

    /// Get the display name for the font.
    pub fn display_name(&self) -> &'static str {
        match self {
            PreviewFont::Sans => "Sans",
            PreviewFont::Serif => "Serif",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Settings
// ─────────────────────────────────────────────────────────────────────────────

/// Application settings persisted to `config.json`.
///
/// Missing fields take their default values, unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Quiet period after the last edit before the preview re-renders
    pub render_debounce_ms: u64,
    /// Whether scrolling one pane scrolls the other
    pub sync_scroll: bool,
    /// Smallest offset change, in pixels, treated as a user scroll
    pub min_scroll_delta: f32,
    /// Editor font size in points
    pub font_size: f32,
    /// Typeface of the rendered preview
    pub preview_font: PreviewFont,
    /// Fraction of the window width given to the editor pane
    pub split_ratio: f32,
    /// Last window geometry
    pub window_size: WindowSize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            render_debounce_ms: 250,
            sync_scroll: true,
            min_scroll_delta: 1.0,
            font_size: 14.0,
            preview_font: PreviewFont::default(),
            split_ratio: 0.5,
            window_size: WindowSize::default(),
        }
    }
}

impl Settings {
    /// Maximum render debounce.
    pub const MAX_RENDER_DEBOUNCE_MS: u64 = 2000;
    /// Maximum scroll delta threshold.
    pub const MAX_SCROLL_DELTA: f32 = 50.0;
    /// Minimum font size.
    pub const MIN_FONT_SIZE: f32 = 8.0;
    /// Maximum font size.
    pub const MAX_FONT_SIZE: f32 = 72.0;
    /// Minimum split ratio.
    pub const MIN_SPLIT_RATIO: f32 = 0.1;
    /// Maximum split ratio.
    pub const MAX_SPLIT_RATIO: f32 = 0.9;
    /// Minimum window dimension.
    pub const MIN_WINDOW_SIZE: f32 = 200.0;
    /// Maximum window dimension.
    pub const MAX_WINDOW_SIZE: f32 = 10000.0;

    /// Render debounce as a duration.
    pub fn render_debounce(&self) -> Duration {
        Duration::from_millis(self.render_debounce_ms)
    }

    /// Sanitize settings by clamping values to valid ranges.
    ///
    /// This is useful after loading settings from a file that might have
    /// been manually edited with invalid values.
    pub fn sanitize(&mut self) {
        self.render_debounce_ms = self.render_debounce_ms.min(Self::MAX_RENDER_DEBOUNCE_MS);

        // NaN fails every comparison, so reset it before clamping
        if !self.min_scroll_delta.is_finite() {
            self.min_scroll_delta = Self::default().min_scroll_delta;
        }
        self.min_scroll_delta = self.min_scroll_delta.clamp(0.0, Self::MAX_SCROLL_DELTA);

        if !self.font_size.is_finite() {
            self.font_size = Self::default().font_size;
        }
        self.font_size = self
            .font_size
            .clamp(Self::MIN_FONT_SIZE, Self::MAX_FONT_SIZE);

        if !self.split_ratio.is_finite() {
            self.split_ratio = Self::default().split_ratio;
        }
        self.split_ratio = self
            .split_ratio
            .clamp(Self::MIN_SPLIT_RATIO, Self::MAX_SPLIT_RATIO);

        self.window_size.width = self
            .window_size
            .width
            .clamp(Self::MIN_WINDOW_SIZE, Self::MAX_WINDOW_SIZE);
        self.window_size.height = self
            .window_size
            .height
            .clamp(Self::MIN_WINDOW_SIZE, Self::MAX_WINDOW_SIZE);
    }

    /// Load settings and sanitize them to ensure validity.
    ///
    /// This is a convenience method that deserializes and then sanitizes.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
