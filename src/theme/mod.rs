//! Theme System for PrevueMD
//!
//! This module defines the light and dark themes, the colors each uses, and
//! the [`ThemeManager`] that switches between them and remembers the choice.
//!
//! # Usage
//!
//! ```ignore
//! use crate::theme::{Theme, ThemeColors, ThemeManager};
//!
//! let mut manager = ThemeManager::load(&preferences);
//! manager.apply_if_needed(ctx);
//!
//! let colors = ThemeColors::for_theme(manager.current_theme());
//! ui.label(RichText::new("Hello").color(colors.text));
//! ```

pub mod manager;

pub use manager::ThemeManager;

use eframe::egui::{Color32, Visuals};
use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Theme
// ─────────────────────────────────────────────────────────────────────────────

/// Available color themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    /// Used on first launch
    #[default]
    Dark,
}

impl Theme {
    /// The other theme.
    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Label for the toggle button, naming the theme it switches to.
    pub fn toggle_label(&self) -> &'static str {
        match self {
            Theme::Light => "🌙 Dark",
            Theme::Dark => "☀ Light",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Theme Colors
// ─────────────────────────────────────────────────────────────────────────────

/// Colors used by the panes and the exported HTML document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemeColors {
    pub dark: bool,
    pub background: Color32,
    pub panel: Color32,
    pub text: Color32,
    pub muted: Color32,
    pub heading: Color32,
    pub link: Color32,
    pub border: Color32,
    pub code_background: Color32,
    pub accent: Color32,
    pub error: Color32,
}

impl ThemeColors {
    pub fn light() -> Self {
        Self {
            dark: false,
            background: Color32::from_rgb(255, 255, 255),
            panel: Color32::from_rgb(245, 245, 245),
            text: Color32::from_rgb(36, 41, 47),
            muted: Color32::from_rgb(101, 109, 118),
            heading: Color32::from_rgb(23, 23, 23),
            link: Color32::from_rgb(9, 105, 218),
            border: Color32::from_rgb(208, 215, 222),
            code_background: Color32::from_rgb(240, 240, 240),
            accent: Color32::from_rgb(64, 64, 64),
            error: Color32::from_rgb(207, 34, 46),
        }
    }

    pub fn dark() -> Self {
        Self {
            dark: true,
            background: Color32::from_rgb(23, 23, 23),
            panel: Color32::from_rgb(32, 32, 32),
            text: Color32::from_rgb(230, 237, 243),
            muted: Color32::from_rgb(139, 148, 158),
            heading: Color32::from_rgb(245, 245, 245),
            link: Color32::from_rgb(88, 166, 255),
            border: Color32::from_rgb(48, 54, 61),
            code_background: Color32::from_rgb(38, 38, 38),
            accent: Color32::from_rgb(212, 212, 212),
            error: Color32::from_rgb(248, 81, 73),
        }
    }

    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self::light(),
            Theme::Dark => Self::dark(),
        }
    }

    /// egui visuals built on this palette.
    pub fn to_visuals(&self) -> Visuals {
        let mut visuals = if self.dark {
            Visuals::dark()
        } else {
            Visuals::light()
        };
        visuals.panel_fill = self.panel;
        visuals.window_fill = self.panel;
        visuals.extreme_bg_color = self.background;
        visuals.code_bg_color = self.code_background;
        visuals.hyperlink_color = self.link;
        visuals.error_fg_color = self.error;
        visuals.override_text_color = Some(self.text);
        visuals
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
