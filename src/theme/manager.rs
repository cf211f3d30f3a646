//! Theme Manager for PrevueMD
//!
//! This module handles theme switching, persistence of the choice through a
//! [`PreferenceStore`], and application of the theme to the egui context.
//!
//! # Usage
//!
//! ```ignore
//! let mut manager = ThemeManager::load(&preferences);
//! manager.apply_if_needed(&ctx);
//!
//! manager.toggle(&mut preferences)?;
//! manager.apply_if_needed(&ctx);
//! ```

use eframe::egui::Context;
use log::{debug, info, warn};

use super::{Theme, ThemeColors};
use crate::config::{decode_preference, encode_preference, PreferenceStore, THEME_KEY};
use crate::error::Result;

// ─────────────────────────────────────────────────────────────────────────────
// Theme Manager
// ─────────────────────────────────────────────────────────────────────────────

/// Manages theme state and applies themes to the egui context.
#[derive(Debug, Clone)]
pub struct ThemeManager {
    /// Current theme setting
    current_theme: Theme,
    /// Whether the theme needs to be reapplied
    needs_apply: bool,
}

impl ThemeManager {
    /// Create a new ThemeManager with the given initial theme.
    pub fn new(theme: Theme) -> Self {
        info!("ThemeManager initialized with theme: {:?}", theme);
        Self {
            current_theme: theme,
            needs_apply: true,
        }
    }

    /// Create a manager from the stored preference.
    ///
    /// A missing or unrecognized value falls back to the dark theme.
    pub fn load(preferences: &dyn PreferenceStore) -> Self {
        let theme = match preferences.get(THEME_KEY) {
            Some(value) => decode_preference::<Theme>(&value).unwrap_or_else(|e| {
                warn!("Unknown theme '{}' ({}); using default theme", value, e);
                Theme::default()
            }),
            None => Theme::default(),
        };
        Self::new(theme)
    }

    /// Get the current theme setting.
    pub fn current_theme(&self) -> Theme {
        self.current_theme
    }

    /// Colors of the current theme.
    pub fn colors(&self) -> ThemeColors {
        ThemeColors::for_theme(self.current_theme)
    }

    /// Set the theme and mark for reapplication.
    ///
    /// This doesn't apply the theme immediately - call `apply_if_needed()` to
    /// update the UI.
    pub fn set_theme(&mut self, theme: Theme) {
        if self.current_theme != theme {
            info!("Theme changed from {:?} to {:?}", self.current_theme, theme);
            self.current_theme = theme;
            self.needs_apply = true;
        }
    }

    /// Switch between light and dark and remember the choice.
    ///
    /// The in-memory theme changes even if persisting fails.
    pub fn toggle(&mut self, preferences: &mut dyn PreferenceStore) -> Result<Theme> {
        let new_theme = self.current_theme.toggled();
        self.set_theme(new_theme);
        preferences.set(THEME_KEY, &encode_preference(&new_theme)?)?;
        Ok(new_theme)
    }

    /// Check if the theme needs to be reapplied.
    #[allow(dead_code)]
    pub fn needs_apply(&self) -> bool {
        self.needs_apply
    }

    /// Apply the theme only if it changed since the last application.
    ///
    /// Returns `true` if the theme was applied.
    pub fn apply_if_needed(&mut self, ctx: &Context) -> bool {
        if !self.needs_apply {
            return false;
        }
        ctx.set_visuals(self.colors().to_visuals());
        self.needs_apply = false;
        debug!("Applied theme: {:?}", self.current_theme);
        true
    }
}

impl Default for ThemeManager {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryPreferenceStore;

    #[test]
    fn test_load_defaults_to_dark() {
        let preferences = MemoryPreferenceStore::new();
        let manager = ThemeManager::load(&preferences);
        assert_eq!(manager.current_theme(), Theme::Dark);
    }

    #[test]
    fn test_load_reads_stored_theme() {
        let mut preferences = MemoryPreferenceStore::new();
        preferences.set(THEME_KEY, "light").unwrap();
        assert_eq!(ThemeManager::load(&preferences).current_theme(), Theme::Light);
    }

    #[test]
    fn test_load_unknown_value_falls_back() {
        let mut preferences = MemoryPreferenceStore::new();
        preferences.set(THEME_KEY, "solarized").unwrap();
        assert_eq!(ThemeManager::load(&preferences).current_theme(), Theme::Dark);
    }

    #[test]
    fn test_toggle_persists() {
        let mut preferences = MemoryPreferenceStore::new();
        let mut manager = ThemeManager::load(&preferences);

        assert_eq!(manager.toggle(&mut preferences).unwrap(), Theme::Light);
        assert_eq!(preferences.get(THEME_KEY), Some("light".to_string()));

        assert_eq!(manager.toggle(&mut preferences).unwrap(), Theme::Dark);
        assert_eq!(preferences.get(THEME_KEY), Some("dark".to_string()));
        assert_eq!(ThemeManager::load(&preferences).current_theme(), Theme::Dark);
    }

    #[test]
    fn test_set_theme_marks_for_apply() {
        let mut manager = ThemeManager::new(Theme::Light);
        let ctx = Context::default();
        assert!(manager.apply_if_needed(&ctx));
        assert!(!manager.needs_apply());
        assert!(!manager.apply_if_needed(&ctx));

        manager.set_theme(Theme::Light);
        assert!(!manager.needs_apply());

        manager.set_theme(Theme::Dark);
        assert!(manager.needs_apply());
        assert!(manager.apply_if_needed(&ctx));
        assert!(ctx.style().visuals.dark_mode);
    }
}
