//! Status bar toasts
//!
//! Short-lived messages shown in the center of the status bar. Actions report
//! their outcome through the [`Notifier`] trait; [`ToastQueue`] is the
//! implementation the app draws from.

use std::collections::VecDeque;

use eframe::egui::{Color32, RichText};
use log::{info, warn};

use crate::theme::ThemeColors;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl ToastLevel {
    /// Seconds a toast of this level stays visible.
    pub fn duration(&self) -> f64 {
        match self {
            ToastLevel::Info | ToastLevel::Success => 2.0,
            ToastLevel::Warning => 3.0,
            ToastLevel::Error => 5.0,
        }
    }

    /// Text color for this level.
    pub fn color(&self, colors: &ThemeColors) -> Color32 {
        match self {
            ToastLevel::Info => colors.text,
            ToastLevel::Success => colors.accent,
            ToastLevel::Warning => Color32::from_rgb(0xd2, 0x99, 0x22),
            ToastLevel::Error => colors.error,
        }
    }
}

/// Sink for user-facing notifications.
pub trait Notifier {
    fn notify(&mut self, level: ToastLevel, message: String);
}

/// A single queued message.
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
    /// Seconds since app start when the toast disappears, set once shown
    expires_at: Option<f64>,
}

/// Toasts waiting to be shown, oldest first.
///
/// Only the front toast is visible. Its expiry clock starts on the first
/// `update` after it reaches the front, so messages queued in a burst are
/// each shown for their full duration.
#[derive(Debug, Default)]
pub struct ToastQueue {
    queue: VecDeque<Toast>,
}

impl ToastQueue {
    /// Most toasts kept; older ones are dropped first.
    const MAX_QUEUED: usize = 4;

    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a message.
    pub fn show(&mut self, level: ToastLevel, message: impl Into<String>) {
        let message = message.into();
        match level {
            ToastLevel::Warning | ToastLevel::Error => warn!("{}", message),
            ToastLevel::Info | ToastLevel::Success => info!("{}", message),
        }
        if self.queue.len() == Self::MAX_QUEUED {
            self.queue.pop_front();
        }
        self.queue.push_back(Toast {
            level,
            message,
            expires_at: None,
        });
    }

    /// Update toast state - clears expired toasts.
    ///
    /// Returns the seconds until the visible toast expires, so the caller can
    /// schedule a repaint.
    pub fn update(&mut self, current_time: f64) -> Option<f64> {
        while let Some(front) = self.queue.front_mut() {
            match front.expires_at {
                None => {
                    front.expires_at = Some(current_time + front.level.duration());
                }
                Some(expires_at) if current_time >= expires_at => {
                    self.queue.pop_front();
                    continue;
                }
                Some(_) => {}
            }
            break;
        }
        self.queue
            .front()
            .and_then(|toast| toast.expires_at)
            .map(|expires_at| (expires_at - current_time).max(0.0))
    }

    /// The toast to display, if any.
    pub fn current(&self) -> Option<&Toast> {
        self.queue.front()
    }

    /// Rich text for the current toast.
    pub fn current_text(&self, colors: &ThemeColors) -> Option<RichText> {
        self.current().map(|toast| {
            RichText::new(&toast.message)
                .italics()
                .color(toast.level.color(colors))
        })
    }
}

impl Notifier for ToastQueue {
    fn notify(&mut self, level: ToastLevel, message: String) {
        self.show(level, message);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_queue() {
        let mut toasts = ToastQueue::new();
        assert!(toasts.current().is_none());
        assert_eq!(toasts.update(0.0), None);
    }

    #[test]
    fn test_toast_expires() {
        let mut toasts = ToastQueue::new();
        toasts.show(ToastLevel::Info, "Copied");

        assert_eq!(toasts.update(10.0), Some(2.0));
        assert_eq!(toasts.current().map(|t| t.message.as_str()), Some("Copied"));

        assert_eq!(toasts.update(11.5), Some(0.5));
        assert_eq!(toasts.update(12.0), None);
        assert!(toasts.current().is_none());
    }

    #[test]
    fn test_queued_toasts_shown_in_turn() {
        let mut toasts = ToastQueue::new();
        toasts.show(ToastLevel::Success, "first");
        toasts.show(ToastLevel::Error, "second");

        toasts.update(0.0);
        assert_eq!(toasts.current().map(|t| t.message.as_str()), Some("first"));

        // second starts its own clock once it reaches the front
        assert_eq!(toasts.update(2.0), Some(5.0));
        assert_eq!(toasts.current().map(|t| t.level), Some(ToastLevel::Error));
        assert_eq!(toasts.update(6.9).map(|r| r > 0.0), Some(true));
        assert_eq!(toasts.update(7.0), None);
    }

    #[test]
    fn test_queue_drops_oldest_when_full() {
        let mut toasts = ToastQueue::new();
        for i in 0..6 {
            toasts.show(ToastLevel::Info, format!("toast {}", i));
        }
        assert_eq!(
            toasts.current().map(|t| t.message.as_str()),
            Some("toast 2")
        );
    }

    #[test]
    fn test_notifier_queues() {
        let mut toasts = ToastQueue::new();
        let notifier: &mut dyn Notifier = &mut toasts;
        notifier.notify(ToastLevel::Warning, "Nothing to download".to_string());
        assert_eq!(toasts.current().map(|t| t.level), Some(ToastLevel::Warning));
    }

    #[test]
    fn test_level_colors_follow_theme() {
        let colors = ThemeColors::dark();
        assert_eq!(ToastLevel::Error.color(&colors), colors.error);
        assert_eq!(ToastLevel::Info.color(&colors), colors.text);
    }
}
