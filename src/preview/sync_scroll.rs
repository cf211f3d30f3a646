//! Loop-safe scroll synchronization between two panes
//!
//! Each pane gets its own [`SyncScroll`], bound to one [`ScrollTarget`].
//! A pane's scroll event is turned into a scroll fraction in `[0, 1]` and
//! handed to a listener; the host forwards that fraction to the other pane's
//! [`SyncScroll::set_scroll_fraction`].
//!
//! # Architecture
//!
//! Setting a scroll position programmatically makes the target emit a scroll
//! event of its own. To stop that event from bouncing back to the pane that
//! started the sync, `set_scroll_fraction` raises an "applying" flag that
//! suppresses listener dispatch. The flag is cleared by [`SyncScroll::settle`],
//! which the host calls once at the end of every event-loop turn, after all
//! scroll events of that turn have been dispatched.
//!
//! While the flag is raised, further `set_scroll_fraction` calls are dropped,
//! not queued.
//!
//! # Usage
//!
//! ```ignore
//! let mut editor = SyncScroll::new();
//! let mut preview = SyncScroll::new();
//!
//! // Editor pane scrolled by the user
//! editor.on_scroll(|fraction| preview.set_scroll_fraction(fraction));
//!
//! // End of the frame
//! editor.settle();
//! preview.settle();
//! ```

use log::trace;

// ─────────────────────────────────────────────────────────────────────────────
// Scroll Target
// ─────────────────────────────────────────────────────────────────────────────

/// A vertically scrollable region.
pub trait ScrollTarget {
    /// Current scroll offset from the top, in pixels.
    fn scroll_top(&self) -> f32;
    /// Move the scroll offset.
    fn set_scroll_top(&mut self, offset: f32);
    /// Total height of the scrollable content.
    fn scroll_height(&self) -> f32;
    /// Height of the visible viewport.
    fn client_height(&self) -> f32;

    /// Distance the content can scroll, `scroll_height - client_height`.
    fn scroll_range(&self) -> f32 {
        self.scroll_height() - self.client_height()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Sync Scroll
// ─────────────────────────────────────────────────────────────────────────────

/// Scroll synchronizer for a single pane.
#[derive(Debug, Clone)]
pub struct SyncScroll<T> {
    /// The bound pane, `None` until mounted
    target: Option<T>,
    /// Set while a programmatic scroll is being applied
    applying: bool,
}

impl<T> Default for SyncScroll<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SyncScroll<T> {
    /// Create an unmounted synchronizer.
    pub fn new() -> Self {
        Self {
            target: None,
            applying: false,
        }
    }

    /// Create a synchronizer bound to `target`.
    #[allow(dead_code)]
    pub fn with_target(target: T) -> Self {
        Self {
            target: Some(target),
            applying: false,
        }
    }

    /// Bind the pane.
    pub fn mount(&mut self, target: T) {
        self.target = Some(target);
    }

    /// Unbind the pane, returning it.
    #[allow(dead_code)]
    pub fn unmount(&mut self) -> Option<T> {
        self.target.take()
    }

    pub fn target(&self) -> Option<&T> {
        self.target.as_ref()
    }

    pub fn target_mut(&mut self) -> Option<&mut T> {
        self.target.as_mut()
    }

    /// Whether a programmatic scroll is in flight.
    #[allow(dead_code)]
    pub fn is_applying(&self) -> bool {
        self.applying
    }

    /// Clear the in-flight flag. Call once at the end of each event-loop turn.
    pub fn settle(&mut self) {
        if self.applying {
            trace!("Programmatic scroll settled");
        }
        self.applying = false;
    }
}

impl<T: ScrollTarget> SyncScroll<T> {
    /// Dispatch the pane's scroll event to `callback`.
    ///
    /// The callback receives the current scroll fraction. It is not invoked
    /// while a programmatic scroll is in flight or when no pane is mounted.
    /// Content that fits the viewport reports a fraction of `0.0`.
    pub fn on_scroll(&self, callback: impl FnOnce(f32)) {
        if self.applying {
            trace!("Scroll event suppressed during programmatic scroll");
            return;
        }
        let Some(target) = &self.target else {
            return;
        };

        callback(scroll_fraction(target));
    }

    /// Scroll the pane to `fraction` of its scrollable range.
    ///
    /// Silently dropped when no pane is mounted, when a previous call has not
    /// settled yet, or when `fraction` is not finite.
    pub fn set_scroll_fraction(&mut self, fraction: f32) {
        if self.applying || !fraction.is_finite() {
            return;
        }
        let Some(target) = &mut self.target else {
            return;
        };

        self.applying = true;
        let offset = fraction * target.scroll_range().max(0.0);
        target.set_scroll_top(offset);
        trace!("Programmatic scroll to {:.3} ({:.1}px)", fraction, offset);
    }
}

/// Scroll fraction of `target`, `scroll_top / (scroll_height - client_height)`.
///
/// A target without overflow has nowhere to scroll, so it reports `0.0`.
pub fn scroll_fraction(target: &impl ScrollTarget) -> f32 {
    let range = target.scroll_range();
    if range <= 0.0 {
        return 0.0;
    }
    target.scroll_top() / range
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
