//! egui scroll area adapter for [`SyncScroll`](super::SyncScroll)
//!
//! egui has no scroll events. A [`ScrollPane`] remembers the offset it last
//! reported; [`ScrollPane::observe`] compares the freshly drawn scroll area
//! against it and reports a user scroll once the offset moved far enough.
//! A programmatic offset is handed to egui on the next frame through
//! [`ScrollPane::take_requested_offset`].

use egui::scroll_area::ScrollAreaOutput;

use super::sync_scroll::ScrollTarget;

/// Geometry of one egui `ScrollArea`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrollPane {
    offset: f32,
    /// Offset at the last reported scroll or forced offset
    reported_offset: f32,
    content_height: f32,
    viewport_height: f32,
    /// Offset to force on the next frame
    requested: Option<f32>,
    /// A requested offset was handed to egui for the frame being drawn
    applying_request: bool,
    /// Smallest offset change treated as a scroll, in pixels
    min_delta: f32,
}

impl ScrollPane {
    /// Create a pane that ignores offset jitter below `min_delta` pixels.
    pub fn new(min_delta: f32) -> Self {
        Self {
            min_delta: min_delta.max(0.0),
            ..Self::default()
        }
    }

    /// Offset to pass to `ScrollArea::vertical_scroll_offset` this frame.
    pub fn take_requested_offset(&mut self) -> Option<f32> {
        let requested = self.requested.take();
        self.applying_request = requested.is_some();
        requested
    }

    /// Record the geometry drawn this frame.
    ///
    /// Returns `true` when the offset moved by at least the minimum delta
    /// since the last reported position, i.e. the pane scrolled. Slow scrolls
    /// accumulate until they cross the threshold. The frame that applies a
    /// requested offset never reports, even if egui clamped the offset.
    pub fn observe(&mut self, offset: f32, content_height: f32, viewport_height: f32) -> bool {
        self.offset = offset;
        self.content_height = content_height;
        self.viewport_height = viewport_height;

        if std::mem::take(&mut self.applying_request) {
            self.reported_offset = offset;
            return false;
        }

        let scrolled = (offset - self.reported_offset).abs() >= self.min_delta.max(f32::EPSILON);
        if scrolled {
            self.reported_offset = offset;
        }
        scrolled
    }

    /// Record the geometry of a drawn scroll area.
    pub fn observe_output<R>(&mut self, output: &ScrollAreaOutput<R>) -> bool {
        self.observe(
            output.state.offset.y,
            output.content_size.y,
            output.inner_rect.height(),
        )
    }

    /// Largest offset the current content allows.
    fn max_offset(&self) -> f32 {
        (self.content_height - self.viewport_height).max(0.0)
    }
}

impl ScrollTarget for ScrollPane {
    fn scroll_top(&self) -> f32 {
        self.offset
    }

    fn set_scroll_top(&mut self, offset: f32) {
        let offset = offset.clamp(0.0, self.max_offset());
        self.offset = offset;
        self.reported_offset = offset;
        self.requested = Some(offset);
    }

    fn scroll_height(&self) -> f32 {
        self.content_height
    }

    fn client_height(&self) -> f32 {
        self.viewport_height
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
