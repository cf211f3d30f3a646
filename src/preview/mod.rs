//! Preview and sync scrolling module for PrevueMD
//!
//! This module provides synchronized scrolling between the editor and preview
//! panes, so that scrolling one pane keeps the other at the same relative
//! position.

mod pane;
mod sync_scroll;

pub use pane::ScrollPane;
pub use sync_scroll::SyncScroll;
