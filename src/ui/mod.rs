//! UI components for PrevueMD
//!
//! This module contains the toolbar and the status bar toasts.

mod toast;
mod toolbar;

pub use toast::{Notifier, ToastLevel, ToastQueue};
pub use toolbar::{Toolbar, ToolbarAction, ToolbarState};
