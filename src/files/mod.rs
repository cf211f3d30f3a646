//! File operations module for PrevueMD
//!
//! This module provides the native save dialog used when downloading the
//! current document.

pub mod dialogs;
