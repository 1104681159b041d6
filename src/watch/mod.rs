//! Clipboard polling for clipmark.
//!
//! This module handles:
//! - The [`ChangeSource`] seam between the monitor and the platform clipboard
//! - The system clipboard implementation backed by `arboard`
//! - The tick-driven monitor that observes, rewrites, and writes back

pub mod monitor;
pub mod source;

pub use monitor::{ClipboardMonitor, TickOutcome};
pub use source::{ChangeSource, RevisionTracker, SystemClipboard};
