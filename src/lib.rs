//! Clipmark - clipboard watcher that marks Figma links with a VPN/proxy prefix.
//!
//! This library provides the core functionality for clipmark, including:
//! - The rewrite engine: link scanning, grouping, and marker insertion
//! - The clipboard monitor: tick-driven polling with write-back
//! - Configuration file parsing and discovery
//!
//! # Example
//!
//! ```
//! use clipmark::rewrite::RewriteEngine;
//!
//! let engine = RewriteEngine::new().unwrap();
//! assert_eq!(
//!     engine.rewrite("see https://figma.com/file/abc"),
//!     "see **[VPN, PROXY]** https://figma.com/file/abc"
//! );
//!
//! // Rewriting is idempotent: marked text is never marked twice.
//! let once = engine.rewrite("https://figma.com/a, https://figma.com/b");
//! assert_eq!(engine.rewrite(&once), once);
//! ```

pub mod config;
pub mod error;
pub mod rewrite;
pub mod watch;

pub use error::{ClipmarkError, Result};
