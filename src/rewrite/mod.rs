//! Link detection and marker insertion for clipmark.
//!
//! This module handles:
//! - Scanning text for Figma links as byte-offset matches
//! - Grouping consecutive links (newline-separated and delimiter-separated)
//! - Inserting the marker prefix with one splice pass over the original text

pub mod engine;
pub mod scanner;

pub use engine::{MARKER, RewriteEngine, RewriteMode, rewrite};
pub use scanner::{LINK_PATTERN, LinkMatch, compile_link_pattern, scan_links};
