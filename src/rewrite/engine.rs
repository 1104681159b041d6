use crate::error::{ClipmarkError, Result};
use crate::rewrite::scanner::{
	compile_link_pattern, delimiter_groups, newline_groups, scan_links,
};
use regex::Regex;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// The fixed marker inserted before qualifying links.
pub const MARKER: &str = "**[VPN, PROXY]** ";

/// Host substring checked by the global policy.
const TARGET_HOST: &str = "figma.com";

/// Rewrite policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewriteMode {
	/// Mark each link group once, at its first link (canonical policy).
	#[default]
	Grouped,

	/// Prefix the whole text once when a Figma link is present.
	Global,
}

impl fmt::Display for RewriteMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			RewriteMode::Grouped => write!(f, "grouped"),
			RewriteMode::Global => write!(f, "global"),
		}
	}
}

impl FromStr for RewriteMode {
	type Err = ClipmarkError;

	fn from_str(s: &str) -> Result<Self> {
		match s {
			"grouped" => Ok(RewriteMode::Grouped),
			"global" => Ok(RewriteMode::Global),
			other => Err(ClipmarkError::InvalidMode {
				value: other.to_string(),
			}),
		}
	}
}

/// A single splice against the original text: replace `start..end` with
/// `text`. Insertions have `start == end`.
#[derive(Debug)]
struct Edit {
	start: usize,
	end: usize,
	text: String,
}

impl Edit {
	fn insert(at: usize, text: String) -> Self {
		Edit {
			start: at,
			end: at,
			text,
		}
	}

	fn replace(start: usize, end: usize, text: String) -> Self {
		Edit { start, end, text }
	}
}

/// The rewrite engine: finds Figma links and inserts the marker prefix.
///
/// `rewrite` is pure and total: for any input it returns either the input
/// unchanged or the input with markers inserted, and applying it twice
/// yields the same result as applying it once.
#[derive(Debug)]
pub struct RewriteEngine {
	link_re: Regex,
	mode: RewriteMode,
}

impl RewriteEngine {
	/// Create an engine with the canonical grouped policy.
	pub fn new() -> Result<Self> {
		Self::with_mode(RewriteMode::Grouped)
	}

	/// Create an engine with an explicit policy.
	pub fn with_mode(mode: RewriteMode) -> Result<Self> {
		Ok(RewriteEngine {
			link_re: compile_link_pattern()?,
			mode,
		})
	}

	/// The policy this engine applies.
	pub fn mode(&self) -> RewriteMode {
		self.mode
	}

	/// Rewrite `text`, inserting the marker before qualifying links.
	pub fn rewrite(&self, text: &str) -> String {
		match self.mode {
			RewriteMode::Grouped => self.rewrite_grouped(text),
			RewriteMode::Global => rewrite_global(text),
		}
	}

	/// Grouped policy: one marker per shape, inserted before the shape's
	/// first link.
	///
	/// Texts already containing the marker anywhere are returned unchanged,
	/// even when they also hold unmarked links. This keeps repeated runs on
	/// evolving clipboard content from ever stacking markers.
	fn rewrite_grouped(&self, text: &str) -> String {
		if text.contains(MARKER) {
			return text.to_string();
		}

		let links = scan_links(&self.link_re, text);
		if links.is_empty() {
			return text.to_string();
		}

		let mut claimed = vec![false; links.len()];
		let mut edits = Vec::new();

		// Newline groups claim their links first.
		for group in newline_groups(text, &links) {
			edits.push(Edit::insert(links[group[0]].start, MARKER.to_string()));
			for &i in &group {
				claimed[i] = true;
			}
		}

		// Delimiter groups form only among links still unclaimed. The whole
		// span is replaced so the separators collapse to ", ".
		for group in delimiter_groups(text, &links, &claimed) {
			let joined = group
				.iter()
				.map(|&i| links[i].text(text))
				.collect::<Vec<_>>()
				.join(", ");
			let first = links[group[0]].start;
			let last = links[*group.last().unwrap_or(&group[0])].end;
			edits.push(Edit::replace(first, last, format!("{MARKER}{joined}")));
			for &i in &group {
				claimed[i] = true;
			}
		}

		// Whatever is left is a singleton.
		for (i, link) in links.iter().enumerate() {
			if !claimed[i] {
				edits.push(Edit::insert(link.start, MARKER.to_string()));
			}
		}

		apply_edits(text, edits)
	}
}

/// Global policy: prefix the whole text once when the target host appears
/// and the text does not already start with the marker.
fn rewrite_global(text: &str) -> String {
	if text.to_lowercase().contains(TARGET_HOST) && !text.starts_with(MARKER) {
		format!("{MARKER}{text}")
	} else {
		text.to_string()
	}
}

/// Apply non-overlapping edits in a single left-to-right copy-and-splice
/// pass over the original text.
///
/// A malformed edit (overlapping the previous one, out of bounds, or not on
/// a character boundary) is skipped; the remaining edits still apply.
fn apply_edits(text: &str, mut edits: Vec<Edit>) -> String {
	edits.sort_by_key(|e| (e.start, e.end));

	let mut out = String::with_capacity(text.len() + edits.len() * MARKER.len());
	let mut cursor = 0;

	for edit in edits {
		if edit.start < cursor
			|| edit.end > text.len()
			|| !text.is_char_boundary(edit.start)
			|| !text.is_char_boundary(edit.end)
		{
			continue;
		}
		out.push_str(&text[cursor..edit.start]);
		out.push_str(&edit.text);
		cursor = edit.end;
	}

	out.push_str(&text[cursor..]);
	out
}

static DEFAULT_ENGINE: LazyLock<Option<RewriteEngine>> = LazyLock::new(|| RewriteEngine::new().ok());

/// Rewrite `text` with the canonical grouped policy.
///
/// Pattern compilation cannot fail for the fixed pattern; if it ever did,
/// this degrades to returning the input unchanged.
pub fn rewrite(text: &str) -> String {
	match &*DEFAULT_ENGINE {
		Some(engine) => engine.rewrite(text),
		None => text.to_string(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn engine() -> RewriteEngine {
		RewriteEngine::new().unwrap()
	}

	#[test]
	fn test_identity_on_no_match() {
		let e = engine();
		assert_eq!(e.rewrite(""), "");
		assert_eq!(e.rewrite("plain text"), "plain text");
		assert_eq!(
			e.rewrite("https://example.com/figma"),
			"https://example.com/figma"
		);
	}

	#[test]
	fn test_singleton_link() {
		assert_eq!(
			engine().rewrite("see https://figma.com/file/abc"),
			"see **[VPN, PROXY]** https://figma.com/file/abc"
		);
	}

	#[test]
	fn test_singleton_link_at_start() {
		assert_eq!(
			engine().rewrite("https://figma.com/file/abc"),
			"**[VPN, PROXY]** https://figma.com/file/abc"
		);
	}

	#[test]
	fn test_singleton_www_and_case() {
		assert_eq!(
			engine().rewrite("HTTP://WWW.Figma.COM/x"),
			"**[VPN, PROXY]** HTTP://WWW.Figma.COM/x"
		);
	}

	#[test]
	fn test_two_distant_singletons() {
		assert_eq!(
			engine().rewrite("a https://figma.com/x and b https://figma.com/y"),
			"a **[VPN, PROXY]** https://figma.com/x and b **[VPN, PROXY]** https://figma.com/y"
		);
	}

	#[test]
	fn test_identical_links_at_different_offsets() {
		// Ranges, not literal text, decide what gets marked.
		assert_eq!(
			engine().rewrite("https://figma.com/x and https://figma.com/x"),
			"**[VPN, PROXY]** https://figma.com/x and **[VPN, PROXY]** https://figma.com/x"
		);
	}

	#[test]
	fn test_delimiter_group_comma() {
		assert_eq!(
			engine().rewrite("https://figma.com/a, https://figma.com/b"),
			"**[VPN, PROXY]** https://figma.com/a, https://figma.com/b"
		);
	}

	#[test]
	fn test_delimiter_group_space_collapses_to_comma() {
		assert_eq!(
			engine().rewrite("https://figma.com/a https://figma.com/b https://figma.com/c"),
			"**[VPN, PROXY]** https://figma.com/a, https://figma.com/b, https://figma.com/c"
		);
	}

	#[test]
	fn test_delimiter_group_keeps_surrounding_text() {
		assert_eq!(
			engine().rewrite("links: https://figma.com/a, https://figma.com/b done"),
			"links: **[VPN, PROXY]** https://figma.com/a, https://figma.com/b done"
		);
	}

	#[test]
	fn test_newline_group() {
		assert_eq!(
			engine().rewrite("https://figma.com/a\nhttps://figma.com/b"),
			"**[VPN, PROXY]** https://figma.com/a\nhttps://figma.com/b"
		);
	}

	#[test]
	fn test_newline_group_preserves_other_lines() {
		assert_eq!(
			engine().rewrite("designs\nhttps://figma.com/a\nhttps://figma.com/b\nthanks"),
			"designs\n**[VPN, PROXY]** https://figma.com/a\nhttps://figma.com/b\nthanks"
		);
	}

	#[test]
	fn test_lone_line_link_is_singleton() {
		assert_eq!(
			engine().rewrite("https://figma.com/a\nsome notes"),
			"**[VPN, PROXY]** https://figma.com/a\nsome notes"
		);
	}

	#[test]
	fn test_group_link_not_also_singleton() {
		// Exactly one marker for the whole group.
		let out = engine().rewrite("https://figma.com/a, https://figma.com/b");
		assert_eq!(out.matches(MARKER).count(), 1);
	}

	#[test]
	fn test_newline_group_links_not_also_singletons() {
		let out = engine().rewrite("https://figma.com/a\nhttps://figma.com/b\nhttps://figma.com/c");
		assert_eq!(out.matches(MARKER).count(), 1);
	}

	#[test]
	fn test_group_and_singleton_mix() {
		assert_eq!(
			engine().rewrite("https://figma.com/a, https://figma.com/b and https://figma.com/c"),
			"**[VPN, PROXY]** https://figma.com/a, https://figma.com/b and **[VPN, PROXY]** https://figma.com/c"
		);
	}

	#[test]
	fn test_short_circuit_on_marked_text() {
		let marked = "**[VPN, PROXY]** https://figma.com/a";
		assert_eq!(engine().rewrite(marked), marked);
	}

	#[test]
	fn test_short_circuit_covers_unmarked_links_too() {
		// One marker anywhere freezes the whole text, even with a new
		// unmarked link present.
		let text = "**[VPN, PROXY]** https://figma.com/a and https://figma.com/b";
		assert_eq!(engine().rewrite(text), text);
	}

	#[test]
	fn test_idempotence() {
		let e = engine();
		let inputs = [
			"",
			"plain",
			"https://figma.com/a",
			"see https://figma.com/a and https://figma.com/b",
			"https://figma.com/a, https://figma.com/b",
			"https://figma.com/a\nhttps://figma.com/b",
			"https://figma.com/a\nnotes\nhttps://figma.com/b https://figma.com/c",
		];
		for input in inputs {
			let once = e.rewrite(input);
			assert_eq!(e.rewrite(&once), once, "not idempotent for {input:?}");
		}
	}

	#[test]
	fn test_multibyte_text_around_links() {
		assert_eq!(
			engine().rewrite("глянь https://figma.com/файл 👍"),
			"глянь **[VPN, PROXY]** https://figma.com/файл 👍"
		);
	}

	#[test]
	fn test_free_function_uses_grouped_policy() {
		assert_eq!(
			rewrite("https://figma.com/a"),
			"**[VPN, PROXY]** https://figma.com/a"
		);
	}

	#[test]
	fn test_mode_round_trip() {
		assert_eq!("grouped".parse::<RewriteMode>().unwrap(), RewriteMode::Grouped);
		assert_eq!("global".parse::<RewriteMode>().unwrap(), RewriteMode::Global);
		assert!("markdown".parse::<RewriteMode>().is_err());
		assert_eq!(RewriteMode::Global.to_string(), "global");
	}

	#[test]
	fn test_global_mode_prefixes_whole_text() {
		let e = RewriteEngine::with_mode(RewriteMode::Global).unwrap();
		assert_eq!(
			e.rewrite("check https://figma.com/a please"),
			"**[VPN, PROXY]** check https://figma.com/a please"
		);
	}

	#[test]
	fn test_global_mode_identity_cases() {
		let e = RewriteEngine::with_mode(RewriteMode::Global).unwrap();
		assert_eq!(e.rewrite("no links here"), "no links here");
		let marked = "**[VPN, PROXY]** https://figma.com/a";
		assert_eq!(e.rewrite(marked), marked);
	}

	#[test]
	fn test_global_mode_idempotence() {
		let e = RewriteEngine::with_mode(RewriteMode::Global).unwrap();
		let once = e.rewrite("ссылка figma.com/a");
		assert_eq!(e.rewrite(&once), once);
	}
}
