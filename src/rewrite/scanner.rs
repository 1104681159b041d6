use crate::error::{ClipmarkError, Result};
use regex::Regex;

/// Pattern for a target link: scheme + optional `www.` + the Figma host +
/// path, terminated by whitespace or a comma.
pub const LINK_PATTERN: &str = r"(?i)https?://(?:www\.)?figma\.com[^\s,]*";

/// A link occurrence in the source text, as byte offsets.
///
/// Two identical URLs at different offsets are distinct matches; all
/// grouping and overlap bookkeeping works on ranges, never on literal text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkMatch {
	/// Byte offset where the link starts.
	pub start: usize,

	/// Byte offset one past the end of the link.
	pub end: usize,
}

impl LinkMatch {
	/// The literal link text within `source`.
	pub fn text<'a>(&self, source: &'a str) -> &'a str {
		&source[self.start..self.end]
	}
}

/// Compile the fixed link pattern.
pub fn compile_link_pattern() -> Result<Regex> {
	Regex::new(LINK_PATTERN).map_err(|source| ClipmarkError::InvalidPattern {
		pattern: LINK_PATTERN.to_string(),
		source,
	})
}

/// Find all target links in `text`, in source order.
pub fn scan_links(link_re: &Regex, text: &str) -> Vec<LinkMatch> {
	link_re
		.find_iter(text)
		.map(|m| LinkMatch {
			start: m.start(),
			end: m.end(),
		})
		.collect()
}

/// Find newline-separated groups: runs of two or more immediately
/// consecutive lines where each line, after trimming surrounding
/// whitespace, consists of exactly one target link and nothing else.
///
/// Returns groups as indices into `links`. Any other line, including an
/// empty one, breaks the run.
pub fn newline_groups(text: &str, links: &[LinkMatch]) -> Vec<Vec<usize>> {
	let mut groups = Vec::new();
	let mut run: Vec<usize> = Vec::new();
	let mut next_link = 0;
	let mut offset = 0;

	for line in text.split_inclusive('\n') {
		let line_start = offset;
		offset += line.len();

		let content = line.strip_suffix('\n').unwrap_or(line);
		let content = content.strip_suffix('\r').unwrap_or(content);
		let trimmed = content.trim();
		let trim_start = line_start + (content.len() - content.trim_start().len());
		let trim_end = trim_start + trimmed.len();

		// Skip links from earlier lines.
		while next_link < links.len() && links[next_link].end <= line_start {
			next_link += 1;
		}

		let sole_link = !trimmed.is_empty()
			&& next_link < links.len()
			&& links[next_link].start == trim_start
			&& links[next_link].end == trim_end;

		if sole_link {
			run.push(next_link);
		} else {
			flush_run(&mut run, &mut groups);
		}
	}

	flush_run(&mut run, &mut groups);
	groups
}

/// Find delimiter-separated groups: runs of two or more links where the
/// text between neighbours consists only of commas and/or spaces.
///
/// Links already claimed by another group are skipped and break any run in
/// progress. Returns groups as indices into `links`.
pub fn delimiter_groups(text: &str, links: &[LinkMatch], claimed: &[bool]) -> Vec<Vec<usize>> {
	let mut groups = Vec::new();
	let mut run: Vec<usize> = Vec::new();

	for (i, link) in links.iter().enumerate() {
		if claimed[i] {
			flush_run(&mut run, &mut groups);
			continue;
		}

		if let Some(&prev) = run.last() {
			let gap = &text[links[prev].end..link.start];
			if gap.is_empty() || !gap.bytes().all(|b| b == b',' || b == b' ') {
				flush_run(&mut run, &mut groups);
			}
		}

		run.push(i);
	}

	flush_run(&mut run, &mut groups);
	groups
}

/// A run only counts as a group with at least two members.
fn flush_run(run: &mut Vec<usize>, groups: &mut Vec<Vec<usize>>) {
	if run.len() >= 2 {
		groups.push(std::mem::take(run));
	} else {
		run.clear();
	}
}
