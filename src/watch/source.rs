use crate::error::{ClipmarkError, Result};
use std::hash::{DefaultHasher, Hash, Hasher};

/// A clipboard-like collaborator the monitor polls and writes back to.
///
/// `revision` is an opaque counter that changes whenever the clipboard
/// content changes, including through `set_text`. The monitor compares
/// revisions to decide whether anything new appeared since its last tick.
pub trait ChangeSource {
	/// Current revision of the clipboard content.
	fn revision(&mut self) -> Result<u64>;

	/// Current plain-text content, or `None` when no plain text is available.
	fn text(&mut self) -> Result<Option<String>>;

	/// Replace the clipboard content with `text`.
	fn set_text(&mut self, text: &str) -> Result<()>;
}

/// Emulates a change counter for clipboards that expose none: the revision
/// bumps whenever the observed content hash differs from the last one.
#[derive(Debug, Default)]
pub struct RevisionTracker {
	revision: u64,
	last_hash: Option<u64>,
}

impl RevisionTracker {
	/// Record the currently observed content and return the revision.
	pub fn observe(&mut self, text: Option<&str>) -> u64 {
		let hash = text.map(hash_text);
		if hash != self.last_hash {
			self.last_hash = hash;
			self.revision += 1;
		}
		self.revision
	}
}

fn hash_text(text: &str) -> u64 {
	let mut hasher = DefaultHasher::new();
	text.hash(&mut hasher);
	hasher.finish()
}

/// The system clipboard, backed by `arboard`.
pub struct SystemClipboard {
	clipboard: arboard::Clipboard,
	tracker: RevisionTracker,
}

impl SystemClipboard {
	/// Open the system clipboard.
	pub fn new() -> Result<Self> {
		let clipboard =
			arboard::Clipboard::new().map_err(|source| ClipmarkError::Clipboard { source })?;
		Ok(SystemClipboard {
			clipboard,
			tracker: RevisionTracker::default(),
		})
	}

	fn read_text(&mut self) -> Result<Option<String>> {
		match self.clipboard.get_text() {
			Ok(text) => Ok(Some(text)),
			// Non-text content (or an empty clipboard) is not an error.
			Err(arboard::Error::ContentNotAvailable) => Ok(None),
			Err(source) => Err(ClipmarkError::Clipboard { source }),
		}
	}
}

impl ChangeSource for SystemClipboard {
	fn revision(&mut self) -> Result<u64> {
		// arboard exposes no platform change counter, so one is emulated
		// from the content itself.
		let text = self.read_text()?;
		Ok(self.tracker.observe(text.as_deref()))
	}

	fn text(&mut self) -> Result<Option<String>> {
		self.read_text()
	}

	fn set_text(&mut self, text: &str) -> Result<()> {
		self.clipboard
			.set_text(text)
			.map_err(|source| ClipmarkError::Clipboard { source })?;
		self.tracker.observe(Some(text));
		Ok(())
	}
}
