use crate::error::Result;
use crate::rewrite::RewriteEngine;
use crate::watch::source::ChangeSource;

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
	/// Monitoring is switched off; nothing was read.
	Disabled,

	/// Clipboard revision unchanged since the last tick.
	Unchanged,

	/// Clipboard changed but holds no plain text.
	NoText,

	/// Text was observed and the rewrite left it unchanged.
	Untouched,

	/// Text was observed, rewritten, and written back.
	Rewritten,
}

/// Polls a [`ChangeSource`] and pushes rewritten text back to it.
///
/// The monitor is single-threaded and timer-driven: the owner calls
/// [`tick`](ClipboardMonitor::tick) at a fixed interval, strictly
/// sequentially. It keeps exactly one piece of state between ticks, the last
/// observed revision, so that its own write-backs are never re-observed as
/// external changes.
pub struct ClipboardMonitor<S: ChangeSource> {
	source: S,
	engine: RewriteEngine,
	enabled: bool,
	last_revision: Option<u64>,
}

impl<S: ChangeSource> ClipboardMonitor<S> {
	pub fn new(source: S, engine: RewriteEngine) -> Self {
		ClipboardMonitor {
			source,
			engine,
			enabled: true,
			last_revision: None,
		}
	}

	/// Whether observed clipboard changes are acted upon.
	pub fn is_enabled(&self) -> bool {
		self.enabled
	}

	/// Toggle monitoring. Does not clear or reset the revision bookkeeping,
	/// so re-enabling picks up from where the last enabled tick left off.
	pub fn set_enabled(&mut self, enabled: bool) {
		self.enabled = enabled;
	}

	/// Run one poll cycle: observe → rewrite → conditionally write back.
	///
	/// The clipboard is only overwritten when the rewrite actually changed
	/// the text; after a write-back the source's new revision is recorded so
	/// the next tick does not re-observe our own output.
	pub fn tick(&mut self) -> Result<TickOutcome> {
		if !self.enabled {
			return Ok(TickOutcome::Disabled);
		}

		let revision = self.source.revision()?;
		if self.last_revision == Some(revision) {
			return Ok(TickOutcome::Unchanged);
		}
		self.last_revision = Some(revision);

		let Some(text) = self.source.text()? else {
			return Ok(TickOutcome::NoText);
		};

		let rewritten = self.engine.rewrite(&text);
		if rewritten == text {
			return Ok(TickOutcome::Untouched);
		}

		self.source.set_text(&rewritten)?;
		self.last_revision = Some(self.source.revision()?);
		tracing::debug!(len = rewritten.len(), "wrote rewritten text back");

		Ok(TickOutcome::Rewritten)
	}
}
