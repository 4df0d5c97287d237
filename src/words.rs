//! Word list loading and readiness tracking
//!
//! This module holds the linked word list the picker draws from. The list
//! is fetched once at startup by the embedding application (the engine is
//! agnostic about the transport) and handed to [`WordSource::resolve`] as
//! raw JSON. A failed or malformed fetch degrades to an empty list rather
//! than an error: an empty source keeps the start action disabled but
//! never crashes the engine.

use serde::{Deserialize, Serialize};

/// A single entry of the word list
///
/// Each entry carries the main secret word and, optionally, a related word
/// handed to the imposter in [`Mode::DifferentWord`](crate::game::Mode)
/// rounds. Entries are immutable once loaded.
///
/// The serde field names match the external word-list resource format:
/// a JSON array of `{ "w": "...", "rel": "..." }` objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
    /// The main secret word shown to regular players
    #[serde(rename = "w")]
    main: String,
    /// A related word shown to the imposter instead, if available
    #[serde(rename = "rel", default)]
    related: Option<String>,
}

impl WordEntry {
    /// Creates a new word entry
    pub fn new(main: impl Into<String>, related: Option<String>) -> Self {
        Self {
            main: main.into(),
            related,
        }
    }

    /// Returns the main secret word
    pub fn main(&self) -> &str {
        &self.main
    }

    /// Returns the related word, if the entry has one
    pub fn related(&self) -> Option<&str> {
        self.related.as_deref()
    }
}

/// Readiness of the one-shot word list load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadState {
    /// The fetch has not completed yet
    Loading,
    /// The fetch completed (possibly with an empty list on failure)
    Ready,
}

/// Owns the word list and the state of its one-shot load
///
/// The source starts in [`LoadState::Loading`] with an empty list and
/// becomes ready exactly once, when [`WordSource::resolve`] is called with
/// the fetch outcome. Late outcomes are ignored: a second `resolve`, or a
/// `resolve` after [`WordSource::cancel`], has no effect.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct WordSource {
    /// The loaded word entries, empty until the load resolves
    entries: Vec<WordEntry>,
    /// Whether the one-shot load has completed
    state: LoadState,
    /// Set when the consumer is gone; suppresses any later resolution
    cancelled: bool,
}

impl Default for LoadState {
    fn default() -> Self {
        Self::Loading
    }
}

impl WordSource {
    /// Creates a word source awaiting its one-shot load
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies the outcome of the word list fetch
    ///
    /// `payload` is the raw response body, or `None` if the fetch itself
    /// failed. A payload that is not a JSON array of word objects is
    /// treated the same as a failure: the list stays empty and a warning
    /// is logged. Either way the source becomes ready, so the UI can tell
    /// "still loading" apart from "nothing to play with".
    ///
    /// Only the first call has any effect; calls after the source is
    /// ready or cancelled are ignored.
    pub fn resolve(&mut self, payload: Option<&str>) {
        if self.cancelled || matches!(self.state, LoadState::Ready) {
            return;
        }
        self.entries = match payload {
            Some(raw) => parse_word_list(raw),
            None => {
                tracing::warn!("word list fetch failed, starting with an empty list");
                Vec::new()
            }
        };
        self.state = LoadState::Ready;
    }

    /// Marks the source as abandoned
    ///
    /// Any load outcome arriving after this point is dropped. Idempotent.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    /// Returns whether the one-shot load has completed
    pub fn is_ready(&self) -> bool {
        matches!(self.state, LoadState::Ready)
    }

    /// Returns the loaded word entries
    ///
    /// Empty while loading, and empty after a failed load.
    pub fn entries(&self) -> &[WordEntry] {
        &self.entries
    }
}

/// Parses the raw word list payload, degrading to empty on any error
fn parse_word_list(raw: &str) -> Vec<WordEntry> {
    match serde_json::from_str::<Vec<WordEntry>>(raw) {
        Ok(entries) => entries,
        Err(error) => {
            tracing::warn!(%error, "word list payload is not a valid word array");
            Vec::new()
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_valid_payload() {
        let mut source = WordSource::new();
        assert!(!source.is_ready());

        source.resolve(Some(r#"[{"w":"cat","rel":"lion"},{"w":"tea"}]"#));

        assert!(source.is_ready());
        assert_eq!(source.entries().len(), 2);
        assert_eq!(source.entries()[0].main(), "cat");
        assert_eq!(source.entries()[0].related(), Some("lion"));
        assert_eq!(source.entries()[1].main(), "tea");
        assert_eq!(source.entries()[1].related(), None);
    }

    #[test]
    fn test_resolve_null_related() {
        let mut source = WordSource::new();
        source.resolve(Some(r#"[{"w":"cat","rel":null}]"#));

        assert_eq!(source.entries()[0].related(), None);
    }

    #[test]
    fn test_resolve_fetch_failure_is_ready_and_empty() {
        let mut source = WordSource::new();
        source.resolve(None);

        assert!(source.is_ready());
        assert!(source.entries().is_empty());
    }

    #[test]
    fn test_resolve_non_array_payload() {
        let mut source = WordSource::new();
        source.resolve(Some(r#"{"w":"cat"}"#));

        assert!(source.is_ready());
        assert!(source.entries().is_empty());
    }

    #[test]
    fn test_resolve_invalid_json_payload() {
        let mut source = WordSource::new();
        source.resolve(Some("not json at all"));

        assert!(source.is_ready());
        assert!(source.entries().is_empty());
    }

    #[test]
    fn test_second_resolve_is_ignored() {
        let mut source = WordSource::new();
        source.resolve(Some(r#"[{"w":"cat"}]"#));
        source.resolve(Some(r#"[{"w":"dog"},{"w":"fox"}]"#));

        assert_eq!(source.entries().len(), 1);
        assert_eq!(source.entries()[0].main(), "cat");
    }

    #[test]
    fn test_resolve_after_cancel_is_ignored() {
        let mut source = WordSource::new();
        source.cancel();
        source.resolve(Some(r#"[{"w":"cat"}]"#));

        assert!(!source.is_ready());
        assert!(source.entries().is_empty());
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut source = WordSource::new();
        source.cancel();
        source.cancel();
        source.resolve(Some(r#"[{"w":"cat"}]"#));

        assert!(source.entries().is_empty());
    }

    #[test]
    fn test_entry_serialization_round_trip() {
        let entry = WordEntry::new("cat", Some("lion".to_owned()));
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"w\":\"cat\""));
        assert!(json.contains("\"rel\":\"lion\""));

        let back: WordEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }
}
