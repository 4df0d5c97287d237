//! History-aware randomized word selection
//!
//! This module implements the no-repeat picker: a bounded history of
//! recently used main words and a uniform random choice over the entries
//! not present in it. The recency filter is best-effort; when every word
//! has been used recently the picker falls back to the full list so a
//! small word list can never block play.

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{constants::picker::RECENT_WINDOW, words::WordEntry};

/// Bounded, most-recent-first history of chosen main words
///
/// The history holds up to [`RECENT_WINDOW`] distinct words. Pushing a
/// word that is already present moves it to the front instead of
/// duplicating it. The list serializes as a plain JSON string array,
/// which is the format it is persisted in.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecentHistory {
    /// Most recent first, at most [`RECENT_WINDOW`] entries, no duplicates
    words: Vec<String>,
}

impl RecentHistory {
    /// Creates an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a history from an existing word list
    ///
    /// The list is taken as most-recent-first and truncated to the
    /// recency window, so an over-long persisted value is clamped on load.
    pub fn from_words(mut words: Vec<String>) -> Self {
        words.truncate(RECENT_WINDOW);
        Self { words }
    }

    /// Records a word as the most recently used
    ///
    /// Removes any existing occurrence first, front-inserts, then
    /// truncates to the recency window.
    pub fn push(&mut self, word: &str) {
        self.words.retain(|w| w != word);
        self.words.insert(0, word.to_owned());
        self.words.truncate(RECENT_WINDOW);
    }

    /// Returns whether the word was used recently
    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    /// Returns the recorded words, most recent first
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Returns the number of recorded words
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns whether the history is empty
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Picks a word entry at random, avoiding recently used main words
///
/// The candidate pool is every entry whose main word is not in `recent`.
/// If the pool is empty the full list is used instead, so the picker
/// stays live even when the word list is smaller than the recency
/// window. Selection is uniform over the pool.
///
/// Returns `None` only when `all` itself is empty; the caller must treat
/// that as "cannot start a round". Recording the chosen word in the
/// history is the caller's responsibility, done once per round start.
pub fn pick<'a>(
    all: &'a [WordEntry],
    recent: &RecentHistory,
    rng: &mut fastrand::Rng,
) -> Option<&'a WordEntry> {
    if all.is_empty() {
        return None;
    }

    let pool = all
        .iter()
        .filter(|entry| !recent.contains(entry.main()))
        .collect_vec();
    if pool.is_empty() {
        // every word was used recently, fall back to the full list
        return Some(&all[rng.usize(..all.len())]);
    }

    Some(pool[rng.usize(..pool.len())])
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn entries(words: &[&str]) -> Vec<WordEntry> {
        words.iter().map(|w| WordEntry::new(*w, None)).collect()
    }

    #[test]
    fn test_history_push_and_contains() {
        let mut recent = RecentHistory::new();
        assert!(recent.is_empty());

        recent.push("cat");
        recent.push("dog");

        assert!(recent.contains("cat"));
        assert!(recent.contains("dog"));
        assert!(!recent.contains("fox"));
        assert_eq!(recent.words(), &["dog", "cat"]);
    }

    #[test]
    fn test_history_push_existing_moves_to_front() {
        let mut recent = RecentHistory::from_words(vec!["x".to_owned(), "y".to_owned()]);

        recent.push("x");
        assert_eq!(recent.words(), &["x", "y"]);

        recent.push("y");
        assert_eq!(recent.words(), &["y", "x"]);
        assert_eq!(recent.len(), 2);
    }

    #[test]
    fn test_history_never_exceeds_window() {
        let mut recent = RecentHistory::new();
        for i in 0..(RECENT_WINDOW + 15) {
            recent.push(&format!("word{i}"));
        }

        assert_eq!(recent.len(), RECENT_WINDOW);
        // the oldest pushes fell off the end
        assert!(!recent.contains("word0"));
        assert!(recent.contains(&format!("word{}", RECENT_WINDOW + 14)));
    }

    #[test]
    fn test_history_from_words_clamps_oversized_input() {
        let words = (0..40).map(|i| format!("w{i}")).collect();
        let recent = RecentHistory::from_words(words);

        assert_eq!(recent.len(), RECENT_WINDOW);
        assert!(recent.contains("w0"));
        assert!(!recent.contains("w39"));
    }

    #[test]
    fn test_history_serializes_as_string_array() {
        let mut recent = RecentHistory::new();
        recent.push("cat");
        recent.push("dog");

        let json = serde_json::to_string(&recent).unwrap();
        assert_eq!(json, r#"["dog","cat"]"#);

        let back: RecentHistory = serde_json::from_str(&json).unwrap();
        assert_eq!(back, recent);
    }

    #[test]
    fn test_pick_empty_list_returns_none() {
        let mut rng = fastrand::Rng::with_seed(0);
        assert!(pick(&[], &RecentHistory::new(), &mut rng).is_none());
    }

    #[test]
    fn test_pick_avoids_recent_words() {
        let all = entries(&["a", "b", "c", "d"]);
        let mut recent = RecentHistory::new();
        recent.push("a");
        recent.push("c");

        let mut rng = fastrand::Rng::with_seed(7);
        for _ in 0..200 {
            let chosen = pick(&all, &recent, &mut rng).unwrap();
            assert!(chosen.main() == "b" || chosen.main() == "d");
        }
    }

    #[test]
    fn test_pick_never_repeats_within_window() {
        // 25 words against a full 20-entry history of unrelated words:
        // every pick must miss the snapshot taken just before it.
        let all: Vec<WordEntry> = (0..25)
            .map(|i| WordEntry::new(format!("word{i}"), None))
            .collect();
        let mut recent =
            RecentHistory::from_words((0..RECENT_WINDOW).map(|i| format!("other{i}")).collect());

        let mut rng = fastrand::Rng::with_seed(42);
        for _ in 0..1000 {
            let snapshot = recent.clone();
            let chosen = pick(&all, &recent, &mut rng).unwrap();
            assert!(!snapshot.contains(chosen.main()));
            recent.push(chosen.main());
        }
    }

    #[test]
    fn test_pick_falls_back_to_full_list() {
        let all = entries(&["only"]);
        let mut recent = RecentHistory::new();
        recent.push("only");

        let mut rng = fastrand::Rng::with_seed(3);
        let chosen = pick(&all, &recent, &mut rng).unwrap();
        assert_eq!(chosen.main(), "only");
    }

    #[test]
    fn test_pick_is_reasonably_uniform() {
        let all = entries(&["a", "b", "c"]);
        let recent = RecentHistory::new();
        let mut rng = fastrand::Rng::with_seed(11);

        let mut counts = [0usize; 3];
        for _ in 0..3000 {
            match pick(&all, &recent, &mut rng).unwrap().main() {
                "a" => counts[0] += 1,
                "b" => counts[1] += 1,
                _ => counts[2] += 1,
            }
        }
        for count in counts {
            assert!(count > 800, "selection is badly skewed: {counts:?}");
        }
    }
}
