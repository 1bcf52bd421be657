use std::collections::HashMap;

use crate::oracle::OverflowOracle;
use crate::tokenizer::{SplitMode, join_prefix};

/// Result of fitting a token sequence into a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitOutcome {
    /// The untruncated text already fits. Nothing to do.
    Fits,
    /// Keep the first `k` tokens and append the marker.
    Truncate(usize),
    /// The raw text overflows, but every token rejoined (whitespace collapsed
    /// to single spaces, or trimmed in character mode) fits without a marker.
    FitsNormalized,
    /// Neither the raw nor the rejoined text fits, yet the search closed
    /// without a fit/overflow boundary. Only reachable with a non-monotonic
    /// oracle.
    SearchExhausted,
}

impl FitOutcome {
    pub fn is_truncated(&self) -> bool {
        matches!(self, FitOutcome::Truncate(_))
    }
}

/// Memoizing wrapper that renders prefix candidates and asks the oracle.
///
/// Results are keyed by the rendered candidate, not the prefix length:
/// in character mode a trailing space is trimmed, so `k` and `k + 1` can
/// render the same string.
struct Memo<'a, O: ?Sized> {
    tokens: &'a [&'a str],
    mode: SplitMode,
    marker: &'a str,
    oracle: &'a mut O,
    seen: HashMap<String, bool>,
}

impl<'a, O: OverflowOracle + ?Sized> Memo<'a, O> {
    fn new(tokens: &'a [&'a str], mode: SplitMode, marker: &'a str, oracle: &'a mut O) -> Self {
        Self {
            tokens,
            mode,
            marker,
            oracle,
            seen: HashMap::new(),
        }
    }

    /// Does `tokens[0..k)` plus the marker overflow?
    fn overflows_at(&mut self, k: usize) -> bool {
        let mut candidate = join_prefix(self.tokens, k, self.mode);
        candidate.push_str(self.marker);
        if let Some(&hit) = self.seen.get(&candidate) {
            return hit;
        }
        let hit = self.oracle.overflows(&candidate);
        self.seen.insert(candidate, hit);
        hit
    }
}

/// Binary search for the largest prefix length `m` such that prefix `m` fits
/// with the marker appended and prefix `m + 1` does not.
///
/// Returns `None` when the window closes without a boundary, which happens
/// when every tested prefix fits. Callers that cannot tell "already fits"
/// apart from a misbehaving oracle should treat `None` as "leave the text
/// alone"; [`find_fit`] makes that distinction explicit.
///
/// `tokens` must be non-empty. The oracle is asked at most twice per step
/// and never twice with the same candidate string.
pub fn find_boundary<O>(
    tokens: &[&str],
    mode: SplitMode,
    marker: &str,
    oracle: &mut O,
) -> Option<usize>
where
    O: OverflowOracle + ?Sized,
{
    if tokens.is_empty() {
        return None;
    }

    let mut memo = Memo::new(tokens, mode, marker, oracle);
    let mut low = 0usize;
    let mut high = tokens.len() - 1;

    loop {
        if high < low {
            tracing::debug!(low, high, "search window exhausted");
            return None;
        }

        let mid = low + (high - low).div_ceil(2);
        if mid == 0 {
            return Some(0);
        }

        let mid_overflows = memo.overflows_at(mid);
        let next_overflows = mid_overflows || memo.overflows_at(mid + 1);
        tracing::debug!(low, high, mid, mid_overflows, next_overflows, "search step");

        if mid_overflows {
            high = mid - 1;
        } else if !next_overflows {
            low = mid + 1;
        } else {
            return Some(mid);
        }
    }
}

/// Fits `text` (already split into `tokens`) into the container behind
/// `oracle`.
///
/// The untruncated text is measured first; if it does not overflow the
/// outcome is [`FitOutcome::Fits`] and no search runs. Otherwise the boundary
/// search decides. When it closes without a boundary every marked prefix
/// fit, so the rejoined tokens are measured once more: the raw text may only
/// have overflowed through whitespace (a `\n`, a run of spaces) that
/// rejoining drops. If that fits the outcome is [`FitOutcome::FitsNormalized`],
/// otherwise [`FitOutcome::SearchExhausted`].
pub fn find_fit<O>(
    text: &str,
    tokens: &[&str],
    mode: SplitMode,
    marker: &str,
    oracle: &mut O,
) -> FitOutcome
where
    O: OverflowOracle + ?Sized,
{
    if tokens.is_empty() || !oracle.overflows(text) {
        return FitOutcome::Fits;
    }

    match find_boundary(tokens, mode, marker, oracle) {
        Some(k) => FitOutcome::Truncate(k),
        None => {
            let normalized = join_prefix(tokens, tokens.len(), mode);
            if normalized != text && !oracle.overflows(&normalized) {
                tracing::debug!("text fits once whitespace is normalized");
                return FitOutcome::FitsNormalized;
            }
            tracing::warn!(
                tokens = tokens.len(),
                "text overflows but every prefix fits; overflow oracle is not monotonic"
            );
            FitOutcome::SearchExhausted
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    const MARKER: &str = "…";

    fn words(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("w{i}")).collect()
    }

    fn ceil_log2(n: usize) -> usize {
        (usize::BITS - n.saturating_sub(1).leading_zeros()) as usize
    }

    /// Overflows when the candidate holds more than `limit` words.
    fn word_limit(limit: usize) -> impl FnMut(&str) -> bool {
        move |candidate: &str| {
            candidate.trim_end_matches(MARKER).split_whitespace().count() > limit
        }
    }

    #[test]
    fn test_boundary_quick_brown_fox() {
        let tokens = vec!["The", "quick", "brown", "fox", "jumps"];
        let mut oracle = |c: &str| c.chars().count() > 12;
        assert_eq!(
            find_boundary(&tokens, SplitMode::Words, MARKER, &mut oracle),
            Some(2)
        );
    }

    #[test]
    fn test_boundary_none_when_everything_fits() {
        let tokens = vec!["Hi"];
        let mut calls = 0;
        let mut oracle = |_: &str| {
            calls += 1;
            false
        };
        // A single token never reaches the oracle: the only candidate is 0.
        assert_eq!(
            find_boundary(&tokens, SplitMode::Words, MARKER, &mut oracle),
            Some(0)
        );
        assert_eq!(calls, 0);

        let tokens = vec!["a", "b", "c"];
        let mut never = |_: &str| false;
        assert_eq!(
            find_boundary(&tokens, SplitMode::Words, MARKER, &mut never),
            None
        );
    }

    #[test]
    fn test_boundary_zero_when_first_token_overflows() {
        let tokens = vec!["a", "b", "c"];
        let mut oracle = |c: &str| c != MARKER;
        assert_eq!(
            find_boundary(&tokens, SplitMode::Words, MARKER, &mut oracle),
            Some(0)
        );
    }

    #[test]
    fn test_boundary_characters() {
        let tokens = tokenize("truncateme", SplitMode::Characters);
        let mut oracle = |c: &str| c.trim_end_matches(MARKER).chars().count() > 5;
        assert_eq!(
            find_boundary(&tokens, SplitMode::Characters, MARKER, &mut oracle),
            Some(5)
        );
    }

    #[test]
    fn test_find_fit_exact_for_every_boundary() {
        for n in 1..=64 {
            let owned = words(n);
            let tokens: Vec<&str> = owned.iter().map(String::as_str).collect();
            let text = tokens.join(" ");
            for limit in 0..=n + 1 {
                let outcome =
                    find_fit(&text, &tokens, SplitMode::Words, MARKER, &mut word_limit(limit));
                if limit >= n {
                    assert_eq!(outcome, FitOutcome::Fits, "n={n} limit={limit}");
                } else {
                    assert_eq!(outcome, FitOutcome::Truncate(limit), "n={n} limit={limit}");
                }
            }
        }
    }

    #[test]
    fn test_oracle_call_bound() {
        for n in 1..=200 {
            let owned = words(n);
            let tokens: Vec<&str> = owned.iter().map(String::as_str).collect();
            let text = tokens.join(" ");
            for limit in 0..n {
                let mut calls = 0;
                let mut inner = word_limit(limit);
                let mut oracle = |c: &str| {
                    calls += 1;
                    inner(c)
                };
                find_fit(&text, &tokens, SplitMode::Words, MARKER, &mut oracle);
                assert!(
                    calls <= 2 * ceil_log2(n) + 3,
                    "n={n} limit={limit} calls={calls}"
                );
            }
        }
    }

    #[test]
    fn test_no_candidate_measured_twice() {
        let owned = words(100);
        let tokens: Vec<&str> = owned.iter().map(String::as_str).collect();
        let mut seen: Vec<String> = Vec::new();
        let mut inner = word_limit(37);
        let mut oracle = |c: &str| {
            seen.push(c.to_string());
            inner(c)
        };
        let found = find_boundary(&tokens, SplitMode::Words, MARKER, &mut oracle);
        assert_eq!(found, Some(37));

        let mut deduped = seen.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), seen.len());
    }

    #[test]
    fn test_trimmed_character_candidates_measured_once() {
        // "ab cd ef": prefixes 2 and 3 both render as "ab…".
        let tokens = tokenize("ab cd ef", SplitMode::Characters);
        let mut seen: Vec<String> = Vec::new();
        let mut oracle = |c: &str| {
            seen.push(c.to_string());
            c.trim_end_matches(MARKER).chars().count() > 2
        };
        let found = find_boundary(&tokens, SplitMode::Characters, MARKER, &mut oracle);
        assert_eq!(found, Some(3));

        let mut deduped = seen.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), seen.len(), "measured: {seen:?}");
    }

    #[test]
    fn test_find_fit_normalizes_collapsed_whitespace() {
        // Overflows while the raw text still holds a line break.
        let tokens = vec!["one", "two"];
        let mut oracle = |c: &str| c.contains('\n') || c.chars().count() > 10;
        assert_eq!(
            find_fit("one\ntwo", &tokens, SplitMode::Words, MARKER, &mut oracle),
            FitOutcome::FitsNormalized
        );
    }

    #[test]
    fn test_find_fit_skips_search_when_text_fits() {
        let tokens = vec!["Hi"];
        let mut calls = 0;
        let mut oracle = |_: &str| {
            calls += 1;
            false
        };
        assert_eq!(
            find_fit("Hi", &tokens, SplitMode::Words, MARKER, &mut oracle),
            FitOutcome::Fits
        );
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_find_fit_empty_tokens() {
        let mut oracle = |_: &str| true;
        assert_eq!(
            find_fit("   ", &[], SplitMode::Words, MARKER, &mut oracle),
            FitOutcome::Fits
        );
    }

    #[test]
    fn test_find_fit_reports_exhaustion() {
        // Unmarked text overflows but anything carrying the marker "fits".
        let tokens = vec!["a", "b", "c"];
        let mut oracle = |c: &str| !c.ends_with(MARKER);
        assert_eq!(
            find_fit("a b c", &tokens, SplitMode::Words, MARKER, &mut oracle),
            FitOutcome::SearchExhausted
        );
    }

    #[test]
    fn test_single_token_that_overflows() {
        let tokens = vec!["Supercalifragilistic"];
        let mut oracle = |c: &str| c.chars().count() > 4;
        assert_eq!(
            find_fit(tokens[0], &tokens, SplitMode::Words, MARKER, &mut oracle),
            FitOutcome::Truncate(0)
        );
    }

    #[test]
    fn test_dyn_oracle() {
        let tokens = vec!["one", "two", "three"];
        let mut limit = word_limit(1);
        let oracle: &mut dyn OverflowOracle = &mut limit;
        assert_eq!(
            find_fit("one two three", &tokens, SplitMode::Words, MARKER, oracle),
            FitOutcome::Truncate(1)
        );
    }
}
