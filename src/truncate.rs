use crate::search::FitOutcome;
use crate::tokenizer::{SplitMode, join_prefix};

/// Builds the display string for a fit outcome.
///
/// `Fits` and `SearchExhausted` hand back `text` untouched and
/// `FitsNormalized` hands back every token rejoined, without a marker.
/// `Truncate(k)` keeps the first `k` tokens and appends `marker`, so the
/// result always ends with the marker when truncation happened.
pub fn truncate(
    text: &str,
    tokens: &[&str],
    outcome: FitOutcome,
    mode: SplitMode,
    marker: &str,
) -> String {
    match outcome {
        FitOutcome::Fits => text.to_string(),
        FitOutcome::FitsNormalized => join_prefix(tokens, tokens.len(), mode),
        FitOutcome::SearchExhausted => {
            tracing::warn!("fit search exhausted, keeping original text");
            text.to_string()
        }
        FitOutcome::Truncate(k) => {
            let mut out = join_prefix(tokens, k, mode);
            out.push_str(marker);
            out
        }
    }
}
