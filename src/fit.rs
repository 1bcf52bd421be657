use crate::oracle::OverflowOracle;
use crate::search::{FitOutcome, find_fit};
use crate::tokenizer::{SplitMode, tokenize};
use crate::truncate::truncate;

pub const DEFAULT_MARKER: &str = "…";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FitOptions {
    /// Appended to the kept prefix when text is cut
    pub marker: String,
    /// Cut between words (true) or between characters (false)
    pub split_on_words: bool,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            split_on_words: true,
        }
    }
}

impl FitOptions {
    pub fn mode(&self) -> SplitMode {
        SplitMode::from_split_on_words(self.split_on_words)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fitted {
    pub text: String,
    /// `None` when the input had no tokens and no search ran.
    pub outcome: Option<FitOutcome>,
}

/// Fits `text` into the container behind `oracle` and reports how.
pub fn fit<O>(text: &str, options: &FitOptions, oracle: &mut O) -> Fitted
where
    O: OverflowOracle + ?Sized,
{
    let mode = options.mode();
    let tokens = tokenize(text, mode);
    if tokens.is_empty() {
        return Fitted {
            text: text.to_string(),
            outcome: None,
        };
    }

    let outcome = find_fit(text, &tokens, mode, &options.marker, oracle);
    tracing::debug!(tokens = tokens.len(), ?outcome, "fit complete");
    Fitted {
        text: truncate(text, &tokens, outcome, mode, &options.marker),
        outcome: Some(outcome),
    }
}

/// Returns the longest token prefix of `text` that fits, with the marker
/// appended, or `text` unchanged when it already fits or is blank.
///
/// `oracle` must be monotonic over prefix length.
pub fn fit_and_truncate<O>(text: &str, options: &FitOptions, oracle: &mut O) -> String
where
    O: OverflowOracle + ?Sized,
{
    fit(text, options, oracle).text
}
