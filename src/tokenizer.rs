/// How text is cut into tokens before fitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitMode {
    /// Maximal runs of non-whitespace.
    #[default]
    Words,
    /// One token per `char`, whitespace included.
    Characters,
}

impl SplitMode {
    pub fn from_split_on_words(split_on_words: bool) -> Self {
        if split_on_words {
            SplitMode::Words
        } else {
            SplitMode::Characters
        }
    }
}

/// Splits `text` into an ordered token sequence borrowed from the input.
///
/// Leading and trailing whitespace is dropped in both modes. An empty
/// result means there is nothing to fit and callers should leave the text
/// alone.
///
/// Example: `"  The quick  fox "` in word mode → `["The", "quick", "fox"]`
pub fn tokenize(text: &str, mode: SplitMode) -> Vec<&str> {
    let trimmed = text.trim();
    match mode {
        SplitMode::Words => trimmed.split_whitespace().collect(),
        SplitMode::Characters => trimmed
            .char_indices()
            .map(|(i, c)| &trimmed[i..i + c.len_utf8()])
            .collect(),
    }
}

/// Rebuilds display text from the first `k` tokens.
///
/// Words are joined with a single space; characters are concatenated and the
/// result trimmed so a cut right after a space does not leave it dangling.
/// `k` past the end is clamped.
pub fn join_prefix(tokens: &[&str], k: usize, mode: SplitMode) -> String {
    let prefix = &tokens[..k.min(tokens.len())];
    match mode {
        SplitMode::Words => prefix.join(" "),
        SplitMode::Characters => prefix.concat().trim().to_string(),
    }
}
