use owo_colors::{OwoColorize, Stream::Stderr, Stream::Stdout};

pub fn heading(text: &str) -> String {
    text.if_supports_color(Stdout, |t| t.bold()).to_string()
}

pub fn success(text: &str) -> String {
    text.if_supports_color(Stdout, |t| t.green()).to_string()
}

pub fn info(text: &str) -> String {
    text.if_supports_color(Stdout, |t| t.dimmed()).to_string()
}

pub fn error(text: &str) -> String {
    text.if_supports_color(Stdout, |t| t.red()).to_string()
}

/// Dimmed, for diagnostics written to stderr.
pub fn note(text: &str) -> String {
    text.if_supports_color(Stderr, |t| t.dimmed()).to_string()
}

/// Yellow, for diagnostics written to stderr.
pub fn caution(text: &str) -> String {
    text.if_supports_color(Stderr, |t| t.yellow()).to_string()
}
