// src/render/heuristic.rs
use regex::RegexSet;

/// Patterns that suggest the text was written as Markdown. Any single match is enough.
///
/// The block patterns are `(?m)` anchored: they match at the start of every
/// line, so `"Intro\n- item"` counts as a list. Without the flag `^` would
/// only look at the first line of the text.
pub const DEFAULT_PATTERNS: &[&str] = &[
    r"(?m)^#{1,6}\s", // heading
    r"(?m)^```",      // code fence
    r"(?m)^>\s",      // blockquote
    r"(?m)^[-*+]\s",  // list item
    r"\*\*",          // bold
    r"\*(?-u:\w)",    // emphasis, ASCII word characters only
    r"`",             // inline code
];

/// Guess whether text is Markdown. It is a guess: prose such as `5*x` also matches.
#[derive(Debug, Clone)]
pub struct MarkdownHeuristic {
    patterns: RegexSet,
}

impl MarkdownHeuristic {
    pub fn new<I, S>(patterns: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self {
            patterns: RegexSet::new(patterns)?,
        })
    }

    pub fn standard() -> Result<Self, regex::Error> {
        Self::new(DEFAULT_PATTERNS)
    }

    pub fn looks_like_markdown(&self, text: &str) -> bool {
        self.patterns.is_match(text)
    }
}
