// src/render/sanitize.rs
//! Cleanup applied to model output before it is shown.
//!
//! Vision models like to decorate answers with `***` separators and `**bold**`
//! markers that read badly once displayed. The pass, in order:
//!
//! 1. every run of three or more `*` becomes a single newline,
//! 2. every remaining `**` is dropped,
//! 3. runs of three or more newlines collapse to a blank line,
//! 4. surrounding whitespace is trimmed.
//!
//! The pass is idempotent. If it cannot run, including when the result is
//! not a string at all, the original is shown unmodified.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use super::response::display_text;

#[derive(Debug, Clone, Error)]
pub enum SanitizeError {
    #[error("sanitizer rules failed to compile: {0}")]
    Rules(#[from] regex::Error),

    #[error("result is {0}, not text")]
    NotText(&'static str),
}

struct Rules {
    separators: Regex,
    bold: Regex,
    blank_lines: Regex,
}

impl Rules {
    fn compile() -> Result<Self, SanitizeError> {
        Ok(Self {
            separators: Regex::new(r"\*{3,}")?,
            bold: Regex::new(r"\*{2}")?,
            blank_lines: Regex::new(r"\n{3,}")?,
        })
    }

    fn apply(&self, raw: &str) -> String {
        let text = self.separators.replace_all(raw, "\n");
        let text = self.bold.replace_all(&text, "");
        let text = self.blank_lines.replace_all(&text, "\n\n");
        text.trim().to_string()
    }
}

static RULES: Lazy<Result<Rules, SanitizeError>> = Lazy::new(Rules::compile);

/// Result of the sanitization pass.
#[derive(Debug, Clone)]
pub enum Sanitized {
    Clean(String),
    /// The pass failed; `text` is the input, untouched.
    Original { text: String, reason: SanitizeError },
}

impl Sanitized {
    fn from_attempt(original: String, attempt: Result<String, SanitizeError>) -> Self {
        match attempt {
            Ok(text) => Sanitized::Clean(text),
            Err(reason) => Sanitized::Original {
                text: original,
                reason,
            },
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Sanitized::Clean(text) | Sanitized::Original { text, .. } => text,
        }
    }
}

pub fn sanitize(raw: &Value) -> Sanitized {
    let attempt = match (raw, RULES.as_ref()) {
        (Value::String(text), Ok(rules)) => Ok(rules.apply(text)),
        (Value::String(_), Err(e)) => Err(e.clone()),
        (other, _) => Err(SanitizeError::NotText(kind_of(other))),
    };
    Sanitized::from_attempt(display_text(raw), attempt)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
