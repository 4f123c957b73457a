// src/render/renderer.rs
use log::{debug, warn};
use serde_json::Value;

use super::capability::Capabilities;
use super::heuristic::MarkdownHeuristic;
use super::response::AnalysisResponse;
use super::sanitize::{sanitize, SanitizeError, Sanitized};

pub const FALLBACK_MESSAGE: &str = "Something went wrong. Please try again.";

/// Final content for the output region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub content: String,
    pub is_html: bool,
}

impl Rendered {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_html: false,
        }
    }

    pub fn html(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_html: true,
        }
    }
}

pub struct ResponseRenderer {
    heuristic: MarkdownHeuristic,
    capabilities: Capabilities,
}

impl ResponseRenderer {
    pub fn new(heuristic: MarkdownHeuristic, capabilities: Capabilities) -> Self {
        Self {
            heuristic,
            capabilities,
        }
    }

    /// Decide what to show for a response. Never fails: every problem ends as text.
    pub fn render(&self, response: &AnalysisResponse) -> Rendered {
        match response {
            AnalysisResponse::Success { result } => self.render_result(result),
            AnalysisResponse::Failure { error } => Rendered::text(format!("Error: {}", error)),
            AnalysisResponse::Unknown => Rendered::text(FALLBACK_MESSAGE),
        }
    }

    fn render_result(&self, raw: &Value) -> Rendered {
        debug!("Raw model output: {}", raw);

        let sanitized = sanitize(raw);
        if let Sanitized::Original { reason, .. } = &sanitized {
            warn!("Sanitizer failed, showing raw output: {}", reason);
        }
        let clean = sanitized.text();

        // JSON that was not text is never treated as Markdown.
        let markdown_candidate = !matches!(
            sanitized,
            Sanitized::Original {
                reason: SanitizeError::NotText(_),
                ..
            }
        );
        if !markdown_candidate || !self.heuristic.looks_like_markdown(clean) {
            return Rendered::text(clean);
        }

        let Some((markdown, sanitizer)) = self.capabilities.html_pipeline() else {
            debug!("Output looks like Markdown but no renderer is available");
            return Rendered::text(clean);
        };

        let html = markdown
            .to_html(clean)
            .and_then(|html| sanitizer.sanitize(&html));
        match html {
            Ok(safe) => Rendered::html(safe),
            Err(e) => {
                warn!("Markdown rendering failed, falling back to text: {}", e);
                Rendered::text(clean)
            }
        }
    }
}
