// src/render/capability.rs
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("markdown parsing failed: {0}")]
    Parse(String),

    #[error("html sanitizing failed: {0}")]
    Sanitize(String),
}

/// Turns Markdown into HTML.
pub trait MarkdownParser: Send + Sync {
    fn to_html(&self, markdown: &str) -> Result<String, RenderError>;
}

/// Strips anything script-capable from HTML before it is displayed.
pub trait HtmlSanitizer: Send + Sync {
    fn sanitize(&self, html: &str) -> Result<String, RenderError>;
}

/// The optional collaborators of the renderer. HTML output needs both.
#[derive(Default)]
pub struct Capabilities {
    pub markdown: Option<Box<dyn MarkdownParser>>,
    pub sanitizer: Option<Box<dyn HtmlSanitizer>>,
}

impl Capabilities {
    /// No Markdown support; every render is plain text.
    pub fn none() -> Self {
        Self::default()
    }

    /// Whatever this build was compiled with.
    #[cfg(feature = "markdown")]
    pub fn builtin() -> Self {
        Self {
            markdown: Some(Box::new(CommonMark)),
            sanitizer: Some(Box::new(Ammonia)),
        }
    }

    #[cfg(not(feature = "markdown"))]
    pub fn builtin() -> Self {
        Self::none()
    }

    pub(crate) fn html_pipeline(&self) -> Option<(&dyn MarkdownParser, &dyn HtmlSanitizer)> {
        match (&self.markdown, &self.sanitizer) {
            (Some(markdown), Some(sanitizer)) => Some((markdown.as_ref(), sanitizer.as_ref())),
            _ => None,
        }
    }
}

#[cfg(feature = "markdown")]
pub struct CommonMark;

#[cfg(feature = "markdown")]
impl MarkdownParser for CommonMark {
    fn to_html(&self, markdown: &str) -> Result<String, RenderError> {
        use pulldown_cmark::{html, Options, Parser};

        let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, Parser::new_ext(markdown, options));
        Ok(out)
    }
}

#[cfg(feature = "markdown")]
pub struct Ammonia;

#[cfg(feature = "markdown")]
impl HtmlSanitizer for Ammonia {
    fn sanitize(&self, html: &str) -> Result<String, RenderError> {
        Ok(ammonia::clean(html))
    }
}

#[cfg(all(test, feature = "markdown"))]
mod tests {
    use super::*;

    #[test]
    fn test_commonmark_heading() {
        let html = CommonMark.to_html("# Title\n\nBody").unwrap();
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<p>Body</p>"));
    }

    #[test]
    fn test_ammonia_removes_scripts() {
        let html = CommonMark
            .to_html("Hello <script>alert('x')</script> <a href=\"javascript:alert(1)\">link</a>")
            .unwrap();
        let safe = Ammonia.sanitize(&html).unwrap();
        assert!(!safe.contains("<script"));
        assert!(!safe.contains("javascript:"));
        assert!(safe.contains("link"));
    }

    #[test]
    fn test_builtin_has_both() {
        assert!(Capabilities::builtin().html_pipeline().is_some());
        assert!(Capabilities::none().html_pipeline().is_none());
    }
}
