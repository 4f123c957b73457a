// src/output.rs
use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

/// Where results are displayed. Every `render` replaces whatever was shown before.
pub trait OutputSink {
    fn render(&mut self, content: &str, is_html: bool) -> Result<()>;

    /// Placeholder shown while a request is in flight; the next `render` replaces it.
    fn pending(&mut self, message: &str) -> Result<()> {
        self.render(message, false)
    }

    /// Something the user must acknowledge before trying again.
    fn alert(&mut self, message: &str) -> Result<()>;
}

/// Prints to the terminal. Results go to stdout, or to a page on disk for HTML
/// when `html_out` is set. A terminal cannot take a line back, so pending
/// messages and alerts go to stderr and stdout only ever carries results.
pub struct TerminalSink<O = io::Stdout, E = io::Stderr> {
    out: O,
    status: E,
    html_out: Option<PathBuf>,
}

impl TerminalSink {
    pub fn new(html_out: Option<PathBuf>) -> Self {
        Self::with_streams(io::stdout(), io::stderr(), html_out)
    }
}

impl<O: Write, E: Write> TerminalSink<O, E> {
    pub fn with_streams(out: O, status: E, html_out: Option<PathBuf>) -> Self {
        Self {
            out,
            status,
            html_out,
        }
    }
}

impl<O: Write, E: Write> OutputSink for TerminalSink<O, E> {
    fn render(&mut self, content: &str, is_html: bool) -> Result<()> {
        match (&self.html_out, is_html) {
            (Some(path), true) => {
                fs::write(path, html_page(content))
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                writeln!(self.out, "Result written to: {}", path.display())?;
            }
            _ => writeln!(self.out, "{}", content)?,
        }
        Ok(())
    }

    fn pending(&mut self, message: &str) -> Result<()> {
        writeln!(self.status, "{}", message)?;
        Ok(())
    }

    fn alert(&mut self, message: &str) -> Result<()> {
        writeln!(self.status, "⚠ {}", message)?;
        Ok(())
    }
}

fn html_page(body: &str) -> String {
    let generated = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>Crop analysis</title>\n</head>\n<body>\n<main>\n{}\n</main>\n<footer><small>Generated {}</small></footer>\n</body>\n</html>\n",
        body, generated
    )
}

/// Keeps every write in memory; the last one is what is "on screen".
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemorySink {
    pub renders: Vec<(String, bool)>,
    pub alerts: Vec<String>,
}

#[cfg(test)]
impl MemorySink {
    pub fn current(&self) -> Option<(&str, bool)> {
        self.renders
            .last()
            .map(|(content, is_html)| (content.as_str(), *is_html))
    }
}

#[cfg(test)]
impl OutputSink for MemorySink {
    fn render(&mut self, content: &str, is_html: bool) -> Result<()> {
        self.renders.push((content.to_string(), is_html));
        Ok(())
    }

    fn alert(&mut self, message: &str) -> Result<()> {
        self.alerts.push(message.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_page_wraps_body() {
        let page = html_page("<h1>Title</h1>");
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<main>\n<h1>Title</h1>\n</main>"));
    }

    #[test]
    fn test_terminal_stdout_carries_only_the_result() {
        let mut sink = TerminalSink::with_streams(Vec::new(), Vec::new(), None);
        sink.pending("Analyzing your crop... Please wait 🌿").unwrap();
        sink.render("Healthy maize", false).unwrap();
        sink.alert("Please provide both image and query.").unwrap();

        assert_eq!(String::from_utf8(sink.out).unwrap(), "Healthy maize\n");
        assert_eq!(
            String::from_utf8(sink.status).unwrap(),
            "Analyzing your crop... Please wait 🌿\n⚠ Please provide both image and query.\n"
        );
    }

    #[test]
    fn test_memory_sink_last_write_wins() {
        let mut sink = MemorySink::default();
        sink.pending("pending").unwrap();
        sink.render("<p>done</p>", true).unwrap();
        assert_eq!(sink.current(), Some(("<p>done</p>", true)));
    }
}
