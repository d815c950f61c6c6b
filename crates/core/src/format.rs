//! Plain text output.
//!
//! One paragraph per line, in document order.

/// Formatter for plain text output.
#[derive(Debug, Clone, Default)]
pub struct PlainTextFormatter;

impl PlainTextFormatter {
    /// Create a new formatter.
    pub fn new() -> Self {
        Self
    }

    /// Join paragraphs with a single newline, without a trailing one.
    ///
    /// # Example output
    /// ```text
    /// Hello, world.
    ///
    /// Second paragraph after an empty one
    /// ```
    pub fn format(&self, paragraphs: &[String]) -> String {
        paragraphs.join("\n")
    }

    /// Format and terminate the last line with a newline.
    ///
    /// A document without paragraphs still produces a single empty line.
    pub fn format_with_newline(&self, paragraphs: &[String]) -> String {
        let mut formatted = self.format(paragraphs);
        formatted.push('\n');
        formatted
    }
}
