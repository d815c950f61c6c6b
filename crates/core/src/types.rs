//! Domain types for representing extracted document content.

/// The plain text of a document, one entry per paragraph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedText {
    /// Original filename (without path).
    pub filename: String,

    /// Paragraph texts in document order. Empty paragraphs are kept
    /// as empty strings.
    pub paragraphs: Vec<String>,
}

impl ExtractedText {
    /// Create an empty extraction result for the given filename.
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            paragraphs: Vec::new(),
        }
    }

    /// Append a paragraph and return its index.
    pub fn add_paragraph(&mut self, text: impl Into<String>) -> usize {
        self.paragraphs.push(text.into());
        self.paragraphs.len() - 1
    }

    /// Append text to an existing paragraph.
    ///
    /// # Panics
    /// Panics if `index` was not returned by [`add_paragraph`](Self::add_paragraph).
    pub fn append_to_paragraph(&mut self, index: usize, text: &str) {
        self.paragraphs[index].push_str(text);
    }

    /// Number of paragraphs.
    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    /// Whether the document had no paragraphs at all.
    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    /// Consume the result, yielding the paragraph texts.
    pub fn into_paragraphs(self) -> Vec<String> {
        self.paragraphs
    }
}
