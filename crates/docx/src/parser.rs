//! DOCX file parser implementation.

use doctext_core::{Error, ExtractedText, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use zip::result::ZipError;
use zip::ZipArchive;

/// Archive path of the main document part.
pub const DOCUMENT_PART: &str = "word/document.xml";

/// WordprocessingML main namespace URI.
pub const WML_NAMESPACE: &[u8] = b"http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Extract the paragraph texts of the DOCX file at `path`, in document order.
pub fn extract(path: impl AsRef<Path>) -> Result<Vec<String>> {
    DocxParser::new()
        .open(path)
        .map(ExtractedText::into_paragraphs)
}

/// Parser for DOCX (WordprocessingML) files.
pub struct DocxParser;

impl DocxParser {
    /// Create a new DOCX parser.
    pub fn new() -> Self {
        Self
    }

    /// Open and parse the DOCX file at `path`.
    ///
    /// The file handle is released when this returns, on success or failure.
    pub fn open(&self, path: impl AsRef<Path>) -> Result<ExtractedText> {
        let path = path.as_ref();
        let file = File::open(path)?;

        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown");

        self.parse(BufReader::new(file), filename)
    }

    /// Parse a DOCX file from a reader.
    pub fn parse<R: Read + Seek>(&self, reader: R, filename: &str) -> Result<ExtractedText> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;
        log::debug!("Opened {} ({} entries)", filename, archive.len());

        let content = self.read_file_from_archive(&mut archive, DOCUMENT_PART)?;

        let mut document = ExtractedText::new(filename);
        self.extract_paragraphs_from_xml(&content, &mut document)?;
        log::debug!("Found {} paragraphs in {}", document.len(), DOCUMENT_PART);

        Ok(document)
    }

    /// Collect the text of every WordprocessingML paragraph, in document order.
    ///
    /// Each `p` gets an entry when it opens, so a paragraph nested inside
    /// another (text boxes) comes after its parent, and its text counts
    /// toward every paragraph that encloses it. Only descendants of the
    /// root element are collected.
    fn extract_paragraphs_from_xml(
        &self,
        xml_content: &str,
        document: &mut ExtractedText,
    ) -> Result<()> {
        let mut reader = NsReader::from_str(xml_content);

        let mut open_elements: Vec<OpenElement> = Vec::new();
        let mut seen_root = false;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    let element =
                        begin_element(&reader, &e, &mut open_elements, &mut seen_root, document)?;
                    open_elements.push(element);
                }
                Ok(Event::Empty(e)) => {
                    // An empty <t/> contributes nothing
                    begin_element(&reader, &e, &mut open_elements, &mut seen_root, document)?;
                }
                Ok(Event::Text(e)) => {
                    if open_elements.is_empty() {
                        if !e.iter().all(u8::is_ascii_whitespace) {
                            return Err(Error::XmlError(
                                "Text outside of the root element".to_string(),
                            ));
                        }
                        continue;
                    }

                    let text = e
                        .unescape()
                        .map_err(|err| Error::XmlError(format!("Invalid text: {}", err)))?;
                    if open_elements.last() == Some(&OpenElement::Text) {
                        append_to_open_paragraphs(document, &open_elements, &text);
                    }
                }
                Ok(Event::CData(e)) => {
                    if open_elements.is_empty() {
                        return Err(Error::XmlError(
                            "CDATA outside of the root element".to_string(),
                        ));
                    }

                    if open_elements.last() == Some(&OpenElement::Text) {
                        let text = std::str::from_utf8(&e)
                            .map_err(|err| Error::XmlError(format!("Invalid CDATA: {}", err)))?;
                        append_to_open_paragraphs(document, &open_elements, text);
                    }
                }
                Ok(Event::End(_)) => {
                    if open_elements.pop().is_none() {
                        return Err(Error::XmlError(
                            "Closing tag without a matching opening tag".to_string(),
                        ));
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => {
                    return Err(Error::XmlError(format!(
                        "Error at position {}: {}",
                        reader.buffer_position(),
                        e
                    )));
                }
            }
        }

        if !open_elements.is_empty() {
            return Err(Error::XmlError(format!(
                "Unexpected end of document with {} unclosed element(s)",
                open_elements.len()
            )));
        }

        if !seen_root {
            return Err(Error::XmlError("Document has no root element".to_string()));
        }

        Ok(())
    }

    /// Read a part from the ZIP archive as text.
    fn read_file_from_archive<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        path: &str,
    ) -> Result<String> {
        let mut file = archive.by_name(path).map_err(|e| match e {
            ZipError::FileNotFound => Error::MissingPart(path.to_string()),
            other => Error::ZipError(format!("Failed to open '{}': {}", path, other)),
        })?;

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)
            .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", path, e)))?;
        log::debug!("Read {} bytes from '{}'", bytes.len(), path);

        decode_part(&bytes, path)
    }
}

impl Default for DocxParser {
    fn default() -> Self {
        Self::new()
    }
}

/// WordprocessingML elements that carry paragraph text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WmlElement {
    Paragraph,
    Text,
}

/// An element currently open in the XML tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpenElement {
    /// A paragraph, with its index in the extracted text.
    Paragraph(usize),
    Text,
    /// A `t` that already had a child element; later text is tail text.
    TextTail,
    Other,
}

/// Validate and classify a start or empty tag.
///
/// Returns the entry to push for a start tag. Paragraphs are registered
/// here, so an empty `<p/>` still yields an (empty) paragraph.
fn begin_element(
    reader: &NsReader<&[u8]>,
    element: &BytesStart,
    open_elements: &mut [OpenElement],
    seen_root: &mut bool,
    document: &mut ExtractedText,
) -> Result<OpenElement> {
    check_attributes(reader, element)?;

    let (ns, local_name) = reader.resolve_element(element.name());
    let kind = classify(&ns, local_name.as_ref())?;

    if open_elements.is_empty() {
        enter_root(seen_root)?;
        return Ok(OpenElement::Other);
    }

    if let Some(last) = open_elements.last_mut() {
        if *last == OpenElement::Text {
            *last = OpenElement::TextTail;
        }
    }

    Ok(match kind {
        Some(WmlElement::Paragraph) => OpenElement::Paragraph(document.add_paragraph("")),
        Some(WmlElement::Text) => OpenElement::Text,
        None => OpenElement::Other,
    })
}

/// Reject attributes that are unquoted, duplicated, badly escaped,
/// contain a raw `<`, or use an undeclared prefix.
fn check_attributes(reader: &NsReader<&[u8]>, element: &BytesStart) -> Result<()> {
    for attr in element.attributes() {
        let attr = attr.map_err(|e| Error::XmlError(format!("Invalid attribute: {}", e)))?;
        let name = String::from_utf8_lossy(attr.key.as_ref()).into_owned();

        if attr.value.contains(&b'<') {
            return Err(Error::XmlError(format!(
                "Value of attribute '{}' contains '<'",
                name
            )));
        }

        attr.unescape_value().map_err(|e| {
            Error::XmlError(format!("Invalid value of attribute '{}': {}", name, e))
        })?;

        if let (ResolveResult::Unknown(prefix), _) = reader.resolve_attribute(attr.key) {
            return Err(Error::XmlError(format!(
                "Undeclared namespace prefix '{}' on attribute '{}'",
                String::from_utf8_lossy(&prefix),
                name
            )));
        }
    }

    Ok(())
}

/// Match an element by resolved namespace and local name.
fn classify(ns: &ResolveResult, local_name: &[u8]) -> Result<Option<WmlElement>> {
    match ns {
        ResolveResult::Bound(Namespace(uri)) if *uri == WML_NAMESPACE => Ok(match local_name {
            b"p" => Some(WmlElement::Paragraph),
            b"t" => Some(WmlElement::Text),
            _ => None,
        }),
        ResolveResult::Unknown(prefix) => Err(Error::XmlError(format!(
            "Undeclared namespace prefix '{}'",
            String::from_utf8_lossy(prefix)
        ))),
        _ => Ok(None),
    }
}

fn enter_root(seen_root: &mut bool) -> Result<()> {
    if *seen_root {
        return Err(Error::XmlError(
            "Document has more than one root element".to_string(),
        ));
    }
    *seen_root = true;
    Ok(())
}

fn append_to_open_paragraphs(document: &mut ExtractedText, open: &[OpenElement], text: &str) {
    for element in open {
        if let OpenElement::Paragraph(index) = *element {
            document.append_to_paragraph(index, text);
        }
    }
}

/// Decode part bytes, honouring a UTF-8 or UTF-16 byte order mark.
///
/// UTF-16 without a mark is recognised from the leading `<`.
fn decode_part(bytes: &[u8], path: &str) -> Result<String> {
    match bytes {
        [0xEF, 0xBB, 0xBF, rest @ ..] => decode_utf8(rest, path),
        [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, u16::from_le_bytes, path),
        [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, u16::from_be_bytes, path),
        [b'<', 0x00, ..] => decode_utf16(bytes, u16::from_le_bytes, path),
        [0x00, b'<', ..] => decode_utf16(bytes, u16::from_be_bytes, path),
        _ => decode_utf8(bytes, path),
    }
}

fn decode_utf8(bytes: &[u8], path: &str) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|e| Error::EncodingError(format!("'{}' is not valid UTF-8: {}", path, e)))
}

fn decode_utf16(bytes: &[u8], to_unit: fn([u8; 2]) -> u16, path: &str) -> Result<String> {
    if bytes.len() % 2 != 0 {
        return Err(Error::EncodingError(format!(
            "'{}' has an odd number of UTF-16 bytes",
            path
        )));
    }

    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| to_unit([pair[0], pair[1]]))
        .collect();

    String::from_utf16(&units)
        .map_err(|e| Error::EncodingError(format!("'{}' is not valid UTF-16: {}", path, e)))
}
