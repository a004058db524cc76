//! Read a generated document body back
//!
//! A flat reading of `word/document.xml`: paragraphs with their style,
//! tables as rows of cell text, and page breaks. Cell paragraphs are joined
//! with `\n`. This is what verification and tests compare against the
//! paginated output.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::archive::OoxmlArchive;
use crate::error::{OoxmlError, Result};

/// One top-level element of the document body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyElement {
    /// A paragraph outside any table
    Paragraph {
        style: Option<String>,
        text: String,
    },
    /// A table, as rows of cell text
    Table(Vec<Vec<String>>),
    /// A paragraph holding only a page break
    PageBreak,
}

impl BodyElement {
    pub fn is_page_break(&self) -> bool {
        matches!(self, BodyElement::PageBreak)
    }
}

#[derive(Default)]
struct ParagraphState {
    style: Option<String>,
    text: String,
    page_break: bool,
}

/// Read the body of DOCX bytes
pub fn read_docx(bytes: &[u8]) -> Result<Vec<BodyElement>> {
    let archive = OoxmlArchive::from_bytes(bytes)?;
    read_body(archive.document_xml()?)
}

/// Read the body of a `word/document.xml` part
pub fn read_body(xml: &[u8]) -> Result<Vec<BodyElement>> {
    let mut reader = Reader::from_reader(xml);
    // Keep whitespace inside runs
    reader.config_mut().trim_text(false);

    let mut elements = Vec::new();
    let mut buf = Vec::new();

    let mut para: Option<ParagraphState> = None;
    let mut in_text = false;
    let mut table: Option<Vec<Vec<String>>> = None;
    let mut row: Vec<String> = Vec::new();
    let mut cell: Option<Vec<String>> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"tbl" => table = Some(Vec::new()),
                b"tr" => row.clear(),
                b"tc" => cell = Some(Vec::new()),
                b"p" => para = Some(ParagraphState::default()),
                b"t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"p" => {
                    if let Some(lines) = cell.as_mut() {
                        lines.push(String::new());
                    } else if table.is_none() {
                        elements.push(BodyElement::Paragraph {
                            style: None,
                            text: String::new(),
                        });
                    }
                }
                b"pStyle" => {
                    if let Some(p) = para.as_mut() {
                        p.style = get_attr(e, b"w:val");
                    }
                }
                b"br" => {
                    if let Some(p) = para.as_mut() {
                        if get_attr(e, b"w:type").as_deref() == Some("page") {
                            p.page_break = true;
                        } else {
                            p.text.push('\n');
                        }
                    }
                }
                _ => {}
            },
            Ok(Event::Text(ref e)) => {
                if in_text {
                    if let Some(p) = para.as_mut() {
                        let text = e.unescape().unwrap_or_default();
                        p.text.push_str(&text);
                    }
                }
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => {
                    if let Some(p) = para.take() {
                        if let Some(lines) = cell.as_mut() {
                            lines.push(p.text);
                        } else if p.page_break && p.text.is_empty() {
                            elements.push(BodyElement::PageBreak);
                        } else {
                            elements.push(BodyElement::Paragraph {
                                style: p.style,
                                text: p.text,
                            });
                        }
                    }
                }
                b"tc" => {
                    if let Some(lines) = cell.take() {
                        row.push(lines.join("\n"));
                    }
                }
                b"tr" => {
                    if let Some(rows) = table.as_mut() {
                        rows.push(std::mem::take(&mut row));
                    }
                }
                b"tbl" => {
                    if let Some(rows) = table.take() {
                        elements.push(BodyElement::Table(rows));
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(OoxmlError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(elements)
}

/// All tables of a body, in order
pub fn tables(elements: &[BodyElement]) -> Vec<&Vec<Vec<String>>> {
    elements
        .iter()
        .filter_map(|e| match e {
            BodyElement::Table(rows) => Some(rows),
            _ => None,
        })
        .collect()
}

fn get_attr(e: &BytesStart, name: &[u8]) -> Option<String> {
    e.attributes()
        .filter_map(|a| a.ok())
        .find(|a| a.key.as_ref() == name)
        .and_then(|a| String::from_utf8(a.value.to_vec()).ok())
}
