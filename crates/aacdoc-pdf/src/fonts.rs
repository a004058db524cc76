//! Font resources for PDF output
//!
//! A [`FontResource`] can only be built from a readable OpenType/TrueType
//! font or collection that draws Traditional Chinese, so a renderer holding
//! one never has to check again. Documents are checked against the font's
//! character map before typesetting; output with missing glyphs is never
//! produced. The family name must match the family stored in the font file;
//! the compiler rejects output where Typst could not find it.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use aacdoc_ast::{Block, Document};
use ttf_parser::Face;

use crate::error::{PdfError, Result};

/// sfnt signatures: TrueType, CFF OpenType, legacy Apple TrueType, collection
const SIGNATURES: [&[u8; 4]; 4] = [b"\x00\x01\x00\x00", b"OTTO", b"true", b"ttcf"];

/// Smallest possible sfnt header (version + table count + search fields)
const MIN_HEADER_LEN: usize = 12;

/// Characters every usable font must draw: the fixed document labels
pub const SCRIPT_SAMPLE: &str = "教案名稱學習單評估表評分標準個案資料";

/// Missing characters listed in an error message
const REPORTED_MISSING: usize = 10;

/// A validated font file plus the family name it provides
#[derive(Clone)]
pub struct FontResource {
    family: String,
    bytes: Vec<u8>,
    source: Option<PathBuf>,
}

impl FontResource {
    /// Read and validate a font file
    pub fn load(path: impl AsRef<Path>, family: impl Into<String>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(PdfError::Font(format!(
                "font file not found: {}",
                path.display()
            )));
        }
        let bytes = std::fs::read(path).map_err(|e| {
            PdfError::Font(format!("failed to read font {}: {}", path.display(), e))
        })?;
        let mut font = Self::from_bytes(family, bytes)?;
        font.source = Some(path.to_path_buf());
        Ok(font)
    }

    /// Validate font bytes already in memory
    pub fn from_bytes(family: impl Into<String>, bytes: Vec<u8>) -> Result<Self> {
        let family = family.into();
        if family.trim().is_empty() {
            return Err(PdfError::Font("font family name is empty".to_string()));
        }
        validate_font_bytes(&bytes)?;
        let font = Self {
            family,
            bytes,
            source: None,
        };

        let missing = font.missing_chars(SCRIPT_SAMPLE.chars());
        if !missing.is_empty() {
            return Err(PdfError::Font(format!(
                "font \"{}\" cannot render Traditional Chinese (no glyph for {})",
                font.family,
                describe(&missing)
            )));
        }
        Ok(font)
    }

    /// Family name used in text rules
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Raw font bytes
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// File the font was loaded from, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Characters no face of the font has a glyph for, sorted and without
    /// duplicates. Whitespace and control characters are not checked.
    pub fn missing_chars<I>(&self, chars: I) -> Vec<char>
    where
        I: IntoIterator<Item = char>,
    {
        let faces = faces(&self.bytes);
        chars
            .into_iter()
            .filter(|c| is_drawn(*c) && !has_glyph(&faces, *c))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Fail with [`PdfError::Font`] unless every character of `doc` can be drawn
    pub fn check_coverage(&self, doc: &Document) -> Result<()> {
        let missing = self.missing_chars(document_chars(doc));
        if missing.is_empty() {
            return Ok(());
        }
        Err(PdfError::Font(format!(
            "font \"{}\" has no glyph for {} character(s) in the document: {}",
            self.family,
            missing.len(),
            describe(&missing)
        )))
    }
}

impl fmt::Debug for FontResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontResource")
            .field("family", &self.family)
            .field("len", &self.bytes.len())
            .field("source", &self.source)
            .finish()
    }
}

/// Check that bytes are a font whose tables can be read
pub fn validate_font_bytes(bytes: &[u8]) -> Result<()> {
    if bytes.is_empty() {
        return Err(PdfError::Font("font file is empty".to_string()));
    }
    if bytes.len() < MIN_HEADER_LEN {
        return Err(PdfError::Font(format!(
            "font file is truncated ({} bytes)",
            bytes.len()
        )));
    }
    if !SIGNATURES.iter().any(|sig| bytes.starts_with(&sig[..])) {
        return Err(PdfError::Font(
            "not an OpenType or TrueType font".to_string(),
        ));
    }
    Face::parse(bytes, 0)
        .map_err(|e| PdfError::Font(format!("font tables cannot be read: {}", e)))?;
    Ok(())
}

/// Every face of a font file; collections hold several
fn faces(bytes: &[u8]) -> Vec<Face<'_>> {
    let count = ttf_parser::fonts_in_collection(bytes).unwrap_or(1);
    (0..count)
        .filter_map(|index| Face::parse(bytes, index).ok())
        .collect()
}

fn has_glyph(faces: &[Face<'_>], c: char) -> bool {
    faces
        .iter()
        .any(|face| face.glyph_index(c).is_some_and(|id| id.0 != 0))
}

fn is_drawn(c: char) -> bool {
    !c.is_whitespace() && !c.is_control()
}

/// All characters a document puts on the page
fn document_chars(doc: &Document) -> BTreeSet<char> {
    let mut chars = BTreeSet::new();
    for block in &doc.blocks {
        match block {
            Block::Title(text) => add_chars(&mut chars, text),
            Block::Heading(heading) => add_chars(&mut chars, &heading.text),
            Block::Paragraph(para) => add_chars(&mut chars, &para.text),
            Block::KeyValueRow(row) => {
                add_chars(&mut chars, &row.label);
                for line in &row.lines {
                    add_chars(&mut chars, line);
                }
            }
            Block::GridTable(table) => {
                for cell in table.header.iter().chain(table.rows.iter().flatten()) {
                    add_chars(&mut chars, cell);
                }
            }
            Block::NumberedList(list) => {
                for item in list.labeled() {
                    add_chars(&mut chars, &item);
                }
            }
            Block::PageBreak => {}
        }
    }
    chars
}

fn add_chars(chars: &mut BTreeSet<char>, text: &str) {
    chars.extend(text.chars().filter(|c| is_drawn(*c)));
}

fn describe(missing: &[char]) -> String {
    let mut listed: Vec<String> = missing
        .iter()
        .take(REPORTED_MISSING)
        .map(|c| format!("'{}' (U+{:04X})", c, *c as u32))
        .collect();
    if missing.len() > REPORTED_MISSING {
        listed.push(format!("and {} more", missing.len() - REPORTED_MISSING));
    }
    listed.join(", ")
}
