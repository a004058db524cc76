//! Document root and metadata definitions
//!
//! A `Document` is one laid-out block sequence. Several documents (the
//! learning asset and the evaluation rubric) are concatenated before export.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::block::Block;

/// A complete document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document metadata (title, subject, attributes)
    pub metadata: DocumentMeta,
    /// Document content blocks
    pub blocks: Vec<Block>,
}

/// Document metadata
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DocumentMeta {
    /// Document title
    pub title: Option<String>,
    /// Document subject
    pub subject: Option<String>,
    /// Additional attributes. Ordered so output stays deterministic.
    pub attributes: BTreeMap<String, String>,
}

impl Document {
    /// Create a new empty document
    pub fn new() -> Self {
        Self {
            metadata: DocumentMeta::default(),
            blocks: Vec::new(),
        }
    }

    /// Create a document with a title
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            metadata: DocumentMeta::with_title(title),
            blocks: Vec::new(),
        }
    }

    /// Add a block to the document
    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Append all blocks of another document, keeping this document's metadata
    pub fn append(&mut self, other: Document) {
        self.blocks.extend(other.blocks);
    }

    /// Check if the document is empty (no blocks)
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Get the number of blocks
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Number of explicit page breaks
    pub fn page_break_count(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| matches!(b, Block::PageBreak))
            .count()
    }

    /// Number of non-empty block runs separated by page breaks
    pub fn section_count(&self) -> usize {
        self.blocks
            .split(|b| matches!(b, Block::PageBreak))
            .filter(|run| !run.is_empty())
            .count()
    }

    /// Whether the last block is a page break
    pub fn ends_with_page_break(&self) -> bool {
        matches!(self.blocks.last(), Some(Block::PageBreak))
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentMeta {
    /// Create metadata with just a title
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// Set an attribute
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Get an attribute
    pub fn get_attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(|s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document() {
        let doc = Document::new();
        assert!(doc.is_empty());
        assert_eq!(doc.len(), 0);
        assert_eq!(doc.section_count(), 0);
    }

    #[test]
    fn test_document_with_title() {
        let doc = Document::with_title("教案");
        assert_eq!(doc.metadata.title, Some("教案".to_string()));
    }

    #[test]
    fn test_section_count_ignores_trailing_break() {
        let mut doc = Document::new();
        doc.push(Block::Title("教案".into()));
        doc.push(Block::PageBreak);
        doc.push(Block::heading(1, "學習單"));
        doc.push(Block::PageBreak);
        assert_eq!(doc.page_break_count(), 2);
        assert_eq!(doc.section_count(), 2);
        assert!(doc.ends_with_page_break());
    }

    #[test]
    fn test_append_keeps_metadata() {
        let mut a = Document::with_title("a");
        a.push(Block::paragraph("one"));
        let mut b = Document::with_title("b");
        b.push(Block::paragraph("two"));
        a.append(b);
        assert_eq!(a.len(), 2);
        assert_eq!(a.metadata.title.as_deref(), Some("a"));
    }

    #[test]
    fn test_metadata_attributes() {
        let mut meta = DocumentMeta::default();
        meta.set_attribute("lang", "zh-TW");
        assert_eq!(meta.get_attribute("lang"), Some("zh-TW"));
    }
}
