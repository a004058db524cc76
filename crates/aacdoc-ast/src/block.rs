//! Block-level elements for document structure
//!
//! This module defines the blocks a laid-out document is made of: titles,
//! headings, key/value table rows, grid tables, numbered lists, paragraphs
//! and page breaks. Every backend walks the same sequence, so anything
//! expressed here shows up identically in PDF, DOCX and the preview.

use serde::{Deserialize, Serialize};

/// Relative widths of the label and body columns of a key/value table
pub const KEY_VALUE_COLUMNS: [u32; 2] = [1, 5];

/// Block-level content element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Block {
    /// Document title, rendered large and centered
    Title(String),
    /// A section heading
    Heading(Heading),
    /// One row of a two-column key/value table. Consecutive rows form one table.
    KeyValueRow(KeyValueRow),
    /// A table with a fixed header row
    GridTable(GridTable),
    /// A 1-based numbered list
    NumberedList(NumberedList),
    /// An unconditional page break
    PageBreak,
    /// A paragraph of body text
    Paragraph(Paragraph),
}

/// A section heading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    /// Heading level (1-3, where 1 is the highest)
    pub level: u8,
    /// Heading text
    pub text: String,
}

/// A row of the key/value table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyValueRow {
    /// Label shown in the shaded left column
    pub label: String,
    /// Body lines shown in the right column, one per line
    pub lines: Vec<String>,
}

/// A table with a header row and any number of body rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridTable {
    /// Header cells
    pub header: Vec<String>,
    /// Body rows; every row has as many cells as the header
    pub rows: Vec<Vec<String>>,
    /// Column specifications
    pub columns: Vec<ColumnSpec>,
    /// Whether long cell text wraps inside the cell
    pub wrap: bool,
}

/// Column specification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Relative width (e.g., 1, 3, 8 for proportional sizing)
    pub width: u32,
    /// Cell alignment for this column
    pub align: Alignment,
}

/// Text alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

/// A numbered list. Items are stored unnumbered; labels come from [`numbered`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NumberedList {
    /// Item texts in display order
    pub items: Vec<String>,
}

/// A paragraph block
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Paragraph {
    /// Paragraph text; `\n` marks a line break
    pub text: String,
}

/// Prefix each item with its 1-based position: `"{n}. {item}"`.
///
/// This is the only place list numbering is produced.
pub fn numbered<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item.as_ref()))
        .collect()
}

impl Block {
    /// Create a heading block
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Block::Heading(Heading {
            level,
            text: text.into(),
        })
    }

    /// Create a paragraph block
    pub fn paragraph(text: impl Into<String>) -> Self {
        Block::Paragraph(Paragraph { text: text.into() })
    }

    /// Create a key/value row
    pub fn key_value(label: impl Into<String>, lines: Vec<String>) -> Self {
        Block::KeyValueRow(KeyValueRow {
            label: label.into(),
            lines,
        })
    }
}

impl NumberedList {
    /// Create a list from item texts
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            items: items.into_iter().map(Into::into).collect(),
        }
    }

    /// Items with their `"{n}. "` labels applied
    pub fn labeled(&self) -> Vec<String> {
        numbered(&self.items)
    }
}

impl GridTable {
    /// Number of columns, taken from the header
    pub fn column_count(&self) -> usize {
        self.header.len()
    }

    /// Sum of relative column widths
    pub fn total_width(&self) -> u32 {
        self.columns.iter().map(|c| c.width).sum()
    }
}

impl ColumnSpec {
    /// Create a column of the given relative width
    pub fn new(width: u32, align: Alignment) -> Self {
        Self { width, align }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_is_one_based() {
        let labels = numbered(["a", "b", "c"]);
        assert_eq!(labels, vec!["1. a", "2. b", "3. c"]);
    }

    #[test]
    fn test_numbered_empty() {
        let labels = numbered(Vec::<String>::new());
        assert!(labels.is_empty());
    }

    #[test]
    fn test_numbered_list_labeled() {
        let list = NumberedList::new(["洗手", "擦乾"]);
        assert_eq!(list.labeled(), vec!["1. 洗手", "2. 擦乾"]);
        // Stored items stay unnumbered
        assert_eq!(list.items[0], "洗手");
    }

    #[test]
    fn test_grid_table_widths() {
        let table = GridTable {
            header: vec!["a".into(), "b".into()],
            rows: vec![],
            columns: vec![
                ColumnSpec::new(8, Alignment::Center),
                ColumnSpec::new(3, Alignment::Center),
            ],
            wrap: true,
        };
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.total_width(), 11);
    }

    #[test]
    fn test_block_serde_tag() {
        let block = Block::heading(2, "練習題");
        let json = serde_json::to_string(&block).unwrap();
        assert!(json.contains("Heading"));
        let back: Block = serde_json::from_str(&json).unwrap();
        assert_eq!(back, block);
    }
}
