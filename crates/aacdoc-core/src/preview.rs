//! Markdown preview
//!
//! Renders a laid-out [`Document`] as Markdown for on-screen display. The
//! preview walks the same block sequence as the exported documents, so its
//! ordering and numbering always match them.
//!
//! # Example
//!
//! ```
//! use aacdoc_ast::{Block, Document};
//! use aacdoc_core::preview;
//!
//! let mut doc = Document::new();
//! doc.push(Block::Title("評估表".to_string()));
//! doc.push(Block::heading(1, "評分標準"));
//!
//! let markdown = preview(&doc);
//! assert!(markdown.starts_with("# 評估表"));
//! assert!(markdown.contains("## 評分標準"));
//! ```

use std::fmt::Write;

use aacdoc_ast::{Block, Document, GridTable, Heading, KeyValueRow, NumberedList};

/// Header row of the key/value table in the preview
const KEY_VALUE_HEADER: [&str; 2] = ["項目", "內容"];

/// Preview generator configuration
#[derive(Debug, Clone)]
pub struct PreviewConfig {
    /// Separator written for page breaks
    pub page_break: String,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            page_break: "---".to_string(),
        }
    }
}

/// Markdown preview generator
pub struct PreviewGenerator {
    config: PreviewConfig,
    output: String,
}

impl PreviewGenerator {
    /// Create a new generator with default configuration
    pub fn new() -> Self {
        Self::with_config(PreviewConfig::default())
    }

    /// Create a generator with custom configuration
    pub fn with_config(config: PreviewConfig) -> Self {
        Self {
            config,
            output: String::new(),
        }
    }

    /// Generate Markdown from a document
    pub fn generate(&mut self, doc: &Document) -> String {
        self.output.clear();

        let mut rows: Vec<&KeyValueRow> = Vec::new();
        let mut first = true;
        for block in &doc.blocks {
            if let Block::KeyValueRow(row) = block {
                rows.push(row);
                continue;
            }
            if !rows.is_empty() {
                self.separate(&mut first);
                self.generate_key_value_table(&rows);
                rows.clear();
            }
            self.separate(&mut first);
            self.generate_block(block);
        }
        if !rows.is_empty() {
            self.separate(&mut first);
            self.generate_key_value_table(&rows);
        }

        self.output.trim_end().to_string()
    }

    /// Blank line between blocks
    fn separate(&mut self, first: &mut bool) {
        if !*first {
            writeln!(self.output).unwrap();
        }
        *first = false;
    }

    fn generate_block(&mut self, block: &Block) {
        match block {
            Block::Title(text) => {
                writeln!(self.output, "# {}", single_line(text)).unwrap();
            }
            Block::Heading(h) => self.generate_heading(h),
            Block::KeyValueRow(row) => self.generate_key_value_table(&[row]),
            Block::GridTable(t) => self.generate_grid_table(t),
            Block::NumberedList(l) => self.generate_list(l),
            Block::PageBreak => {
                writeln!(self.output, "{}", self.config.page_break).unwrap();
            }
            Block::Paragraph(p) => {
                // Two trailing spaces keep line breaks inside the paragraph
                let text = p.text.lines().collect::<Vec<_>>().join("  \n");
                writeln!(self.output, "{}", text).unwrap();
            }
        }
    }

    /// The title uses `#`, so heading level 1 becomes `##`
    fn generate_heading(&mut self, heading: &Heading) {
        let prefix = "#".repeat(heading.level as usize + 1);
        writeln!(self.output, "{} {}", prefix, single_line(&heading.text)).unwrap();
    }

    fn generate_key_value_table(&mut self, rows: &[&KeyValueRow]) {
        self.write_row(KEY_VALUE_HEADER.iter().map(|s| s.to_string()));
        self.write_separator(KEY_VALUE_HEADER.len());
        for row in rows {
            self.write_row([row.label.clone(), row.lines.join("<br>")]);
        }
    }

    fn generate_grid_table(&mut self, table: &GridTable) {
        let cols = table.column_count();
        if cols == 0 {
            return;
        }
        self.write_row(table.header.iter().cloned());
        self.write_separator(cols);
        for row in &table.rows {
            self.write_row(row.iter().cloned());
        }
    }

    fn generate_list(&mut self, list: &NumberedList) {
        for line in list.labeled() {
            // Backslash keeps Markdown from renumbering the list
            writeln!(self.output, "{}", line.replacen(". ", "\\. ", 1)).unwrap();
            writeln!(self.output).unwrap();
        }
    }

    fn write_row(&mut self, cells: impl IntoIterator<Item = String>) {
        self.output.push('|');
        for cell in cells {
            write!(self.output, " {} |", table_cell(&cell)).unwrap();
        }
        self.output.push('\n');
    }

    fn write_separator(&mut self, cols: usize) {
        self.output.push('|');
        for _ in 0..cols {
            self.output.push_str("---|");
        }
        self.output.push('\n');
    }
}

impl Default for PreviewGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate a Markdown preview with the default configuration
pub fn preview(doc: &Document) -> String {
    PreviewGenerator::new().generate(doc)
}

fn single_line(text: &str) -> String {
    text.lines().collect::<Vec<_>>().join(" ")
}

/// Cell text with pipes escaped and line breaks as `<br>`
fn table_cell(text: &str) -> String {
    text.replace('|', "\\|")
        .lines()
        .collect::<Vec<_>>()
        .join("<br>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use aacdoc_ast::{Alignment, ColumnSpec};

    #[test]
    fn test_title_and_headings() {
        let mut doc = Document::new();
        doc.push(Block::Title("教案".into()));
        doc.push(Block::heading(1, "學習單"));
        doc.push(Block::heading(2, "一、練習題"));
        let md = preview(&doc);
        assert_eq!(md, "# 教案\n\n## 學習單\n\n### 一、練習題");
    }

    #[test]
    fn test_key_value_rows_form_one_table() {
        let mut doc = Document::new();
        doc.push(Block::key_value("教案名稱", vec!["洗手".into()]));
        doc.push(Block::key_value(
            "教學方法",
            vec!["1. 示範: 老師示範".into(), "2. 練習: 學生練習".into()],
        ));
        let md = preview(&doc);
        let lines: Vec<&str> = md.lines().collect();
        assert_eq!(lines[0], "| 項目 | 內容 |");
        assert_eq!(lines[1], "|---|---|");
        assert_eq!(lines[2], "| 教案名稱 | 洗手 |");
        assert_eq!(lines[3], "| 教學方法 | 1. 示範: 老師示範<br>2. 練習: 學生練習 |");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_grid_table_escapes_pipes() {
        let mut doc = Document::new();
        doc.push(Block::GridTable(GridTable {
            header: vec!["評估項目".into(), "滿意(V)".into()],
            rows: vec![vec!["a|b".into(), String::new()]],
            columns: vec![
                ColumnSpec::new(8, Alignment::Center),
                ColumnSpec::new(3, Alignment::Center),
            ],
            wrap: true,
        }));
        let md = preview(&doc);
        assert!(md.contains("| 評估項目 | 滿意(V) |"));
        assert!(md.contains("| a\\|b |  |"));
    }

    #[test]
    fn test_header_only_grid_table() {
        let mut doc = Document::new();
        doc.push(Block::GridTable(GridTable {
            header: vec!["評估項目".into()],
            rows: vec![],
            columns: vec![ColumnSpec::new(1, Alignment::Left)],
            wrap: true,
        }));
        assert_eq!(preview(&doc), "| 評估項目 |\n|---|");
    }

    #[test]
    fn test_numbered_list_and_break() {
        let mut doc = Document::new();
        doc.push(Block::NumberedList(NumberedList::new(["甲", "乙"])));
        doc.push(Block::PageBreak);
        let md = preview(&doc);
        assert!(md.contains("1\\. 甲"));
        assert!(md.contains("2\\. 乙"));
        assert!(md.ends_with("---"));
    }

    #[test]
    fn test_paragraph_line_breaks() {
        let mut doc = Document::new();
        doc.push(Block::paragraph("姓名: 小明\n性別: 男"));
        assert_eq!(preview(&doc), "姓名: 小明  \n性別: 男");
    }
}
