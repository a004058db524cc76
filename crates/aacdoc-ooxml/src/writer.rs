//! DOCX Writer
//!
//! This module writes an `aacdoc_ast::Document` to a self-contained DOCX
//! package. Output is reflowable: headings and body text use paragraph
//! styles, tables are native `w:tbl` objects with explicit widths on every
//! cell, and page breaks are `w:br w:type="page"` markers.
//!
//! # Example
//!
//! ```
//! use aacdoc_ast::{Block, Document};
//! use aacdoc_ooxml::DocxWriter;
//!
//! let mut doc = Document::with_title("教案");
//! doc.push(Block::Title("教案".to_string()));
//! doc.push(Block::key_value("教案名稱", vec!["洗手".to_string()]));
//!
//! let bytes = DocxWriter::new().generate(&doc).unwrap();
//! assert!(bytes.starts_with(b"PK"));
//! ```

use aacdoc_ast::{
    Alignment, Block, ColumnSpec, Document, GridTable, Heading, KeyValueRow, NumberedList,
    KEY_VALUE_COLUMNS,
};

use crate::archive::{OoxmlArchive, DOCUMENT_PART, STYLES_PART};
use crate::error::{OoxmlError, Result};
use crate::package::{self, R_NS, W_NS};

/// US letter width in twips
pub const PAGE_WIDTH: u32 = 12240;
/// US letter height in twips
pub const PAGE_HEIGHT: u32 = 15840;
/// One-inch margins
pub const PAGE_MARGIN: u32 = 1440;
/// Width available to tables
pub const CONTENT_WIDTH: u32 = PAGE_WIDTH - 2 * PAGE_MARGIN;
/// Padding inside table cells (6pt)
pub const CELL_MARGIN: u32 = 120;
/// Fill of the label column and header rows
pub const SHADING_FILL: &str = "D3D3D3";

/// Package-level settings for the generated document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocxOptions {
    /// Font applied to the defaults and every style, including East Asian text
    pub font_family: String,
    /// Language tag for the document (`w:lang`, `dc:language`)
    pub language: String,
    /// Application name written to the document properties
    pub creator: String,
}

impl Default for DocxOptions {
    fn default() -> Self {
        Self {
            font_family: "Noto Sans TC".to_string(),
            language: "zh-TW".to_string(),
            creator: "aacdoc".to_string(),
        }
    }
}

impl DocxOptions {
    /// Default options with another font family
    pub fn with_font(font_family: impl Into<String>) -> Self {
        Self {
            font_family: font_family.into(),
            ..Self::default()
        }
    }
}

/// DOCX Writer for generating DOCX files from blocks
pub struct DocxWriter {
    /// XML output buffer
    output: String,
    /// Package settings
    options: DocxOptions,
    /// Whether the last thing written was a table
    after_table: bool,
}

impl Default for DocxWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl DocxWriter {
    /// Create a writer with default options
    pub fn new() -> Self {
        Self::with_options(DocxOptions::default())
    }

    /// Create a writer with custom options
    pub fn with_options(options: DocxOptions) -> Self {
        Self {
            output: String::new(),
            options,
            after_table: false,
        }
    }

    pub fn options(&self) -> &DocxOptions {
        &self.options
    }

    /// Generate a complete DOCX package
    pub fn generate(&mut self, doc: &Document) -> Result<Vec<u8>> {
        self.package(doc)?.to_bytes()
    }

    /// Assemble the package parts without zipping them
    pub fn package(&mut self, doc: &Document) -> Result<OoxmlArchive> {
        let document_xml = self.generate_document_xml(doc)?;

        let mut archive = OoxmlArchive::new();
        archive.set_string("[Content_Types].xml", package::content_types_xml());
        archive.set_string("_rels/.rels", package::package_relationships().to_xml());
        archive.set_string(
            "word/_rels/document.xml.rels",
            package::document_relationships().to_xml(),
        );
        archive.set_string(DOCUMENT_PART, document_xml);
        archive.set_string(STYLES_PART, package::styles_xml(&self.options));
        archive.set_string("word/settings.xml", package::settings_xml());
        archive.set_string(
            "docProps/core.xml",
            package::core_properties_xml(&doc.metadata, &self.options),
        );
        archive.set_string(
            "docProps/app.xml",
            package::app_properties_xml(&self.options),
        );
        Ok(archive)
    }

    /// Generate the complete document.xml content
    pub fn generate_document_xml(&mut self, doc: &Document) -> Result<String> {
        self.output.clear();
        self.after_table = false;

        self.output
            .push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        self.output.push('\n');
        self.output.push_str(&format!(
            "<w:document xmlns:w=\"{}\" xmlns:r=\"{}\">\n",
            W_NS, R_NS
        ));
        self.output.push_str("<w:body>\n");

        let mut rows: Vec<&KeyValueRow> = Vec::new();
        for block in &doc.blocks {
            if let Block::KeyValueRow(row) = block {
                rows.push(row);
                continue;
            }
            if !rows.is_empty() {
                self.generate_key_value_table(&rows);
                rows.clear();
            }
            self.generate_block(block)?;
        }
        if !rows.is_empty() {
            self.generate_key_value_table(&rows);
        }

        // A body must not end on a table
        if self.after_table {
            self.output.push_str("<w:p/>\n");
        }
        self.generate_section_properties();

        self.output.push_str("</w:body>\n");
        self.output.push_str("</w:document>");

        Ok(std::mem::take(&mut self.output))
    }

    fn generate_block(&mut self, block: &Block) -> Result<()> {
        match block {
            Block::Title(text) => self.generate_styled_paragraph("Title", text),
            Block::Heading(heading) => self.generate_heading(heading),
            Block::KeyValueRow(row) => self.generate_key_value_table(&[row]),
            Block::GridTable(table) => self.generate_grid_table(table)?,
            Block::NumberedList(list) => self.generate_list(list),
            Block::PageBreak => self.generate_page_break(),
            Block::Paragraph(para) => self.generate_styled_paragraph("BodyText", &para.text),
        }
        Ok(())
    }

    /// Generate XML for a paragraph with a named style
    fn generate_styled_paragraph(&mut self, style: &str, text: &str) {
        self.output.push_str("<w:p>\n");
        self.output.push_str("<w:pPr>\n");
        self.output
            .push_str(&format!("<w:pStyle w:val=\"{}\"/>\n", escape_xml(style)));
        self.output.push_str("</w:pPr>\n");
        self.generate_run(text);
        self.output.push_str("</w:p>\n");
        self.after_table = false;
    }

    /// Generate XML for a heading
    fn generate_heading(&mut self, heading: &Heading) {
        let style = format!("Heading{}", heading.level.clamp(1, 3));
        self.generate_styled_paragraph(&style, &heading.text);
    }

    /// Each item becomes one list paragraph carrying its number as text
    fn generate_list(&mut self, list: &NumberedList) {
        for line in list.labeled() {
            self.generate_styled_paragraph("ListParagraph", &line);
        }
    }

    fn generate_page_break(&mut self) {
        self.output.push_str("<w:p>\n");
        self.output.push_str("<w:r>\n");
        self.output.push_str("<w:br w:type=\"page\"/>\n");
        self.output.push_str("</w:r>\n");
        self.output.push_str("</w:p>\n");
        self.after_table = false;
    }

    /// Generate a text run; `\n` becomes `w:br`
    fn generate_run(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.output.push_str("<w:r>");
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                self.output.push_str("<w:br/>");
            }
            if !line.is_empty() {
                self.output.push_str(&format!(
                    "<w:t xml:space=\"preserve\">{}</w:t>",
                    escape_xml(line)
                ));
            }
        }
        self.output.push_str("</w:r>\n");
    }

    /// Consecutive key/value rows collapse into one two-column table
    fn generate_key_value_table(&mut self, rows: &[&KeyValueRow]) {
        let widths = column_widths(&KEY_VALUE_COLUMNS);
        self.open_table(&widths);
        for row in rows {
            self.output.push_str("<w:tr>\n");
            self.generate_cell(widths[0], Some(SHADING_FILL), None, true, &[row.label.as_str()]);
            let lines: Vec<&str> = row.lines.iter().map(String::as_str).collect();
            self.generate_cell(widths[1], None, None, true, &lines);
            self.output.push_str("</w:tr>\n");
        }
        self.close_table();
    }

    /// Generate XML for a table with a shaded, repeating header row
    fn generate_grid_table(&mut self, table: &GridTable) -> Result<()> {
        check_dimensions(table)?;
        let relative: Vec<u32> = table.columns.iter().map(|c| c.width).collect();
        let widths = column_widths(&relative);
        self.open_table(&widths);

        self.output.push_str("<w:tr>\n");
        self.output.push_str("<w:trPr><w:tblHeader/></w:trPr>\n");
        for ((cell, width), column) in table.header.iter().zip(&widths).zip(&table.columns) {
            self.generate_cell(
                *width,
                Some(SHADING_FILL),
                Some(column),
                table.wrap,
                &[cell.as_str()],
            );
        }
        self.output.push_str("</w:tr>\n");

        for row in &table.rows {
            self.output.push_str("<w:tr>\n");
            for ((cell, width), column) in row.iter().zip(&widths).zip(&table.columns) {
                self.generate_cell(*width, None, Some(column), table.wrap, &[cell.as_str()]);
            }
            self.output.push_str("</w:tr>\n");
        }

        self.close_table();
        Ok(())
    }

    fn open_table(&mut self, widths: &[u32]) {
        // Adjacent tables would merge into one
        if self.after_table {
            self.output.push_str("<w:p/>\n");
        }
        let total: u32 = widths.iter().sum();
        self.output.push_str("<w:tbl>\n");
        self.output.push_str("<w:tblPr>\n");
        self.output.push_str("<w:tblStyle w:val=\"TableGrid\"/>\n");
        self.output
            .push_str(&format!("<w:tblW w:w=\"{}\" w:type=\"dxa\"/>\n", total));
        self.output.push_str(&format!(
            "<w:tblBorders>{}</w:tblBorders>\n",
            package::table_borders()
        ));
        self.output.push_str("<w:tblLayout w:type=\"fixed\"/>\n");
        self.output.push_str(&format!(
            "<w:tblCellMar><w:top w:w=\"{0}\" w:type=\"dxa\"/><w:left w:w=\"{0}\" w:type=\"dxa\"/><w:bottom w:w=\"{0}\" w:type=\"dxa\"/><w:right w:w=\"{0}\" w:type=\"dxa\"/></w:tblCellMar>\n",
            CELL_MARGIN
        ));
        self.output.push_str("</w:tblPr>\n");

        self.output.push_str("<w:tblGrid>\n");
        for width in widths {
            self.output
                .push_str(&format!("<w:gridCol w:w=\"{}\"/>\n", width));
        }
        self.output.push_str("</w:tblGrid>\n");
    }

    fn close_table(&mut self) {
        self.output.push_str("</w:tbl>\n");
        self.after_table = true;
    }

    /// One cell; every line becomes its own paragraph
    fn generate_cell(
        &mut self,
        width: u32,
        fill: Option<&str>,
        column: Option<&ColumnSpec>,
        wrap: bool,
        lines: &[&str],
    ) {
        self.output.push_str("<w:tc>\n");
        self.output.push_str("<w:tcPr>");
        self.output
            .push_str(&format!("<w:tcW w:w=\"{}\" w:type=\"dxa\"/>", width));
        if let Some(fill) = fill {
            self.output.push_str(&format!(
                "<w:shd w:val=\"clear\" w:color=\"auto\" w:fill=\"{}\"/>",
                fill
            ));
        }
        if !wrap {
            self.output.push_str("<w:noWrap/>");
        }
        self.output.push_str("</w:tcPr>\n");

        let justification = column.map(|c| match c.align {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        });

        // A cell needs at least one paragraph
        let lines: &[&str] = if lines.is_empty() { &[""] } else { lines };
        for line in lines {
            self.output.push_str("<w:p>\n");
            self.output.push_str("<w:pPr><w:pStyle w:val=\"TableText\"/>");
            if let Some(jc) = justification {
                self.output.push_str(&format!("<w:jc w:val=\"{}\"/>", jc));
            }
            self.output.push_str("</w:pPr>\n");
            self.generate_run(line);
            self.output.push_str("</w:p>\n");
        }
        self.output.push_str("</w:tc>\n");
    }

    fn generate_section_properties(&mut self) {
        self.output.push_str("<w:sectPr>\n");
        self.output.push_str(&format!(
            "<w:pgSz w:w=\"{}\" w:h=\"{}\"/>\n",
            PAGE_WIDTH, PAGE_HEIGHT
        ));
        self.output.push_str(&format!(
            "<w:pgMar w:top=\"{0}\" w:right=\"{0}\" w:bottom=\"{0}\" w:left=\"{0}\" w:header=\"720\" w:footer=\"720\" w:gutter=\"0\"/>\n",
            PAGE_MARGIN
        ));
        self.output.push_str("</w:sectPr>\n");
    }
}

/// Split [`CONTENT_WIDTH`] proportionally; the last column takes the rounding rest
pub fn column_widths(relative: &[u32]) -> Vec<u32> {
    let total: u32 = relative.iter().sum();
    if relative.is_empty() || total == 0 {
        return vec![CONTENT_WIDTH / relative.len().max(1) as u32; relative.len()];
    }
    let mut widths: Vec<u32> = relative
        .iter()
        .map(|w| CONTENT_WIDTH * w / total)
        .collect();
    let assigned: u32 = widths.iter().sum();
    if let Some(last) = widths.last_mut() {
        *last += CONTENT_WIDTH - assigned;
    }
    widths
}

fn check_dimensions(table: &GridTable) -> Result<()> {
    let cols = table.column_count();
    if cols == 0 {
        return Err(OoxmlError::InvalidStructure(
            "table has no columns".to_string(),
        ));
    }
    if table.columns.len() != cols {
        return Err(OoxmlError::InvalidStructure(format!(
            "table has {} header cells but {} column specs",
            cols,
            table.columns.len()
        )));
    }
    if let Some((i, row)) = table.rows.iter().enumerate().find(|(_, r)| r.len() != cols) {
        return Err(OoxmlError::InvalidStructure(format!(
            "table row {} has {} cells, expected {}",
            i + 1,
            row.len(),
            cols
        )));
    }
    Ok(())
}

/// Escape special XML characters and drop characters XML 1.0 forbids
pub(crate) fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if is_xml_char(c) => out.push(c),
            _ => {}
        }
    }
    out
}

/// `Char` production of XML 1.0; surrogates cannot occur in a `char`
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: Vec<Vec<String>>) -> GridTable {
        GridTable {
            header: vec!["評估項目".into(), "滿意(V)".into()],
            rows,
            columns: vec![
                ColumnSpec::new(8, Alignment::Center),
                ColumnSpec::new(3, Alignment::Center),
            ],
            wrap: true,
        }
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("<a & 'b'>"), "&lt;a &amp; &apos;b&apos;&gt;");
    }

    #[test]
    fn test_escape_xml_drops_forbidden_characters() {
        assert_eq!(escape_xml("a\u{0}b\u{0B}c\u{1F}d\u{FFFE}"), "abcd");
        assert_eq!(escape_xml("\t\u{FFFD}\u{1F600}"), "\t\u{FFFD}\u{1F600}");
    }

    #[test]
    fn test_control_characters_in_text_keep_document_readable() {
        let mut doc = Document::new();
        doc.push(Block::Title("教\u{0B}案".into()));
        doc.push(Block::key_value("教學\u{0}目標", vec!["洗\u{1}手".into()]));
        let bytes = DocxWriter::new().generate(&doc).unwrap();
        let body = crate::read_docx(&bytes).unwrap();
        assert_eq!(
            body[0],
            crate::BodyElement::Paragraph {
                style: Some("Title".into()),
                text: "教案".into()
            }
        );
        assert_eq!(
            crate::tables(&body)[0],
            &vec![vec!["教學目標".to_string(), "洗手".to_string()]]
        );
    }

    #[test]
    fn test_column_widths_fill_content_width() {
        assert_eq!(column_widths(&[1, 5]), vec![1560, 7800]);
        let widths = column_widths(&[8, 3, 3, 4]);
        assert_eq!(widths.iter().sum::<u32>(), CONTENT_WIDTH);
        assert_eq!(widths[0], CONTENT_WIDTH * 8 / 18);
        let equal = column_widths(&[1; 6]);
        assert_eq!(equal, vec![1560; 6]);
    }

    #[test]
    fn test_key_value_rows_form_one_table() {
        let mut doc = Document::new();
        doc.push(Block::key_value("教案名稱", vec!["洗手".into()]));
        doc.push(Block::key_value("教學內容", vec!["1. 甲".into(), "2. 乙".into()]));
        let xml = DocxWriter::new().generate_document_xml(&doc).unwrap();
        assert_eq!(xml.matches("<w:tbl>").count(), 1);
        assert_eq!(xml.matches("<w:tr>").count(), 2);
        assert_eq!(xml.matches("<w:tcW w:w=\"1560\"").count(), 2);
        assert_eq!(xml.matches("<w:tcW w:w=\"7800\"").count(), 2);
        assert_eq!(xml.matches("w:fill=\"D3D3D3\"").count(), 2);
        // Body lines are separate paragraphs
        assert!(xml.contains(">1. 甲</w:t>"));
        assert!(xml.contains(">2. 乙</w:t>"));
    }

    #[test]
    fn test_grid_table_has_header_row_and_cell_widths() {
        let mut doc = Document::new();
        doc.push(Block::GridTable(grid(vec![
            vec!["我會洗手".into(), String::new()],
            vec!["我會擦手".into(), String::new()],
        ])));
        let xml = DocxWriter::new().generate_document_xml(&doc).unwrap();
        assert_eq!(xml.matches("<w:tblHeader/>").count(), 1);
        assert_eq!(xml.matches("<w:tc>").count(), 6);
        assert_eq!(xml.matches("<w:tcW ").count(), 6);
        assert_eq!(xml.matches("<w:jc w:val=\"center\"/>").count(), 6);
    }

    #[test]
    fn test_header_only_grid_table() {
        let mut doc = Document::new();
        doc.push(Block::GridTable(grid(vec![])));
        let xml = DocxWriter::new().generate_document_xml(&doc).unwrap();
        assert_eq!(xml.matches("<w:tr>").count(), 1);
        // Trailing paragraph after the final table
        assert!(xml.contains("</w:tbl>\n<w:p/>\n<w:sectPr>"));
    }

    #[test]
    fn test_ragged_grid_table_is_rejected() {
        let mut doc = Document::new();
        doc.push(Block::GridTable(grid(vec![vec!["only one".into()]])));
        let err = DocxWriter::new().generate_document_xml(&doc).unwrap_err();
        assert!(matches!(err, OoxmlError::InvalidStructure(_)));
    }

    #[test]
    fn test_page_break_and_styles() {
        let mut doc = Document::new();
        doc.push(Block::Title("教案".into()));
        doc.push(Block::heading(2, "一、練習題"));
        doc.push(Block::PageBreak);
        doc.push(Block::paragraph("第一行\n第二行"));
        let xml = DocxWriter::new().generate_document_xml(&doc).unwrap();
        assert!(xml.contains("<w:pStyle w:val=\"Title\"/>"));
        assert!(xml.contains("<w:pStyle w:val=\"Heading2\"/>"));
        assert!(xml.contains("<w:pStyle w:val=\"BodyText\"/>"));
        assert_eq!(xml.matches("<w:br w:type=\"page\"/>").count(), 1);
        assert!(xml.contains("第一行</w:t><w:br/><w:t xml:space=\"preserve\">第二行"));
    }

    #[test]
    fn test_numbered_list_paragraphs() {
        let mut doc = Document::new();
        doc.push(Block::NumberedList(NumberedList::new(["甲", "乙", "丙"])));
        let xml = DocxWriter::new().generate_document_xml(&doc).unwrap();
        assert_eq!(xml.matches("<w:pStyle w:val=\"ListParagraph\"/>").count(), 3);
        assert!(xml.contains(">3. 丙</w:t>"));
    }

    #[test]
    fn test_letter_page_setup() {
        let xml = DocxWriter::new()
            .generate_document_xml(&Document::new())
            .unwrap();
        assert!(xml.contains("<w:pgSz w:w=\"12240\" w:h=\"15840\"/>"));
        assert!(xml.contains("w:top=\"1440\""));
    }

    #[test]
    fn test_package_parts() {
        let archive = DocxWriter::new().package(&Document::new()).unwrap();
        for part in [
            "[Content_Types].xml",
            "_rels/.rels",
            "word/_rels/document.xml.rels",
            "word/document.xml",
            "word/styles.xml",
            "word/settings.xml",
            "docProps/core.xml",
            "docProps/app.xml",
        ] {
            assert!(archive.contains(part), "missing {}", part);
        }
    }

    #[test]
    fn test_generate_is_deterministic() {
        let mut doc = Document::with_title("教案");
        doc.push(Block::Title("教案".into()));
        doc.push(Block::key_value("教案名稱", vec!["洗手".into()]));
        let a = DocxWriter::new().generate(&doc).unwrap();
        let b = DocxWriter::new().generate(&doc).unwrap();
        assert_eq!(a, b);
    }
}
