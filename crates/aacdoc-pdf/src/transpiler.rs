//! Block sequence to Typst markup transpiler
//!
//! All document text is emitted as Typst string literals (`#"..."`), so
//! nothing a user writes is ever read as markup. Every table row is written
//! on a single line; [`crate::inspect`] relies on that.

use aacdoc_ast::{
    Alignment, Block, Document, GridTable, Heading, KeyValueRow, NumberedList, Paragraph,
    KEY_VALUE_COLUMNS,
};

use crate::error::{PdfError, Result};

/// Body text size in points
const BODY_SIZE_PT: u32 = 12;
/// Table text size in points
const TABLE_SIZE_PT: u32 = 10;
/// Title size in points
const TITLE_SIZE_PT: u32 = 24;
/// Label column and header row shading
const SHADING: &str = "luma(211)";
/// Left indent of paragraphs and list items
const INDENT: &str = "20pt";

/// Transpiler options
#[derive(Debug, Clone)]
pub struct TranspileOptions {
    /// Font family applied to every text element
    pub font_family: String,
}

impl Default for TranspileOptions {
    fn default() -> Self {
        Self {
            font_family: "Noto Sans TC".to_string(),
        }
    }
}

/// Transpiler for converting a block sequence to Typst markup
#[derive(Debug, Clone, Default)]
pub struct Transpiler {
    options: TranspileOptions,
}

impl Transpiler {
    /// Create a transpiler using the given font family
    pub fn new(font_family: impl Into<String>) -> Self {
        Self {
            options: TranspileOptions {
                font_family: font_family.into(),
            },
        }
    }

    /// Create a transpiler with explicit options
    pub fn with_options(options: TranspileOptions) -> Self {
        Self { options }
    }

    /// Transpile a document to Typst markup
    pub fn transpile(&self, doc: &Document) -> Result<String> {
        let mut output = self.preamble(doc);

        let mut rows: Vec<&KeyValueRow> = Vec::new();
        for block in &doc.blocks {
            if let Block::KeyValueRow(row) = block {
                rows.push(row);
                continue;
            }
            if !rows.is_empty() {
                output.push_str(&Self::transpile_key_value_table(&rows));
                output.push('\n');
                rows.clear();
            }
            output.push_str(&self.transpile_block(block)?);
            output.push('\n');
        }
        if !rows.is_empty() {
            output.push_str(&Self::transpile_key_value_table(&rows));
        }

        Ok(output)
    }

    /// Page setup and text rules
    fn preamble(&self, doc: &Document) -> String {
        let font = string_literal(&self.options.font_family);
        let mut output = String::new();

        if let Some(ref title) = doc.metadata.title {
            output.push_str(&format!("#set document(title: {})\n", string_literal(title)));
        }
        output.push_str("#set page(paper: \"us-letter\", margin: 1in)\n");
        output.push_str(&format!(
            "#set text(font: {}, size: {}pt, lang: \"zh\", region: \"tw\", fallback: false)\n",
            font, BODY_SIZE_PT
        ));
        // Headings and tables must not pick up a different family
        output.push_str(&format!("#show heading: set text(font: {})\n", font));
        output.push_str(&format!("#show table: set text(font: {})\n", font));
        output.push('\n');
        output
    }

    /// Transpile a single block
    fn transpile_block(&self, block: &Block) -> Result<String> {
        let markup = match block {
            Block::Title(text) => format!(
                "#align(center)[#text(size: {}pt, weight: \"bold\")[{}]]\n",
                TITLE_SIZE_PT,
                content(text)
            ),
            Block::Heading(heading) => Self::transpile_heading(heading),
            Block::KeyValueRow(row) => Self::transpile_key_value_table(&[row]),
            Block::GridTable(table) => Self::transpile_grid_table(table)?,
            Block::NumberedList(list) => Self::transpile_list(list),
            Block::PageBreak => "#pagebreak()\n".to_string(),
            Block::Paragraph(para) => Self::transpile_paragraph(para),
        };
        Ok(markup)
    }

    fn transpile_heading(heading: &Heading) -> String {
        let level = heading.level.clamp(1, 6) as usize;
        format!("{} {}\n", "=".repeat(level), content(&heading.text))
    }

    fn transpile_paragraph(para: &Paragraph) -> String {
        format!(
            "#pad(left: {})[#par(justify: true)[{}]]\n",
            INDENT,
            content(&para.text)
        )
    }

    fn transpile_list(list: &NumberedList) -> String {
        list.labeled()
            .iter()
            .map(|item| format!("#pad(left: {})[{}]\n", INDENT, content(item)))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// One two-column table for a run of key/value rows
    fn transpile_key_value_table(rows: &[&KeyValueRow]) -> String {
        let columns = fractions(&KEY_VALUE_COLUMNS);
        let mut output = String::new();
        output.push_str("#table(\n");
        output.push_str(&format!("  columns: {},\n", columns));
        output.push_str("  stroke: 1pt + black,\n");
        output.push_str("  inset: 6pt,\n");
        output.push_str(&format!(
            "  fill: (x, y) => if x == 0 {{ {} }},\n",
            SHADING
        ));
        for row in rows {
            output.push_str(&format!(
                "  {}, {},\n",
                cell(&row.label),
                cell_lines(&row.lines)
            ));
        }
        output.push_str(")\n");
        output
    }

    fn transpile_grid_table(table: &GridTable) -> Result<String> {
        check_dimensions(table)?;

        let widths: Vec<u32> = table.columns.iter().map(|c| c.width).collect();
        let aligns: Vec<&str> = table.columns.iter().map(|c| alignment(c.align)).collect();

        let mut output = String::new();
        output.push_str("#table(\n");
        output.push_str(&format!("  columns: {},\n", fractions(&widths)));
        output.push_str("  stroke: 1pt + black,\n");
        output.push_str("  inset: 6pt,\n");
        output.push_str(&format!("  align: ({},),\n", aligns.join(", ")));
        output.push_str(&format!(
            "  fill: (x, y) => if y == 0 {{ {} }},\n",
            SHADING
        ));
        let header: Vec<String> = table.header.iter().map(|h| cell(h)).collect();
        output.push_str(&format!("  table.header({}),\n", header.join(", ")));
        for row in &table.rows {
            let cells: Vec<String> = row.iter().map(|c| cell(c)).collect();
            output.push_str(&format!("  {},\n", cells.join(", ")));
        }
        output.push_str(")\n");
        Ok(output)
    }
}

fn check_dimensions(table: &GridTable) -> Result<()> {
    let cols = table.column_count();
    if cols == 0 {
        return Err(PdfError::InvalidStructure(
            "table has no columns".to_string(),
        ));
    }
    if table.columns.len() != cols {
        return Err(PdfError::InvalidStructure(format!(
            "table has {} header cells but {} column specs",
            cols,
            table.columns.len()
        )));
    }
    if let Some((i, row)) = table.rows.iter().enumerate().find(|(_, r)| r.len() != cols) {
        return Err(PdfError::InvalidStructure(format!(
            "table row {} has {} cells, expected {}",
            i + 1,
            row.len(),
            cols
        )));
    }
    Ok(())
}

/// A table cell holding one piece of text
fn cell(text: &str) -> String {
    format!("[#text(size: {}pt)[{}]]", TABLE_SIZE_PT, content(text))
}

/// A table cell holding several lines
fn cell_lines(lines: &[String]) -> String {
    let body: Vec<String> = lines.iter().map(|l| content(l)).collect();
    format!(
        "[#text(size: {}pt)[{}]]",
        TABLE_SIZE_PT,
        body.join("#linebreak()")
    )
}

/// Text as markup: one literal per line, joined by line breaks
fn content(text: &str) -> String {
    text.split('\n')
        .map(|line| format!("#{}", string_literal(line)))
        .collect::<Vec<_>>()
        .join("#linebreak()")
}

fn fractions(widths: &[u32]) -> String {
    let parts: Vec<String> = widths.iter().map(|w| format!("{}fr", w)).collect();
    format!("({},)", parts.join(", "))
}

fn alignment(align: Alignment) -> &'static str {
    match align {
        Alignment::Left => "left",
        Alignment::Center => "center",
        Alignment::Right => "right",
    }
}

/// Quote text as a Typst string literal
pub(crate) fn string_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use aacdoc_ast::ColumnSpec;

    fn transpile(doc: &Document) -> String {
        Transpiler::default().transpile(doc).unwrap()
    }

    #[test]
    fn test_string_literal_escapes() {
        assert_eq!(string_literal("a\"b"), "\"a\\\"b\"");
        assert_eq!(string_literal("c:\\x"), "\"c:\\\\x\"");
        // Markup characters stay literal inside strings
        assert_eq!(string_literal("#set *x* $y$"), "\"#set *x* $y$\"");
    }

    #[test]
    fn test_preamble_sets_font_everywhere() {
        let markup = Transpiler::new("Source Han Sans TC")
            .transpile(&Document::with_title("教案"))
            .unwrap();
        assert!(markup.contains("#set document(title: \"教案\")"));
        assert!(markup.contains("#set page(paper: \"us-letter\", margin: 1in)"));
        assert!(markup.contains("#set text(font: \"Source Han Sans TC\", size: 12pt"));
        assert!(markup.contains("fallback: false"));
        assert!(markup.contains("#show heading: set text(font: \"Source Han Sans TC\")"));
        assert!(!markup.contains("Noto Sans TC"));
    }

    #[test]
    fn test_title_and_headings() {
        let mut doc = Document::new();
        doc.push(Block::Title("教案".into()));
        doc.push(Block::heading(1, "學習單"));
        doc.push(Block::heading(2, "一、練習題"));
        let markup = transpile(&doc);
        assert!(markup.contains("#align(center)[#text(size: 24pt, weight: \"bold\")[#\"教案\"]]"));
        assert!(markup.contains("\n= #\"學習單\"\n"));
        assert!(markup.contains("\n== #\"一、練習題\"\n"));
    }

    #[test]
    fn test_key_value_run_is_one_table() {
        let mut doc = Document::new();
        doc.push(Block::key_value("教案名稱", vec!["洗手".into()]));
        doc.push(Block::key_value("教學內容", vec!["1. 甲".into(), "2. 乙".into()]));
        doc.push(Block::PageBreak);
        let markup = transpile(&doc);
        assert_eq!(markup.matches("#table(").count(), 1);
        assert!(markup.contains("columns: (1fr, 5fr,)"));
        assert!(markup.contains("fill: (x, y) => if x == 0 { luma(211) }"));
        assert!(markup.contains("#\"1. 甲\"#linebreak()#\"2. 乙\""));
        assert!(markup.trim_end().ends_with("#pagebreak()"));
    }

    #[test]
    fn test_grid_table_header_and_widths() {
        let mut doc = Document::new();
        doc.push(Block::GridTable(GridTable {
            header: vec!["評估項目".into(), "滿意(V)".into()],
            rows: vec![vec!["我會洗手".into(), String::new()]],
            columns: vec![
                ColumnSpec::new(8, Alignment::Left),
                ColumnSpec::new(3, Alignment::Center),
            ],
            wrap: true,
        }));
        let markup = transpile(&doc);
        assert!(markup.contains("columns: (8fr, 3fr,)"));
        assert!(markup.contains("align: (left, center,)"));
        assert!(markup.contains("table.header([#text(size: 10pt)[#\"評估項目\"]]"));
        assert!(markup.contains("[#text(size: 10pt)[#\"我會洗手\"]], [#text(size: 10pt)[#\"\"]],"));
    }

    #[test]
    fn test_ragged_grid_table_is_rejected() {
        let mut doc = Document::new();
        doc.push(Block::GridTable(GridTable {
            header: vec!["a".into(), "b".into()],
            rows: vec![vec!["only".into()]],
            columns: vec![
                ColumnSpec::new(1, Alignment::Left),
                ColumnSpec::new(1, Alignment::Left),
            ],
            wrap: true,
        }));
        let err = Transpiler::default().transpile(&doc).unwrap_err();
        assert!(matches!(err, PdfError::InvalidStructure(_)));
    }

    #[test]
    fn test_user_text_cannot_inject_markup() {
        let mut doc = Document::new();
        doc.push(Block::paragraph("#pagebreak() \"quoted\""));
        let markup = transpile(&doc);
        assert!(markup.contains("#\"#pagebreak() \\\"quoted\\\"\""));
        assert_eq!(markup.matches("\n#pagebreak()").count(), 0);
    }

    #[test]
    fn test_list_and_paragraph_lines() {
        let mut doc = Document::new();
        doc.push(Block::NumberedList(NumberedList::new(["第一步？", "第二步？"])));
        doc.push(Block::paragraph("優良：9-16 分\n良好：8-9 分"));
        let markup = transpile(&doc);
        assert!(markup.contains("#pad(left: 20pt)[#\"1. 第一步？\"]"));
        assert!(markup.contains("#pad(left: 20pt)[#\"2. 第二步？\"]"));
        assert!(markup.contains("#\"優良：9-16 分\"#linebreak()#\"良好：8-9 分\""));
    }
}
