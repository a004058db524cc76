//! Writer coverage tests
//!
//! Generate complete packages and read them back through the public API.

use std::io::Cursor;

use aacdoc_ast::{Alignment, Block, ColumnSpec, Document, GridTable, NumberedList};
use aacdoc_ooxml::{read_docx, BodyElement, DocxOptions, DocxWriter, OoxmlArchive};

fn sample() -> Document {
    let mut doc = Document::with_title("教案");
    doc.push(Block::Title("教案".into()));
    doc.push(Block::key_value("教案名稱", vec!["洗手".into()]));
    doc.push(Block::key_value("教學目標", vec!["目標一".into(), "目標二".into()]));
    doc.push(Block::PageBreak);
    doc.push(Block::heading(1, "學習單"));
    doc.push(Block::heading(2, "一、練習題"));
    doc.push(Block::NumberedList(NumberedList::new(["第一步？", "第二步？"])));
    doc.push(Block::heading(2, "五、自我評估表"));
    doc.push(Block::GridTable(GridTable {
        header: vec![
            "評估項目".into(),
            "滿意(V)".into(),
            "需改進(X)".into(),
            "反思與改進方法".into(),
        ],
        rows: vec![vec![
            "我會洗手".into(),
            String::new(),
            String::new(),
            String::new(),
        ]],
        columns: [8, 3, 3, 4]
            .iter()
            .map(|&w| ColumnSpec::new(w, Alignment::Center))
            .collect(),
        wrap: true,
    }));
    doc.push(Block::PageBreak);
    doc
}

#[test]
fn test_body_order_survives_round_trip() {
    let bytes = DocxWriter::new().generate(&sample()).unwrap();
    let body = read_docx(&bytes).unwrap();

    let kinds: Vec<&str> = body
        .iter()
        .map(|e| match e {
            BodyElement::Paragraph { .. } => "p",
            BodyElement::Table(_) => "table",
            BodyElement::PageBreak => "break",
        })
        .collect();
    assert_eq!(
        kinds,
        vec!["p", "table", "break", "p", "p", "p", "p", "p", "table", "break"]
    );
}

#[test]
fn test_exactly_one_break_after_lesson_plan_table() {
    let bytes = DocxWriter::new().generate(&sample()).unwrap();
    let body = read_docx(&bytes).unwrap();

    let first_table = body
        .iter()
        .position(|e| matches!(e, BodyElement::Table(_)))
        .unwrap();
    let worksheet = body
        .iter()
        .position(|e| {
            matches!(e, BodyElement::Paragraph { text, .. } if text == "學習單")
        })
        .unwrap();
    let breaks = body[first_table..worksheet]
        .iter()
        .filter(|e| e.is_page_break())
        .count();
    assert_eq!(breaks, 1);
}

#[test]
fn test_list_paragraphs_are_numbered() {
    let bytes = DocxWriter::new().generate(&sample()).unwrap();
    let body = read_docx(&bytes).unwrap();
    let items: Vec<&str> = body
        .iter()
        .filter_map(|e| match e {
            BodyElement::Paragraph {
                style: Some(style),
                text,
            } if style == "ListParagraph" => Some(text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(items, vec!["1. 第一步？", "2. 第二步？"]);
}

#[test]
fn test_configured_font_reaches_styles() {
    let options = DocxOptions::with_font("Source Han Sans TC");
    let bytes = DocxWriter::with_options(options).generate(&sample()).unwrap();
    let archive = OoxmlArchive::from_reader(Cursor::new(&bytes)).unwrap();
    let styles = archive.get_string("word/styles.xml").unwrap();
    assert!(styles.contains("w:eastAsia=\"Source Han Sans TC\""));
    assert!(!styles.contains("Noto Sans TC"));
}

#[test]
fn test_core_properties_carry_title() {
    let bytes = DocxWriter::new().generate(&sample()).unwrap();
    let archive = OoxmlArchive::from_bytes(&bytes).unwrap();
    let core = archive.get_string("docProps/core.xml").unwrap();
    assert!(core.contains("<dc:title>教案</dc:title>"));
}

#[test]
fn test_same_input_same_bytes() {
    let doc = sample();
    let first = DocxWriter::new().generate(&doc).unwrap();
    let second = DocxWriter::new().generate(&doc).unwrap();
    assert_eq!(first, second);
}
