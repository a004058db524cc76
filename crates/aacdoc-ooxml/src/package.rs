//! Package parts
//!
//! Everything except `word/document.xml`: content types, relationships,
//! styles, settings and document properties. The package is built from
//! scratch, no template file is involved.

use aacdoc_ast::DocumentMeta;

use crate::writer::{escape_xml, DocxOptions};

/// WordprocessingML main namespace
pub const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
/// Office relationships namespace (for `r:` attributes)
pub const R_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
/// Package relationships namespace
pub const RELATIONSHIPS_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// Ordered relationship list for a `.rels` part
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    entries: Vec<(String, &'static str, String)>,
}

impl Relationships {
    pub const TYPE_OFFICE_DOCUMENT: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    pub const TYPE_CORE_PROPERTIES: &'static str =
        "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
    pub const TYPE_EXTENDED_PROPERTIES: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties";
    pub const TYPE_STYLES: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
    pub const TYPE_SETTINGS: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/settings";

    pub fn new() -> Self {
        Self::default()
    }

    /// Add a relationship and return its generated ID (`rId1`, `rId2`, ...)
    pub fn add(&mut self, target: impl Into<String>, rel_type: &'static str) -> String {
        let id = format!("rId{}", self.entries.len() + 1);
        self.entries.push((id.clone(), rel_type, target.into()));
        id
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize to a `.rels` part
    pub fn to_xml(&self) -> String {
        let mut xml = String::new();
        xml.push_str(XML_DECL);
        xml.push('\n');
        xml.push_str(&format!("<Relationships xmlns=\"{}\">\n", RELATIONSHIPS_NS));
        for (id, rel_type, target) in &self.entries {
            xml.push_str(&format!(
                "<Relationship Id=\"{}\" Type=\"{}\" Target=\"{}\"/>\n",
                id,
                rel_type,
                escape_xml(target)
            ));
        }
        xml.push_str("</Relationships>");
        xml
    }
}

/// `[Content_Types].xml`
pub fn content_types_xml() -> String {
    let overrides = [
        (
            "/word/document.xml",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml",
        ),
        (
            "/word/styles.xml",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml",
        ),
        (
            "/word/settings.xml",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.settings+xml",
        ),
        (
            "/docProps/core.xml",
            "application/vnd.openxmlformats-package.core-properties+xml",
        ),
        (
            "/docProps/app.xml",
            "application/vnd.openxmlformats-officedocument.extended-properties+xml",
        ),
    ];

    let mut xml = String::new();
    xml.push_str(XML_DECL);
    xml.push('\n');
    xml.push_str(
        "<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\n",
    );
    xml.push_str("<Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\n");
    xml.push_str("<Default Extension=\"xml\" ContentType=\"application/xml\"/>\n");
    for (part, content_type) in overrides {
        xml.push_str(&format!(
            "<Override PartName=\"{}\" ContentType=\"{}\"/>\n",
            part, content_type
        ));
    }
    xml.push_str("</Types>");
    xml
}

/// `_rels/.rels`
pub fn package_relationships() -> Relationships {
    let mut rels = Relationships::new();
    rels.add("word/document.xml", Relationships::TYPE_OFFICE_DOCUMENT);
    rels.add("docProps/core.xml", Relationships::TYPE_CORE_PROPERTIES);
    rels.add("docProps/app.xml", Relationships::TYPE_EXTENDED_PROPERTIES);
    rels
}

/// `word/_rels/document.xml.rels`
pub fn document_relationships() -> Relationships {
    let mut rels = Relationships::new();
    rels.add("styles.xml", Relationships::TYPE_STYLES);
    rels.add("settings.xml", Relationships::TYPE_SETTINGS);
    rels
}

/// Font declaration used by the defaults and by every style
fn run_fonts(font: &str) -> String {
    let font = escape_xml(font);
    format!(
        "<w:rFonts w:ascii=\"{0}\" w:hAnsi=\"{0}\" w:eastAsia=\"{0}\" w:cs=\"{0}\"/>",
        font
    )
}

/// One paragraph style
struct ParagraphStyle {
    id: &'static str,
    name: &'static str,
    ppr: &'static str,
    rpr: &'static str,
}

/// `word/styles.xml`
pub fn styles_xml(options: &DocxOptions) -> String {
    let fonts = run_fonts(&options.font_family);
    let lang = escape_xml(&options.language);

    let paragraph_styles = [
        ParagraphStyle {
            id: "Title",
            name: "Title",
            ppr: "<w:keepNext/><w:spacing w:before=\"240\" w:after=\"240\"/><w:jc w:val=\"center\"/>",
            rpr: "<w:b/><w:bCs/><w:sz w:val=\"48\"/><w:szCs w:val=\"48\"/>",
        },
        ParagraphStyle {
            id: "Heading1",
            name: "heading 1",
            ppr: "<w:keepNext/><w:spacing w:before=\"240\" w:after=\"120\"/><w:outlineLvl w:val=\"0\"/>",
            rpr: "<w:b/><w:bCs/><w:sz w:val=\"36\"/><w:szCs w:val=\"36\"/>",
        },
        ParagraphStyle {
            id: "Heading2",
            name: "heading 2",
            ppr: "<w:keepNext/><w:spacing w:before=\"200\" w:after=\"100\"/><w:outlineLvl w:val=\"1\"/>",
            rpr: "<w:b/><w:bCs/><w:sz w:val=\"28\"/><w:szCs w:val=\"28\"/>",
        },
        ParagraphStyle {
            id: "Heading3",
            name: "heading 3",
            ppr: "<w:keepNext/><w:spacing w:before=\"160\" w:after=\"80\"/><w:outlineLvl w:val=\"2\"/>",
            rpr: "<w:b/><w:bCs/><w:sz w:val=\"24\"/><w:szCs w:val=\"24\"/>",
        },
        ParagraphStyle {
            id: "BodyText",
            name: "Body Text",
            ppr: "<w:spacing w:after=\"120\"/><w:ind w:left=\"400\"/><w:jc w:val=\"both\"/>",
            rpr: "",
        },
        ParagraphStyle {
            id: "ListParagraph",
            name: "List Paragraph",
            ppr: "<w:spacing w:after=\"80\"/><w:ind w:left=\"400\"/>",
            rpr: "",
        },
        ParagraphStyle {
            id: "TableText",
            name: "Table Text",
            ppr: "<w:spacing w:before=\"0\" w:after=\"0\"/>",
            rpr: "<w:sz w:val=\"20\"/><w:szCs w:val=\"20\"/>",
        },
    ];

    let mut xml = String::new();
    xml.push_str(XML_DECL);
    xml.push('\n');
    xml.push_str(&format!("<w:styles xmlns:w=\"{}\">\n", W_NS));

    xml.push_str("<w:docDefaults>\n");
    xml.push_str(&format!(
        "<w:rPrDefault><w:rPr>{}<w:sz w:val=\"24\"/><w:szCs w:val=\"24\"/><w:lang w:val=\"{}\" w:eastAsia=\"{}\"/></w:rPr></w:rPrDefault>\n",
        fonts, lang, lang
    ));
    xml.push_str("<w:pPrDefault><w:pPr><w:spacing w:after=\"120\" w:line=\"280\" w:lineRule=\"auto\"/></w:pPr></w:pPrDefault>\n");
    xml.push_str("</w:docDefaults>\n");

    xml.push_str(&format!(
        "<w:style w:type=\"paragraph\" w:default=\"1\" w:styleId=\"Normal\"><w:name w:val=\"Normal\"/><w:qFormat/><w:rPr>{}</w:rPr></w:style>\n",
        fonts
    ));
    for style in &paragraph_styles {
        xml.push_str(&format!(
            "<w:style w:type=\"paragraph\" w:styleId=\"{}\"><w:name w:val=\"{}\"/><w:basedOn w:val=\"Normal\"/><w:next w:val=\"Normal\"/><w:qFormat/><w:pPr>{}</w:pPr><w:rPr>{}{}</w:rPr></w:style>\n",
            style.id, style.name, style.ppr, fonts, style.rpr
        ));
    }
    xml.push_str(&format!(
        "<w:style w:type=\"table\" w:styleId=\"TableGrid\"><w:name w:val=\"Table Grid\"/><w:tblPr><w:tblBorders>{}</w:tblBorders></w:tblPr><w:rPr>{}</w:rPr></w:style>\n",
        table_borders(),
        fonts
    ));
    xml.push_str("</w:styles>");
    xml
}

/// Single black 1pt borders on every edge
pub(crate) fn table_borders() -> String {
    ["top", "left", "bottom", "right", "insideH", "insideV"]
        .iter()
        .map(|edge| {
            format!(
                "<w:{} w:val=\"single\" w:sz=\"8\" w:space=\"0\" w:color=\"000000\"/>",
                edge
            )
        })
        .collect()
}

/// `word/settings.xml`
pub fn settings_xml() -> String {
    let mut xml = String::new();
    xml.push_str(XML_DECL);
    xml.push('\n');
    xml.push_str(&format!("<w:settings xmlns:w=\"{}\">\n", W_NS));
    xml.push_str("<w:defaultTabStop w:val=\"720\"/>\n");
    xml.push_str("<w:characterSpacingControl w:val=\"compressPunctuation\"/>\n");
    xml.push_str("<w:compat><w:compatSetting w:name=\"compatibilityMode\" w:uri=\"http://schemas.microsoft.com/office/word\" w:val=\"15\"/></w:compat>\n");
    xml.push_str("</w:settings>");
    xml
}

/// `docProps/core.xml`.
///
/// Carries no timestamps so identical content gives identical bytes.
pub fn core_properties_xml(meta: &DocumentMeta, options: &DocxOptions) -> String {
    let mut xml = String::new();
    xml.push_str(XML_DECL);
    xml.push('\n');
    xml.push_str("<cp:coreProperties xmlns:cp=\"http://schemas.openxmlformats.org/package/2006/metadata/core-properties\" xmlns:dc=\"http://purl.org/dc/elements/1.1/\" xmlns:dcterms=\"http://purl.org/dc/terms/\" xmlns:dcmitype=\"http://purl.org/dc/dcmitype/\" xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\">\n");
    if let Some(title) = &meta.title {
        xml.push_str(&format!("<dc:title>{}</dc:title>\n", escape_xml(title)));
    }
    if let Some(subject) = &meta.subject {
        xml.push_str(&format!("<dc:subject>{}</dc:subject>\n", escape_xml(subject)));
    }
    xml.push_str(&format!(
        "<dc:creator>{}</dc:creator>\n",
        escape_xml(&options.creator)
    ));
    xml.push_str(&format!(
        "<dc:language>{}</dc:language>\n",
        escape_xml(&options.language)
    ));
    xml.push_str("</cp:coreProperties>");
    xml
}

/// `docProps/app.xml`
pub fn app_properties_xml(options: &DocxOptions) -> String {
    let mut xml = String::new();
    xml.push_str(XML_DECL);
    xml.push('\n');
    xml.push_str("<Properties xmlns=\"http://schemas.openxmlformats.org/officeDocument/2006/extended-properties\">\n");
    xml.push_str(&format!(
        "<Application>{}</Application>\n",
        escape_xml(&options.creator)
    ));
    xml.push_str("</Properties>");
    xml
}
