//! Combination and export
//!
//! Laid-out documents are concatenated into one block sequence and handed
//! to exactly one backend per format. Everything stays in memory; writing
//! files is the caller's business.

use std::fmt;

use aacdoc_ast::Document;
use aacdoc_core::{CoreError, DocumentHeader, EvaluationAssetTable, LayoutEngine, LearningAsset};
use aacdoc_ooxml::{render_docx, DocxOptions, OoxmlError, DOCX_CONTENT_TYPE};
use aacdoc_pdf::{render_pdf, FontResource, PdfError, PDF_CONTENT_TYPE};
use clap::ValueEnum;
use thiserror::Error;
use tracing::{debug, info};

/// Errors while assembling or rendering an export
#[derive(Error, Debug)]
pub enum ExportError {
    /// Nothing to export, or the parts cannot be combined
    #[error("Cannot assemble export: {0}")]
    Assembly(String),

    /// Content could not be laid out
    #[error("Layout failed: {0}")]
    Layout(#[from] CoreError),

    /// PDF backend failure
    #[error("PDF rendering failed: {0}")]
    Pdf(#[from] PdfError),

    /// DOCX backend failure
    #[error("DOCX rendering failed: {0}")]
    Docx(#[from] OoxmlError),
}

/// Result type for export operations
pub type Result<T> = std::result::Result<T, ExportError>;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, ValueEnum)]
pub enum ExportFormat {
    /// Paginated print document
    Pdf,
    /// Editable word-processor document
    Docx,
}

impl ExportFormat {
    /// Every format, in export order
    pub const ALL: [ExportFormat; 2] = [ExportFormat::Pdf, ExportFormat::Docx];

    /// File extension without the dot
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Docx => "docx",
        }
    }

    /// MIME type of the rendered bytes
    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Pdf => PDF_CONTENT_TYPE,
            ExportFormat::Docx => DOCX_CONTENT_TYPE,
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// One rendered file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Lay out whichever documents are present, learning asset first
pub fn layout_documents(
    header: Option<&DocumentHeader>,
    asset: Option<&LearningAsset>,
    evaluation: Option<&EvaluationAssetTable>,
) -> Result<Vec<Document>> {
    let engine = match header {
        Some(header) => LayoutEngine::with_header(header.clone()),
        None => LayoutEngine::new(),
    };
    let mut documents = Vec::new();
    if let Some(asset) = asset {
        documents.push(engine.layout_learning_asset(asset)?);
    }
    if let Some(evaluation) = evaluation {
        documents.push(engine.layout_evaluation(evaluation)?);
    }
    Ok(documents)
}

/// Concatenate documents in order.
///
/// The first document's metadata is kept. A page break at the very end of
/// the result is dropped so no export ends on a blank page.
pub fn combine(documents: &[Document]) -> Result<Document> {
    let (first, rest) = documents
        .split_first()
        .ok_or_else(|| ExportError::Assembly("no documents to combine".to_string()))?;

    let mut combined = first.clone();
    for doc in rest {
        combined.append(doc.clone());
    }
    if combined.ends_with_page_break() {
        combined.blocks.pop();
    }
    debug!(
        documents = documents.len(),
        blocks = combined.len(),
        sections = combined.section_count(),
        "documents combined"
    );
    Ok(combined)
}

/// `{main}-{sub}.{ext}`, with path separators replaced
pub fn export_filename(main_title: &str, sub_title: &str, format: ExportFormat) -> String {
    let clean = |s: &str| s.trim().replace(['/', '\\'], "_");
    format!(
        "{}-{}.{}",
        clean(main_title),
        clean(sub_title),
        format.extension()
    )
}

/// Renders combined documents into named artifacts
#[derive(Debug, Clone)]
pub struct Exporter {
    main_title: String,
    sub_title: String,
    font: Option<FontResource>,
    docx: DocxOptions,
}

impl Exporter {
    /// Exporter naming files after the given titles
    pub fn new(main_title: impl Into<String>, sub_title: impl Into<String>) -> Self {
        Self {
            main_title: main_title.into(),
            sub_title: sub_title.into(),
            font: None,
            docx: DocxOptions::default(),
        }
    }

    /// Exporter naming files after a document header
    pub fn for_header(header: &DocumentHeader) -> Self {
        Self::new(header.main_title.clone(), header.sub_title.clone())
    }

    /// Use this font for PDF output and its family for DOCX styles
    pub fn with_font(mut self, font: FontResource) -> Self {
        self.docx.font_family = font.family().to_string();
        self.font = Some(font);
        self
    }

    /// Override the DOCX package options
    pub fn with_docx_options(mut self, options: DocxOptions) -> Self {
        self.docx = options;
        self
    }

    /// Change the titles used for filenames
    pub fn set_titles(&mut self, main_title: impl Into<String>, sub_title: impl Into<String>) {
        self.main_title = main_title.into();
        self.sub_title = sub_title.into();
    }

    /// Font used for PDF output, if configured
    pub fn font(&self) -> Option<&FontResource> {
        self.font.as_ref()
    }

    /// Render one document in one format
    pub fn export(&self, doc: &Document, format: ExportFormat) -> Result<ExportArtifact> {
        let bytes = match format {
            ExportFormat::Pdf => {
                let font = self.font.as_ref().ok_or_else(|| {
                    PdfError::Font("no font configured for PDF output".to_string())
                })?;
                render_pdf(doc, font)?
            }
            ExportFormat::Docx => render_docx(doc, &self.docx)?,
        };
        let artifact = ExportArtifact {
            filename: export_filename(&self.main_title, &self.sub_title, format),
            content_type: format.content_type(),
            bytes,
        };
        info!(
            filename = %artifact.filename,
            size = artifact.bytes.len(),
            "export rendered"
        );
        Ok(artifact)
    }

    /// Combine documents and render them in one format
    pub fn export_combined(
        &self,
        documents: &[Document],
        format: ExportFormat,
    ) -> Result<ExportArtifact> {
        let combined = combine(documents)?;
        self.export(&combined, format)
    }
}
