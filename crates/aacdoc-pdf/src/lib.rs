//! aacdoc-pdf - PDF generation via Typst
//!
//! Renders a laid-out block sequence as a US Letter PDF with one embedded
//! CJK font.
//!
//! # Architecture
//!
//! 1. **FontResource** - validated font bytes, the family they provide and
//!    their character coverage
//! 2. **Transpiler** - converts `aacdoc_ast::Document` to Typst markup
//! 3. **Compiler** - compiles Typst markup to PDF bytes
//!
//! # Example
//!
//! ```ignore
//! use aacdoc_ast::Document;
//! use aacdoc_pdf::{render_pdf, FontResource};
//!
//! let font = FontResource::load("fonts/NotoSansTC-Regular.otf", "Noto Sans TC")?;
//! let pdf_bytes = render_pdf(&Document::new(), &font)?;
//! ```

mod compiler;
mod error;
mod fonts;
pub mod inspect;
mod transpiler;

pub use compiler::Compiler;
pub use error::{PdfError, Result};
pub use fonts::{validate_font_bytes, FontResource, SCRIPT_SAMPLE};
pub use transpiler::{TranspileOptions, Transpiler};

/// MIME type of rendered output
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Render a document to PDF bytes.
///
/// Fails with [`PdfError::Font`] before typesetting when the font has no
/// glyph for some character of the document.
pub fn render_pdf(doc: &aacdoc_ast::Document, font: &FontResource) -> Result<Vec<u8>> {
    font.check_coverage(doc)?;
    let markup = Transpiler::new(font.family()).transpile(doc)?;
    Compiler::compile(&markup, font)
}
