//! aacdoc-ooxml - DOCX rendering
//!
//! Writes laid-out `aacdoc_ast` documents as self-contained WordprocessingML
//! packages and reads their bodies back for verification.

pub mod archive;
pub mod error;
pub mod extract;
pub mod package;
pub mod writer;

pub use archive::OoxmlArchive;
pub use error::{OoxmlError, Result};
pub use extract::{read_body, read_docx, tables, BodyElement};
pub use writer::{DocxOptions, DocxWriter};

/// MIME type of a DOCX package
pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Render a document to DOCX bytes
pub fn render_docx(doc: &aacdoc_ast::Document, options: &DocxOptions) -> Result<Vec<u8>> {
    DocxWriter::with_options(options.clone()).generate(doc)
}
