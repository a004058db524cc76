//! Typst to PDF compiler
//!
//! Compiles Typst markup to PDF bytes using typst-as-lib. Only the supplied
//! font is available to the engine.

use typst_as_lib::TypstEngine;

use crate::error::{PdfError, Result};
use crate::fonts::FontResource;

/// Compiler for converting Typst markup to PDF
pub struct Compiler;

impl Compiler {
    /// Compile Typst markup to PDF bytes with a single font
    ///
    /// Fails with [`PdfError::Font`] when the markup asks for a family the
    /// font does not provide, instead of emitting a PDF without glyphs.
    pub fn compile(markup: &str, font: &FontResource) -> Result<Vec<u8>> {
        let engine = TypstEngine::builder()
            .main_file(markup.to_string())
            .fonts([font.bytes().to_vec()])
            .build();

        // compiled is Warned<Result<Document, Error>>
        let compiled = engine.compile();

        if let Some(warning) = compiled
            .warnings
            .iter()
            .find(|w| w.message.contains("unknown font family"))
        {
            return Err(PdfError::Font(format!(
                "font family \"{}\" is not provided by the font file: {}",
                font.family(),
                warning.message
            )));
        }

        let document = compiled
            .output
            .map_err(|e| PdfError::Compilation(format!("{:?}", e)))?;

        let options = typst_pdf::PdfOptions::default();
        let pdf_bytes = typst_pdf::pdf(&document, &options)
            .map_err(|e| PdfError::Compilation(format!("PDF generation failed: {:?}", e)))?;

        Ok(pdf_bytes.into())
    }
}
