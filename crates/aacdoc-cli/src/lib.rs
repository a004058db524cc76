//! aacdoc CLI - Command-line interface library
//!
//! This library provides the CLI functionality for aacdoc, including:
//! - Render: lay out lesson content files and export PDF/DOCX
//! - Preview: print the Markdown preview of content files
//! - Generate: fetch a case, generate content with a model, export it
//!
//! # Library Usage
//!
//! ```ignore
//! use aacdoc_cli::export::{combine, layout_documents, ExportFormat, Exporter};
//!
//! let documents = layout_documents(Some(&header), Some(&asset), Some(&evaluation))?;
//! let artifact = Exporter::for_header(&header)
//!     .with_font(font)
//!     .export_combined(&documents, ExportFormat::Pdf)?;
//! ```
//!
//! # Binary Usage
//!
//! ```bash
//! # Render existing content
//! aacdoc render --asset asset.json --evaluation evaluation.json --font NotoSansTC-Regular.otf
//!
//! # Preview as Markdown
//! aacdoc preview --asset asset.json
//!
//! # Full pipeline
//! aacdoc generate --api-key KEY --board-id 42 --format docx
//! ```

pub mod app;
pub mod cache;
pub mod config;
pub mod export;

// Re-export main entry point and types
pub use app::{
    generate_command, load_content, preview_command, render_command, ContentArgs,
    GenerateRequest, OutputArgs,
};
pub use app::{run_cli, RenderFormat};
pub use cache::{ExportCache, Session, SessionContent};
pub use config::Settings;
pub use export::{combine, export_filename, ExportArtifact, ExportError, ExportFormat, Exporter};
