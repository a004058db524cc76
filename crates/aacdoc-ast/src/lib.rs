//! aacdoc-ast - Document block definitions
//!
//! This crate provides the renderer-agnostic block model produced by the
//! layout engine and consumed by the PDF, DOCX and preview backends.

pub mod block;
pub mod document;

pub use block::{
    numbered, Alignment, Block, ColumnSpec, GridTable, Heading, KeyValueRow, NumberedList,
    Paragraph, KEY_VALUE_COLUMNS,
};
pub use document::{Document, DocumentMeta};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
