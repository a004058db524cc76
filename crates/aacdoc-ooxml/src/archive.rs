//! Archive handling for DOCX packages
//!
//! A DOCX file is a ZIP archive of XML parts. Parts are written in sorted
//! order with a fixed timestamp, so the same parts always produce the same
//! bytes.

use std::collections::HashMap;
use std::fs::File;
use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;

use zip::read::ZipArchive;
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::{CompressionMethod, DateTime};

use crate::error::{OoxmlError, Result};

/// Path of the main document part
pub const DOCUMENT_PART: &str = "word/document.xml";
/// Path of the styles part
pub const STYLES_PART: &str = "word/styles.xml";

/// An unpacked OOXML package
#[derive(Debug, Default)]
pub struct OoxmlArchive {
    /// All parts in the archive, keyed by path
    files: HashMap<String, Vec<u8>>,
}

impl OoxmlArchive {
    /// Create an empty package
    pub fn new() -> Self {
        Self::default()
    }

    /// Open and unpack a DOCX file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Unpack DOCX bytes held in memory
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_reader(Cursor::new(bytes))
    }

    /// Create from any reader that implements Read + Seek
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)?;
        let mut files = HashMap::new();

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            let name = file.name().to_string();

            // Skip directories
            if name.ends_with('/') {
                continue;
            }

            let mut contents = Vec::new();
            file.read_to_end(&mut contents)?;
            files.insert(name, contents);
        }

        Ok(Self { files })
    }

    /// Get a part's contents by path
    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.files.get(path).map(|v| v.as_slice())
    }

    /// Get a part's contents as a string
    pub fn get_string(&self, path: &str) -> Option<String> {
        self.files
            .get(path)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    /// Get the main document content (word/document.xml)
    pub fn document_xml(&self) -> Result<&[u8]> {
        self.get(DOCUMENT_PART)
            .ok_or_else(|| OoxmlError::MissingFile(DOCUMENT_PART.to_string()))
    }

    /// Get the styles definition (word/styles.xml)
    pub fn styles_xml(&self) -> Result<&[u8]> {
        self.get(STYLES_PART)
            .ok_or_else(|| OoxmlError::MissingFile(STYLES_PART.to_string()))
    }

    /// Check if a part exists in the archive
    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    /// List all parts, sorted
    pub fn file_list(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.files.keys().map(|s| s.as_str()).collect();
        paths.sort_unstable();
        paths
    }

    /// Set a part's contents from a string
    pub fn set_string(&mut self, path: impl Into<String>, contents: impl Into<String>) {
        self.files.insert(path.into(), contents.into().into_bytes());
    }

    /// Write the archive to a file
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        self.write_to(file)
    }

    /// Write the archive to any writer
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<()> {
        let mut zip = ZipWriter::new(writer);
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default());

        for path in self.file_list() {
            zip.start_file(path, options)?;
            zip.write_all(&self.files[path])?;
        }

        zip.finish()?;
        Ok(())
    }

    /// Write the archive into a byte buffer
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        self.write_to(&mut buffer)?;
        Ok(buffer.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_operations() {
        let mut archive = OoxmlArchive::new();
        archive.set_string("test.xml", "<root/>");
        assert!(archive.contains("test.xml"));
        assert_eq!(archive.get_string("test.xml"), Some("<root/>".to_string()));
        assert!(archive.get("missing.xml").is_none());
    }

    #[test]
    fn test_missing_document_part() {
        let archive = OoxmlArchive::new();
        assert!(matches!(
            archive.document_xml(),
            Err(OoxmlError::MissingFile(_))
        ));
    }

    #[test]
    fn test_roundtrip_through_bytes() {
        let mut archive = OoxmlArchive::new();
        archive.set_string(DOCUMENT_PART, "<w:document/>");
        archive.set_string("[Content_Types].xml", "<Types/>");

        let bytes = archive.to_bytes().unwrap();
        let back = OoxmlArchive::from_bytes(&bytes).unwrap();
        assert_eq!(back.document_xml().unwrap(), b"<w:document/>");
        assert_eq!(back.file_list(), vec!["[Content_Types].xml", DOCUMENT_PART]);
    }

    #[test]
    fn test_output_is_deterministic() {
        let build = || {
            let mut archive = OoxmlArchive::new();
            archive.set_string("b.xml", "<b/>");
            archive.set_string("a.xml", "<a/>");
            archive.to_bytes().unwrap()
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.docx");
        let mut archive = OoxmlArchive::new();
        archive.set_string(DOCUMENT_PART, "<w:document/>");
        archive.write_to_file(&path).unwrap();

        let reopened = OoxmlArchive::open(&path).unwrap();
        assert!(reopened.contains(DOCUMENT_PART));
    }
}
