//! Content fingerprints
//!
//! A fingerprint identifies the exact content a document was rendered from.
//! Export caches are keyed by it, so any change to the content (or to the
//! header printed above it) produces a different key.

use std::fmt;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::{CoreError, Result};
use crate::layout::DocumentHeader;
use crate::schema::{EvaluationAssetTable, LearningAsset};

/// SHA-256 of the canonical JSON form of the rendered content
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentFingerprint(String);

#[derive(Serialize)]
struct Canonical<'a> {
    header: Option<&'a DocumentHeader>,
    asset: Option<&'a LearningAsset>,
    evaluation: Option<&'a EvaluationAssetTable>,
}

impl ContentFingerprint {
    /// Fingerprint one request's worth of content
    pub fn compute(
        header: Option<&DocumentHeader>,
        asset: Option<&LearningAsset>,
        evaluation: Option<&EvaluationAssetTable>,
    ) -> Result<Self> {
        let canonical = Canonical {
            header,
            asset,
            evaluation,
        };
        let bytes = serde_json::to_vec(&canonical).map_err(CoreError::Fingerprint)?;
        Ok(Self::of_bytes(&bytes))
    }

    /// Fingerprint raw bytes
    pub fn of_bytes(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        let result = hasher.finalize();
        Self(format!(
            "sha256:{}",
            result.iter().map(|b| format!("{:02x}", b)).collect::<String>()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(title: &str) -> EvaluationAssetTable {
        EvaluationAssetTable {
            evaluation_asset_title: title.into(),
            evaluation_items: vec![],
        }
    }

    #[test]
    fn test_format() {
        let fp = ContentFingerprint::of_bytes(b"abc");
        assert!(fp.as_str().starts_with("sha256:"));
        assert_eq!(fp.as_str().len(), 7 + 64);
    }

    #[test]
    fn test_same_content_same_fingerprint() {
        let a = ContentFingerprint::compute(None, None, Some(&table("洗手"))).unwrap();
        let b = ContentFingerprint::compute(None, None, Some(&table("洗手"))).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_content_and_header_change_fingerprint() {
        let base = ContentFingerprint::compute(None, None, Some(&table("洗手"))).unwrap();
        let other = ContentFingerprint::compute(None, None, Some(&table("刷牙"))).unwrap();
        assert_ne!(base, other);

        let header = DocumentHeader::new("生活自理", "洗手", "");
        let with_header =
            ContentFingerprint::compute(Some(&header), None, Some(&table("洗手"))).unwrap();
        assert_ne!(base, with_header);
    }

    #[test]
    fn test_serialization_failure_is_not_a_schema_error() {
        let source = serde_json::from_str::<u8>("x").unwrap_err();
        let err = CoreError::Fingerprint(source);
        assert!(!matches!(err, CoreError::SchemaValidation { .. }));
        let message = err.to_string();
        assert!(message.starts_with("cannot fingerprint content"));
        assert!(!message.contains("schema"));
    }
}
