//! Export cache and session state
//!
//! Rendered artifacts are kept per content fingerprint and format. Loading
//! new content drops every artifact rendered from anything else, so a stale
//! download can never be served.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use aacdoc_core::{
    preview, ContentFingerprint, DocumentHeader, EvaluationAssetTable, LearningAsset,
};
use tracing::debug;

use crate::export::{
    combine, layout_documents, ExportArtifact, ExportError, ExportFormat, Exporter, Result,
};

/// Cache key: what was rendered, and into which format
pub type CacheKey = (ContentFingerprint, ExportFormat);

/// Rendered artifacts by content and format
#[derive(Debug, Default)]
pub struct ExportCache {
    entries: HashMap<CacheKey, ExportArtifact>,
}

impl ExportCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached artifact, if any
    pub fn get(
        &self,
        fingerprint: &ContentFingerprint,
        format: ExportFormat,
    ) -> Option<&ExportArtifact> {
        self.entries.get(&(fingerprint.clone(), format))
    }

    /// Store an artifact, replacing any previous one for the key
    pub fn insert(&mut self, key: CacheKey, artifact: ExportArtifact) {
        self.entries.insert(key, artifact);
    }

    /// Cached artifact, rendering and storing it on a miss.
    ///
    /// A failed render stores nothing.
    pub fn get_or_try_insert_with<F>(
        &mut self,
        key: CacheKey,
        render: F,
    ) -> Result<&ExportArtifact>
    where
        F: FnOnce() -> Result<ExportArtifact>,
    {
        match self.entries.entry(key) {
            Entry::Occupied(entry) => {
                debug!(format = %entry.key().1, "export cache hit");
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => {
                debug!(format = %entry.key().1, "export cache miss");
                let artifact = render()?;
                Ok(entry.insert(artifact))
            }
        }
    }

    /// Drop every entry not rendered from `fingerprint`. Returns how many were dropped.
    pub fn retain_fingerprint(&mut self, fingerprint: &ContentFingerprint) -> usize {
        let before = self.entries.len();
        self.entries.retain(|(fp, _), _| fp == fingerprint);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Content currently loaded into a session
#[derive(Debug, Clone)]
pub struct SessionContent {
    pub header: DocumentHeader,
    pub learning_asset: Option<LearningAsset>,
    pub evaluation: Option<EvaluationAssetTable>,
}

/// One user's working state: loaded content plus its rendered exports
#[derive(Debug)]
pub struct Session {
    content: Option<SessionContent>,
    fingerprint: Option<ContentFingerprint>,
    exporter: Exporter,
    cache: ExportCache,
}

impl Session {
    /// Empty session rendering through `exporter`
    pub fn new(exporter: Exporter) -> Self {
        Self {
            content: None,
            fingerprint: None,
            exporter,
            cache: ExportCache::new(),
        }
    }

    /// Load new content.
    ///
    /// Cached exports of different content are invalidated; reloading the
    /// same content keeps them.
    pub fn replace_content(&mut self, content: SessionContent) -> Result<&ContentFingerprint> {
        let fingerprint = ContentFingerprint::compute(
            Some(&content.header),
            content.learning_asset.as_ref(),
            content.evaluation.as_ref(),
        )?;
        let dropped = self.cache.retain_fingerprint(&fingerprint);
        debug!(%fingerprint, dropped, "session content replaced");

        self.exporter.set_titles(
            content.header.main_title.clone(),
            content.header.sub_title.clone(),
        );
        self.content = Some(content);
        Ok(self.fingerprint.insert(fingerprint))
    }

    /// Fingerprint of the loaded content
    pub fn fingerprint(&self) -> Option<&ContentFingerprint> {
        self.fingerprint.as_ref()
    }

    pub fn content(&self) -> Option<&SessionContent> {
        self.content.as_ref()
    }

    pub fn cache(&self) -> &ExportCache {
        &self.cache
    }

    /// Render the loaded content, reusing a cached artifact when possible
    pub fn export(&mut self, format: ExportFormat) -> Result<&ExportArtifact> {
        let (content, fingerprint) = match (&self.content, &self.fingerprint) {
            (Some(content), Some(fingerprint)) => (content, fingerprint.clone()),
            _ => return Err(no_content()),
        };
        let exporter = &self.exporter;
        self.cache
            .get_or_try_insert_with((fingerprint, format), || render(content, exporter, format))
    }

    /// Markdown preview of the loaded content
    pub fn preview(&self) -> Result<String> {
        let content = self.content.as_ref().ok_or_else(no_content)?;
        let documents = layout_documents(
            Some(&content.header),
            content.learning_asset.as_ref(),
            content.evaluation.as_ref(),
        )?;
        Ok(preview(&combine(&documents)?))
    }
}

fn render(
    content: &SessionContent,
    exporter: &Exporter,
    format: ExportFormat,
) -> Result<ExportArtifact> {
    let documents = layout_documents(
        Some(&content.header),
        content.learning_asset.as_ref(),
        content.evaluation.as_ref(),
    )?;
    exporter.export_combined(&documents, format)
}

fn no_content() -> ExportError {
    ExportError::Assembly("no content loaded".to_string())
}
