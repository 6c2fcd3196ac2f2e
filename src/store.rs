//! On-disk transcript cache laid out as `<root>/<lang>/<videoId>.json`.
//!
//! Writes are plain overwrites: no locking, no temp-file rename, last writer
//! wins. Readers may observe a half written file while a save is in flight.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::service::ResponseDocument;

pub const DEFAULT_TRANSCRIPTS_ROOT: &str = "../transcripts";
const DOCUMENT_EXT: &str = "json";

#[derive(Debug, Clone)]
pub struct TranscriptStore {
    root: PathBuf,
}

/// A document found in the cache together with where it lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedTranscript {
    pub path: PathBuf,
    pub document: ResponseDocument,
}

impl TranscriptStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn language_dir(&self, lang: &str) -> PathBuf {
        self.root.join(lang)
    }

    /// File that holds `video_id` for `lang`. Refuses ids that would escape
    /// the language directory.
    pub fn path_for(&self, lang: &str, video_id: &str) -> Result<PathBuf> {
        if video_id.is_empty()
            || video_id == "."
            || video_id == ".."
            || video_id.contains(['/', '\\'])
        {
            bail!("refusing to use {video_id:?} as a cache file name");
        }
        let file_name = format!("{video_id}.{DOCUMENT_EXT}");
        Ok(self.language_dir(lang).join(file_name))
    }

    /// Serializes `document` with two-space indentation and overwrites the
    /// cache file for its language.
    pub fn save(&self, lang: &str, document: &ResponseDocument) -> Result<PathBuf> {
        let path = self.path_for(lang, &document.video_id)?;
        let dir = self.language_dir(lang);
        fs::create_dir_all(&dir)
            .with_context(|| format!("creating transcript directory {}", dir.display()))?;

        let json = serde_json::to_vec_pretty(document).context("serializing transcript document")?;
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "cached transcript document");
        Ok(path)
    }

    pub fn load(&self, lang: &str, video_id: &str) -> Result<Option<ResponseDocument>> {
        let path = self.path_for(lang, video_id)?;
        if !path.exists() {
            return Ok(None);
        }
        read_document(&path).map(Some)
    }

    /// Every readable document cached for `lang`, ordered by video id.
    /// Files that fail to parse are skipped.
    pub fn list(&self, lang: &str) -> Result<Vec<CachedTranscript>> {
        let dir = self.language_dir(lang);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut documents = Vec::new();
        for entry in WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
        {
            if entry.path().extension().and_then(|ext| ext.to_str()) != Some(DOCUMENT_EXT) {
                continue;
            }
            match read_document(entry.path()) {
                Ok(document) => documents.push(CachedTranscript {
                    path: entry.path().to_path_buf(),
                    document,
                }),
                Err(err) => warn!("skipping {}: {err:#}", entry.path().display()),
            }
        }

        documents.sort_by(|a, b| a.document.video_id.cmp(&b.document.video_id));
        Ok(documents)
    }
}

impl Default for TranscriptStore {
    fn default() -> Self {
        Self::new(DEFAULT_TRANSCRIPTS_ROOT)
    }
}

fn read_document(path: &Path) -> Result<ResponseDocument> {
    let raw = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&raw).with_context(|| format!("parsing {}", path.display()))
}
