//! Request orchestration: metadata + transcript lookup, document assembly and
//! the cache write.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ServiceError, ServiceResult};
use crate::metadata::{MetadataSource, VideoDetails, lookup_video};
use crate::store::{CachedTranscript, TranscriptStore};
use crate::transcript::{TranscriptEntry, TranscriptSource, lookup_transcript};

/// Languages the API serves, one route each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Korean,
    Japanese,
    Chinese,
    Spanish,
}

impl Language {
    pub const ALL: [Language; 4] = [
        Language::Korean,
        Language::Japanese,
        Language::Chinese,
        Language::Spanish,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Language::Korean => "ko",
            Language::Japanese => "ja",
            Language::Chinese => "zh",
            Language::Spanish => "es",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = ServiceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .into_iter()
            .find(|lang| lang.code() == value)
            .ok_or_else(|| ServiceError::UnknownLanguage(value.to_owned()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageName {
    pub code: String,
    pub name: String,
}

/// Body returned to the client and written verbatim to the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseDocument {
    #[serde(rename = "videoId")]
    pub video_id: String,
    #[serde(rename = "videoInfo")]
    pub video_info: VideoDetails,
    pub language_code: Vec<LanguageName>,
    pub transcripts: BTreeMap<String, Vec<TranscriptEntry>>,
}

/// Explicitly constructed at startup and shared with the HTTP layer.
#[derive(Clone)]
pub struct TranscriptService {
    metadata: Arc<dyn MetadataSource>,
    transcripts: Arc<dyn TranscriptSource>,
    store: TranscriptStore,
}

impl TranscriptService {
    pub fn new(
        metadata: Arc<dyn MetadataSource>,
        transcripts: Arc<dyn TranscriptSource>,
        store: TranscriptStore,
    ) -> Self {
        Self {
            metadata,
            transcripts,
            store,
        }
    }

    pub fn store(&self) -> &TranscriptStore {
        &self.store
    }

    /// Builds a fresh document for `video_id` in `lang`, overwrites its cache
    /// file and returns it. Blocks on both collaborators.
    pub fn fetch_and_store(
        &self,
        video_id: Option<&str>,
        lang: Language,
    ) -> ServiceResult<ResponseDocument> {
        let video_id = video_id
            .filter(|id| !id.is_empty())
            .ok_or(ServiceError::MissingVideoId)?;
        let code = lang.code();

        let video_info =
            lookup_video(self.metadata.as_ref(), video_id).map_err(ServiceError::Upstream)?;
        let (entries, names) = lookup_transcript(self.transcripts.as_ref(), video_id, code)
            .map_err(ServiceError::Upstream)?;

        let document = ResponseDocument {
            video_id: video_id.to_owned(),
            video_info,
            language_code: vec![LanguageName {
                code: code.to_owned(),
                name: names.get(code).cloned().unwrap_or_default(),
            }],
            transcripts: BTreeMap::from([(code.to_owned(), entries)]),
        };

        let path = self
            .store
            .save(code, &document)
            .map_err(ServiceError::Storage)?;
        info!(
            video_id,
            lang = code,
            entries = document.transcripts[code].len(),
            path = %path.display(),
            "transcript document ready"
        );
        Ok(document)
    }

    pub fn cached(&self, lang: Language) -> ServiceResult<Vec<ResponseDocument>> {
        let listed = self.store.list(lang.code()).map_err(ServiceError::Storage)?;
        Ok(listed
            .into_iter()
            .map(|CachedTranscript { document, .. }| document)
            .collect())
    }

    /// Where a cached document would live. Ids that cannot name a cache file
    /// are `NotCached`; whether the file exists is left to the reader.
    pub fn cached_path(&self, lang: Language, video_id: &str) -> ServiceResult<PathBuf> {
        self.store
            .path_for(lang.code(), video_id)
            .map_err(|_| ServiceError::NotCached)
    }
}
