//! Transcript lookup: ask the caption collaborator for one language and
//! convert its snippets into `HH:MM:SS` entries.

use std::collections::BTreeMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::timestamp::format_seconds;

/// Raw timed text as handed back by the collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptSnippet {
    pub start: f64,
    pub duration: f64,
    pub text: String,
}

/// The track the collaborator settled on, with its body already downloaded.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedTranscript {
    pub language_code: String,
    /// Display name as the collaborator reports it, e.g. `Korean` or
    /// `Korean (auto-generated)`.
    pub language: String,
    pub is_generated: bool,
    pub snippets: Vec<TranscriptSnippet>,
}

/// Entry stored in the document, offsets already formatted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub start: String,
    pub end: String,
    pub text: String,
}

impl From<TranscriptSnippet> for TranscriptEntry {
    fn from(snippet: TranscriptSnippet) -> Self {
        Self {
            start: format_seconds(snippet.start),
            end: format_seconds(snippet.start + snippet.duration),
            text: snippet.text,
        }
    }
}

/// Failure modes of a transcript collaborator. The first two are expected
/// outcomes for videos without captions; only `Upstream` means the lookup broke.
#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("subtitles are disabled for video {video_id}")]
    TranscriptsDisabled { video_id: String },
    #[error("no transcript in {languages:?} for video {video_id}")]
    NoTranscriptFound {
        video_id: String,
        languages: Vec<String>,
    },
    #[error(transparent)]
    Upstream(#[from] anyhow::Error),
}

pub trait TranscriptSource: Send + Sync {
    /// Fetches the first track matching one of `languages`, trying each code
    /// in order. Manually created tracks win over generated ones.
    fn fetch_transcript(
        &self,
        video_id: &str,
        languages: &[&str],
    ) -> Result<FetchedTranscript, TranscriptError>;
}

/// Formatted entries plus the `{code: display name}` map for the document.
pub type TranscriptLookup = (Vec<TranscriptEntry>, BTreeMap<String, String>);

/// Looks up `lang` for `video_id`.
///
/// Missing or disabled captions yield `([], {lang: ""})`; any other
/// collaborator failure is returned as an error.
pub fn lookup_transcript(
    source: &dyn TranscriptSource,
    video_id: &str,
    lang: &str,
) -> Result<TranscriptLookup> {
    match source.fetch_transcript(video_id, &[lang]) {
        Ok(fetched) => {
            debug!(
                video_id,
                lang,
                generated = fetched.is_generated,
                entries = fetched.snippets.len(),
                "transcript fetched"
            );
            let entries = fetched
                .snippets
                .into_iter()
                .map(TranscriptEntry::from)
                .collect();
            Ok((entries, BTreeMap::from([(lang.to_string(), fetched.language)])))
        }
        Err(
            err @ (TranscriptError::TranscriptsDisabled { .. }
            | TranscriptError::NoTranscriptFound { .. }),
        ) => {
            info!(video_id, lang, "{err}");
            Ok((Vec::new(), BTreeMap::from([(lang.to_string(), String::new())])))
        }
        Err(TranscriptError::Upstream(err)) => Err(err),
    }
}
