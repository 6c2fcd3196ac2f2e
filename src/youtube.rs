//! Caption collaborator backed by `yt_transcript_rs`.
//!
//! The client is async; `fetch_transcript` drives it on the runtime handle it
//! was built with, so it must be called from a blocking thread
//! (`spawn_blocking`), never from inside an async task.

use anyhow::{Context, Result, anyhow};
use tokio::runtime::Handle;
use tracing::debug;
use yt_transcript_rs::api::YouTubeTranscriptApi;
use yt_transcript_rs::errors::{CouldNotRetrieveTranscript, CouldNotRetrieveTranscriptReason};

use crate::transcript::{FetchedTranscript, TranscriptError, TranscriptSnippet, TranscriptSource};

#[derive(Clone)]
pub struct YouTubeTranscripts {
    api: YouTubeTranscriptApi,
    runtime: Handle,
}

impl YouTubeTranscripts {
    pub fn new(runtime: Handle) -> Result<Self> {
        let api = YouTubeTranscriptApi::new(None, None, None)
            .map_err(|err| anyhow!("{err}"))
            .context("creating YouTube transcript client")?;
        Ok(Self { api, runtime })
    }
}

impl TranscriptSource for YouTubeTranscripts {
    fn fetch_transcript(
        &self,
        video_id: &str,
        languages: &[&str],
    ) -> Result<FetchedTranscript, TranscriptError> {
        debug!(video_id, ?languages, "fetching transcript");
        let fetched = self
            .runtime
            .block_on(self.api.fetch_transcript(video_id, languages, false))
            .map_err(|err| classify(err, languages))?;

        Ok(FetchedTranscript {
            language_code: fetched.language_code,
            language: fetched.language,
            is_generated: fetched.is_generated,
            snippets: fetched
                .snippets
                .into_iter()
                .map(|snippet| TranscriptSnippet {
                    start: snippet.start,
                    duration: snippet.duration,
                    text: snippet.text,
                })
                .collect(),
        })
    }
}

/// Keeps the client's "no captions" outcomes by name; everything else is an
/// upstream failure carrying the client's message.
fn classify(err: CouldNotRetrieveTranscript, languages: &[&str]) -> TranscriptError {
    match &err.reason {
        Some(CouldNotRetrieveTranscriptReason::TranscriptsDisabled) => {
            TranscriptError::TranscriptsDisabled {
                video_id: err.video_id.clone(),
            }
        }
        Some(CouldNotRetrieveTranscriptReason::NoTranscriptFound { .. }) => {
            TranscriptError::NoTranscriptFound {
                video_id: err.video_id.clone(),
                languages: languages.iter().map(|code| code.to_string()).collect(),
            }
        }
        _ => TranscriptError::Upstream(
            anyhow!("{err}").context(format!("fetching transcript for {}", err.video_id)),
        ),
    }
}
