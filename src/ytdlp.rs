//! yt-dlp backed metadata collaborator.
//!
//! Runs `yt-dlp --dump-single-json --skip-download` once per lookup and reads
//! the video fields from the dump.

use std::path::PathBuf;
use std::process::Command;

use anyhow::{Context, Result, bail};
use tracing::debug;

use crate::metadata::{MetadataSource, VideoInfo};

pub const DEFAULT_YTDLP: &str = "yt-dlp";

#[derive(Debug, Clone)]
pub struct YtDlp {
    program: PathBuf,
    cookies: Option<PathBuf>,
}

impl YtDlp {
    pub fn new(program: impl Into<PathBuf>, cookies: Option<PathBuf>) -> Self {
        Self {
            program: program.into(),
            cookies,
        }
    }

    /// Runs the dump for one video and returns the raw JSON text.
    fn dump_json(&self, video_id: &str) -> Result<String> {
        let video_url = watch_url(video_id);
        let mut command = Command::new(&self.program);
        command
            .arg("--dump-single-json")
            .arg("--skip-download")
            .arg("--no-warnings")
            .arg("--no-progress")
            .arg(&video_url);

        if let Some(cookies) = self.cookies.as_deref().filter(|path| path.exists()) {
            command.arg("--cookies").arg(cookies);
        }

        debug!(program = %self.program.display(), %video_url, "running yt-dlp");
        let output = command
            .output()
            .with_context(|| format!("running {} for {}", self.program.display(), video_url))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "yt-dlp failed for {} (status {}): {}",
                video_url,
                output.status,
                stderr.trim()
            );
        }

        String::from_utf8(output.stdout).context("parsing yt-dlp output as UTF-8")
    }
}

impl MetadataSource for YtDlp {
    fn video_info(&self, video_id: &str) -> Result<VideoInfo> {
        let raw = self.dump_json(video_id)?;
        serde_json::from_str(&raw).context("deserializing yt-dlp metadata")
    }
}

pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={video_id}")
}
