#![forbid(unsafe_code)]

//! Transcript API: fetches a video's metadata and one caption track, caches
//! the combined document under `<root>/<lang>/<videoId>.json` and serves it
//! over HTTP.

pub mod api;
pub mod config;
pub mod error;
pub mod metadata;
pub mod service;
pub mod store;
pub mod timestamp;
pub mod transcript;
pub mod youtube;
pub mod ytdlp;
