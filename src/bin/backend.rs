#![forbid(unsafe_code)]

//! HTTP backend: wires yt-dlp, the YouTube caption client and the on-disk
//! transcript cache into the router and serves it until Ctrl+C.

use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use tokio::{runtime::Handle, signal};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use transcript_api::{
    api,
    config::{self, RuntimeConfig},
    service::TranscriptService,
    store::TranscriptStore,
    youtube::YouTubeTranscripts,
    ytdlp::YtDlp,
};

const DEFAULT_LOG_FILTER: &str = "transcript_api=info,backend=info,tower_http=info";

#[derive(Parser, Debug)]
#[command(author, version, about = "Fetch, cache and serve YouTube transcripts.")]
struct Args {
    #[arg(
        long,
        value_name = "PATH",
        default_value = config::DEFAULT_CONFIG_PATH,
        help = "KEY=\"value\" env file; missing file means defaults"
    )]
    config: PathBuf,
    #[arg(long, help = "Address to bind, overrides TRANSCRIPT_API_HOST")]
    host: Option<String>,
    #[arg(long, help = "Port to bind, overrides TRANSCRIPT_API_PORT")]
    port: Option<u16>,
    #[arg(
        long,
        value_name = "DIR",
        help = "Cache directory, overrides TRANSCRIPTS_ROOT"
    )]
    transcripts_root: Option<PathBuf>,
    #[arg(long, value_name = "PATH", help = "yt-dlp executable, overrides YTDLP_PATH")]
    ytdlp: Option<PathBuf>,
}

impl Args {
    fn resolve(self) -> Result<RuntimeConfig> {
        let mut runtime = config::load_runtime_config_from(&self.config)
            .with_context(|| format!("loading {}", self.config.display()))?;
        if let Some(host) = self.host {
            runtime.host = host;
        }
        if let Some(port) = self.port {
            runtime.port = port;
        }
        if let Some(root) = self.transcripts_root {
            runtime.transcripts_root = root;
        }
        if let Some(ytdlp) = self.ytdlp {
            runtime.ytdlp_path = ytdlp;
        }
        Ok(runtime)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let runtime = Args::parse().resolve()?;

    if let Some(cookies) = &runtime.ytdlp_cookies
        && !cookies.exists()
    {
        warn!(
            "cookies file {} does not exist; yt-dlp will run without it",
            cookies.display()
        );
    }

    let ytdlp = Arc::new(YtDlp::new(
        runtime.ytdlp_path.clone(),
        runtime.ytdlp_cookies.clone(),
    ));
    let captions = Arc::new(YouTubeTranscripts::new(Handle::current())?);
    let store = TranscriptStore::new(runtime.transcripts_root.clone());
    let service = TranscriptService::new(ytdlp, captions, store);
    let app = api::router(service);

    let addr = SocketAddr::new(
        runtime
            .host
            .parse()
            .with_context(|| format!("parsing host {}", runtime.host))?,
        runtime.port,
    );
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding to {}", addr))?;
    info!(
        "transcript API listening on http://{} (cache at {})",
        addr,
        runtime.transcripts_root.display()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("running API server")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        error!("failed to install Ctrl+C handler: {}", err);
    }
}
