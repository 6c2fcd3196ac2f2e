//! HTTP surface: one `GET` route per language plus read access to the cache.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::anyhow;
use axum::{
    Json, Router,
    body::Body,
    extract::{Path as AxumPath, Query, State},
    http::{Method, header},
    response::{IntoResponse, Response},
    routing::get,
};
use tokio::{fs::File, task};
use tokio_util::io::ReaderStream;
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

use crate::error::{ServiceError, ServiceResult};
use crate::service::{Language, ResponseDocument, TranscriptService};

const VIDEO_ID_PARAM: &str = "videoId";

#[derive(Clone)]
struct AppState {
    service: TranscriptService,
}

/// Builds the application router around an already constructed service.
pub fn router(service: TranscriptService) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    Router::new()
        .route("/ko", get(transcript_ko))
        .route("/ja", get(transcript_ja))
        .route("/zh", get(transcript_zh))
        .route("/es", get(transcript_es))
        .route("/transcripts/{lang}", get(list_cached))
        .route("/transcripts/{lang}/{video_id}", get(download_cached))
        .layer(cors)
        .with_state(AppState { service })
}

async fn transcript_ko(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ServiceResult<Json<ResponseDocument>> {
    get_transcript(state, params, Language::Korean).await
}

async fn transcript_ja(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ServiceResult<Json<ResponseDocument>> {
    get_transcript(state, params, Language::Japanese).await
}

async fn transcript_zh(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ServiceResult<Json<ResponseDocument>> {
    get_transcript(state, params, Language::Chinese).await
}

async fn transcript_es(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ServiceResult<Json<ResponseDocument>> {
    get_transcript(state, params, Language::Spanish).await
}

async fn get_transcript(
    state: AppState,
    mut params: HashMap<String, String>,
    lang: Language,
) -> ServiceResult<Json<ResponseDocument>> {
    let video_id = params.remove(VIDEO_ID_PARAM);
    let service = state.service.clone();

    let document = task::spawn_blocking(move || service.fetch_and_store(video_id.as_deref(), lang))
        .await
        .map_err(|err| ServiceError::Upstream(anyhow!("task join error: {err}")))?
        .inspect_err(|err| warn!(%lang, "transcript request failed: {err}"))?;

    Ok(Json(document))
}

async fn list_cached(
    State(state): State<AppState>,
    AxumPath(lang): AxumPath<String>,
) -> ServiceResult<Json<Vec<ResponseDocument>>> {
    let lang: Language = lang.parse()?;
    let service = state.service.clone();

    let documents = task::spawn_blocking(move || service.cached(lang))
        .await
        .map_err(|err| ServiceError::Storage(anyhow!("task join error: {err}")))??;

    Ok(Json(documents))
}

async fn download_cached(
    State(state): State<AppState>,
    AxumPath((lang, video_id)): AxumPath<(String, String)>,
) -> ServiceResult<Response> {
    let lang: Language = lang.parse()?;
    let path = state.service.cached_path(lang, &video_id)?;
    stream_file(path).await
}

async fn stream_file(path: PathBuf) -> ServiceResult<Response> {
    let file = File::open(&path)
        .await
        .map_err(|_| ServiceError::NotCached)?;
    let is_file = file
        .metadata()
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false);
    if !is_file {
        return Err(ServiceError::NotCached);
    }

    let stream = ReaderStream::new(file);
    let mut response = Body::from_stream(stream).into_response();
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("application/json"),
    );
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MISSING_VIDEO_ID;
    use crate::service::tests::{FakeCollaborators, service_with};
    use axum::body::to_bytes;
    use axum::http::StatusCode;
    use serde_json::Value;
    use std::sync::Arc;
    use std::sync::atomic::Ordering;
    use tempfile::tempdir;

    fn query(video_id: &str) -> HashMap<String, String> {
        HashMap::from([(VIDEO_ID_PARAM.to_string(), video_id.to_string())])
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn korean_route_returns_and_caches_document() {
        let dir = tempdir().unwrap();
        let state = AppState {
            service: service_with(Arc::new(FakeCollaborators::new()), dir.path()),
        };

        let response = transcript_ko(State(state), Query(query("abc123")))
            .await
            .unwrap()
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;

        assert_eq!(body["videoId"], "abc123");
        assert_eq!(body["videoInfo"]["genre"], "Education");
        assert_eq!(body["videoInfo"]["duration"], "125");
        assert_eq!(
            body["transcripts"]["ko"],
            serde_json::json!([{"start": "00:00:05", "end": "00:00:07", "text": "hello"}])
        );
        assert_eq!(
            body["language_code"],
            serde_json::json!([{"code": "ko", "name": "Korean"}])
        );

        let cached: Value =
            serde_json::from_slice(&std::fs::read(dir.path().join("ko/abc123.json")).unwrap())
                .unwrap();
        assert_eq!(cached, body);
    }

    #[tokio::test]
    async fn missing_video_id_is_400_without_side_effects() {
        let dir = tempdir().unwrap();
        let fake = Arc::new(FakeCollaborators::new());
        let state = AppState {
            service: service_with(fake.clone(), dir.path()),
        };

        let err = transcript_es(State(state), Query(HashMap::new()))
            .await
            .unwrap_err();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            serde_json::json!({"error": MISSING_VIDEO_ID})
        );
        assert_eq!(fake.calls.load(Ordering::SeqCst), 0);
        assert!(!dir.path().join("es").exists());
    }

    #[tokio::test]
    async fn collaborator_failure_is_500_with_message() {
        let dir = tempdir().unwrap();
        let fake = Arc::new(FakeCollaborators {
            fail_metadata: true,
            ..FakeCollaborators::new()
        });
        let state = AppState {
            service: service_with(fake, dir.path()),
        };

        let err = transcript_ja(State(state), Query(query("gone")))
            .await
            .unwrap_err();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert!(
            body["error"]
                .as_str()
                .unwrap()
                .contains("Video unavailable")
        );
    }

    #[tokio::test]
    async fn cached_routes_list_and_stream() {
        let dir = tempdir().unwrap();
        let service = service_with(Arc::new(FakeCollaborators::new()), dir.path());
        let state = AppState { service };

        transcript_zh(State(state.clone()), Query(query("abc123")))
            .await
            .unwrap();

        let listed = list_cached(State(state.clone()), AxumPath("zh".into()))
            .await
            .unwrap();
        assert_eq!(listed.0.len(), 1);
        assert_eq!(listed.0[0].video_id, "abc123");

        let response = download_cached(
            State(state.clone()),
            AxumPath(("zh".into(), "abc123".into())),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["videoId"], "abc123");

        let err = download_cached(State(state.clone()), AxumPath(("zh".into(), "nope".into())))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        std::fs::create_dir(dir.path().join("zh/folder.json")).unwrap();
        let err = download_cached(State(state.clone()), AxumPath(("zh".into(), "folder".into())))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err = list_cached(State(state), AxumPath("fr".into()))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn router_serves_get_only_with_cors() {
        let dir = tempdir().unwrap();
        let app = router(service_with(
            Arc::new(FakeCollaborators::new()),
            dir.path(),
        ));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        task::spawn_blocking(move || {
            let base = format!("http://{addr}");

            let ok = ureq::get(&format!("{base}/ko?videoId=abc123"))
                .set("Origin", "https://frontend.example")
                .call()
                .unwrap();
            assert_eq!(ok.status(), 200);
            assert_eq!(ok.header("access-control-allow-origin"), Some("*"));
            let body: Value = ok.into_json().unwrap();
            assert_eq!(body["transcripts"]["ko"][0]["text"], "hello");

            match ureq::post(&format!("{base}/ko?videoId=abc123")).call() {
                Err(ureq::Error::Status(code, _)) => assert_eq!(code, 405),
                other => panic!("expected 405, got {other:?}"),
            }

            match ureq::get(&format!("{base}/ja")).call() {
                Err(ureq::Error::Status(code, response)) => {
                    assert_eq!(code, 400);
                    let body: Value = response.into_json().unwrap();
                    assert_eq!(body, serde_json::json!({"error": MISSING_VIDEO_ID}));
                }
                other => panic!("expected 400, got {other:?}"),
            }

            match ureq::get(&format!("{base}/fr?videoId=abc123")).call() {
                Err(ureq::Error::Status(code, _)) => assert_eq!(code, 404),
                other => panic!("expected 404, got {other:?}"),
            }
        })
        .await
        .unwrap();
    }
}
