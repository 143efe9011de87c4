//! Contract tests for the HTTP service against a local axum server that
//! plays the part of the cloning/synthesis backend.

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use vocalclone_core::api::{
    ApiError, AudioFile, AudioService, CloneRequest, Flow, HttpAudioService, SynthesisRequest,
};
use vocalclone_core::download::Downloader;
use vocalclone_core::panel::{Factor, PanelActor, PanelEvent};
use vocalclone_core::Settings;

#[derive(Debug, Clone)]
struct ReceivedPart {
    name: String,
    file_name: Option<String>,
    content_type: Option<String>,
    data: Vec<u8>,
}

#[derive(Clone, Default)]
struct Recorded {
    parts: Arc<Mutex<Vec<ReceivedPart>>>,
    json_bodies: Arc<Mutex<Vec<Value>>>,
}

async fn clone_audio(State(recorded): State<Recorded>, mut multipart: Multipart) -> Json<Value> {
    while let Ok(Some(field)) = multipart.next_field().await {
        let part = ReceivedPart {
            name: field.name().unwrap_or("").to_string(),
            file_name: field.file_name().map(str::to_string),
            content_type: field.content_type().map(str::to_string),
            data: field.bytes().await.unwrap().to_vec(),
        };
        recorded.parts.lock().unwrap().push(part);
    }
    Json(json!({ "audio_url": "/tmp/a.mp3" }))
}

async fn text_to_speech(State(recorded): State<Recorded>, Json(body): Json<Value>) -> Json<Value> {
    recorded.json_bodies.lock().unwrap().push(body);
    Json(json!({ "audio_url": "https://cdn.example.com/speech.mp3" }))
}

async fn start_server() -> (SocketAddr, Recorded) {
    let recorded = Recorded::default();
    let app = Router::new()
        .route("/api/clone-audio", post(clone_audio))
        .route("/api/text-to-speech", post(text_to_speech))
        .route("/missing", post(|| async { Json(json!({ "status": "ok" })) }))
        .route("/html", post(|| async { "<html>Bad Gateway</html>" }))
        .route(
            "/error",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "model crashed") }),
        )
        .route(
            "/error-with-url",
            post(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "audio_url": "/tmp/c.mp3" })),
                )
            }),
        )
        .route(
            "/accepted",
            post(|| async { (StatusCode::ACCEPTED, Json(json!({ "audio_url": "/tmp/s.mp3" }))) }),
        )
        .route(
            "/not-found-json",
            post(|| async { (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not Found" }))) }),
        )
        .route(
            "/slow",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({ "audio_url": "/late.mp3" }))
            }),
        )
        .route("/tmp/a.mp3", get(|| async { b"ID3-cloned".to_vec() }))
        .layer(DefaultBodyLimit::disable())
        .with_state(recorded.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, recorded)
}

fn settings_for(addr: SocketAddr) -> Settings {
    Settings {
        base_url: format!("http://{addr}"),
        ..Settings::default()
    }
}

fn sample(dir: &TempDir, name: &str, size: usize) -> AudioFile {
    let path = dir.path().join(name);
    std::fs::write(&path, vec![7u8; size]).unwrap();
    AudioFile::from_path(path).unwrap()
}

#[tokio::test]
async fn test_clone_sends_three_part_multipart() {
    let (addr, recorded) = start_server().await;
    let service = HttpAudioService::from_settings(&settings_for(addr)).unwrap();
    let dir = TempDir::new().unwrap();

    let request = CloneRequest {
        file: sample(&dir, "sample.mp3", 2 * 1024 * 1024),
        pitch: Factor::new(1.5),
        speed: Factor::new(0.8),
    };
    let result = service.clone_audio(&request).await.unwrap();
    assert_eq!(result.audio_url, "/tmp/a.mp3");

    let parts = recorded.parts.lock().unwrap().clone();
    assert_eq!(parts.len(), 3);

    assert_eq!(parts[0].name, "file");
    assert_eq!(parts[0].file_name.as_deref(), Some("sample.mp3"));
    assert_eq!(parts[0].content_type.as_deref(), Some("audio/mpeg"));
    assert_eq!(parts[0].data.len(), 2 * 1024 * 1024);

    assert_eq!(parts[1].name, "pitch");
    assert_eq!(parts[1].data, b"1.5");
    assert_eq!(parts[2].name, "speed");
    assert_eq!(parts[2].data, b"0.8");
}

#[tokio::test]
async fn test_synthesis_posts_json_text() {
    let (addr, recorded) = start_server().await;
    let service = HttpAudioService::from_settings(&settings_for(addr)).unwrap();

    let request = SynthesisRequest {
        text: "Hello \"world\"\n".to_string(),
    };
    let result = service.text_to_speech(&request).await.unwrap();
    assert_eq!(result.audio_url, "https://cdn.example.com/speech.mp3");

    let bodies = recorded.json_bodies.lock().unwrap().clone();
    assert_eq!(bodies, vec![json!({ "text": "Hello \"world\"\n" })]);
}

#[tokio::test]
async fn test_bad_responses_map_to_errors() {
    let (addr, _) = start_server().await;
    let request = SynthesisRequest {
        text: "hi".to_string(),
    };

    let service_for = |endpoint: &str| {
        HttpAudioService::from_settings(&Settings {
            tts_endpoint: endpoint.to_string(),
            ..settings_for(addr)
        })
        .unwrap()
    };

    let err = service_for("/missing").text_to_speech(&request).await.unwrap_err();
    assert!(matches!(err, ApiError::MissingAudioUrl), "{err}");

    let err = service_for("/html").text_to_speech(&request).await.unwrap_err();
    assert!(matches!(err, ApiError::MalformedResponse(_)), "{err}");

    let err = service_for("/error").text_to_speech(&request).await.unwrap_err();
    match err {
        ApiError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "model crashed");
        }
        other => panic!("Expected status error, got {other}"),
    }

    let err = service_for("/not-found-json")
        .text_to_speech(&request)
        .await
        .unwrap_err();
    match err {
        ApiError::Status { status, body } => {
            assert_eq!(status, 404);
            assert!(body.contains("Not Found"), "{body}");
        }
        other => panic!("Expected status error, got {other}"),
    }
}

#[tokio::test]
async fn test_audio_url_in_body_wins_over_status() {
    let (addr, _) = start_server().await;
    let request = SynthesisRequest {
        text: "hi".to_string(),
    };

    for (endpoint, expected) in [("/accepted", "/tmp/s.mp3"), ("/error-with-url", "/tmp/c.mp3")] {
        let service = HttpAudioService::from_settings(&Settings {
            tts_endpoint: endpoint.to_string(),
            ..settings_for(addr)
        })
        .unwrap();
        let result = service.text_to_speech(&request).await.unwrap();
        assert_eq!(result.audio_url, expected, "{endpoint}");
    }
}

#[tokio::test]
async fn test_transport_and_file_errors() {
    // Nothing listens on a freshly released port
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let service = HttpAudioService::from_settings(&settings_for(addr)).unwrap();

    let err = service
        .text_to_speech(&SynthesisRequest {
            text: "hi".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)), "{err}");

    let missing = CloneRequest {
        file: AudioFile::from_path("/definitely/not/here.wav").unwrap(),
        pitch: Factor::default(),
        speed: Factor::default(),
    };
    let err = service.clone_audio(&missing).await.unwrap_err();
    assert!(matches!(err, ApiError::File { .. }), "{err}");
}

#[tokio::test]
async fn test_configured_timeout_applies() {
    let (addr, _) = start_server().await;
    let service = HttpAudioService::from_settings(&Settings {
        tts_endpoint: "/slow".to_string(),
        request_timeout_secs: Some(1),
        ..settings_for(addr)
    })
    .unwrap();

    let err = service
        .text_to_speech(&SynthesisRequest {
            text: "hi".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)), "{err}");
}

#[tokio::test]
async fn test_download_resolves_relative_url() {
    let (addr, _) = start_server().await;
    let dir = TempDir::new().unwrap();
    let downloader = Downloader::from_settings(&Settings {
        download_dir: Some(dir.path().join("out")),
        ..settings_for(addr)
    })
    .unwrap();

    let path = downloader.download(Flow::Clone, "/tmp/a.mp3").await.unwrap();

    assert_eq!(path, dir.path().join("out").join("cloned_audio.mp3"));
    assert_eq!(std::fs::read(&path).unwrap(), b"ID3-cloned");

    // A second download replaces the first
    std::fs::write(&path, b"stale").unwrap();
    assert_eq!(downloader.existing_target(Flow::Clone), Some(path.clone()));
    let again = downloader.download(Flow::Clone, "/tmp/a.mp3").await.unwrap();
    assert_eq!(again, path);
    assert_eq!(std::fs::read(&path).unwrap(), b"ID3-cloned");
}

#[test]
fn test_panel_end_to_end_over_http() {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let local = tokio::task::LocalSet::new();

    runtime.block_on(local.run_until(async {
        let (addr, recorded) = start_server().await;
        let dir = TempDir::new().unwrap();
        let file = sample(&dir, "voice.wav", 64);

        let (actor, mut event_rx) = PanelActor::builder()
            .settings(Settings {
                download_dir: Some(dir.path().to_path_buf()),
                ..settings_for(addr)
            })
            .build()
            .unwrap();

        actor.select_file(Some(file.path.clone())).unwrap();
        actor.set_pitch(1.5).unwrap();
        actor.set_speed(0.8).unwrap();
        actor.submit(Flow::Clone).unwrap();

        loop {
            match event_rx.recv().await.unwrap() {
                PanelEvent::ResultReady { result, .. } => {
                    assert_eq!(result.audio_url, "/tmp/a.mp3");
                    break;
                }
                PanelEvent::RequestFailed { error, .. } => panic!("Request failed: {error}"),
                _ => {}
            }
        }
        assert_eq!(recorded.parts.lock().unwrap().len(), 3);

        actor.download(Flow::Clone).unwrap();
        loop {
            match event_rx.recv().await.unwrap() {
                PanelEvent::Downloaded { flow, path } => {
                    assert_eq!(flow, Flow::Clone);
                    assert_eq!(std::fs::read(path).unwrap(), b"ID3-cloned");
                    break;
                }
                PanelEvent::Error(e) => panic!("Download failed: {e}"),
                _ => {}
            }
        }

        actor.shutdown().unwrap();
    }));
}
