#![allow(dead_code)]

use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    io,
    sync::{Arc, Mutex},
};

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use shareoxide_shorten::{
    page::{LINK_INPUT_ID, SHORTLINK_INPUT_ID},
    Page, SubmitEvent,
};
use tokio::net::TcpListener;
use tracing::subscriber::DefaultGuard;
use url::Url;

pub const ERROR_ALERT: &str = "An error occurred while shortening the URL. Please try again.";

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub content_type: Option<String>,
    pub body: Value,
}

#[derive(Clone, Default)]
pub struct Recorder(Arc<Mutex<Vec<RecordedRequest>>>);

impl Recorder {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.0.lock().unwrap().clone()
    }
}

/// Serves `/api/link` on a random local port, answering every POST with `status`.
pub async fn spawn_link_api(status: StatusCode) -> (Url, Recorder) {
    let recorder = Recorder::default();

    let app = Router::new()
        .route(
            "/api/link",
            post(
                move |State(recorder): State<Recorder>, headers: HeaderMap, body: String| async move {
                    recorder.0.lock().unwrap().push(RecordedRequest {
                        content_type: headers
                            .get(header::CONTENT_TYPE)
                            .and_then(|value| value.to_str().ok())
                            .map(str::to_string),
                        body: serde_json::from_str(&body).unwrap_or(Value::Null),
                    });
                    status
                },
            )
            .get(move || async move {
                if status.is_success() {
                    Json(json!([
                        { "id": "k3n9", "url": "https://example.com", "shortcuts": ["docs"] }
                    ]))
                    .into_response()
                } else {
                    (status, Json(json!({ "error": "nope" }))).into_response()
                }
            }),
        )
        .with_state(recorder.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

    (Url::parse(&format!("http://{addr}")).unwrap(), recorder)
}

/// A base URL nothing listens on.
pub async fn unreachable_base_url() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    Url::parse(&format!("http://{addr}")).unwrap()
}

#[derive(Default)]
pub struct RecordingPage {
    inputs: HashMap<&'static str, String>,
    pub alerts: RefCell<Vec<String>>,
    pub reloads: Cell<usize>,
}

impl RecordingPage {
    pub fn new(link: &str, shortlink: &str) -> Self {
        Self {
            inputs: HashMap::from([
                (LINK_INPUT_ID, link.to_string()),
                (SHORTLINK_INPUT_ID, shortlink.to_string()),
            ]),
            ..Default::default()
        }
    }
}

impl Page for RecordingPage {
    fn input_value(&self, id: &str) -> Option<String> {
        self.inputs.get(id).cloned()
    }

    fn alert(&self, message: &str) {
        self.alerts.borrow_mut().push(message.to_string());
    }

    fn reload(&self) {
        self.reloads.set(self.reloads.get() + 1);
    }
}

#[derive(Default)]
pub struct FormSubmit {
    pub prevented: Cell<bool>,
}

impl SubmitEvent for FormSubmit {
    fn prevent_default(&self) {
        self.prevented.set(true);
    }
}

/// Collects everything logged on the current thread while the guard from
/// [`CapturedLogs::install`] is alive.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn install(&self) -> DefaultGuard {
        let logs = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .without_time()
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(move || logs.clone())
            .finish();

        tracing::subscriber::set_default(subscriber)
    }

    /// Lines logged at `level`, e.g. `"ERROR"`.
    pub fn lines_at(&self, level: &str) -> Vec<String> {
        String::from_utf8_lossy(&self.0.lock().unwrap())
            .lines()
            .filter(|line| line.trim_start().starts_with(level))
            .map(str::to_string)
            .collect()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
