#![allow(dead_code)]

use axum::{
    extract::State,
    http::{
        StatusCode,
        Uri,
    },
    response::{
        IntoResponse,
        Response,
    },
    Router,
};
use inventory_collector_config::{
    Settings,
    Target,
};
use inventory_collector_core::{
    document_channel,
    ArchiveWriter,
    CollectionError,
    Collector,
    ControllerApi,
    ModelApi,
    RunSummary,
    RunTimestamp,
};
use inventory_collector_juju::{
    JujuError,
    ModelSummary,
};
use serde_json::Value;
use std::{
    collections::HashMap,
    fs::File,
    future::Future,
    io::Read,
    path::Path,
    pin::Pin,
    sync::{
        Arc,
        Mutex,
    },
    time::Duration,
};

pub const TIMESTAMP: &str = "20240101120000";

pub fn settings(collection_path: &Path) -> Settings {
    Settings {
        collection_path: collection_path.to_path_buf(),
        customer: "foo".to_string(),
        site: "bar".to_string(),
    }
}

pub fn target(endpoint: &str, hostname: &str, model: &str) -> Target {
    Target {
        endpoint: endpoint.to_string(),
        hostname: hostname.to_string(),
        customer: "foo".to_string(),
        site: "bar".to_string(),
        model: model.to_string(),
    }
}

/// Every member of the tarball at `path` as `(name, content)`, in archive order.
pub fn read_archive(path: &Path) -> Vec<(String, String)> {
    let mut archive = tar::Archive::new(File::open(path).unwrap());
    archive
        .entries()
        .unwrap()
        .map(|member| {
            let mut member = member.unwrap();
            let name = member.path().unwrap().to_string_lossy().into_owned();
            let mut content = String::new();
            member.read_to_string(&mut content).unwrap();
            (name, content)
        })
        .collect()
}

/// File names in `dir`, sorted.
pub fn archive_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<_> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// A shared, ordered log of what the fakes were asked to do.
#[derive(Debug, Clone, Default)]
pub struct Events(Arc<Mutex<Vec<String>>>);

impl Events {
    pub fn push(&self, event: impl Into<String>) {
        self.0.lock().unwrap().push(event.into());
    }

    pub fn all(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

/// How the fake exporter answers one inventory path.
#[derive(Debug, Clone)]
pub enum Reply {
    Body(String),
    Status(StatusCode),
    Stall(Duration),
}

struct ExporterState {
    replies: HashMap<String, Reply>,
    events: Events,
}

/// An HTTP exporter on a random local port. Paths without a configured reply answer
/// `<path>-data`.
pub struct FakeExporter {
    pub endpoint: String,
    pub events: Events,
}

impl FakeExporter {
    pub async fn spawn(replies: Vec<(&str, Reply)>) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = listener.local_addr().unwrap().to_string();
        let events = Events::default();
        let state = Arc::new(ExporterState {
            replies: replies
                .into_iter()
                .map(|(path, reply)| (path.to_string(), reply))
                .collect(),
            events: events.clone(),
        });

        let app = Router::new().fallback(serve_inventory).with_state(state);
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { endpoint, events }
    }
}

async fn serve_inventory(State(state): State<Arc<ExporterState>>, uri: Uri) -> Response {
    let path = uri.path().trim_start_matches('/').to_string();
    state.events.push(path.clone());

    match state.replies.get(&path).cloned() {
        Some(Reply::Body(body)) => body.into_response(),
        Some(Reply::Status(status)) => status.into_response(),
        Some(Reply::Stall(delay)) => {
            tokio::time::sleep(delay).await;
            format!("{path}-data").into_response()
        }
        None => format!("{path}-data").into_response(),
    }
}

/// What one fake model answers.
#[derive(Debug, Clone)]
pub struct FakeModelSpec {
    pub name: String,
    pub status: Result<Value, String>,
    pub bundle: Result<String, String>,
}

impl FakeModelSpec {
    pub fn new(name: &str, bundle: &str) -> Self {
        Self {
            name: name.to_string(),
            status: Ok(serde_json::json!({"model": {"name": name}})),
            bundle: Ok(bundle.to_string()),
        }
    }

    pub fn with_bundle_error(mut self, message: &str) -> Self {
        self.bundle = Err(message.to_string());
        self
    }

    pub fn with_status_error(mut self, message: &str) -> Self {
        self.status = Err(message.to_string());
        self
    }
}

/// An in-memory controller recording connects and disconnects in `events`.
pub struct FakeController {
    models: Vec<FakeModelSpec>,
    pub events: Events,
}

impl FakeController {
    pub fn new(models: Vec<FakeModelSpec>) -> Self {
        Self {
            models,
            events: Events::default(),
        }
    }
}

impl ControllerApi for FakeController {
    type Model = FakeModel;

    fn list_models(&mut self) -> Pin<Box<dyn Future<Output = Result<Vec<ModelSummary>, JujuError>> + Send + '_>> {
        self.events.push("list models");
        let models = self
            .models
            .iter()
            .enumerate()
            .map(|(index, model)| ModelSummary::new(&model.name, format!("uuid-{index}")))
            .collect();
        Box::pin(async move { Ok(models) })
    }

    fn model<'a>(
        &'a mut self,
        model: &'a ModelSummary,
    ) -> Pin<Box<dyn Future<Output = Result<Self::Model, JujuError>> + Send + 'a>> {
        self.events.push(format!("open {}", model.name));
        let spec = self
            .models
            .iter()
            .find(|spec| spec.name == model.name)
            .cloned()
            .ok_or_else(|| JujuError::api("not found", format!("model {} not found", model.name)));
        let events = self.events.clone();
        Box::pin(async move { spec.map(|spec| FakeModel { spec, events }) })
    }

    fn disconnect(self) -> Pin<Box<dyn Future<Output = Result<(), JujuError>> + Send>> {
        self.events.push("disconnect controller");
        Box::pin(async { Ok(()) })
    }
}

pub struct FakeModel {
    spec: FakeModelSpec,
    events: Events,
}

impl ModelApi for FakeModel {
    fn status(&mut self) -> Pin<Box<dyn Future<Output = Result<Value, JujuError>> + Send + '_>> {
        self.events.push(format!("status {}", self.spec.name));
        let status = self.spec.status.clone().map_err(|message| JujuError::api("", message));
        Box::pin(async move { status })
    }

    fn export_bundle(&mut self) -> Pin<Box<dyn Future<Output = Result<String, JujuError>> + Send + '_>> {
        self.events.push(format!("export {}", self.spec.name));
        let bundle = self.spec.bundle.clone().map_err(|message| JujuError::api("", message));
        Box::pin(async move { bundle })
    }

    fn disconnect(self) -> Pin<Box<dyn Future<Output = Result<(), JujuError>> + Send>> {
        self.events.push(format!("disconnect {}", self.spec.name));
        Box::pin(async { Ok(()) })
    }
}

pub fn timestamp() -> RunTimestamp {
    TIMESTAMP.parse().unwrap()
}

/// Runs one collector against a fresh archive writer, returning what the collector and the writer
/// each reported.
pub async fn run_collector(
    collector: &mut impl Collector,
    collection_path: &Path,
) -> (Result<(), CollectionError>, Result<RunSummary, CollectionError>) {
    let timestamp = timestamp();
    let (documents, receiver) = document_channel();
    let writer = ArchiveWriter::new(collection_path);
    let writing = tokio::task::spawn_blocking(move || writer.consume(receiver));

    let collected = collector.collect(&timestamp, &documents).await;
    drop(documents);
    (collected, writing.await.unwrap())
}
