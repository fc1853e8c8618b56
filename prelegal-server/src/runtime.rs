use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::response::sse::{Event, Sse};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use futures_util::stream::{self, Stream};
use serde::Deserialize;
use serde_json::{json, Value};
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tower_http::trace::TraceLayer;

use prelegal_assistant::{Assistant, OpenRouterClient};
use prelegal_core::{ChatTurn, DocType, DocumentRegistry, FieldSet};
use prelegal_renderer::Renderer;

use crate::assets::resolve_asset;
use crate::config::{LogFormat, ServerConfig};
use crate::error::{ApiError, ServerError};
use crate::events::{chat_events, ChatEvent};

/// Shared, immutable request state.
#[derive(Clone)]
pub struct AppState {
    assistant: Assistant,
    renderer: Arc<Renderer>,
    static_dir: Arc<PathBuf>,
}

impl AppState {
    pub fn new(assistant: Assistant, renderer: Arc<Renderer>, static_dir: PathBuf) -> Self {
        Self {
            assistant,
            renderer,
            static_dir: Arc::new(static_dir),
        }
    }

    /// Registry, renderer and provider client as described by `config`.
    pub fn from_config(config: &ServerConfig) -> Result<Self, ServerError> {
        let registry = match &config.catalog {
            Some(path) => DocumentRegistry::load_at(path)?,
            None => DocumentRegistry::builtin()?,
        };
        let renderer = Renderer::with_template_dir(config.templates_dir.as_deref())?;
        if config.model.api_key.is_none() {
            tracing::warn!("OPENROUTER_API_KEY is not set; chat requests will fail");
        }
        tracing::info!(
            documents = registry.len(),
            templates = renderer.engine().doc_types().len(),
            model = %config.model.model,
            "loaded document catalog"
        );
        let model = Arc::new(OpenRouterClient::new(config.model.clone()));
        let assistant = Assistant::new(Arc::new(registry), model);
        Ok(Self::new(assistant, Arc::new(renderer), config.static_dir.clone()))
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatTurn>,
    #[serde(default)]
    pub fields: FieldSet,
    #[serde(default)]
    pub doc_type: DocType,
}

#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    #[serde(default)]
    pub doc_type: DocType,
    #[serde(default)]
    pub fields: FieldSet,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/chat", post(chat))
        .route("/api/preview", post(preview))
        .fallback(static_asset)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>> + Send + 'static>, ApiError> {
    let assistant = state.assistant.clone();
    let ChatRequest {
        messages,
        fields,
        doc_type,
    } = request;

    let result = tokio::task::spawn_blocking(move || {
        assistant.chat(&messages, &fields, doc_type.as_str())
    })
    .await
    .map_err(|err| ApiError::Internal(format!("chat task join error: {err}")))??;

    if let Some(doc_type) = &result.detected_doc_type {
        tracing::info!(doc_type = %doc_type, "classifier detected document type");
    }
    let events: Vec<Result<Event, axum::Error>> = chat_events(&result)
        .iter()
        .map(|event: &ChatEvent| Event::default().json_data(event))
        .collect();
    Ok(Sse::new(stream::iter(events)))
}

async fn preview(
    State(state): State<AppState>,
    Json(request): Json<PreviewRequest>,
) -> Result<Json<Value>, ApiError> {
    let html = state
        .renderer
        .render(request.doc_type.as_str(), &request.fields)?;
    Ok(Json(json!({ "html": html })))
}

async fn static_asset(State(state): State<AppState>, request: Request) -> Response {
    let root = state.static_dir.as_path();
    if !root.is_dir() {
        return Json(json!({ "error": "Frontend not built" })).into_response();
    }
    let path = resolve_asset(root, request.uri().path());
    match ServeFile::new(path).oneshot(request).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}

/// Serve until ctrl-c.
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    let app = router(AppState::from_config(&config)?);
    let listener = tokio::net::TcpListener::bind(config.bind.as_str())
        .await
        .map_err(|source| ServerError::Bind {
            addr: config.bind.clone(),
            source,
        })?;
    tracing::info!(
        addr = %config.bind,
        static_dir = %config.static_dir.display(),
        "prelegal listening"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Serve)
}

/// Start the server and block the current thread until it exits.
pub fn start_blocking(config: ServerConfig) -> Result<(), ServerError> {
    init_tracing(config.log_format);
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(ServerError::Runtime)?;
    runtime.block_on(run(config))
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("received ctrl-c, shutting down"),
        Err(err) => {
            tracing::error!(error = %err, "ctrl-c handler failed");
            std::future::pending::<()>().await;
        }
    }
}

pub fn init_tracing(format: LogFormat) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = match format {
        LogFormat::Json => fmt()
            .json()
            .with_env_filter(filter)
            .with_target(false)
            .try_init(),
        LogFormat::Text => fmt().with_env_filter(filter).with_target(false).try_init(),
    };
}
