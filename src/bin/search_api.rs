use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use clap::Parser;
use formsearch::{load_records, run_query, OpenAiEmbedder, QuerySpec, SearchError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "formsearch-api",
    about = "HTTP API serving semantic similarity search over JSON form submissions"
)]
struct ApiCli {
    /// Address to bind the HTTP server to (host:port).
    #[arg(long, env = "FORMSEARCH_BIND", default_value = "127.0.0.1:5000")]
    bind: String,

    /// OpenAI API key used for embeddings.
    #[arg(long, env = "OPENAI_API_KEY")]
    openai_api_key: String,

    /// Embedding model identifier.
    #[arg(
        long,
        env = "FORMSEARCH_OPENAI_MODEL",
        default_value = "text-embedding-3-small"
    )]
    openai_model: String,

    /// Optional embedding dimension override.
    #[arg(long, env = "FORMSEARCH_OPENAI_DIMENSIONS")]
    openai_dimensions: Option<usize>,

    /// Base URL for OpenAI-compatible endpoints.
    #[arg(
        long,
        env = "FORMSEARCH_OPENAI_BASE",
        default_value = "https://api.openai.com/v1"
    )]
    openai_base_url: String,

    /// Max inputs per embedding request.
    #[arg(long, env = "FORMSEARCH_OPENAI_BATCH", default_value_t = 32)]
    batch_size: usize,

    /// Seconds before OpenAI requests time out.
    #[arg(long, env = "FORMSEARCH_OPENAI_TIMEOUT_SECS", default_value_t = 30)]
    openai_timeout_secs: u64,

    /// Retry attempts for transient embedding errors.
    #[arg(long, env = "FORMSEARCH_OPENAI_MAX_RETRIES", default_value_t = 5)]
    max_retries: usize,
}

#[derive(Clone)]
struct AppState {
    embedder: Arc<OpenAiEmbedder>,
}

#[derive(Debug, Deserialize)]
struct QueryRequest {
    /// Path to the JSON file holding the record set.
    #[serde(default)]
    file_path: Option<String>,
    #[serde(default)]
    query: Option<String>,
    #[serde(default)]
    top_k: Option<usize>,
    #[serde(default)]
    fetch_all: bool,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum QueryResponse {
    Success { results: Vec<Value> },
    Error { message: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = ApiCli::parse();
    let embedder = Arc::new(OpenAiEmbedder::new(
        cli.openai_api_key,
        cli.openai_base_url,
        cli.openai_model,
        cli.openai_dimensions,
        Duration::from_secs(cli.openai_timeout_secs.max(1)),
        cli.max_retries.max(1),
        cli.batch_size.max(1),
    )?);
    let state = AppState { embedder };

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/query", post(query_handler))
        .with_state(state);

    let addr: SocketAddr = cli
        .bind
        .parse()
        .with_context(|| format!("invalid bind address {}", cli.bind))?;
    tracing::info!("formsearch-api listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app).await.context("server shutdown")?;
    Ok(())
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

async fn query_handler(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> (StatusCode, Json<QueryResponse>) {
    let Some(file_path) = request.file_path.filter(|path| !path.trim().is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "file path is missing");
    };
    let spec = QuerySpec {
        query_text: request.query,
        top_k: request.top_k,
        fetch_all: request.fetch_all,
    };

    // The embedding client blocks on network I/O, so the whole request-scoped
    // pipeline runs off the async runtime.
    let embedder = state.embedder.clone();
    let start = Instant::now();
    let outcome = tokio::task::spawn_blocking(move || {
        let records = load_records(&file_path)?;
        run_query(embedder.as_ref(), records, &spec)
    })
    .await;

    match outcome {
        Ok(Ok(results)) => {
            tracing::info!(
                results = results.len(),
                latency_ms = start.elapsed().as_millis() as u64,
                "query served"
            );
            (
                StatusCode::OK,
                Json(QueryResponse::Success { results }),
            )
        }
        Ok(Err(err)) => error_response(status_for(&err), &err.to_string()),
        Err(err) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            &format!("query task failed: {err}"),
        ),
    }
}

fn status_for(err: &SearchError) -> StatusCode {
    match err {
        SearchError::Configuration(_)
        | SearchError::EmptyInput(_)
        | SearchError::MalformedRecord(_) => StatusCode::BAD_REQUEST,
        SearchError::EmbeddingProvider(_) => StatusCode::BAD_GATEWAY,
    }
}

fn error_response(status: StatusCode, message: &str) -> (StatusCode, Json<QueryResponse>) {
    (
        status,
        Json(QueryResponse::Error {
            message: message.to_string(),
        }),
    )
}
