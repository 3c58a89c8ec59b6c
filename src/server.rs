//! Completion proxy: the only place holding the completion credential.
//!
//! `POST /api/chat` relays a question to the host, `GET /api/config` reports whether a
//! live backend is configured. Backend failures never surface as HTTP errors.

use crate::{
    ai::{ChatRelay, CompletionBackend, OpenAIBackend},
    api::{ChatRequest, ChatResponse, ConfigResponse, ErrorResponse},
    error::Result,
    mock,
    settings::Settings,
};
use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use std::{future::Future, net::SocketAddr, sync::Arc};
use tokio::{net::TcpListener, task::JoinHandle};
use tower_http::cors::CorsLayer;

pub struct ServerState<B> {
    relay: Option<ChatRelay<B>>,
    base_url: String,
    environment: String,
}

impl<B: CompletionBackend> ServerState<B> {
    /// `relay` is `None` when no credential is configured; the proxy then
    /// answers with canned replies.
    pub fn new(relay: Option<ChatRelay<B>>, base_url: &str, environment: &str) -> Self {
        Self {
            relay,
            base_url: base_url.to_string(),
            environment: environment.to_string(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.relay.is_some()
    }
}

impl ServerState<OpenAIBackend> {
    pub fn from_settings(settings: &Settings) -> Self {
        let relay = settings.api_key().map(|api_key| {
            ChatRelay::new(
                OpenAIBackend::new(api_key, &settings.base_url),
                settings.relay_options(),
            )
        });
        Self::new(relay, &settings.base_url, &settings.environment)
    }
}

pub fn router<B: CompletionBackend + 'static>(state: Arc<ServerState<B>>) -> Router {
    Router::new()
        .route(
            "/api/chat",
            post(chat::<B>)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .route(
            "/api/config",
            get(config::<B>)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn chat<B: CompletionBackend + 'static>(
    State(state): State<Arc<ServerState<B>>>,
    payload: std::result::Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            log::warn!("Rejected chat body: {rejection}");
            return missing_fields();
        }
    };
    let question = request.user_question.filter(|question| !question.is_empty());
    let (Some(question), Some(game)) = (question, request.game) else {
        return missing_fields();
    };

    let response = match &state.relay {
        Some(relay) => relay.ask(&question, &game, &request.chat_history).await,
        None => canned_reply(),
    };
    Json(ChatResponse { response }).into_response()
}

async fn config<B: CompletionBackend + 'static>(
    State(state): State<Arc<ServerState<B>>>,
) -> Json<ConfigResponse> {
    Json(ConfigResponse {
        openai_configured: state.is_configured(),
        base_url: state.base_url.clone(),
        environment: state.environment.clone(),
    })
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn method_not_allowed() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorResponse::new("Method not allowed")),
    )
}

fn missing_fields() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::new("Missing required fields")),
    )
        .into_response()
}

fn canned_reply() -> String {
    mock::canned_reply(&mut rand::rng()).to_string()
}

pub async fn run<B, F>(listener: TcpListener, state: ServerState<B>, shutdown: F) -> Result<()>
where
    B: CompletionBackend + 'static,
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(Arc::new(state)))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

/// Runs the proxy on the configured address until Ctrl-C.
pub async fn serve(settings: &Settings) -> Result<()> {
    let addr = settings.listen_addr()?;
    let listener = TcpListener::bind(addr).await?;
    let state = ServerState::from_settings(settings);
    log::info!(
        "Proxy listening on {} (live backend: {})",
        listener.local_addr()?,
        state.is_configured()
    );
    run(listener, state, async {
        let _ = tokio::signal::ctrl_c().await;
        log::info!("Proxy shutting down");
    })
    .await
}

/// Starts a proxy on an ephemeral loopback port for the terminal client.
pub async fn spawn_embedded(settings: &Settings) -> Result<(SocketAddr, JoinHandle<()>)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = ServerState::from_settings(settings);
    log::info!(
        "Embedded proxy on {addr} (live backend: {})",
        state.is_configured()
    );
    let handle = tokio::spawn(async move {
        if let Err(e) = run(listener, state, std::future::pending()).await {
            log::error!("Embedded proxy stopped: {e:#}");
        }
    });
    Ok((addr, handle))
}
