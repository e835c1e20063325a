//! # SupportBot HTTP Handlers
//!
//! File: cli/src/commands/srv/handlers.rs
//!
//! ## Overview
//!
//! JSON endpoints behind `supportbot srv`, used by the chat widget and the
//! FAQ page:
//!
//! | Method | Path                        | Purpose                               |
//! |--------|-----------------------------|---------------------------------------|
//! | GET    | `/api/health`               | liveness                              |
//! | POST   | `/api/chat`                 | answer `{query, tone?}`               |
//! | GET    | `/api/faq`                  | search/paginate FAQ items             |
//! | GET    | `/api/faq/categories`       | category list                         |
//! | GET    | `/api/faq/helpful?ids=a,b`  | helpful counts per id                 |
//! | GET    | `/api/faq/{id}`             | one item plus its plain-text answer   |
//! | POST   | `/api/faq/{id}/helpful`     | mark an item helpful                  |
//!
//! ## Errors
//!
//! Failures are returned as `{"error": "..."}` with a status chosen from the
//! `SupportError` variant: bad input 400, unknown item 404, repeat vote 409,
//! vote storage failure 502, anything else 500.
//!
use crate::common::network::build_http_client;
use crate::common::network::ip::UNKNOWN_IP;
use crate::common::network::votes::{cast_vote, VoteBackend, VoteGuard};
use crate::core::config::Config;
use crate::core::error::{Result, SupportError};
use crate::data::faq::{FaqItem, FaqPage, FaqQuery};
use crate::data::FaqCatalog;
use crate::engine::{Assistant, Reply, Tone};
use anyhow::Context;
use axum::extract::{ConnectInfo, Path, Query, State};
use axum::http::{Extensions, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Shared, read-mostly state of the API server.
pub struct AppState {
    pub assistant: Assistant,
    pub catalog: FaqCatalog,
    pub votes: VoteBackend,
    pub guard: VoteGuard,
    pub page_size: usize,
}

impl AppState {
    /// Loads data files and vote storage from the configuration.
    pub fn load(config: &Config) -> Result<Self> {
        let assistant = Assistant::load(config)?;
        let faq_path = config.data.faq_path();
        let catalog = FaqCatalog::load(&faq_path)
            .with_context(|| format!("Failed to load FAQ from {}", faq_path.display()))?;
        let votes = VoteBackend::from_config(&config.votes, build_http_client(&config.votes)?);
        Ok(Self {
            assistant,
            catalog,
            votes,
            guard: VoteGuard::default(),
            page_size: config.faq.page_size,
        })
    }
}

pub type SharedState = Arc<AppState>;

/// Error type returned by every handler.
pub struct ApiError(anyhow::Error);

impl<E: Into<anyhow::Error>> From<E> for ApiError {
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self.0.downcast_ref::<SupportError>() {
            Some(SupportError::EmptyQuery) | Some(SupportError::UnknownTone(_)) => {
                StatusCode::BAD_REQUEST
            }
            Some(SupportError::FaqNotFound { .. }) => StatusCode::NOT_FOUND,
            Some(SupportError::AlreadyVoted { .. }) => StatusCode::CONFLICT,
            Some(SupportError::VoteBackend(_)) | Some(SupportError::Http { .. }) => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {:#}", self.0);
        } else {
            debug!("Request rejected ({}): {}", status, self.0);
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    query: String,
    #[serde(default)]
    tone: Option<String>,
}

pub async fn chat(State(state): State<SharedState>, Json(request): Json<ChatRequest>) -> ApiResult<Reply> {
    let tone = match request.tone.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        Some("auto") => None,
        Some(raw) => Some(raw.parse::<Tone>()?),
        None => state.assistant.default_tone(),
    };
    let reply = state
        .assistant
        .reply(&request.query, tone, chrono::Local::now().date_naive())?;
    debug!("Chat reply found={} tone={}", reply.found, reply.tone);
    Ok(Json(reply))
}

pub async fn list_faq(State(state): State<SharedState>, Query(query): Query<FaqQuery>) -> Json<FaqPage> {
    Json(state.catalog.search(&query, state.page_size))
}

pub async fn faq_categories(State(state): State<SharedState>) -> Json<Vec<String>> {
    Json(state.catalog.categories())
}

#[derive(Debug, Serialize)]
pub struct FaqDetail {
    #[serde(flatten)]
    item: FaqItem,
    plain_text: String,
}

pub async fn faq_item(State(state): State<SharedState>, Path(id): Path<String>) -> ApiResult<FaqDetail> {
    let item = state
        .catalog
        .get(&id)
        .ok_or(SupportError::FaqNotFound { id })?;
    Ok(Json(FaqDetail {
        plain_text: item.plain_text(),
        item: item.clone(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct HelpfulQuery {
    #[serde(default)]
    ids: Option<String>,
}

pub async fn helpful_counts(
    State(state): State<SharedState>,
    Query(query): Query<HelpfulQuery>,
) -> ApiResult<BTreeMap<String, u64>> {
    let ids: Vec<String> = query
        .ids
        .as_deref()
        .unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect();
    let counts = state.votes.counts(&ids).await?;
    Ok(Json(counts.into_iter().collect()))
}

#[derive(Debug, Serialize)]
pub struct VoteResponse {
    faq_id: String,
    count: u64,
}

pub async fn mark_helpful(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    extensions: Extensions,
) -> ApiResult<VoteResponse> {
    if state.catalog.get(&id).is_none() {
        return Err(SupportError::FaqNotFound { id }.into());
    }
    let voter = voter_identity(&headers, &extensions);
    info!("Helpful vote for '{}' from {}", id, voter);
    let count = cast_vote(&state.votes, &state.guard, &id, &voter).await?;
    Ok(Json(VoteResponse { faq_id: id, count }))
}

/// The first `X-Forwarded-For` address, else the peer address, else
/// `"unknown"`.
fn voter_identity(headers: &HeaderMap, extensions: &Extensions) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty());
    if let Some(ip) = forwarded {
        return ip.to_string();
    }
    extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_IP.to_string())
}
