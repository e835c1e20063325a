//! # SupportBot Server Logic
//!
//! File: cli/src/commands/srv/server_logic.rs
//!
//! ## Overview
//!
//! Builds the `axum` router and runs it:
//!
//! - finds a free port, trying up to 10 consecutive ports from the requested one
//! - mounts the JSON API under `/api` and, when configured, the widget
//!   directory as the fallback service
//! - wraps everything in request tracing and (unless disabled) permissive CORS
//! - shuts down gracefully on Ctrl+C or SIGTERM
//!
use super::config::ServerConfig;
use super::handlers::{self, SharedState};
use crate::core::error::Result;
use anyhow::Context;
use axum::routing::{get, post};
use axum::Router;
use std::net::{IpAddr, SocketAddr};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, warn, Level};

const MAX_PORT_ATTEMPTS: u8 = 10;

pub async fn run_server(config: ServerConfig, state: SharedState) -> Result<()> {
    let addr = find_available_port(config.host, config.port, MAX_PORT_ATTEMPTS).await?;
    let app = create_app(&config, state);

    println!("\n=================================================================");
    println!("🤖 SupportBot API:    http://{}/api", addr);
    match &config.widget_dir {
        Some(dir) => println!("📂 Widget files:      {}", dir.display()),
        None => println!("📂 Widget files:      (none)"),
    }
    println!("🔒 CORS enabled:      {}", config.enable_cors);
    println!("=================================================================\n");
    println!("Server starting! Press Ctrl+C to stop.");

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind TCP listener to address {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("HTTP server failed")?;

    println!("\nServer shutdown complete.");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, initiating graceful shutdown..."),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
                info!("Received SIGTERM, initiating graceful shutdown...");
            }
            Err(e) => {
                error!(
                    "Failed to install SIGTERM handler: {}. Shutdown on SIGTERM might not work.",
                    e
                );
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

async fn find_available_port(host: IpAddr, start_port: u16, max_attempts: u8) -> Result<SocketAddr> {
    let mut current_port = start_port;

    for attempt in 0..max_attempts {
        let addr = SocketAddr::new(host, current_port);
        match TcpListener::bind(addr).await {
            Ok(listener) => {
                drop(listener);
                if attempt > 0 {
                    info!(
                        "Port {} was unavailable, using port {} instead.",
                        start_port, current_port
                    );
                }
                return Ok(addr);
            }
            Err(e) => {
                warn!(
                    "Attempt {}: port {} on host {} is unavailable ({}). Trying next port...",
                    attempt + 1,
                    current_port,
                    host,
                    e
                );
                current_port = match current_port.checked_add(1) {
                    Some(next) => next,
                    None => break,
                };
            }
        }
    }

    anyhow::bail!(
        "Could not find an available port on host {} starting from port {} after trying {} ports.",
        host,
        start_port,
        max_attempts
    )
}

pub(crate) fn create_app(config: &ServerConfig, state: SharedState) -> Router {
    let cors_layer = if config.enable_cors {
        info!("CORS middleware enabled (permissive).");
        CorsLayer::permissive()
    } else {
        info!("CORS middleware disabled.");
        CorsLayer::new()
    };

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::default().include_headers(false))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let api = Router::new()
        .route("/health", get(handlers::health))
        .route("/chat", post(handlers::chat))
        .route("/faq", get(handlers::list_faq))
        .route("/faq/categories", get(handlers::faq_categories))
        .route("/faq/helpful", get(handlers::helpful_counts))
        .route("/faq/{id}", get(handlers::faq_item))
        .route("/faq/{id}/helpful", post(handlers::mark_helpful))
        .with_state(state);

    let mut app = Router::new().nest("/api", api);
    if let Some(dir) = &config.widget_dir {
        info!("Serving widget files from {}", dir.display());
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(
        ServiceBuilder::new()
            .layer(trace_layer)
            .layer(cors_layer),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::network::votes::{MemoryVotes, VoteBackend, VoteGuard};
    use crate::core::config::ChatConfig;
    use crate::data::{ChatbotDataset, FaqCatalog, KnowledgeBase};
    use crate::engine::Assistant;
    use super::handlers::AppState;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use std::net::Ipv4Addr;
    use std::sync::Arc;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn state() -> SharedState {
        let knowledge = KnowledgeBase::from_json(
            r#"{ "knowledge_base": { "cancel": {
                "keywords": { "primary": ["취소"] },
                "responses": {
                    "formal": { "content": "승인번호로 취소하실 수 있습니다." },
                    "casual": { "content": "승인번호로 취소하면 돼." }
                },
                "follow_up_questions": ["수정발행은요?"] } } }"#,
        )
        .unwrap();
        let catalog = FaqCatalog::from_json(
            r#"{ "categories": ["세금계산서", "포인트"],
                 "items": [
                    { "id": "faq-1", "question": "계산서 취소", "category": "세금계산서",
                      "content": [ { "type": "text", "text": "승인번호로 취소합니다." } ] },
                    { "id": "faq-2", "question": "포인트 충전", "category": "포인트",
                      "answer": "충전 메뉴를 이용하세요." }
                 ] }"#,
        )
        .unwrap();
        Arc::new(AppState {
            assistant: Assistant::new(knowledge, ChatbotDataset::default(), ChatConfig::default()),
            catalog,
            votes: VoteBackend::Memory(MemoryVotes::default()),
            guard: VoteGuard::default(),
            page_size: 10,
        })
    }

    fn app() -> Router {
        create_app(&ServerConfig::default(), state())
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_find_available_port_start_is_free() -> Result<()> {
        let host = Ipv4Addr::LOCALHOST.into();
        let addr = find_available_port(host, 50100, 5).await?;
        assert_eq!(addr.port(), 50100);
        assert_eq!(addr.ip(), host);
        Ok(())
    }

    #[tokio::test]
    async fn test_find_available_port_start_occupied() -> Result<()> {
        let host = Ipv4Addr::LOCALHOST.into();
        let start_port = 51100;
        let _listener = TcpListener::bind(SocketAddr::new(host, start_port)).await?;

        let addr = find_available_port(host, start_port, 5).await?;
        assert!(addr.port() > start_port);
        assert!(addr.port() < start_port + 5);
        Ok(())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(app(), get_request("/api/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn test_chat_answers_with_requested_tone() {
        let (status, body) = send(
            app(),
            post_json("/api/chat", json!({ "query": "계산서 취소", "tone": "casual" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["found"], true);
        assert_eq!(body["tone"], "casual");
        assert_eq!(body["response"], "승인번호로 취소하면 돼.");
        assert_eq!(body["follow_up_questions"], json!(["수정발행은요?"]));
        assert_eq!(body["related_guides"], json!([]));
    }

    #[tokio::test]
    async fn test_chat_fallback_and_bad_input() {
        let (status, body) = send(app(), post_json("/api/chat", json!({ "query": "회원 탈퇴" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["found"], false);

        let (status, body) = send(app(), post_json("/api/chat", json!({ "query": "   " }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Query cannot be empty.");

        let (status, _) = send(
            app(),
            post_json("/api/chat", json!({ "query": "취소", "tone": "rude" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_faq_list_search_and_categories() {
        let (status, body) = send(app(), get_request("/api/faq?category=%ED%8F%AC%EC%9D%B8%ED%8A%B8")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_items"], 1);
        assert_eq!(body["items"][0]["id"], "faq-2");

        let (_, body) = send(app(), get_request("/api/faq?page=5&page_size=1")).await;
        assert_eq!(body["page"], 2);
        assert_eq!(body["total_pages"], 2);

        let (_, body) = send(app(), get_request("/api/faq/categories")).await;
        assert_eq!(body, json!(["세금계산서", "포인트"]));
    }

    #[tokio::test]
    async fn test_faq_item_and_not_found() {
        let (status, body) = send(app(), get_request("/api/faq/faq-1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["question"], "계산서 취소");
        assert_eq!(body["plain_text"], "승인번호로 취소합니다.");

        let (status, body) = send(app(), get_request("/api/faq/nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "FAQ item 'nope' not found.");
    }

    #[tokio::test]
    async fn test_helpful_votes_flow() {
        let app = app();

        let (status, body) = send(app.clone(), post_json("/api/faq/faq-1/helpful", json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "faq_id": "faq-1", "count": 1 }));

        // Same client again.
        let (status, _) = send(app.clone(), post_json("/api/faq/faq-1/helpful", json!({}))).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let mut other = post_json("/api/faq/faq-1/helpful", json!({}));
        other
            .headers_mut()
            .insert("x-forwarded-for", "198.51.100.2".parse().unwrap());
        let (status, body) = send(app.clone(), other).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 2);

        let (_, body) = send(app.clone(), get_request("/api/faq/helpful?ids=faq-1,faq-2")).await;
        assert_eq!(body, json!({ "faq-1": 2, "faq-2": 0 }));

        let (status, _) = send(app, post_json("/api/faq/ghost/helpful", json!({}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cors_header_when_enabled() {
        let request = Request::builder()
            .uri("/api/health")
            .header("origin", "https://help.example.com")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn test_widget_dir_is_served_as_fallback() -> Result<()> {
        let temp_dir = TempDir::new()?;
        tokio::fs::write(temp_dir.path().join("index.html"), "<html>widget</html>").await?;
        let config = ServerConfig {
            widget_dir: Some(temp_dir.path().to_path_buf()),
            ..ServerConfig::default()
        };

        let response = create_app(&config, state())
            .oneshot(get_request("/index.html"))
            .await?;
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        assert_eq!(&bytes[..], b"<html>widget</html>");
        Ok(())
    }

    #[tokio::test]
    async fn test_shutdown_signal_creation() {
        let shutdown_future = shutdown_signal();
        drop(shutdown_future);
    }
}
