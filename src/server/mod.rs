//! Preview server exposing the blog queries as JSON

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::content::BlogRepository;
use crate::Folio;

/// Server state
struct ServerState {
    repo: BlogRepository,
    site: SiteInfo,
}

/// Site-level metadata for listing pages
#[derive(Debug, Clone, Serialize)]
struct SiteInfo {
    title: String,
    description: String,
    author: String,
}

/// Build the router for a site
pub fn router(folio: &Folio) -> Router {
    let state = Arc::new(ServerState {
        repo: folio.repository(),
        site: SiteInfo {
            title: folio.config.title.clone(),
            description: folio.config.description.clone(),
            author: folio.config.author.clone(),
        },
    });

    Router::new()
        .route("/api/site", get(site_handler))
        .route("/api/posts", get(posts_handler))
        .route("/api/posts/:slug", get(post_handler))
        .route("/api/featured", get(featured_handler))
        .route("/api/tags", get(tags_handler))
        .route("/api/tags/:tag", get(tag_posts_handler))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the preview server
pub async fn start(folio: &Folio, ip: &str, port: u16) -> Result<()> {
    let app = router(folio);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Serving posts from {}", folio.content_dir.display());
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Run a repository query off the async executor; file reads block
async fn query<T, F>(state: &ServerState, f: F) -> Response
where
    T: Serialize + Send + 'static,
    F: FnOnce(&BlogRepository) -> T + Send + 'static,
{
    let repo = state.repo.clone();
    match tokio::task::spawn_blocking(move || f(&repo)).await {
        Ok(value) => Json(value).into_response(),
        Err(e) => {
            tracing::error!("Query task failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
        }
    }
}

async fn site_handler(State(state): State<Arc<ServerState>>) -> Json<SiteInfo> {
    Json(state.site.clone())
}

async fn posts_handler(State(state): State<Arc<ServerState>>) -> Response {
    query(&state, |repo| repo.list_posts()).await
}

async fn featured_handler(State(state): State<Arc<ServerState>>) -> Response {
    query(&state, |repo| repo.list_featured_posts()).await
}

async fn post_handler(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> Response {
    let repo = state.repo.clone();
    match tokio::task::spawn_blocking(move || repo.get_post(&slug)).await {
        Ok(Some(post)) => Json(post).into_response(),
        Ok(None) => not_found().await.into_response(),
        Err(e) => {
            tracing::error!("Query task failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
        }
    }
}

async fn tags_handler(State(state): State<Arc<ServerState>>) -> Response {
    query(&state, |repo| repo.list_all_tags()).await
}

async fn tag_posts_handler(
    State(state): State<Arc<ServerState>>,
    Path(tag): Path<String>,
) -> Response {
    query(&state, move |repo| repo.list_posts_by_tag(&tag)).await
}

async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "not found" })),
    )
}
