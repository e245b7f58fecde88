//! HTTP endpoint serving the rendered documentation.

use crate::cache::RenderedDocs;
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use log::{debug, info};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;

/// Query accepted by the documentation endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct DocsQuery {
    /// Documentation topic; must not be empty when present
    pub topic: Option<String>,
}

impl DocsQuery {
    pub fn validate(&self) -> Result<(), String> {
        match &self.topic {
            Some(topic) if topic.is_empty() => Err("topic must not be empty".to_string()),
            _ => Ok(()),
        }
    }
}

/// Router exposing `GET /docs`.
pub fn router(docs: Arc<RenderedDocs>) -> Router {
    Router::new().route("/docs", get(get_docs)).with_state(docs)
}

async fn get_docs(
    State(docs): State<Arc<RenderedDocs>>,
    Query(query): Query<DocsQuery>,
) -> Response {
    if let Err(message) = query.validate() {
        return (StatusCode::BAD_REQUEST, message).into_response();
    }
    if let Some(topic) = &query.topic {
        debug!("Documentation requested for topic {}", topic);
    }

    let html = docs.load();
    (
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        html.as_str().to_owned(),
    )
        .into_response()
}

/// Serves the documentation until the process is stopped.
pub async fn serve(addr: SocketAddr, docs: Arc<RenderedDocs>) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Serving API documentation at http://{}/docs", listener.local_addr()?);
    axum::serve(listener, router(docs)).await
}
