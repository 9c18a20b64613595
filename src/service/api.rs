use crate::application::app::Application;
use crate::application::history::DEFAULT_PAGE_LIMIT;
use crate::domain::models::TransactionRecord;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::broadcast;
use tower_http::cors::CorsLayer;

pub async fn start_server(
    shutdown: broadcast::Sender<()>,
    app: Arc<impl Application + Send + Sync + 'static>,
    listen_port: u16,
) -> anyhow::Result<()> {
    let router = router(app);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", listen_port)).await?;

    let server = axum::serve(listener, router);

    tracing::info!("API server started on port {}", listen_port);

    let mut shutdown_rx = shutdown.subscribe();

    tokio::select! {
        _ = shutdown_rx.recv() => {
            tracing::warn!("API server received shutdown signal");
        }
        _ = server => {
            tracing::warn!("API server stopped unexpectedly");
        }
    }

    Ok(())
}

pub fn router(app: Arc<impl Application + Send + Sync + 'static>) -> Router {
    Router::new()
        .route("/api/transactions", get(get_transactions))
        .with_state(app)
        .layer(CorsLayer::permissive())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransactionsQuery {
    pub_key: String,
    limit: Option<usize>,
    before_signature: Option<String>,
}

async fn get_transactions(
    State(app): State<Arc<impl Application>>,
    Query(params): Query<TransactionsQuery>,
) -> Result<Json<Vec<TransactionRecord>>, (StatusCode, Json<Value>)> {
    app.transaction_history(
        &params.pub_key,
        params.limit.unwrap_or(DEFAULT_PAGE_LIMIT),
        params.before_signature.as_deref(),
    )
    .await
    .map(Json)
    .map_err(|e| {
        tracing::error!("Error fetching transaction history: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to fetch transactions" })),
        )
    })
}
