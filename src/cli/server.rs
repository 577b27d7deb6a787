//! HTTP server mode for browsing and exporting the aggregated listings

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::cli::runner::build_aggregator;
use crate::config::SweepConfig;
use crate::display::{ListingTable, SortOrder, TableDisplay, TableOptions, DEFAULT_PAGE_LENGTH};
use crate::engine::FetchContext;
use crate::error::{Error, Result};
use crate::output::{ExportFormat, ParquetWriterConfig};
use crate::session::Session;
use crate::types::Column;

/// App state shared across handlers
struct AppState {
    session: Session,
    /// Table rebuilt from every finished run
    display: Arc<RwLock<TableDisplay>>,
    parquet: ParquetWriterConfig,
}

/// Query string for the listings endpoint
#[derive(Debug, Default, Deserialize)]
struct ListingsQuery {
    #[serde(default)]
    search: Option<String>,
    #[serde(default)]
    sort: Option<String>,
    #[serde(default)]
    order: Option<SortOrder>,
    #[serde(default)]
    page: Option<usize>,
    #[serde(default)]
    page_length: Option<usize>,
}

/// Request body for the refresh endpoint
#[derive(Debug, Default, Deserialize)]
struct RefreshRequest {
    /// First page of the new run (defaults to the current start page)
    #[serde(default)]
    start_page: Option<u32>,
}

/// Query string for the export endpoint
#[derive(Debug, Default, Deserialize)]
struct ExportQuery {
    #[serde(default)]
    format: Option<ExportFormat>,
}

/// Response wrapper
#[derive(Debug, Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn error(msg: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

/// Build the router around a running session
///
/// The listings table is attached to the session and rebuilt whenever a
/// run finishes; requests only change its view options.
pub async fn router(session: Session, parquet: ParquetWriterConfig) -> Router {
    let display = Arc::new(RwLock::new(TableDisplay::default()));
    session.attach_display(display.clone()).await;

    let state = AppState {
        session,
        display,
        parquet,
    };

    // Build CORS layer - allow all origins for development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/status", get(status))
        .route("/listings", get(listings))
        .route("/refresh", post(refresh))
        .route("/export", get(export))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Start the HTTP server
pub async fn serve(config: &SweepConfig, port: u16) -> Result<()> {
    let aggregator = Arc::new(build_aggregator(config)?);
    let session = Session::spawn(aggregator, config.fetch_context());
    let app = router(session, config.parquet_config()).await;

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting HTTP server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::config(format!("Failed to bind to port {port}: {e}")))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::config(format!("Server error: {e}")))?;

    Ok(())
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Status of the latest run, without the listings
async fn status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.session.snapshot();
    Json(ApiResponse::success(json!({
        "status": snapshot.status,
        "error": snapshot.error().map(ToString::to_string),
        "count": snapshot.len(),
        "pages_fetched": snapshot.pages_fetched,
        "next_page": snapshot.next_page,
        "context": snapshot.context,
        "started_at": snapshot.started_at,
        "finished_at": snapshot.finished_at,
        "duration_ms": snapshot.duration_ms(),
    })))
}

/// One page of the listings table
async fn listings(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListingsQuery>,
) -> impl IntoResponse {
    let sort = match query.sort.as_deref().map(str::parse::<Column>).transpose() {
        Ok(sort) => sort,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::<()>::error(e.to_string())),
            )
                .into_response();
        }
    };

    let options = TableOptions {
        search: query.search,
        sort,
        order: query.order.unwrap_or_default(),
        page: query.page.unwrap_or(1),
        page_length: query.page_length.unwrap_or(DEFAULT_PAGE_LENGTH),
    };

    let snapshot = state.session.snapshot();
    let empty = ListingTable::with_options(&[], options.clone());
    let mut display = state.display.write().await;
    display.set_options(options);
    let page = display.table().unwrap_or(&empty).page();

    (
        StatusCode::OK,
        Json(ApiResponse::success(json!({
            "status": snapshot.status,
            "error": snapshot.error().map(ToString::to_string),
            "info": page.info(),
            "page": page.page,
            "pages": page.pages,
            "filtered": page.filtered,
            "total": page.total,
            "rows": page.rows,
        }))),
    )
        .into_response()
}

/// Start a fresh run, discarding the current snapshot when it finishes
async fn refresh(
    State(state): State<Arc<AppState>>,
    body: Option<Json<RefreshRequest>>,
) -> impl IntoResponse {
    let request = body.map(|Json(r)| r).unwrap_or_default();

    let current = state.session.context();
    let mut next: FetchContext = current.next_generation();
    if let Some(start_page) = request.start_page {
        if start_page == 0 {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::<()>::error(
                    Error::InvalidPage { page: 0 }.to_string(),
                )),
            )
                .into_response();
        }
        next.start_page = start_page;
    }

    state.session.set_context(next.clone());
    (StatusCode::ACCEPTED, Json(ApiResponse::success(next))).into_response()
}

/// Download the current snapshot as a file
async fn export(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ExportQuery>,
) -> impl IntoResponse {
    let format = query.format.unwrap_or_default();
    let snapshot = state.session.snapshot();

    match format.encode(snapshot.listings(), &state.parquet) {
        Ok(data) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, format.content_type().to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", format.default_file_name()),
                ),
            ],
            data,
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<()>::error(e.to_string())),
        )
            .into_response(),
    }
}
