use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::db;
use crate::error::ServiceError;
use crate::model::{MessageUpdate, NewMessage};
use crate::service::MessageService;
use crate::store::SqliteStore;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<MessageService>,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let pool = db::open_pool(&config.db_path)?;
        let service = Arc::new(MessageService::new(Arc::new(SqliteStore::new(pool))));
        Ok(Self { service, config })
    }
}

/// Build the HTTP application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/messages", post(create_message).get(list_messages))
        .route(
            "/messages/:id",
            get(get_message).put(update_message).delete(delete_message),
        )
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

#[derive(Serialize)]
struct ErrorResp {
    error: String,
}

fn err(status: StatusCode, msg: &str) -> (StatusCode, Json<ErrorResp>) {
    (status, Json(ErrorResp { error: msg.into() }))
}

fn parse_id(id: &str) -> Result<Uuid, (StatusCode, Json<ErrorResp>)> {
    Uuid::parse_str(id).map_err(|_| err(StatusCode::BAD_REQUEST, "invalid_id"))
}

/// Every not-found condition, including the update id mismatch, surfaces as a
/// bad request carrying the service message.
fn map_service_err(e: ServiceError) -> (StatusCode, Json<ErrorResp>) {
    match e {
        ServiceError::NotFound(msg) => err(StatusCode::BAD_REQUEST, &msg),
        ServiceError::Store(e) => {
            tracing::warn!(error = %e, "storage fault");
            err(StatusCode::INTERNAL_SERVER_ERROR, "storage_error")
        }
    }
}

async fn create_message(
    State(state): State<AppState>,
    Json(body): Json<NewMessage>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResp>)> {
    if body.author.trim().is_empty() {
        return Err(err(StatusCode::BAD_REQUEST, "empty_author"));
    }
    if body.content.trim().is_empty() {
        return Err(err(StatusCode::BAD_REQUEST, "empty_content"));
    }
    let message = state.service.create(body).map_err(map_service_err)?;
    Ok((StatusCode::CREATED, Json(message)))
}

async fn get_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResp>)> {
    let id = parse_id(&id)?;
    let message = state.service.get(&id).map_err(map_service_err)?;
    Ok((StatusCode::OK, Json(message)))
}

async fn update_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<MessageUpdate>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResp>)> {
    let id = parse_id(&id)?;
    let message = state.service.update(&id, body).map_err(map_service_err)?;
    Ok((StatusCode::ACCEPTED, Json(message)))
}

#[derive(Serialize)]
struct DeleteResp {
    deleted: bool,
}

async fn delete_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResp>)> {
    let id = parse_id(&id)?;
    let deleted = state.service.delete(&id).map_err(map_service_err)?;
    Ok((StatusCode::OK, Json(DeleteResp { deleted })))
}

#[derive(Deserialize)]
struct ListParams {
    page: Option<u64>,
    size: Option<u64>,
}

async fn list_messages(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResp>)> {
    let page = state
        .service
        .list(params.page, params.size)
        .map_err(map_service_err)?;
    Ok((StatusCode::OK, Json(page)))
}

/// Run the HTTP server with the provided configuration.
pub async fn run_http_server(config: Config) -> Result<()> {
    let addr: SocketAddr = config.bind.parse()?;
    tracing::info!(%addr, db = %config.db_path.display(), "message board listening");
    let state = AppState::new(config)?;
    axum::Server::bind(&addr)
        .serve(build_router(state).into_make_service())
        .await?;
    Ok(())
}
