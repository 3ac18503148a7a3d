use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use shared::{
    domain::{EventDraft, EventId, EventRecord},
    error::{ApiError, ErrorCode},
};
use storage::Storage;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer};
use tracing::{error, info};

mod api;
mod config;

use api::{event_route, events_route, ApiContext};
use config::{load_settings, prepare_database_url};

#[derive(Clone)]
struct AppState {
    api: ApiContext,
}

type HttpError = (StatusCode, Json<ApiError>);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = load_settings();
    let database_url = prepare_database_url(&settings.database_url)?;
    let storage = Storage::new(&database_url).await.map_err(|error| {
        error!(
            %database_url,
            %error,
            "failed to open SQLite database; verify parent directory exists and permissions are correct"
        );
        error
    })?;

    let state = AppState {
        api: ApiContext { storage },
    };
    let app = build_router(Arc::new(state)).layer(RequestBodyLimitLayer::new(
        settings.max_body_bytes,
    ));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "event store listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route(events_route(), get(http_list_events).post(http_create_event))
        .route(
            event_route(),
            get(http_get_event)
                .put(http_replace_event)
                .delete(http_delete_event),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn healthz(State(state): State<Arc<AppState>>) -> Result<&'static str, HttpError> {
    state.api.storage.health_check().await.map_err(|e| {
        error!(error = %e, "health check failed");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiError::new(ErrorCode::Internal, e.to_string())),
        )
    })?;
    Ok("ok")
}

async fn http_list_events(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<EventRecord>>, HttpError> {
    let events = api::list_events(&state.api).await.map_err(into_http)?;
    Ok(Json(events))
}

async fn http_get_event(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<i64>,
) -> Result<Json<EventRecord>, HttpError> {
    let event = api::get_event(&state.api, EventId(event_id))
        .await
        .map_err(into_http)?;
    Ok(Json(event))
}

async fn http_create_event(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<EventDraft>,
) -> Result<(StatusCode, Json<EventRecord>), HttpError> {
    let event = api::create_event(&state.api, draft)
        .await
        .map_err(into_http)?;
    info!(event_id = %event.id, "event created");
    Ok((StatusCode::CREATED, Json(event)))
}

async fn http_replace_event(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<i64>,
    Json(draft): Json<EventDraft>,
) -> Result<Json<EventRecord>, HttpError> {
    let event = api::replace_event(&state.api, EventId(event_id), draft)
        .await
        .map_err(into_http)?;
    info!(event_id = %event.id, "event replaced");
    Ok(Json(event))
}

async fn http_delete_event(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<i64>,
) -> Result<Json<serde_json::Value>, HttpError> {
    api::delete_event(&state.api, EventId(event_id))
        .await
        .map_err(into_http)?;
    info!(event_id, "event deleted");
    Ok(Json(serde_json::json!({})))
}

fn into_http(e: ApiError) -> HttpError {
    let status = match e.code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(e))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
