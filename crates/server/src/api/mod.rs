use shared::{
    domain::{EventDraft, EventId, EventRecord},
    error::{ApiError, ErrorCode},
};
use storage::Storage;
use tracing::error;

#[derive(Clone)]
pub struct ApiContext {
    pub storage: Storage,
}

pub fn events_route() -> &'static str {
    "/events"
}

pub fn event_route() -> &'static str {
    "/events/:event_id"
}

pub async fn list_events(ctx: &ApiContext) -> Result<Vec<EventRecord>, ApiError> {
    ctx.storage.list_events().await.map_err(internal)
}

pub async fn get_event(ctx: &ApiContext, event_id: EventId) -> Result<EventRecord, ApiError> {
    ctx.storage
        .get_event(event_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| event_not_found(event_id))
}

pub async fn create_event(ctx: &ApiContext, draft: EventDraft) -> Result<EventRecord, ApiError> {
    ensure_complete(&draft)?;
    ctx.storage.create_event(&draft).await.map_err(internal)
}

pub async fn replace_event(
    ctx: &ApiContext,
    event_id: EventId,
    draft: EventDraft,
) -> Result<EventRecord, ApiError> {
    ensure_complete(&draft)?;
    ctx.storage
        .replace_event(event_id, &draft)
        .await
        .map_err(internal)?
        .ok_or_else(|| event_not_found(event_id))
}

pub async fn delete_event(ctx: &ApiContext, event_id: EventId) -> Result<(), ApiError> {
    let deleted = ctx
        .storage
        .delete_event(event_id)
        .await
        .map_err(internal)?;
    if !deleted {
        return Err(event_not_found(event_id));
    }
    Ok(())
}

fn ensure_complete(draft: &EventDraft) -> Result<(), ApiError> {
    if draft.is_complete() {
        Ok(())
    } else {
        Err(ApiError::validation(
            "eventName, startDate and endDate must not be empty",
        ))
    }
}

fn event_not_found(event_id: EventId) -> ApiError {
    ApiError::not_found(format!("event {event_id} not found"))
}

fn internal(e: anyhow::Error) -> ApiError {
    error!(error = %e, "event storage failure");
    ApiError::new(ErrorCode::Internal, e.to_string())
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
