use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use shared::domain::{EventDraft, EventId, EventRecord};
use url::Url;

use crate::error::ModelError;

/// The remote event store the model writes through to.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn list_events(&self) -> Result<Vec<EventRecord>, ModelError>;
    async fn create_event(&self, draft: &EventDraft) -> Result<EventRecord, ModelError>;
    async fn delete_event(&self, event_id: EventId) -> Result<(), ModelError>;
    async fn replace_event(
        &self,
        event_id: EventId,
        draft: &EventDraft,
    ) -> Result<EventRecord, ModelError>;
}

/// REST+JSON store rooted at `{base_url}/events`.
pub struct HttpRemoteStore {
    http: Client,
    events_url: Url,
}

impl HttpRemoteStore {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Result<Self> {
        let mut events_url =
            Url::parse(base_url).with_context(|| format!("invalid store url '{base_url}'"))?;
        events_url
            .path_segments_mut()
            .map_err(|_| anyhow!("store url '{base_url}' cannot carry a path"))?
            .pop_if_empty()
            .push("events");
        Ok(Self { http, events_url })
    }

    pub fn events_url(&self) -> &Url {
        &self.events_url
    }

    fn event_url(&self, event_id: EventId) -> Url {
        let mut url = self.events_url.clone();
        // events_url was built through path_segments_mut, so it is a base url.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(&event_id.to_string());
        }
        url
    }

    async fn send(request: RequestBuilder) -> Result<Response, ModelError> {
        Ok(request.send().await?.error_for_status()?)
    }
}

#[async_trait]
impl RemoteStore for HttpRemoteStore {
    async fn list_events(&self) -> Result<Vec<EventRecord>, ModelError> {
        let res = Self::send(self.http.get(self.events_url.clone())).await?;
        Ok(res.json().await?)
    }

    async fn create_event(&self, draft: &EventDraft) -> Result<EventRecord, ModelError> {
        let res = Self::send(self.http.post(self.events_url.clone()).json(draft)).await?;
        Ok(res.json().await?)
    }

    async fn delete_event(&self, event_id: EventId) -> Result<(), ModelError> {
        Self::send(self.http.delete(self.event_url(event_id))).await?;
        Ok(())
    }

    async fn replace_event(
        &self,
        event_id: EventId,
        draft: &EventDraft,
    ) -> Result<EventRecord, ModelError> {
        let res = Self::send(self.http.put(self.event_url(event_id)).json(draft)).await?;
        Ok(res.json().await?)
    }
}

#[cfg(test)]
#[path = "tests/remote_tests.rs"]
mod tests;
