use std::sync::Arc;

use shared::domain::{EventDraft, EventId, EventRecord};
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, warn};

use crate::{error::ModelError, remote::RemoteStore};

const CHANGE_CHANNEL_CAPACITY: usize = 16;

/// Payload-less "the event list changed" signal. Subscribers re-read
/// [`EventModel::events`] instead of receiving a diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelChanged;

#[derive(Default)]
struct ModelState {
    events: Vec<EventRecord>,
    loaded: bool,
}

/// Owns the event list and keeps it in step with the remote store.
///
/// Every mutation is applied only after the store acknowledged it, and is
/// followed by exactly one [`ModelChanged`]. Failed requests leave the list
/// untouched and emit nothing. Overlapping calls are not serialized: when two
/// requests on the same id race, whichever response lands last wins.
pub struct EventModel {
    store: Arc<dyn RemoteStore>,
    state: RwLock<ModelState>,
    changes: broadcast::Sender<ModelChanged>,
}

impl EventModel {
    pub fn new(store: Arc<dyn RemoteStore>) -> Arc<Self> {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Arc::new(Self {
            store,
            state: RwLock::new(ModelState::default()),
            changes,
        })
    }

    /// Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> broadcast::Receiver<ModelChanged> {
        self.changes.subscribe()
    }

    pub async fn events(&self) -> Vec<EventRecord> {
        self.state.read().await.events.clone()
    }

    pub(crate) async fn is_loaded(&self) -> bool {
        self.state.read().await.loaded
    }

    pub async fn load(&self) -> Result<(), ModelError> {
        let events = self
            .store
            .list_events()
            .await
            .map_err(|error| request_failed("load", None, error))?;

        {
            let mut guard = self.state.write().await;
            debug!(count = events.len(), "event list loaded");
            guard.events = events;
            guard.loaded = true;
        }
        self.notify_changed();
        Ok(())
    }

    pub async fn create(&self, draft: EventDraft) -> Result<EventRecord, ModelError> {
        let created = self
            .store
            .create_event(&draft)
            .await
            .map_err(|error| request_failed("create", None, error))?;

        self.state.write().await.events.push(created.clone());
        debug!(event_id = %created.id, "event created");
        self.notify_changed();
        Ok(created)
    }

    pub async fn remove(&self, event_id: EventId) -> Result<(), ModelError> {
        self.store
            .delete_event(event_id)
            .await
            .map_err(|error| request_failed("remove", Some(event_id), error))?;

        self.state
            .write()
            .await
            .events
            .retain(|event| event.id != event_id);
        debug!(%event_id, "event removed");
        self.notify_changed();
        Ok(())
    }

    pub async fn replace(
        &self,
        event_id: EventId,
        draft: EventDraft,
    ) -> Result<EventRecord, ModelError> {
        let updated = self
            .store
            .replace_event(event_id, &draft)
            .await
            .map_err(|error| request_failed("replace", Some(event_id), error))?;

        {
            let mut guard = self.state.write().await;
            for event in guard.events.iter_mut().filter(|event| event.id == event_id) {
                *event = updated.clone();
            }
        }
        debug!(%event_id, "event replaced");
        self.notify_changed();
        Ok(updated)
    }

    fn notify_changed(&self) {
        // No subscribers is not an error.
        let _ = self.changes.send(ModelChanged);
    }
}

fn request_failed(
    operation: &'static str,
    event_id: Option<EventId>,
    error: ModelError,
) -> ModelError {
    match event_id {
        Some(event_id) => warn!(operation, %event_id, %error, "event request failed"),
        None => warn!(operation, %error, "event request failed"),
    }
    error
}

#[cfg(test)]
#[path = "tests/model_tests.rs"]
mod tests;
