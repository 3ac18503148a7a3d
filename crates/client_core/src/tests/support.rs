use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;
use shared::domain::{EventDraft, EventId, EventRecord};
use tokio::sync::{Mutex, Notify};

use crate::{error::ModelError, remote::RemoteStore};

/// In-process stand-in for the event store that can be told to fail.
#[derive(Default)]
pub(crate) struct MemoryRemoteStore {
    events: Mutex<Vec<EventRecord>>,
    next_id: Mutex<i64>,
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl MemoryRemoteStore {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) async fn seeded(drafts: &[EventDraft]) -> Arc<Self> {
        let store = Self::new();
        for draft in drafts {
            store.create_event(draft).await.expect("seed event");
        }
        store.calls.store(0, Ordering::SeqCst);
        store
    }

    pub(crate) fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) async fn snapshot(&self) -> Vec<EventRecord> {
        self.events.lock().await.clone()
    }

    fn begin(&self) -> Result<(), ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(ModelError::RequestFailed(
                "HTTP status server error (500 Internal Server Error)".into(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteStore for MemoryRemoteStore {
    async fn list_events(&self) -> Result<Vec<EventRecord>, ModelError> {
        self.begin()?;
        Ok(self.events.lock().await.clone())
    }

    async fn create_event(&self, draft: &EventDraft) -> Result<EventRecord, ModelError> {
        self.begin()?;
        let id = {
            let mut next_id = self.next_id.lock().await;
            *next_id += 1;
            EventId(*next_id)
        };
        let record = EventRecord::from_draft(id, draft.clone());
        self.events.lock().await.push(record.clone());
        Ok(record)
    }

    async fn delete_event(&self, event_id: EventId) -> Result<(), ModelError> {
        self.begin()?;
        let mut events = self.events.lock().await;
        let before = events.len();
        events.retain(|event| event.id != event_id);
        if events.len() == before {
            return Err(ModelError::RequestFailed(format!("event {event_id} not found")));
        }
        Ok(())
    }

    async fn replace_event(
        &self,
        event_id: EventId,
        draft: &EventDraft,
    ) -> Result<EventRecord, ModelError> {
        self.begin()?;
        let mut events = self.events.lock().await;
        let Some(slot) = events.iter_mut().find(|event| event.id == event_id) else {
            return Err(ModelError::RequestFailed(format!("event {event_id} not found")));
        };
        *slot = EventRecord::from_draft(event_id, draft.clone());
        Ok(slot.clone())
    }
}

/// Wraps [`MemoryRemoteStore`] and parks every mutating request until the
/// test releases it.
#[derive(Default)]
pub(crate) struct GatedRemoteStore {
    pub(crate) inner: Arc<MemoryRemoteStore>,
    entered: Notify,
    release: Notify,
}

impl GatedRemoteStore {
    pub(crate) fn over(inner: Arc<MemoryRemoteStore>) -> Arc<Self> {
        Arc::new(Self {
            inner,
            ..Self::default()
        })
    }

    /// Resolves once a mutating request reached the store.
    pub(crate) async fn in_flight(&self) {
        self.entered.notified().await;
    }

    pub(crate) fn release(&self) {
        self.release.notify_one();
    }

    async fn hold(&self) {
        self.entered.notify_one();
        self.release.notified().await;
    }
}

#[async_trait]
impl RemoteStore for GatedRemoteStore {
    async fn list_events(&self) -> Result<Vec<EventRecord>, ModelError> {
        self.inner.list_events().await
    }

    async fn create_event(&self, draft: &EventDraft) -> Result<EventRecord, ModelError> {
        self.hold().await;
        self.inner.create_event(draft).await
    }

    async fn delete_event(&self, event_id: EventId) -> Result<(), ModelError> {
        self.hold().await;
        self.inner.delete_event(event_id).await
    }

    async fn replace_event(
        &self,
        event_id: EventId,
        draft: &EventDraft,
    ) -> Result<EventRecord, ModelError> {
        self.hold().await;
        self.inner.replace_event(event_id, draft).await
    }
}

pub(crate) fn conf() -> EventDraft {
    EventDraft::new("Conf", "2024-01-01", "2024-01-02")
}

pub(crate) fn conf2() -> EventDraft {
    EventDraft::new("Conf2", "2024-01-01", "2024-01-03")
}
