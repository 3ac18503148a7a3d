use std::sync::Arc;

use anyhow::Result;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{debug, error, info};

use crate::{
    model::{EventModel, ModelChanged},
    remote::{HttpRemoteStore, RemoteStore},
    view::{Click, DispatchOutcome, EventTableView, Field, Notice},
};

/// Builds the model, hands it to the view, and re-renders the view whenever
/// the model reports a change.
///
/// Re-rendering is pull based: only [`Controller::init`] and
/// [`Controller::dispatch`] drain the change channel on their own. Front ends
/// call [`Controller::sync`] on every tick so that mutations made through
/// [`Controller::model`] reach the view.
pub struct Controller {
    model: Arc<EventModel>,
    view: EventTableView,
    changes: broadcast::Receiver<ModelChanged>,
}

impl Controller {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        let model = EventModel::new(store);
        let view = EventTableView::new(Arc::clone(&model));
        let changes = model.subscribe();
        Self {
            model,
            view,
            changes,
        }
    }

    pub fn connect(store_url: &str) -> Result<Self> {
        let store = HttpRemoteStore::new(store_url)?;
        info!(events_url = %store.events_url(), "using remote event store");
        Ok(Self::new(Arc::new(store)))
    }

    pub fn model(&self) -> &Arc<EventModel> {
        &self.model
    }

    pub fn view(&self) -> &EventTableView {
        &self.view
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.view.take_notices()
    }

    /// Initial load. A failure here is fatal for the session and is raised as
    /// [`Notice::LoadFailed`].
    pub async fn init(&mut self) -> Result<(), Notice> {
        if let Err(error) = self.model.load().await {
            error!(%error, "initial event load failed");
            self.view.push_notice(Notice::LoadFailed);
            return Err(Notice::LoadFailed);
        }
        self.sync().await;
        Ok(())
    }

    /// Drains pending change notifications and renders once if any arrived.
    pub async fn sync(&mut self) -> bool {
        let mut changed = false;
        loop {
            match self.changes.try_recv() {
                Ok(ModelChanged) | Err(TryRecvError::Lagged(_)) => changed = true,
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        if changed {
            debug!(loaded = self.model.is_loaded().await, "model changed");
            self.view.render().await;
        }
        changed
    }

    pub async fn dispatch(&mut self, click: Click) -> DispatchOutcome {
        let outcome = self.view.dispatch(click).await;
        self.sync().await;
        outcome
    }

    pub fn set_field(&mut self, row: usize, field: Field, value: impl Into<String>) -> bool {
        self.view.set_field(row, field, value)
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
