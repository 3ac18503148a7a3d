//! Client side of the event table: a write-through model over the remote
//! event store, a headless table view, and the controller wiring them.

pub mod controller;
pub mod error;
pub mod model;
pub mod remote;
pub mod view;

pub use controller::Controller;
pub use error::ModelError;
pub use model::{EventModel, ModelChanged};
pub use remote::{HttpRemoteStore, RemoteStore};
pub use view::{ActionKind, Click, DispatchOutcome, EventTableView, Field, Notice, TableRow};

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
