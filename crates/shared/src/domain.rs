use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(EventId);

/// An event as the remote store knows it, id included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub id: EventId,
    pub event_name: String,
    pub start_date: String,
    pub end_date: String,
}

impl EventRecord {
    pub fn from_draft(id: EventId, draft: EventDraft) -> Self {
        Self {
            id,
            event_name: draft.event_name,
            start_date: draft.start_date,
            end_date: draft.end_date,
        }
    }

    pub fn to_draft(&self) -> EventDraft {
        EventDraft {
            event_name: self.event_name.clone(),
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
        }
    }
}

/// User-submitted field values before the store assigns or confirms an id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    pub event_name: String,
    pub start_date: String,
    pub end_date: String,
}

impl EventDraft {
    pub fn new(
        event_name: impl Into<String>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
    ) -> Self {
        Self {
            event_name: event_name.into(),
            start_date: start_date.into(),
            end_date: end_date.into(),
        }
    }

    /// Dates are only checked for presence, not format.
    pub fn is_complete(&self) -> bool {
        !self.event_name.is_empty() && !self.start_date.is_empty() && !self.end_date.is_empty()
    }
}
