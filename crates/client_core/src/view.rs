//! Headless event table: the rows currently shown, their edit forms, and the
//! single dispatch entry point every row control goes through.

use std::{fmt, str::FromStr, sync::Arc};

use shared::domain::{EventDraft, EventId, EventRecord};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{error::ModelError, model::EventModel};

/// User-facing prompts. The display strings are what the user sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Notice {
    #[error("Inputs are not valid!")]
    InvalidInput,
    #[error("Internet error, please try again")]
    RequestFailed,
    #[error("Internet Error, please refresh the page")]
    LoadFailed,
}

impl Notice {
    /// Nothing else works once the initial load failed.
    pub fn is_fatal(self) -> bool {
        matches!(self, Notice::LoadFailed)
    }
}

/// The action tag carried by a table control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    New,
    Add,
    Update,
    Cancel,
    Drop,
    Edit,
}

impl ActionKind {
    pub fn tag(self) -> &'static str {
        match self {
            ActionKind::New => "new",
            ActionKind::Add => "add",
            ActionKind::Update => "update",
            ActionKind::Cancel => "cancel",
            ActionKind::Drop => "drop",
            ActionKind::Edit => "edit",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ActionKind::New => "New",
            ActionKind::Add => "Add",
            ActionKind::Update => "Save",
            ActionKind::Cancel => "Cancel",
            ActionKind::Drop => "Drop",
            ActionKind::Edit => "Edit",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown action tag '{0}'")]
pub struct UnknownAction(pub String);

impl FromStr for ActionKind {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "new" => Ok(ActionKind::New),
            "add" => Ok(ActionKind::Add),
            "update" | "save" => Ok(ActionKind::Update),
            "cancel" => Ok(ActionKind::Cancel),
            "drop" => Ok(ActionKind::Drop),
            "edit" => Ok(ActionKind::Edit),
            other => Err(UnknownAction(other.to_string())),
        }
    }
}

/// One of the three editable cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    EventName,
    StartDate,
    EndDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown field '{0}'")]
pub struct UnknownField(pub String);

impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "name" | "eventName" => Ok(Field::EventName),
            "start" | "startDate" => Ok(Field::StartDate),
            "end" | "endDate" => Ok(Field::EndDate),
            other => Err(UnknownField(other.to_string())),
        }
    }
}

/// A click on a control: its action tag plus the row it sits in, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Click {
    pub kind: ActionKind,
    pub row: Option<usize>,
}

impl Click {
    pub fn new_row() -> Self {
        Self {
            kind: ActionKind::New,
            row: None,
        }
    }

    pub fn on_row(kind: ActionKind, row: usize) -> Self {
        Self {
            kind,
            row: Some(row),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableRow {
    Display { record: EventRecord, hidden: bool },
    EditingNew { draft: EventDraft },
    EditingExisting { id: EventId, draft: EventDraft },
}

impl TableRow {
    fn display(record: EventRecord) -> Self {
        TableRow::Display {
            record,
            hidden: false,
        }
    }

    /// Present only for rows backed by a stored event.
    pub fn event_id(&self) -> Option<EventId> {
        match self {
            TableRow::Display { record, .. } => Some(record.id),
            TableRow::EditingExisting { id, .. } => Some(*id),
            TableRow::EditingNew { .. } => None,
        }
    }

    pub fn is_visible(&self) -> bool {
        !matches!(self, TableRow::Display { hidden: true, .. })
    }

    pub fn is_editing(&self) -> bool {
        !matches!(self, TableRow::Display { .. })
    }

    /// Name, start date, end date.
    pub fn cells(&self) -> [&str; 3] {
        match self {
            TableRow::Display { record, .. } => [
                record.event_name.as_str(),
                record.start_date.as_str(),
                record.end_date.as_str(),
            ],
            TableRow::EditingNew { draft } | TableRow::EditingExisting { draft, .. } => [
                draft.event_name.as_str(),
                draft.start_date.as_str(),
                draft.end_date.as_str(),
            ],
        }
    }

    pub fn actions(&self) -> &'static [ActionKind] {
        match self {
            TableRow::Display { .. } => &[ActionKind::Edit, ActionKind::Drop],
            TableRow::EditingNew { .. } => &[ActionKind::Add, ActionKind::Cancel],
            TableRow::EditingExisting { .. } => &[ActionKind::Update, ActionKind::Cancel],
        }
    }

    fn draft_mut(&mut self) -> Option<&mut EventDraft> {
        match self {
            TableRow::Display { .. } => None,
            TableRow::EditingNew { draft } | TableRow::EditingExisting { draft, .. } => {
                Some(draft)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Applied,
    /// The tag does not apply to the addressed row, or the row is gone.
    Ignored,
    Rejected(Notice),
}

pub struct EventTableView {
    model: Arc<EventModel>,
    rows: Vec<TableRow>,
    notices: Vec<Notice>,
}

impl EventTableView {
    pub fn new(model: Arc<EventModel>) -> Self {
        Self {
            model,
            rows: Vec::new(),
            notices: Vec::new(),
        }
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub(crate) fn push_notice(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    /// Throws away every row, uncommitted edits included, and rebuilds the
    /// table from the model.
    pub async fn render(&mut self) {
        let events = self.model.events().await;
        debug!(count = events.len(), "rendering event table");
        self.rows = events.into_iter().map(TableRow::display).collect();
    }

    /// Edits an input cell. Returns false when the row has no inputs.
    pub fn set_field(&mut self, row: usize, field: Field, value: impl Into<String>) -> bool {
        let Some(draft) = self.rows.get_mut(row).and_then(TableRow::draft_mut) else {
            return false;
        };
        let value = value.into();
        match field {
            Field::EventName => draft.event_name = value,
            Field::StartDate => draft.start_date = value,
            Field::EndDate => draft.end_date = value,
        }
        true
    }

    pub async fn dispatch(&mut self, click: Click) -> DispatchOutcome {
        if click.kind == ActionKind::New {
            self.rows.push(TableRow::EditingNew {
                draft: EventDraft::default(),
            });
            return DispatchOutcome::Applied;
        }

        let Some(index) = click.row else {
            return DispatchOutcome::Ignored;
        };
        let Some(row) = self.rows.get(index).filter(|row| row.is_visible()) else {
            return DispatchOutcome::Ignored;
        };

        match (click.kind, row.clone()) {
            (ActionKind::Edit, TableRow::Display { record, .. }) => {
                self.begin_edit(index, record);
                DispatchOutcome::Applied
            }
            (ActionKind::Drop, TableRow::Display { record, .. }) => {
                match self.model.remove(record.id).await {
                    Ok(()) => {
                        self.rows.remove(index);
                        DispatchOutcome::Applied
                    }
                    Err(error) => self.request_failed("drop", &error),
                }
            }
            (ActionKind::Cancel, TableRow::EditingNew { .. }) => {
                self.rows.remove(index);
                DispatchOutcome::Applied
            }
            (ActionKind::Cancel, TableRow::EditingExisting { id, .. }) => {
                self.close_edit(index, id);
                DispatchOutcome::Applied
            }
            (ActionKind::Add, TableRow::EditingNew { draft }) => {
                if !draft.is_complete() {
                    return self.reject(Notice::InvalidInput);
                }
                match self.model.create(draft).await {
                    Ok(_) => {
                        self.rows.remove(index);
                        DispatchOutcome::Applied
                    }
                    Err(error) => self.request_failed("add", &error),
                }
            }
            (ActionKind::Update, TableRow::EditingExisting { id, draft }) => {
                if !draft.is_complete() {
                    return self.reject(Notice::InvalidInput);
                }
                match self.model.replace(id, draft).await {
                    Ok(_) => {
                        self.close_edit(index, id);
                        DispatchOutcome::Applied
                    }
                    Err(error) => self.request_failed("update", &error),
                }
            }
            _ => DispatchOutcome::Ignored,
        }
    }

    /// The edit row goes in front of the display row, which is hidden, not
    /// removed.
    fn begin_edit(&mut self, index: usize, record: EventRecord) {
        if let Some(TableRow::Display { hidden, .. }) = self.rows.get_mut(index) {
            *hidden = true;
        }
        self.rows.insert(
            index,
            TableRow::EditingExisting {
                id: record.id,
                draft: record.to_draft(),
            },
        );
    }

    fn close_edit(&mut self, index: usize, id: EventId) {
        self.rows.remove(index);
        for row in &mut self.rows {
            if let TableRow::Display { record, hidden } = row {
                if record.id == id {
                    *hidden = false;
                }
            }
        }
    }

    fn reject(&mut self, notice: Notice) -> DispatchOutcome {
        self.notices.push(notice);
        DispatchOutcome::Rejected(notice)
    }

    fn request_failed(
        &mut self,
        action: &'static str,
        error: &ModelError,
    ) -> DispatchOutcome {
        warn!(action, %error, "table action failed");
        self.reject(Notice::RequestFailed)
    }
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
