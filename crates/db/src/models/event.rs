//! Event row model.

use epic_core::event::Event;
use epic_core::types::{DbId, Timestamp};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct EventRow {
    pub id: DbId,
    pub contract_id: DbId,
    pub support_contact_id: Option<DbId>,
    pub completed: bool,
    pub attendees: Option<i32>,
    pub event_date: Option<Timestamp>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Self {
            id: row.id,
            contract_id: row.contract_id,
            support_contact_id: row.support_contact_id,
            completed: row.completed,
            attendees: row.attendees,
            event_date: row.event_date,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
