//! Event entity (the customer's occasion, not a platform message) and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::client::{contains_ignore_case, Client};
use crate::types::{DbId, Timestamp};

/// An event organised for a signed contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
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

/// Request body for creating an event under a signed contract.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateEvent {
    pub support_contact_id: Option<DbId>,
    #[validate(range(min = 0, message = "attendees must not be negative"))]
    pub attendees: Option<i32>,
    pub event_date: Option<Timestamp>,
    pub notes: Option<String>,
}

/// Request body for updating an event. Support assignment has its own endpoint.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateEvent {
    #[validate(range(min = 0, message = "attendees must not be negative"))]
    pub attendees: Option<i32>,
    pub event_date: Option<Timestamp>,
    pub notes: Option<String>,
    pub completed: Option<bool>,
}

/// Request body for `PATCH .../assign-support`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssignSupport {
    pub support_contact_id: Option<DbId>,
}

/// Store input for inserting an event.
#[derive(Debug, Clone, Default)]
pub struct NewEvent {
    pub contract_id: DbId,
    pub support_contact_id: Option<DbId>,
    pub attendees: Option<i32>,
    pub event_date: Option<Timestamp>,
    pub notes: Option<String>,
}

impl NewEvent {
    /// An event with every optional field left at its default.
    pub fn for_contract(contract_id: DbId) -> Self {
        Self {
            contract_id,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EventChanges {
    pub support_contact_id: Option<DbId>,
    pub attendees: Option<i32>,
    pub event_date: Option<Timestamp>,
    pub notes: Option<String>,
    pub completed: Option<bool>,
}

impl EventChanges {
    pub fn apply(&self, event: &mut Event) {
        if let Some(v) = self.support_contact_id {
            event.support_contact_id = Some(v);
        }
        if let Some(v) = self.attendees {
            event.attendees = Some(v);
        }
        if let Some(v) = self.event_date {
            event.event_date = Some(v);
        }
        if let Some(v) = &self.notes {
            event.notes = Some(v.clone());
        }
        if let Some(v) = self.completed {
            event.completed = v;
        }
    }
}

impl From<UpdateEvent> for EventChanges {
    fn from(input: UpdateEvent) -> Self {
        Self {
            support_contact_id: None,
            attendees: input.attendees,
            event_date: input.event_date,
            notes: input.notes,
            completed: input.completed,
        }
    }
}

/// Filters for event listing and search.
///
/// `contract_id` is set from the route when listing a contract's events.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventFilter {
    #[serde(skip)]
    pub contract_id: Option<DbId>,
    pub company_name: Option<String>,
    pub client_email: Option<String>,
    /// Calendar day the event takes place on.
    pub event_date: Option<NaiveDate>,
}

impl EventFilter {
    pub fn for_contract(contract_id: DbId) -> Self {
        Self {
            contract_id: Some(contract_id),
            ..Default::default()
        }
    }

    pub fn matches(&self, event: &Event, client: &Client) -> bool {
        if self.contract_id.is_some_and(|id| id != event.contract_id) {
            return false;
        }
        if let Some(name) = &self.company_name {
            if !contains_ignore_case(&client.company_name, name) {
                return false;
            }
        }
        if let Some(email) = &self.client_email {
            if !client.email.eq_ignore_ascii_case(email) {
                return false;
            }
        }
        if let Some(day) = self.event_date {
            if event.event_date.map(|d| d.date_naive()) != Some(day) {
                return false;
            }
        }
        true
    }
}
