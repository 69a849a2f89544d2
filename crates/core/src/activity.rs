//! Structured activity emitted by the workflow.
//!
//! Every successful lifecycle operation publishes one [`Activity`] to the
//! [`ActivitySink`] the workflow was built with. The sink is injected, so
//! tests can record activity and the server can fan it out to log consumers.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::DbId;

pub const CLIENT_CREATED: &str = "client.created";
pub const CLIENT_UPDATED: &str = "client.updated";
pub const CLIENT_STATUS_CHANGED: &str = "client.status_changed";
pub const CLIENT_DELETED: &str = "client.deleted";
pub const CONTRACT_CREATED: &str = "contract.created";
pub const CONTRACT_UPDATED: &str = "contract.updated";
pub const CONTRACT_SIGNED: &str = "contract.signed";
pub const CONTRACT_DELETED: &str = "contract.deleted";
pub const EVENT_CREATED: &str = "event.created";
pub const EVENT_UPDATED: &str = "event.updated";
pub const EVENT_SUPPORT_ASSIGNED: &str = "event.support_assigned";
pub const EVENT_DELETED: &str = "event.deleted";

/// One thing that happened, with who did it and to what.
#[derive(Debug, Clone, Serialize)]
pub struct Activity {
    /// Dot-separated name, e.g. `"contract.signed"`.
    pub kind: String,
    pub entity_type: &'static str,
    pub entity_id: DbId,
    pub actor_user_id: DbId,
    pub payload: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

impl Activity {
    pub fn new(kind: &str, entity_type: &'static str, entity_id: DbId, actor_user_id: DbId) -> Self {
        Self {
            kind: kind.to_string(),
            entity_type,
            entity_id,
            actor_user_id,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

/// Destination for workflow activity.
pub trait ActivitySink: Send + Sync {
    fn publish(&self, activity: Activity);
}

/// Drops every activity.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ActivitySink for NullSink {
    fn publish(&self, _activity: Activity) {}
}

/// Keeps every activity in memory, in publish order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    recorded: Mutex<Vec<Activity>>,
}

impl RecordingSink {
    pub fn kinds(&self) -> Vec<String> {
        self.recorded
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|a| a.kind.clone())
            .collect()
    }
}

impl ActivitySink for RecordingSink {
    fn publish(&self, activity: Activity) {
        self.recorded
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(activity);
    }
}
