//! Structured activity log.
//!
//! [`ActivityLogger`] subscribes to the [`EventBus`](crate::bus::EventBus)
//! and writes one `tracing` record per activity under the `epic::activity`
//! target. It runs as a long-lived background task and stops when the bus
//! is dropped.

use epic_core::activity::Activity;
use tokio::sync::broadcast;

pub struct ActivityLogger;

impl ActivityLogger {
    /// Run the logging loop until the channel closes.
    ///
    /// Returns the number of activities logged.
    pub async fn run(mut receiver: broadcast::Receiver<Activity>) -> u64 {
        let mut logged = 0;
        loop {
            match receiver.recv().await {
                Ok(activity) => {
                    Self::log(&activity);
                    logged += 1;
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Activity logger lagged, some activity was not logged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, activity logger shutting down");
                    break;
                }
            }
        }
        logged
    }

    fn log(activity: &Activity) {
        tracing::info!(
            target: "epic::activity",
            kind = %activity.kind,
            entity_type = activity.entity_type,
            entity_id = activity.entity_id,
            actor_user_id = activity.actor_user_id,
            payload = %activity.payload,
            timestamp = %activity.timestamp,
            "Activity recorded",
        );
    }
}
