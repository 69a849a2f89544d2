use std::sync::Arc;

use epic_core::activity::ActivitySink;
use epic_core::store::CrmStore;
use epic_core::workflow::Workflow;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Persistence backend (PostgreSQL in production, in-memory in tests).
    pub store: Arc<dyn CrmStore>,
    /// Lifecycle service built over `store`.
    pub workflow: Workflow,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn CrmStore>,
        activity: Arc<dyn ActivitySink>,
        config: ServerConfig,
    ) -> Self {
        let workflow = Workflow::new(Arc::clone(&store), activity, config.workflow);
        Self {
            store,
            workflow,
            config: Arc::new(config),
        }
    }
}
