//! Activity fan-out for the Epic Events CRM.
//!
//! - [`EventBus`] -- in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`; the workflow publishes into it through
//!   [`epic_core::activity::ActivitySink`].
//! - [`ActivityLogger`] -- background consumer that writes every activity
//!   as a structured `tracing` record.

pub mod bus;
pub mod logger;

pub use bus::EventBus;
pub use logger::ActivityLogger;
