//! Domain core of the Epic Events CRM.
//!
//! - [`client`], [`contract`], [`event`] -- entities, statuses, request DTOs.
//! - [`identity`] and [`roles`] -- users and the closed role set.
//! - [`policy`] -- role-based authorization decisions.
//! - [`workflow`] -- the client → contract → event lifecycle.
//! - [`store`] -- persistence trait; [`memory`] is the in-process backend.
//! - [`activity`] -- structured activity published by the workflow.

pub mod activity;
pub mod client;
pub mod contract;
pub mod error;
pub mod event;
pub mod identity;
pub mod memory;
pub mod policy;
pub mod roles;
pub mod store;
pub mod types;
pub mod workflow;

pub use error::{CoreError, SuggestedAction};
pub use workflow::{Applied, Workflow, WorkflowConfig, WriteStatus};
