//! Client → contract → event lifecycle.
//!
//! [`Workflow`] runs every mutating operation through the same steps:
//! resolve the parent chain (a missing parent fails fast with `NotFound`),
//! consult [`crate::policy`], check the parent's status precondition, write
//! through the [`CrmStore`], then publish an [`Activity`].
//!
//! - [`clients`] -- create, update, status change, delete.
//! - [`contracts`] -- create, update, sign, delete.
//! - [`events`] -- create, update, support assignment, delete.

pub mod clients;
pub mod contracts;
pub mod events;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use crate::activity::{Activity, ActivitySink};
use crate::client::{Client, ClientFilter};
use crate::contract::{Contract, ContractFilter};
use crate::error::CoreError;
use crate::event::{Event, EventFilter};
use crate::identity::Actor;
use crate::roles::Role;
use crate::store::CrmStore;
use crate::types::DbId;

/// Product switches for the workflow.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkflowConfig {
    /// Signing a contract under a non-active client activates the client in
    /// the same transaction instead of failing the precondition.
    pub auto_activate_client_on_sign: bool,
}

/// What a successful write did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    Created,
    Updated,
    Deleted,
}

/// A successful write together with the affected entity.
#[derive(Debug, Clone)]
pub struct Applied<T> {
    pub status: WriteStatus,
    pub value: T,
}

impl<T> Applied<T> {
    pub fn created(value: T) -> Self {
        Self {
            status: WriteStatus::Created,
            value,
        }
    }

    pub fn updated(value: T) -> Self {
        Self {
            status: WriteStatus::Updated,
            value,
        }
    }

    pub fn deleted(value: T) -> Self {
        Self {
            status: WriteStatus::Deleted,
            value,
        }
    }
}

pub type WorkflowResult<T> = Result<Applied<T>, CoreError>;

/// The lifecycle service. Cheap to clone.
#[derive(Clone)]
pub struct Workflow {
    store: Arc<dyn CrmStore>,
    activity: Arc<dyn ActivitySink>,
    config: WorkflowConfig,
}

impl Workflow {
    pub fn new(
        store: Arc<dyn CrmStore>,
        activity: Arc<dyn ActivitySink>,
        config: WorkflowConfig,
    ) -> Self {
        Self {
            store,
            activity,
            config,
        }
    }

    pub fn store(&self) -> &dyn CrmStore {
        self.store.as_ref()
    }

    pub fn config(&self) -> WorkflowConfig {
        self.config
    }

    // -----------------------------------------------------------------------
    // Reads (open to every authenticated actor)
    // -----------------------------------------------------------------------

    pub async fn get_client(&self, client_id: DbId) -> Result<Client, CoreError> {
        self.load_client(client_id).await
    }

    pub async fn list_clients(&self, filter: &ClientFilter) -> Result<Vec<Client>, CoreError> {
        self.store.list_clients(filter).await
    }

    pub async fn get_contract(
        &self,
        client_id: DbId,
        contract_id: DbId,
    ) -> Result<Contract, CoreError> {
        let client = self.load_client(client_id).await?;
        self.load_contract(&client, contract_id).await
    }

    /// List contracts. `filter.client_id`, when set, must name an existing client.
    pub async fn list_contracts(&self, filter: &ContractFilter) -> Result<Vec<Contract>, CoreError> {
        if let Some(client_id) = filter.client_id {
            self.load_client(client_id).await?;
        }
        self.store.list_contracts(filter).await
    }

    pub async fn get_event(
        &self,
        client_id: DbId,
        contract_id: DbId,
        event_id: DbId,
    ) -> Result<Event, CoreError> {
        let client = self.load_client(client_id).await?;
        let contract = self.load_contract(&client, contract_id).await?;
        self.load_event(&contract, event_id).await
    }

    /// List events under `client_id`/`contract_id`, or search across all
    /// events when no parent is given.
    pub async fn list_events(
        &self,
        parent: Option<(DbId, DbId)>,
        filter: &EventFilter,
    ) -> Result<Vec<Event>, CoreError> {
        let mut filter = filter.clone();
        if let Some((client_id, contract_id)) = parent {
            let client = self.load_client(client_id).await?;
            let contract = self.load_contract(&client, contract_id).await?;
            filter.contract_id = Some(contract.id);
        }
        self.store.list_events(&filter).await
    }

    // -----------------------------------------------------------------------
    // Shared helpers
    // -----------------------------------------------------------------------

    async fn load_client(&self, id: DbId) -> Result<Client, CoreError> {
        self.store
            .find_client(id)
            .await?
            .ok_or(CoreError::not_found("Client", id))
    }

    /// Load a contract and check it belongs to `client`.
    async fn load_contract(&self, client: &Client, id: DbId) -> Result<Contract, CoreError> {
        match self.store.find_contract(id).await? {
            Some(contract) if contract.client_id == client.id => Ok(contract),
            _ => Err(CoreError::not_found("Contract", id)),
        }
    }

    /// Load an event and check it belongs to `contract`.
    async fn load_event(&self, contract: &Contract, id: DbId) -> Result<Event, CoreError> {
        match self.store.find_event(id).await? {
            Some(event) if event.contract_id == contract.id => Ok(event),
            _ => Err(CoreError::not_found("Event", id)),
        }
    }

    /// Resolve a mandatory contact reference that must hold `role`.
    async fn require_contact(&self, user_id: Option<DbId>, role: Role) -> Result<DbId, CoreError> {
        let user_id =
            user_id.ok_or_else(|| CoreError::Validation(format!("{role} contact is required")))?;
        self.check_contact(user_id, role).await
    }

    /// Check that `user_id` names an existing user holding `role`.
    async fn check_contact(&self, user_id: DbId, role: Role) -> Result<DbId, CoreError> {
        match self.store.find_user(user_id).await? {
            Some(user) if user.has_role(role) => Ok(user.id),
            _ => Err(CoreError::Validation(format!("Invalid {role} contact ID."))),
        }
    }

    fn emit(&self, actor: &Actor, kind: &str, entity_type: &'static str, entity_id: DbId) {
        tracing::debug!(kind, entity_type, entity_id, actor = actor.user_id, "Publishing activity");
        self.activity
            .publish(Activity::new(kind, entity_type, entity_id, actor.user_id));
    }

    fn emit_with(
        &self,
        actor: &Actor,
        kind: &str,
        entity_type: &'static str,
        entity_id: DbId,
        payload: serde_json::Value,
    ) {
        tracing::debug!(kind, entity_type, entity_id, actor = actor.user_id, "Publishing activity");
        self.activity.publish(
            Activity::new(kind, entity_type, entity_id, actor.user_id).with_payload(payload),
        );
    }
}
