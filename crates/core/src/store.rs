//! Persistence seam for the workflow.
//!
//! [`CrmStore`] is the only way the workflow touches storage. Deleting a
//! parent removes its children (client → contracts → events). The PostgreSQL
//! implementation lives in `epic-db`; [`crate::memory::MemoryStore`] backs
//! tests and local runs.

use async_trait::async_trait;

use crate::client::{Client, ClientChanges, ClientFilter, NewClient};
use crate::contract::{Contract, ContractChanges, ContractFilter, NewContract, SignContract, SignedContract};
use crate::error::CoreError;
use crate::event::{Event, EventChanges, EventFilter, NewEvent};
use crate::identity::{NewUser, User, UserCredentials};
use crate::types::DbId;

pub type StoreResult<T> = Result<T, CoreError>;

#[async_trait]
pub trait CrmStore: Send + Sync {
    /// Cheap reachability check for the health endpoint.
    async fn health_check(&self) -> StoreResult<()>;

    // --- users ---

    async fn find_user(&self, id: DbId) -> StoreResult<Option<User>>;

    async fn find_credentials(&self, username: &str) -> StoreResult<Option<UserCredentials>>;

    async fn list_users(&self) -> StoreResult<Vec<User>>;

    async fn create_user(&self, input: &NewUser) -> StoreResult<User>;

    // --- clients ---

    async fn find_client(&self, id: DbId) -> StoreResult<Option<Client>>;

    async fn list_clients(&self, filter: &ClientFilter) -> StoreResult<Vec<Client>>;

    async fn create_client(&self, input: &NewClient) -> StoreResult<Client>;

    /// Returns `None` if no client with `id` exists.
    async fn update_client(&self, id: DbId, changes: &ClientChanges)
        -> StoreResult<Option<Client>>;

    /// Returns `true` if a row was removed.
    async fn delete_client(&self, id: DbId) -> StoreResult<bool>;

    // --- contracts ---

    async fn find_contract(&self, id: DbId) -> StoreResult<Option<Contract>>;

    async fn list_contracts(&self, filter: &ContractFilter) -> StoreResult<Vec<Contract>>;

    async fn create_contract(&self, input: &NewContract) -> StoreResult<Contract>;

    async fn update_contract(
        &self,
        id: DbId,
        changes: &ContractChanges,
    ) -> StoreResult<Option<Contract>>;

    async fn delete_contract(&self, id: DbId) -> StoreResult<bool>;

    /// Apply a [`SignContract`] atomically.
    ///
    /// Fails with [`CoreError::Conflict`] if the contract is already signed
    /// when the lock is taken, and with [`CoreError::NotFound`] if it is gone.
    async fn apply_sign(&self, command: &SignContract) -> StoreResult<SignedContract>;

    // --- events ---

    async fn find_event(&self, id: DbId) -> StoreResult<Option<Event>>;

    async fn list_events(&self, filter: &EventFilter) -> StoreResult<Vec<Event>>;

    async fn create_event(&self, input: &NewEvent) -> StoreResult<Event>;

    async fn update_event(&self, id: DbId, changes: &EventChanges) -> StoreResult<Option<Event>>;

    async fn delete_event(&self, id: DbId) -> StoreResult<bool>;
}
