//! In-memory [`CrmStore`] used by tests and database-less local runs.
//!
//! All state sits behind one mutex, so every call (including
//! [`CrmStore::apply_sign`]) is atomic with respect to the others. The lock is
//! never held across an `.await`.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use crate::client::{Client, ClientChanges, ClientFilter, ClientStatus, NewClient};
use crate::contract::{
    Contract, ContractChanges, ContractFilter, ContractStatus, NewContract, SignContract,
    SignedContract,
};
use crate::error::CoreError;
use crate::event::{Event, EventChanges, EventFilter, NewEvent};
use crate::identity::{NewUser, User, UserCredentials};
use crate::store::{CrmStore, StoreResult};
use crate::types::DbId;

#[derive(Default)]
struct Tables {
    next_id: DbId,
    writes: u64,
    users: BTreeMap<DbId, UserCredentials>,
    clients: BTreeMap<DbId, Client>,
    contracts: BTreeMap<DbId, Contract>,
    events: BTreeMap<DbId, Event>,
}

impl Tables {
    fn next_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }

    fn insert_event(&mut self, input: &NewEvent) -> StoreResult<Event> {
        if !self.contracts.contains_key(&input.contract_id) {
            return Err(CoreError::not_found("Contract", input.contract_id));
        }
        let now = Utc::now();
        let event = Event {
            id: self.next_id(),
            contract_id: input.contract_id,
            support_contact_id: input.support_contact_id,
            completed: false,
            attendees: input.attendees,
            event_date: input.event_date,
            notes: input.notes.clone(),
            created_at: now,
            updated_at: now,
        };
        self.events.insert(event.id, event.clone());
        self.writes += 1;
        Ok(event)
    }

    fn remove_contract_cascade(&mut self, id: DbId) -> bool {
        if self.contracts.remove(&id).is_none() {
            return false;
        }
        self.events.retain(|_, e| e.contract_id != id);
        true
    }
}

/// Thread-safe in-memory store.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful write operations performed so far.
    pub fn write_count(&self) -> u64 {
        self.lock().writes
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        // A poisoned lock only means a panic elsewhere; the maps stay consistent.
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl CrmStore for MemoryStore {
    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn find_user(&self, id: DbId) -> StoreResult<Option<User>> {
        Ok(self.lock().users.get(&id).map(|c| c.user.clone()))
    }

    async fn find_credentials(&self, username: &str) -> StoreResult<Option<UserCredentials>> {
        Ok(self
            .lock()
            .users
            .values()
            .find(|c| c.user.username == username)
            .cloned())
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(self.lock().users.values().map(|c| c.user.clone()).collect())
    }

    async fn create_user(&self, input: &NewUser) -> StoreResult<User> {
        let mut t = self.lock();
        if t.users.values().any(|c| c.user.username == input.username) {
            return Err(CoreError::Conflict(format!(
                "Username '{}' is already taken",
                input.username
            )));
        }
        let user = User {
            id: t.next_id(),
            username: input.username.clone(),
            email: input.email.clone(),
            role: input.role,
            is_staff: input.is_staff,
            created_at: Utc::now(),
        };
        t.users.insert(
            user.id,
            UserCredentials {
                user: user.clone(),
                password_hash: input.password_hash.clone(),
            },
        );
        t.writes += 1;
        Ok(user)
    }

    async fn find_client(&self, id: DbId) -> StoreResult<Option<Client>> {
        Ok(self.lock().clients.get(&id).cloned())
    }

    async fn list_clients(&self, filter: &ClientFilter) -> StoreResult<Vec<Client>> {
        Ok(self
            .lock()
            .clients
            .values()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect())
    }

    async fn create_client(&self, input: &NewClient) -> StoreResult<Client> {
        let mut t = self.lock();
        if t.clients.values().any(|c| c.email == input.email) {
            return Err(CoreError::Conflict(format!(
                "A client with email '{}' already exists",
                input.email
            )));
        }
        let now = Utc::now();
        let client = Client {
            id: t.next_id(),
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            email: input.email.clone(),
            phone: input.phone.clone(),
            mobile: input.mobile.clone(),
            company_name: input.company_name.clone(),
            status: ClientStatus::Lead,
            sales_contact_id: input.sales_contact_id,
            created_at: now,
            updated_at: now,
        };
        t.clients.insert(client.id, client.clone());
        t.writes += 1;
        Ok(client)
    }

    async fn update_client(
        &self,
        id: DbId,
        changes: &ClientChanges,
    ) -> StoreResult<Option<Client>> {
        let mut t = self.lock();
        if let Some(email) = &changes.email {
            if t.clients.values().any(|c| c.id != id && &c.email == email) {
                return Err(CoreError::Conflict(format!(
                    "A client with email '{email}' already exists"
                )));
            }
        }
        let Some(client) = t.clients.get_mut(&id) else {
            return Ok(None);
        };
        changes.apply(client);
        client.updated_at = Utc::now();
        let updated = client.clone();
        t.writes += 1;
        Ok(Some(updated))
    }

    async fn delete_client(&self, id: DbId) -> StoreResult<bool> {
        let mut t = self.lock();
        if t.clients.remove(&id).is_none() {
            return Ok(false);
        }
        let children: Vec<DbId> = t
            .contracts
            .values()
            .filter(|k| k.client_id == id)
            .map(|k| k.id)
            .collect();
        for contract_id in children {
            t.remove_contract_cascade(contract_id);
        }
        t.writes += 1;
        Ok(true)
    }

    async fn find_contract(&self, id: DbId) -> StoreResult<Option<Contract>> {
        Ok(self.lock().contracts.get(&id).cloned())
    }

    async fn list_contracts(&self, filter: &ContractFilter) -> StoreResult<Vec<Contract>> {
        let t = self.lock();
        Ok(t.contracts
            .values()
            .filter(|k| {
                t.clients
                    .get(&k.client_id)
                    .is_some_and(|client| filter.matches(k, client))
            })
            .cloned()
            .collect())
    }

    async fn create_contract(&self, input: &NewContract) -> StoreResult<Contract> {
        let mut t = self.lock();
        if !t.clients.contains_key(&input.client_id) {
            return Err(CoreError::not_found("Client", input.client_id));
        }
        let now = Utc::now();
        let contract = Contract {
            id: t.next_id(),
            client_id: input.client_id,
            sales_contact_id: input.sales_contact_id,
            status: ContractStatus::Open,
            amount: input.amount,
            payment_due: input.payment_due,
            created_at: now,
            updated_at: now,
        };
        t.contracts.insert(contract.id, contract.clone());
        t.writes += 1;
        Ok(contract)
    }

    async fn update_contract(
        &self,
        id: DbId,
        changes: &ContractChanges,
    ) -> StoreResult<Option<Contract>> {
        let mut t = self.lock();
        let Some(contract) = t.contracts.get_mut(&id) else {
            return Ok(None);
        };
        changes.apply(contract);
        contract.updated_at = Utc::now();
        let updated = contract.clone();
        t.writes += 1;
        Ok(Some(updated))
    }

    async fn delete_contract(&self, id: DbId) -> StoreResult<bool> {
        let mut t = self.lock();
        let removed = t.remove_contract_cascade(id);
        if removed {
            t.writes += 1;
        }
        Ok(removed)
    }

    async fn apply_sign(&self, command: &SignContract) -> StoreResult<SignedContract> {
        let mut t = self.lock();
        let contract = t
            .contracts
            .get(&command.contract_id)
            .cloned()
            .ok_or_else(|| CoreError::not_found("Contract", command.contract_id))?;
        if contract.is_signed() {
            return Err(CoreError::Conflict("Contract is already Signed".into()));
        }
        if let Some(client_id) = command.activate_client {
            if !t.clients.contains_key(&client_id) {
                return Err(CoreError::not_found("Client", client_id));
            }
        }

        // Every check has passed; nothing below can fail.
        let now = Utc::now();
        if let Some(client_id) = command.activate_client {
            if let Some(client) = t.clients.get_mut(&client_id) {
                client.status = ClientStatus::Active;
                client.updated_at = now;
            }
        }
        let mut signed = contract;
        signed.status = ContractStatus::Signed;
        signed.updated_at = now;
        t.contracts.insert(signed.id, signed.clone());
        t.writes += 1;
        let event = t.insert_event(&NewEvent::for_contract(signed.id))?;

        Ok(SignedContract {
            contract: signed,
            event,
        })
    }

    async fn find_event(&self, id: DbId) -> StoreResult<Option<Event>> {
        Ok(self.lock().events.get(&id).cloned())
    }

    async fn list_events(&self, filter: &EventFilter) -> StoreResult<Vec<Event>> {
        let t = self.lock();
        Ok(t.events
            .values()
            .filter(|e| {
                t.contracts
                    .get(&e.contract_id)
                    .and_then(|k| t.clients.get(&k.client_id))
                    .is_some_and(|client| filter.matches(e, client))
            })
            .cloned()
            .collect())
    }

    async fn create_event(&self, input: &NewEvent) -> StoreResult<Event> {
        self.lock().insert_event(input)
    }

    async fn update_event(&self, id: DbId, changes: &EventChanges) -> StoreResult<Option<Event>> {
        let mut t = self.lock();
        let Some(event) = t.events.get_mut(&id) else {
            return Ok(None);
        };
        changes.apply(event);
        event.updated_at = Utc::now();
        let updated = event.clone();
        t.writes += 1;
        Ok(Some(updated))
    }

    async fn delete_event(&self, id: DbId) -> StoreResult<bool> {
        let mut t = self.lock();
        let removed = t.events.remove(&id).is_some();
        if removed {
            t.writes += 1;
        }
        Ok(removed)
    }
}
