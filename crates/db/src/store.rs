//! [`CrmStore`] backed by PostgreSQL.

use async_trait::async_trait;
use epic_core::client::{Client, ClientChanges, ClientFilter, ClientStatus, NewClient};
use epic_core::contract::{
    Contract, ContractChanges, ContractFilter, ContractStatus, NewContract, SignContract,
    SignedContract,
};
use epic_core::error::CoreError;
use epic_core::event::{Event, EventChanges, EventFilter, NewEvent};
use epic_core::identity::{NewUser, User, UserCredentials};
use epic_core::store::{CrmStore, StoreResult};
use epic_core::types::DbId;

use crate::models::client::ClientRow;
use crate::models::contract::ContractRow;
use crate::models::user::UserRow;
use crate::repositories::{ClientRepo, ContractRepo, EventRepo, UserRepo};
use crate::DbPool;

/// PostgreSQL implementation of [`CrmStore`]. Cheap to clone.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

/// Map a sqlx error onto the domain error taxonomy.
///
/// - Unique violations on `uq_*` constraints become conflicts.
/// - Foreign-key violations become validation errors.
/// - Everything else is logged and reported as internal.
pub fn classify_sqlx_error(err: sqlx::Error) -> CoreError {
    if let sqlx::Error::Database(db_err) = &err {
        match db_err.code().as_deref() {
            Some("23505") => {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return CoreError::Conflict(format!(
                        "Duplicate value violates unique constraint: {constraint}"
                    ));
                }
            }
            Some("23503") => {
                let constraint = db_err.constraint().unwrap_or("unknown");
                return CoreError::Validation(format!(
                    "Referenced row does not exist ({constraint})"
                ));
            }
            _ => {}
        }
    }
    tracing::error!(error = %err, "Database error");
    CoreError::Internal(err.to_string())
}

fn client(row: ClientRow) -> StoreResult<Client> {
    row.into_domain().map_err(classify_sqlx_error)
}

fn contract(row: ContractRow) -> StoreResult<Contract> {
    row.into_domain().map_err(classify_sqlx_error)
}

fn user(row: UserRow) -> StoreResult<User> {
    row.into_domain().map_err(classify_sqlx_error)
}

#[async_trait]
impl CrmStore for PgStore {
    async fn health_check(&self) -> StoreResult<()> {
        crate::health_check(&self.pool)
            .await
            .map_err(classify_sqlx_error)
    }

    // --- users ---

    async fn find_user(&self, id: DbId) -> StoreResult<Option<User>> {
        UserRepo::find_by_id(&self.pool, id)
            .await
            .map_err(classify_sqlx_error)?
            .map(user)
            .transpose()
    }

    async fn find_credentials(&self, username: &str) -> StoreResult<Option<UserCredentials>> {
        UserRepo::find_by_username(&self.pool, username)
            .await
            .map_err(classify_sqlx_error)?
            .map(|row| row.into_credentials().map_err(classify_sqlx_error))
            .transpose()
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        UserRepo::list(&self.pool)
            .await
            .map_err(classify_sqlx_error)?
            .into_iter()
            .map(user)
            .collect()
    }

    async fn create_user(&self, input: &NewUser) -> StoreResult<User> {
        let row = UserRepo::create(&self.pool, input)
            .await
            .map_err(classify_sqlx_error)?;
        user(row)
    }

    // --- clients ---

    async fn find_client(&self, id: DbId) -> StoreResult<Option<Client>> {
        ClientRepo::find_by_id(&self.pool, id)
            .await
            .map_err(classify_sqlx_error)?
            .map(client)
            .transpose()
    }

    async fn list_clients(&self, filter: &ClientFilter) -> StoreResult<Vec<Client>> {
        ClientRepo::list(&self.pool, filter)
            .await
            .map_err(classify_sqlx_error)?
            .into_iter()
            .map(client)
            .collect()
    }

    async fn create_client(&self, input: &NewClient) -> StoreResult<Client> {
        let row = ClientRepo::create(&self.pool, input)
            .await
            .map_err(classify_sqlx_error)?;
        client(row)
    }

    async fn update_client(
        &self,
        id: DbId,
        changes: &ClientChanges,
    ) -> StoreResult<Option<Client>> {
        ClientRepo::update(&self.pool, id, changes)
            .await
            .map_err(classify_sqlx_error)?
            .map(client)
            .transpose()
    }

    async fn delete_client(&self, id: DbId) -> StoreResult<bool> {
        ClientRepo::delete(&self.pool, id)
            .await
            .map_err(classify_sqlx_error)
    }

    // --- contracts ---

    async fn find_contract(&self, id: DbId) -> StoreResult<Option<Contract>> {
        ContractRepo::find_by_id(&self.pool, id)
            .await
            .map_err(classify_sqlx_error)?
            .map(contract)
            .transpose()
    }

    async fn list_contracts(&self, filter: &ContractFilter) -> StoreResult<Vec<Contract>> {
        ContractRepo::list(&self.pool, filter)
            .await
            .map_err(classify_sqlx_error)?
            .into_iter()
            .map(contract)
            .collect()
    }

    async fn create_contract(&self, input: &NewContract) -> StoreResult<Contract> {
        let row = ContractRepo::create(&self.pool, input)
            .await
            .map_err(classify_sqlx_error)?;
        contract(row)
    }

    async fn update_contract(
        &self,
        id: DbId,
        changes: &ContractChanges,
    ) -> StoreResult<Option<Contract>> {
        ContractRepo::update(&self.pool, id, changes)
            .await
            .map_err(classify_sqlx_error)?
            .map(contract)
            .transpose()
    }

    async fn delete_contract(&self, id: DbId) -> StoreResult<bool> {
        ContractRepo::delete(&self.pool, id)
            .await
            .map_err(classify_sqlx_error)
    }

    /// Sign inside one transaction.
    ///
    /// The contract row is locked with `FOR UPDATE` so two concurrent signs
    /// serialize; the loser sees `Signed` and gets a conflict. Dropping the
    /// transaction on any early return rolls everything back.
    async fn apply_sign(&self, command: &SignContract) -> StoreResult<SignedContract> {
        let mut tx = self.pool.begin().await.map_err(classify_sqlx_error)?;

        let locked = ContractRepo::find_for_update(&mut tx, command.contract_id)
            .await
            .map_err(classify_sqlx_error)?
            .ok_or(CoreError::not_found("Contract", command.contract_id))?;
        if locked.is_signed() {
            return Err(CoreError::Conflict("Contract is already Signed".into()));
        }

        if let Some(client_id) = command.activate_client {
            let updated = ClientRepo::set_status(&mut *tx, client_id, ClientStatus::Active)
                .await
                .map_err(classify_sqlx_error)?;
            if !updated {
                return Err(CoreError::not_found("Client", client_id));
            }
        }

        let signed = ContractRepo::set_status(&mut tx, command.contract_id, ContractStatus::Signed)
            .await
            .map_err(classify_sqlx_error)?;
        let event = EventRepo::create(&mut *tx, &NewEvent::for_contract(command.contract_id))
            .await
            .map_err(classify_sqlx_error)?;

        tx.commit().await.map_err(classify_sqlx_error)?;

        tracing::info!(
            contract_id = command.contract_id,
            event_id = event.id,
            client_activated = command.activate_client.is_some(),
            "Contract signed",
        );

        Ok(SignedContract {
            contract: contract(signed)?,
            event: Event::from(event),
        })
    }

    // --- events ---

    async fn find_event(&self, id: DbId) -> StoreResult<Option<Event>> {
        Ok(EventRepo::find_by_id(&self.pool, id)
            .await
            .map_err(classify_sqlx_error)?
            .map(Event::from))
    }

    async fn list_events(&self, filter: &EventFilter) -> StoreResult<Vec<Event>> {
        Ok(EventRepo::list(&self.pool, filter)
            .await
            .map_err(classify_sqlx_error)?
            .into_iter()
            .map(Event::from)
            .collect())
    }

    async fn create_event(&self, input: &NewEvent) -> StoreResult<Event> {
        let row = EventRepo::create(&self.pool, input)
            .await
            .map_err(classify_sqlx_error)?;
        Ok(Event::from(row))
    }

    async fn update_event(&self, id: DbId, changes: &EventChanges) -> StoreResult<Option<Event>> {
        Ok(EventRepo::update(&self.pool, id, changes)
            .await
            .map_err(classify_sqlx_error)?
            .map(Event::from))
    }

    async fn delete_event(&self, id: DbId) -> StoreResult<bool> {
        EventRepo::delete(&self.pool, id)
            .await
            .map_err(classify_sqlx_error)
    }
}
