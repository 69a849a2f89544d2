//! Client operations.

use serde_json::json;
use validator::Validate;

use super::{Applied, Workflow, WorkflowResult};
use crate::activity::{CLIENT_CREATED, CLIENT_DELETED, CLIENT_STATUS_CHANGED, CLIENT_UPDATED};
use crate::client::{Client, ClientChanges, ClientStatus, CreateClient, NewClient, UpdateClient};
use crate::error::CoreError;
use crate::identity::Actor;
use crate::policy::{authorize, owner_or_management, Action, Target};
use crate::roles::Role;
use crate::types::DbId;

impl Workflow {
    /// Create a client.
    ///
    /// Management must name a Sales user as `sales_contact_id`. Sales always
    /// become the sales contact themselves; any id they send is ignored.
    pub async fn create_client(&self, actor: &Actor, input: CreateClient) -> WorkflowResult<Client> {
        let sales_contact_id = match actor.role {
            Some(Role::Management) => {
                input.validate()?;
                self.require_contact(input.sales_contact_id, Role::Sales)
                    .await?
            }
            Some(Role::Sales) => {
                input.validate()?;
                actor.user_id
            }
            _ => {
                return Err(CoreError::Forbidden(
                    "You do not have permission to create a client".into(),
                ))
            }
        };

        let client = self
            .store
            .create_client(&NewClient::from_request(input, sales_contact_id))
            .await?;
        self.emit(actor, CLIENT_CREATED, "client", client.id);
        Ok(Applied::created(client))
    }

    pub async fn update_client(
        &self,
        actor: &Actor,
        client_id: DbId,
        input: UpdateClient,
    ) -> WorkflowResult<Client> {
        let client = self.load_client(client_id).await?;
        authorize(actor, Action::Update, Target::Client(&client)).into_result()?;
        input.validate()?;
        if let Some(sales_contact_id) = input.sales_contact_id {
            self.check_contact(sales_contact_id, Role::Sales).await?;
        }

        let updated = self
            .store
            .update_client(client.id, &ClientChanges::from(input))
            .await?
            .ok_or(CoreError::not_found("Client", client_id))?;
        self.emit(actor, CLIENT_UPDATED, "client", updated.id);
        Ok(Applied::updated(updated))
    }

    /// Move a client to `requested`.
    ///
    /// Activating an already active client is a conflict and writes nothing.
    /// Any other requested status is written as is.
    pub async fn change_client_status(
        &self,
        actor: &Actor,
        client_id: DbId,
        requested: ClientStatus,
    ) -> WorkflowResult<Client> {
        let client = self.load_client(client_id).await?;
        authorize(actor, Action::Update, Target::Client(&client)).into_result()?;
        owner_or_management(actor, Some(client.sales_contact_id), "update this client")
            .into_result()?;

        if requested == ClientStatus::Active && client.is_active() {
            return Err(CoreError::Conflict("Client is already Active".into()));
        }

        let updated = self
            .store
            .update_client(client.id, &ClientChanges::status(requested))
            .await?
            .ok_or(CoreError::not_found("Client", client_id))?;
        self.emit_with(
            actor,
            CLIENT_STATUS_CHANGED,
            "client",
            updated.id,
            json!({ "from": client.status, "to": updated.status }),
        );
        Ok(Applied::updated(updated))
    }

    pub async fn delete_client(&self, actor: &Actor, client_id: DbId) -> WorkflowResult<Client> {
        let client = self.load_client(client_id).await?;
        authorize(actor, Action::Delete, Target::Client(&client)).into_result()?;
        owner_or_management(actor, Some(client.sales_contact_id), "delete this client")
            .into_result()?;

        if !self.store.delete_client(client.id).await? {
            return Err(CoreError::not_found("Client", client_id));
        }
        self.emit(actor, CLIENT_DELETED, "client", client.id);
        Ok(Applied::deleted(client))
    }
}
