//! Event operations.

use serde_json::json;
use validator::Validate;

use super::{Applied, Workflow, WorkflowResult};
use crate::activity::{EVENT_CREATED, EVENT_DELETED, EVENT_SUPPORT_ASSIGNED, EVENT_UPDATED};
use crate::client::Client;
use crate::contract::Contract;
use crate::error::{CoreError, SuggestedAction};
use crate::event::{AssignSupport, CreateEvent, Event, EventChanges, NewEvent, UpdateEvent};
use crate::identity::Actor;
use crate::policy::{authorize, owner_or_management, Action, Target};
use crate::roles::Role;
use crate::types::DbId;

fn already_completed() -> CoreError {
    CoreError::Conflict("Event is already completed".into())
}

impl Workflow {
    /// Load a contract that can take new events, with its client.
    ///
    /// Fails with `NotFound` for an unknown client or contract and with a
    /// precondition error suggesting signature while the contract is open.
    pub async fn signed_contract(
        &self,
        client_id: DbId,
        contract_id: DbId,
    ) -> Result<(Client, Contract), CoreError> {
        let client = self.load_client(client_id).await?;
        let contract = self.load_contract(&client, contract_id).await?;
        if !contract.is_signed() {
            return Err(CoreError::PreconditionFailed {
                message: format!(
                    "Contract status is still '{}'. Please sign it first",
                    contract.status
                ),
                suggested_action: SuggestedAction::sign_contract(client.id, contract.id),
            });
        }
        Ok((client, contract))
    }

    /// Create an event under a signed contract.
    ///
    /// Management must name a Support user. Sales may only create events for
    /// their own clients; a support contact they send is checked but optional.
    pub async fn create_event(
        &self,
        actor: &Actor,
        client_id: DbId,
        contract_id: DbId,
        input: CreateEvent,
    ) -> WorkflowResult<Event> {
        let (client, contract) = self.signed_contract(client_id, contract_id).await?;

        let support_contact_id = match actor.role {
            Some(Role::Management) => {
                input.validate()?;
                Some(
                    self.require_contact(input.support_contact_id, Role::Support)
                        .await?,
                )
            }
            Some(Role::Sales) => {
                if !actor.is(client.sales_contact_id) {
                    return Err(CoreError::Forbidden(
                        "You are not assigned to this client".into(),
                    ));
                }
                input.validate()?;
                match input.support_contact_id {
                    Some(id) => Some(self.check_contact(id, Role::Support).await?),
                    None => None,
                }
            }
            _ => {
                return Err(CoreError::Forbidden(
                    "You do not have permission to create an event".into(),
                ))
            }
        };

        let event = self
            .store
            .create_event(&NewEvent {
                contract_id: contract.id,
                support_contact_id,
                attendees: input.attendees,
                event_date: input.event_date,
                notes: input.notes,
            })
            .await?;
        self.emit(actor, EVENT_CREATED, "event", event.id);
        Ok(Applied::created(event))
    }

    pub async fn update_event(
        &self,
        actor: &Actor,
        client_id: DbId,
        contract_id: DbId,
        event_id: DbId,
        input: UpdateEvent,
    ) -> WorkflowResult<Event> {
        let client = self.load_client(client_id).await?;
        let contract = self.load_contract(&client, contract_id).await?;
        let event = self.load_event(&contract, event_id).await?;
        authorize(
            actor,
            Action::Update,
            Target::Event {
                event: &event,
                client: &client,
            },
        )
        .into_result()?;
        if event.completed {
            return Err(already_completed());
        }
        input.validate()?;

        let updated = self
            .store
            .update_event(event.id, &EventChanges::from(input))
            .await?
            .ok_or(CoreError::not_found("Event", event_id))?;
        self.emit(actor, EVENT_UPDATED, "event", updated.id);
        Ok(Applied::updated(updated))
    }

    /// Assign the support contact of an event. Management only.
    pub async fn assign_support(
        &self,
        actor: &Actor,
        client_id: DbId,
        contract_id: DbId,
        event_id: DbId,
        input: AssignSupport,
    ) -> WorkflowResult<Event> {
        let client = self.load_client(client_id).await?;
        let contract = self.load_contract(&client, contract_id).await?;
        let event = self.load_event(&contract, event_id).await?;
        if event.completed {
            return Err(already_completed());
        }
        if !actor.is_management() {
            return Err(CoreError::Forbidden(
                "Only Management may assign a support contact".into(),
            ));
        }
        let support_contact_id = self
            .require_contact(input.support_contact_id, Role::Support)
            .await?;

        let changes = EventChanges {
            support_contact_id: Some(support_contact_id),
            ..Default::default()
        };
        let updated = self
            .store
            .update_event(event.id, &changes)
            .await?
            .ok_or(CoreError::not_found("Event", event_id))?;
        self.emit_with(
            actor,
            EVENT_SUPPORT_ASSIGNED,
            "event",
            updated.id,
            json!({ "support_contact_id": support_contact_id }),
        );
        Ok(Applied::updated(updated))
    }

    /// Delete an event. Only its support contact or Management may do so.
    pub async fn delete_event(
        &self,
        actor: &Actor,
        client_id: DbId,
        contract_id: DbId,
        event_id: DbId,
    ) -> WorkflowResult<Event> {
        let client = self.load_client(client_id).await?;
        let contract = self.load_contract(&client, contract_id).await?;
        let event = self.load_event(&contract, event_id).await?;
        authorize(
            actor,
            Action::Delete,
            Target::Event {
                event: &event,
                client: &client,
            },
        )
        .into_result()?;
        owner_or_management(actor, event.support_contact_id, "delete this event").into_result()?;

        if !self.store.delete_event(event.id).await? {
            return Err(CoreError::not_found("Event", event_id));
        }
        self.emit(actor, EVENT_DELETED, "event", event.id);
        Ok(Applied::deleted(event))
    }
}
