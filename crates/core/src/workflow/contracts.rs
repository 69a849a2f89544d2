//! Contract operations, including signing.

use serde_json::json;
use validator::Validate;

use super::{Applied, Workflow, WorkflowResult};
use crate::activity::{
    CONTRACT_CREATED, CONTRACT_DELETED, CONTRACT_SIGNED, CONTRACT_UPDATED, EVENT_CREATED,
};
use crate::client::Client;
use crate::contract::{
    Contract, ContractChanges, ContractStatus, CreateContract, NewContract, SignContract,
    SignContractRequest, SignedContract, UpdateContract,
};
use crate::error::{CoreError, SuggestedAction};
use crate::identity::Actor;
use crate::policy::{authorize, owner_or_management, Action, Target};
use crate::roles::Role;
use crate::types::DbId;

fn client_not_active(client: &Client) -> CoreError {
    CoreError::PreconditionFailed {
        message: format!(
            "Client status is still '{}'. Please change it to 'Active'",
            client.status
        ),
        suggested_action: SuggestedAction::activate_client(client.id),
    }
}

impl Workflow {
    /// Load a client that can take new contracts.
    ///
    /// Fails with `NotFound` for an unknown id and with a precondition error
    /// suggesting activation while the client is not `Active`.
    pub async fn active_client(&self, client_id: DbId) -> Result<Client, CoreError> {
        let client = self.load_client(client_id).await?;
        if !client.is_active() {
            return Err(client_not_active(&client));
        }
        Ok(client)
    }

    /// Create a contract under an active client.
    ///
    /// Management must name a Sales user as `sales_contact_id`. Sales may only
    /// create contracts for their own clients and become the contract's sales
    /// contact.
    pub async fn create_contract(
        &self,
        actor: &Actor,
        client_id: DbId,
        input: CreateContract,
    ) -> WorkflowResult<Contract> {
        let client = self.active_client(client_id).await?;

        let sales_contact_id = match actor.role {
            Some(Role::Management) => {
                input.validate()?;
                self.require_contact(input.sales_contact_id, Role::Sales)
                    .await?
            }
            Some(Role::Sales) => {
                if !actor.is(client.sales_contact_id) {
                    return Err(CoreError::Forbidden(
                        "You are not assigned to this client".into(),
                    ));
                }
                input.validate()?;
                actor.user_id
            }
            _ => {
                return Err(CoreError::Forbidden(
                    "You do not have permission to create a contract".into(),
                ))
            }
        };

        let contract = self
            .store
            .create_contract(&NewContract {
                client_id: client.id,
                sales_contact_id,
                amount: input.amount,
                payment_due: input.payment_due,
            })
            .await?;
        self.emit(actor, CONTRACT_CREATED, "contract", contract.id);
        Ok(Applied::created(contract))
    }

    pub async fn update_contract(
        &self,
        actor: &Actor,
        client_id: DbId,
        contract_id: DbId,
        input: UpdateContract,
    ) -> WorkflowResult<Contract> {
        let client = self.load_client(client_id).await?;
        let contract = self.load_contract(&client, contract_id).await?;
        authorize(
            actor,
            Action::Update,
            Target::Contract {
                contract: &contract,
                client: &client,
            },
        )
        .into_result()?;
        input.validate()?;
        if let Some(sales_contact_id) = input.sales_contact_id {
            self.check_contact(sales_contact_id, Role::Sales).await?;
        }

        let updated = self
            .store
            .update_contract(contract.id, &ContractChanges::from(input))
            .await?
            .ok_or(CoreError::not_found("Contract", contract_id))?;
        self.emit(actor, CONTRACT_UPDATED, "contract", updated.id);
        Ok(Applied::updated(updated))
    }

    /// Sign a contract.
    ///
    /// Signing moves the contract to `Signed` and creates its first event in
    /// one store transaction. The client must be active unless the workflow
    /// is configured to activate it as part of the same transaction.
    pub async fn sign_contract(
        &self,
        actor: &Actor,
        client_id: DbId,
        contract_id: DbId,
        request: SignContractRequest,
    ) -> WorkflowResult<SignedContract> {
        let client = self.load_client(client_id).await?;
        let contract = self.load_contract(&client, contract_id).await?;
        authorize(
            actor,
            Action::Update,
            Target::Contract {
                contract: &contract,
                client: &client,
            },
        )
        .into_result()?;

        let requested = request.status.unwrap_or(ContractStatus::Signed);
        if requested != ContractStatus::Signed {
            return Err(CoreError::Validation(format!(
                "Contract status can only be changed to 'Signed', got '{requested}'"
            )));
        }

        let activate_client = if client.is_active() {
            None
        } else if self.config.auto_activate_client_on_sign {
            Some(client.id)
        } else {
            return Err(client_not_active(&client));
        };

        if contract.is_signed() {
            return Err(CoreError::Conflict("Contract is already Signed".into()));
        }

        let signed = self
            .store
            .apply_sign(&SignContract {
                contract_id: contract.id,
                activate_client,
            })
            .await?;

        self.emit_with(
            actor,
            CONTRACT_SIGNED,
            "contract",
            signed.contract.id,
            json!({
                "event_id": signed.event.id,
                "client_activated": activate_client.is_some(),
            }),
        );
        self.emit(actor, EVENT_CREATED, "event", signed.event.id);
        Ok(Applied::updated(signed))
    }

    pub async fn delete_contract(
        &self,
        actor: &Actor,
        client_id: DbId,
        contract_id: DbId,
    ) -> WorkflowResult<Contract> {
        let client = self.load_client(client_id).await?;
        let contract = self.load_contract(&client, contract_id).await?;
        authorize(
            actor,
            Action::Delete,
            Target::Contract {
                contract: &contract,
                client: &client,
            },
        )
        .into_result()?;
        owner_or_management(actor, Some(contract.sales_contact_id), "delete this contract")
            .into_result()?;

        if !self.store.delete_contract(contract.id).await? {
            return Err(CoreError::not_found("Contract", contract_id));
        }
        self.emit(actor, CONTRACT_DELETED, "contract", contract.id);
        Ok(Applied::deleted(contract))
    }
}
