//! Contract entity, status, DTOs, and the sign command.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::client::{contains_ignore_case, Client};
use crate::event::Event;
use crate::types::{DbId, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ContractStatus {
    #[default]
    Open,
    Signed,
}

impl ContractStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ContractStatus::Open => "Open",
            ContractStatus::Signed => "Signed",
        }
    }
}

impl fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContractStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Open" => Ok(ContractStatus::Open),
            "Signed" => Ok(ContractStatus::Signed),
            other => Err(format!("Unknown contract status '{other}'")),
        }
    }
}

/// A contract between the business and one client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contract {
    pub id: DbId,
    pub client_id: DbId,
    pub sales_contact_id: DbId,
    pub status: ContractStatus,
    pub amount: f64,
    pub payment_due: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Contract {
    pub fn is_signed(&self) -> bool {
        self.status == ContractStatus::Signed
    }
}

/// Request body for creating a contract under a client.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateContract {
    #[validate(range(min = 0.0, message = "amount must not be negative"))]
    pub amount: f64,
    pub payment_due: Timestamp,
    /// Honoured for Management only; Sales users are always the contact.
    pub sales_contact_id: Option<DbId>,
}

/// Request body for updating a contract. Status is changed via sign only.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateContract {
    #[validate(range(min = 0.0, message = "amount must not be negative"))]
    pub amount: Option<f64>,
    pub payment_due: Option<Timestamp>,
    pub sales_contact_id: Option<DbId>,
}

/// Request body for the sign endpoint. A missing status means `Signed`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignContractRequest {
    pub status: Option<ContractStatus>,
}

#[derive(Debug, Clone)]
pub struct NewContract {
    pub client_id: DbId,
    pub sales_contact_id: DbId,
    pub amount: f64,
    pub payment_due: Timestamp,
}

#[derive(Debug, Clone, Default)]
pub struct ContractChanges {
    pub amount: Option<f64>,
    pub payment_due: Option<Timestamp>,
    pub sales_contact_id: Option<DbId>,
}

impl ContractChanges {
    pub fn apply(&self, contract: &mut Contract) {
        if let Some(v) = self.amount {
            contract.amount = v;
        }
        if let Some(v) = self.payment_due {
            contract.payment_due = v;
        }
        if let Some(v) = self.sales_contact_id {
            contract.sales_contact_id = v;
        }
    }
}

impl From<UpdateContract> for ContractChanges {
    fn from(input: UpdateContract) -> Self {
        Self {
            amount: input.amount,
            payment_due: input.payment_due,
            sales_contact_id: input.sales_contact_id,
        }
    }
}

/// The atomic unit of work performed when a contract is signed.
///
/// The store applies every effect in one transaction: the contract moves to
/// `Signed`, one child event is created with default fields, and, when
/// `activate_client` is set, the parent client becomes `Active`. The store
/// re-checks the contract status under a row lock and fails with a conflict
/// if it is already signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignContract {
    pub contract_id: DbId,
    pub activate_client: Option<DbId>,
}

/// Result of a successful [`SignContract`].
#[derive(Debug, Clone, Serialize)]
pub struct SignedContract {
    pub contract: Contract,
    pub event: Event,
}

/// Filters for contract listing and search.
///
/// `client_id` is set from the route when listing a client's contracts.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContractFilter {
    #[serde(skip)]
    pub client_id: Option<DbId>,
    pub company_name: Option<String>,
    pub client_email: Option<String>,
    /// Calendar day the contract was created on.
    pub contract_date: Option<NaiveDate>,
    pub amount: Option<f64>,
}

impl ContractFilter {
    pub fn for_client(client_id: DbId) -> Self {
        Self {
            client_id: Some(client_id),
            ..Default::default()
        }
    }

    pub fn matches(&self, contract: &Contract, client: &Client) -> bool {
        if self.client_id.is_some_and(|id| id != contract.client_id) {
            return false;
        }
        if let Some(name) = &self.company_name {
            if !contains_ignore_case(&client.company_name, name) {
                return false;
            }
        }
        if let Some(email) = &self.client_email {
            if !client.email.eq_ignore_ascii_case(email) {
                return false;
            }
        }
        if let Some(day) = self.contract_date {
            if contract.created_at.date_naive() != day {
                return false;
            }
        }
        if let Some(amount) = self.amount {
            if contract.amount != amount {
                return false;
            }
        }
        true
    }
}
