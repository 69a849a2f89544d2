//! Contract row model.

use epic_core::contract::{Contract, ContractStatus};
use epic_core::types::{DbId, Timestamp};
use sqlx::FromRow;

use super::decode_column;

#[derive(Debug, Clone, FromRow)]
pub struct ContractRow {
    pub id: DbId,
    pub client_id: DbId,
    pub sales_contact_id: DbId,
    pub status: String,
    pub amount: f64,
    pub payment_due: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ContractRow {
    pub fn is_signed(&self) -> bool {
        self.status == ContractStatus::Signed.as_str()
    }

    pub fn into_domain(self) -> Result<Contract, sqlx::Error> {
        Ok(Contract {
            status: decode_column::<ContractStatus>("status", &self.status)?,
            id: self.id,
            client_id: self.client_id,
            sales_contact_id: self.sales_contact_id,
            amount: self.amount,
            payment_due: self.payment_due,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
