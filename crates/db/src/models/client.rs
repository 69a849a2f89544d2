//! Client row model.

use epic_core::client::{Client, ClientStatus};
use epic_core::types::{DbId, Timestamp};
use sqlx::FromRow;

use super::decode_column;

#[derive(Debug, Clone, FromRow)]
pub struct ClientRow {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub mobile: Option<String>,
    pub company_name: String,
    pub status: String,
    pub sales_contact_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ClientRow {
    pub fn into_domain(self) -> Result<Client, sqlx::Error> {
        Ok(Client {
            status: decode_column::<ClientStatus>("status", &self.status)?,
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            mobile: self.mobile,
            company_name: self.company_name,
            sales_contact_id: self.sales_contact_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
