//! Client entity, status, and DTOs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::types::{DbId, Timestamp};

/// Where a client stands in the sales funnel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ClientStatus {
    #[default]
    Lead,
    Active,
    Inactive,
}

impl ClientStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ClientStatus::Lead => "Lead",
            ClientStatus::Active => "Active",
            ClientStatus::Inactive => "Inactive",
        }
    }
}

impl fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClientStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Lead" => Ok(ClientStatus::Lead),
            "Active" => Ok(ClientStatus::Active),
            "Inactive" => Ok(ClientStatus::Inactive),
            other => Err(format!("Unknown client status '{other}'")),
        }
    }
}

/// A client of the business, owned by exactly one sales contact.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Client {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub mobile: Option<String>,
    pub company_name: String,
    pub status: ClientStatus,
    pub sales_contact_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Client {
    pub fn is_active(&self) -> bool {
        self.status == ClientStatus::Active
    }
}

/// Request body for creating a client.
///
/// `sales_contact_id` is only honoured for Management; Sales users always
/// become the owner of the clients they create.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateClient {
    #[validate(length(min = 1, max = 25, message = "first_name must be 1-25 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 30, message = "last_name must be 1-30 characters"))]
    pub last_name: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(max = 20, message = "phone must be at most 20 characters"))]
    pub phone: Option<String>,
    #[validate(length(max = 20, message = "mobile must be at most 20 characters"))]
    pub mobile: Option<String>,
    #[validate(length(min = 1, max = 60, message = "company_name must be 1-60 characters"))]
    pub company_name: String,
    pub sales_contact_id: Option<DbId>,
}

/// Request body for updating a client's contact fields. All fields are optional.
///
/// `phone` and `mobile` distinguish an absent key (keep) from `null` (clear).
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateClient {
    #[validate(length(min = 1, max = 25, message = "first_name must be 1-25 characters"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 30, message = "last_name must be 1-30 characters"))]
    pub last_name: Option<String>,
    #[validate(email(message = "email must be a valid address"))]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    #[validate(length(max = 20, message = "phone must be at most 20 characters"))]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[validate(length(max = 20, message = "mobile must be at most 20 characters"))]
    pub mobile: Option<Option<String>>,
    #[validate(length(min = 1, max = 60, message = "company_name must be 1-60 characters"))]
    pub company_name: Option<String>,
    pub sales_contact_id: Option<DbId>,
}

/// Deserialize a present key as `Some`, so `null` becomes `Some(None)`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Request body for the client status endpoint. Defaults to `Active`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChangeClientStatus {
    pub status: Option<ClientStatus>,
}

/// Store input for inserting a client; the owner is already resolved.
#[derive(Debug, Clone)]
pub struct NewClient {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub mobile: Option<String>,
    pub company_name: String,
    pub sales_contact_id: DbId,
}

impl NewClient {
    pub fn from_request(input: CreateClient, sales_contact_id: DbId) -> Self {
        Self {
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            phone: input.phone,
            mobile: input.mobile,
            company_name: input.company_name,
            sales_contact_id,
        }
    }
}

/// Store input for a partial client update. `None` leaves a column unchanged;
/// `Some(None)` clears a nullable one.
#[derive(Debug, Clone, Default)]
pub struct ClientChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<Option<String>>,
    pub mobile: Option<Option<String>>,
    pub company_name: Option<String>,
    pub status: Option<ClientStatus>,
    pub sales_contact_id: Option<DbId>,
}

impl ClientChanges {
    pub fn status(status: ClientStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn apply(&self, client: &mut Client) {
        if let Some(v) = &self.first_name {
            client.first_name = v.clone();
        }
        if let Some(v) = &self.last_name {
            client.last_name = v.clone();
        }
        if let Some(v) = &self.email {
            client.email = v.clone();
        }
        if let Some(v) = &self.phone {
            client.phone = v.clone();
        }
        if let Some(v) = &self.mobile {
            client.mobile = v.clone();
        }
        if let Some(v) = &self.company_name {
            client.company_name = v.clone();
        }
        if let Some(v) = self.status {
            client.status = v;
        }
        if let Some(v) = self.sales_contact_id {
            client.sales_contact_id = v;
        }
    }
}

impl From<UpdateClient> for ClientChanges {
    fn from(input: UpdateClient) -> Self {
        Self {
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            phone: input.phone,
            mobile: input.mobile,
            company_name: input.company_name,
            status: None,
            sales_contact_id: input.sales_contact_id,
        }
    }
}

/// Search filters for listing clients (`?name=&email=`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientFilter {
    /// Case-insensitive substring of the company name.
    pub name: Option<String>,
    /// Case-insensitive exact email.
    pub email: Option<String>,
}

impl ClientFilter {
    pub fn matches(&self, client: &Client) -> bool {
        if let Some(name) = &self.name {
            if !contains_ignore_case(&client.company_name, name) {
                return false;
            }
        }
        if let Some(email) = &self.email {
            if !client.email.eq_ignore_ascii_case(email) {
                return false;
            }
        }
        true
    }
}

pub(crate) fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(company: &str, email: &str) -> Client {
        let now = chrono::Utc::now();
        Client {
            id: 1,
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: email.into(),
            phone: None,
            mobile: None,
            company_name: company.into(),
            status: ClientStatus::Lead,
            sales_contact_id: 7,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_update_distinguishes_absent_from_null() {
        let keep: UpdateClient = serde_json::from_str(r#"{"first_name":"Grace"}"#).unwrap();
        assert_eq!(keep.phone, None);

        let clear: UpdateClient = serde_json::from_str(r#"{"phone":null}"#).unwrap();
        assert_eq!(clear.phone, Some(None));

        let mut c = client("Acme", "x@acme.io");
        c.phone = Some("+1 555 0100".into());
        c.mobile = Some("+1 555 0199".into());
        ClientChanges::from(clear).apply(&mut c);
        assert_eq!(c.phone, None);
        assert_eq!(c.mobile.as_deref(), Some("+1 555 0199"));
    }

    #[test]
    fn test_update_validates_present_phone() {
        let long: UpdateClient =
            serde_json::from_str(r#"{"mobile":"012345678901234567890123"}"#).unwrap();
        assert!(long.validate().is_err());

        let cleared: UpdateClient = serde_json::from_str(r#"{"mobile":null}"#).unwrap();
        assert!(cleared.validate().is_ok());
    }

    #[test]
    fn test_status_defaults_to_lead() {
        assert_eq!(ClientStatus::default(), ClientStatus::Lead);
    }

    #[test]
    fn test_status_round_trips_through_str() {
        for s in ["Lead", "Active", "Inactive"] {
            assert_eq!(s.parse::<ClientStatus>().unwrap().as_str(), s);
        }
        assert!("Signed".parse::<ClientStatus>().is_err());
    }

    #[test]
    fn test_filter_by_company_name_is_case_insensitive_substring() {
        let c = client("Acme Events", "x@acme.io");
        let filter = ClientFilter {
            name: Some("acme".into()),
            email: None,
        };
        assert!(filter.matches(&c));

        let filter = ClientFilter {
            name: Some("globex".into()),
            email: None,
        };
        assert!(!filter.matches(&c));
    }

    #[test]
    fn test_filter_by_email_is_exact_ignoring_case() {
        let c = client("Acme", "Ops@Acme.io");
        let exact = ClientFilter {
            name: None,
            email: Some("ops@acme.io".into()),
        };
        assert!(exact.matches(&c));

        let partial = ClientFilter {
            name: None,
            email: Some("acme.io".into()),
        };
        assert!(!partial.matches(&c));
    }

    #[test]
    fn test_create_client_rejects_bad_email() {
        let input = CreateClient {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "not-an-email".into(),
            phone: None,
            mobile: None,
            company_name: "Acme".into(),
            sales_contact_id: None,
        };
        assert!(input.validate().is_err());
    }
}
