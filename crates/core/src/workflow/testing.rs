//! Shared fixtures for workflow tests.

use std::sync::Arc;

use chrono::{Duration, Utc};

use super::{Workflow, WorkflowConfig};
use crate::activity::RecordingSink;
use crate::client::{Client, ClientStatus, CreateClient};
use crate::contract::{Contract, CreateContract};
use crate::identity::{Actor, NewUser};
use crate::memory::MemoryStore;
use crate::roles::Role;
use crate::store::CrmStore;
use crate::types::DbId;

pub struct Fixture {
    pub store: Arc<MemoryStore>,
    pub sink: Arc<RecordingSink>,
    pub workflow: Workflow,
    pub management: Actor,
    pub sales: Actor,
    pub other_sales: Actor,
    pub support: Actor,
    pub other_support: Actor,
    pub no_role: Actor,
}

impl Fixture {
    pub async fn new() -> Self {
        Self::with_config(WorkflowConfig::default()).await
    }

    pub async fn with_config(config: WorkflowConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        let sink = Arc::new(RecordingSink::default());
        let workflow = Workflow::new(store.clone(), sink.clone(), config);

        let management = user(&store, "manager", Some(Role::Management)).await;
        let sales = user(&store, "sally", Some(Role::Sales)).await;
        let other_sales = user(&store, "sam", Some(Role::Sales)).await;
        let support = user(&store, "sue", Some(Role::Support)).await;
        let other_support = user(&store, "stan", Some(Role::Support)).await;
        let no_role = user(&store, "guest", None).await;

        Self {
            store,
            sink,
            workflow,
            management,
            sales,
            other_sales,
            support,
            other_support,
            no_role,
        }
    }

    /// A client owned by `self.sales`, still a `Lead`.
    pub async fn lead_client(&self) -> Client {
        self.workflow
            .create_client(&self.sales, client_input("acme@example.com"))
            .await
            .unwrap()
            .value
    }

    /// A client owned by `self.sales`, already `Active`.
    pub async fn active_client(&self) -> Client {
        let client = self.lead_client().await;
        self.workflow
            .change_client_status(&self.sales, client.id, ClientStatus::Active)
            .await
            .unwrap()
            .value
    }

    /// An `Open` contract under an active client.
    pub async fn open_contract(&self) -> (Client, Contract) {
        let client = self.active_client().await;
        let contract = self
            .workflow
            .create_contract(&self.sales, client.id, contract_input())
            .await
            .unwrap()
            .value;
        (client, contract)
    }
}

async fn user(store: &MemoryStore, username: &str, role: Option<Role>) -> Actor {
    store
        .create_user(&NewUser {
            username: username.to_string(),
            email: format!("{username}@epic.test"),
            password_hash: "not-a-real-hash".to_string(),
            role,
            is_staff: false,
        })
        .await
        .unwrap()
        .actor()
}

pub fn client_input(email: &str) -> CreateClient {
    CreateClient {
        first_name: "Kevin".into(),
        last_name: "Casey".into(),
        email: email.into(),
        phone: Some("+33 1 23 45 67 89".into()),
        mobile: None,
        company_name: "Cool Startup LLC".into(),
        sales_contact_id: None,
    }
}

pub fn contract_input() -> CreateContract {
    CreateContract {
        amount: 1500.0,
        payment_due: Utc::now() + Duration::days(30),
        sales_contact_id: None,
    }
}

pub fn contract_input_for(sales_contact_id: DbId) -> CreateContract {
    CreateContract {
        sales_contact_id: Some(sales_contact_id),
        ..contract_input()
    }
}
