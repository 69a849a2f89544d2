//! PostgreSQL-backed store tests.
//!
//! These need a running database reachable through `DATABASE_URL`; run them
//! with `cargo test -p epic-db -- --ignored`.

use assert_matches::assert_matches;
use chrono::Utc;
use epic_core::client::{ClientChanges, ClientFilter, ClientStatus, NewClient};
use epic_core::contract::{ContractFilter, ContractStatus, NewContract, SignContract};
use epic_core::error::CoreError;
use epic_core::event::EventFilter;
use epic_core::identity::NewUser;
use epic_core::roles::Role;
use epic_core::store::CrmStore;
use epic_core::types::DbId;
use epic_db::PgStore;
use sqlx::PgPool;

async fn sales_user(store: &PgStore) -> DbId {
    store
        .create_user(&NewUser {
            username: "sally".into(),
            email: "sally@epic.test".into(),
            password_hash: "hash".into(),
            role: Some(Role::Sales),
            is_staff: false,
        })
        .await
        .expect("user creation should succeed")
        .id
}

fn new_client(email: &str, sales_contact_id: DbId) -> NewClient {
    NewClient {
        first_name: "Kevin".into(),
        last_name: "Casey".into(),
        email: email.into(),
        phone: None,
        mobile: None,
        company_name: "Cool Startup LLC".into(),
        sales_contact_id,
    }
}

fn new_contract(client_id: DbId, sales_contact_id: DbId) -> NewContract {
    NewContract {
        client_id,
        sales_contact_id,
        amount: 1500.0,
        payment_due: Utc::now(),
    }
}

#[sqlx::test(migrator = "epic_db::MIGRATOR")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_client_roundtrip_and_unique_email(pool: PgPool) {
    let store = PgStore::new(pool);
    let sales = sales_user(&store).await;

    let client = store
        .create_client(&new_client("kevin@startup.io", sales))
        .await
        .unwrap();
    assert_eq!(client.status, ClientStatus::Lead);

    let duplicate = store
        .create_client(&new_client("kevin@startup.io", sales))
        .await;
    assert_matches!(duplicate, Err(CoreError::Conflict(_)));

    let activated = store
        .update_client(client.id, &ClientChanges::status(ClientStatus::Active))
        .await
        .unwrap()
        .expect("client should exist");
    assert_eq!(activated.status, ClientStatus::Active);

    let found = store
        .list_clients(&ClientFilter {
            name: Some("startup".into()),
            email: None,
        })
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
}

#[sqlx::test(migrator = "epic_db::MIGRATOR")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_sign_is_atomic_and_single_shot(pool: PgPool) {
    let store = PgStore::new(pool);
    let sales = sales_user(&store).await;
    let client = store
        .create_client(&new_client("kevin@startup.io", sales))
        .await
        .unwrap();
    let contract = store
        .create_contract(&new_contract(client.id, sales))
        .await
        .unwrap();

    let command = SignContract {
        contract_id: contract.id,
        activate_client: Some(client.id),
    };
    let signed = store.apply_sign(&command).await.unwrap();
    assert_eq!(signed.contract.status, ContractStatus::Signed);
    assert_eq!(signed.event.contract_id, contract.id);

    let client = store.find_client(client.id).await.unwrap().unwrap();
    assert_eq!(client.status, ClientStatus::Active);

    let again = store.apply_sign(&command).await;
    assert_matches!(again, Err(CoreError::Conflict(_)));
    let events = store
        .list_events(&EventFilter::for_contract(contract.id))
        .await
        .unwrap();
    assert_eq!(events.len(), 1);
}

#[sqlx::test(migrator = "epic_db::MIGRATOR")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_deleting_client_cascades(pool: PgPool) {
    let store = PgStore::new(pool);
    let sales = sales_user(&store).await;
    let client = store
        .create_client(&new_client("kevin@startup.io", sales))
        .await
        .unwrap();
    let contract = store
        .create_contract(&new_contract(client.id, sales))
        .await
        .unwrap();
    store
        .apply_sign(&SignContract {
            contract_id: contract.id,
            activate_client: None,
        })
        .await
        .unwrap();

    assert!(store.delete_client(client.id).await.unwrap());
    assert!(store
        .list_contracts(&ContractFilter::default())
        .await
        .unwrap()
        .is_empty());
    assert!(store
        .list_events(&EventFilter::default())
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test(migrator = "epic_db::MIGRATOR")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_contract_search_joins_client(pool: PgPool) {
    let store = PgStore::new(pool);
    let sales = sales_user(&store).await;
    let client = store
        .create_client(&new_client("kevin@startup.io", sales))
        .await
        .unwrap();
    store
        .create_contract(&new_contract(client.id, sales))
        .await
        .unwrap();

    let by_email = store
        .list_contracts(&ContractFilter {
            client_email: Some("KEVIN@startup.io".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(by_email.len(), 1);

    let by_day = store
        .list_contracts(&ContractFilter {
            contract_date: Some(Utc::now().date_naive()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(by_day.len(), 1);

    let miss = store
        .list_contracts(&ContractFilter {
            company_name: Some("nobody".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(miss.is_empty());
}

#[sqlx::test(migrator = "epic_db::MIGRATOR")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_concurrent_signs_create_one_event(pool: PgPool) {
    let store = PgStore::new(pool);
    let sales = sales_user(&store).await;
    let client = store
        .create_client(&new_client("kevin@startup.io", sales))
        .await
        .unwrap();
    let contract = store
        .create_contract(&new_contract(client.id, sales))
        .await
        .unwrap();

    let command = SignContract {
        contract_id: contract.id,
        activate_client: None,
    };
    let first = tokio::spawn({
        let store = store.clone();
        let command = command.clone();
        async move { store.apply_sign(&command).await }
    });
    let second = tokio::spawn({
        let store = store.clone();
        async move { store.apply_sign(&command).await }
    });
    let (first, second) = (first.await.unwrap(), second.await.unwrap());

    let conflicts = [&first, &second]
        .iter()
        .filter(|r| matches!(r, Err(CoreError::Conflict(_))))
        .count();
    assert_eq!(conflicts, 1);
    assert!(first.is_ok() || second.is_ok());

    let events = store
        .list_events(&EventFilter::for_contract(contract.id))
        .await
        .unwrap();
    assert_eq!(events.len(), 1);
}

#[sqlx::test(migrator = "epic_db::MIGRATOR")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_update_clears_phone_and_keeps_mobile(pool: PgPool) {
    let store = PgStore::new(pool);
    let sales = sales_user(&store).await;
    let mut input = new_client("kevin@startup.io", sales);
    input.phone = Some("+678 123 456 78".into());
    input.mobile = Some("+678 987 654 32".into());
    let client = store.create_client(&input).await.unwrap();

    let updated = store
        .update_client(
            client.id,
            &ClientChanges {
                phone: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .expect("client should exist");
    assert_eq!(updated.phone, None);
    assert_eq!(updated.mobile.as_deref(), Some("+678 987 654 32"));
}
