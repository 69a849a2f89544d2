//! Repository for the `contracts` table.

use epic_core::contract::{ContractChanges, ContractFilter, ContractStatus, NewContract};
use epic_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::contract::ContractRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, client_id, sales_contact_id, status, amount, payment_due, created_at, updated_at";

/// Same columns qualified with the table name, for joins.
const QUALIFIED_COLUMNS: &str = "contracts.id, contracts.client_id, contracts.sales_contact_id, \
                                 contracts.status, contracts.amount, contracts.payment_due, \
                                 contracts.created_at, contracts.updated_at";

pub struct ContractRepo;

impl ContractRepo {
    /// Insert a new contract. Status starts at the column default (`Open`).
    pub async fn create(pool: &PgPool, input: &NewContract) -> Result<ContractRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO contracts (client_id, sales_contact_id, amount, payment_due)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContractRow>(&query)
            .bind(input.client_id)
            .bind(input.sales_contact_id)
            .bind(input.amount)
            .bind(input.payment_due)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ContractRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM contracts WHERE id = $1");
        sqlx::query_as::<_, ContractRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Lock a contract row for the rest of the transaction.
    pub async fn find_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<ContractRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM contracts WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, ContractRow>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// List or search contracts.
    ///
    /// Company name is a case-insensitive substring, client email a
    /// case-insensitive exact match, `contract_date` the UTC creation day.
    pub async fn list(
        pool: &PgPool,
        filter: &ContractFilter,
    ) -> Result<Vec<ContractRow>, sqlx::Error> {
        let query = format!(
            "SELECT {QUALIFIED_COLUMNS}
             FROM contracts
             JOIN clients ON clients.id = contracts.client_id
             WHERE ($1::bigint IS NULL OR contracts.client_id = $1)
               AND ($2::text IS NULL OR clients.company_name ILIKE '%' || $2 || '%')
               AND ($3::text IS NULL OR lower(clients.email) = lower($3))
               AND ($4::date IS NULL OR (contracts.created_at AT TIME ZONE 'UTC')::date = $4)
               AND ($5::float8 IS NULL OR contracts.amount = $5)
             ORDER BY contracts.id"
        );
        sqlx::query_as::<_, ContractRow>(&query)
            .bind(filter.client_id)
            .bind(&filter.company_name)
            .bind(&filter.client_email)
            .bind(filter.contract_date)
            .bind(filter.amount)
            .fetch_all(pool)
            .await
    }

    /// Update a contract. Only non-`None` fields in `changes` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        changes: &ContractChanges,
    ) -> Result<Option<ContractRow>, sqlx::Error> {
        let query = format!(
            "UPDATE contracts SET
                amount = COALESCE($2, amount),
                payment_due = COALESCE($3, payment_due),
                sales_contact_id = COALESCE($4, sales_contact_id),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContractRow>(&query)
            .bind(id)
            .bind(changes.amount)
            .bind(changes.payment_due)
            .bind(changes.sales_contact_id)
            .fetch_optional(pool)
            .await
    }

    /// Set the status of a contract inside a transaction, returning the updated row.
    pub async fn set_status(
        conn: &mut PgConnection,
        id: DbId,
        status: ContractStatus,
    ) -> Result<ContractRow, sqlx::Error> {
        let query = format!(
            "UPDATE contracts SET status = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContractRow>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_one(conn)
            .await
    }

    /// Delete a contract and its events. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM contracts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
