//! Repository for the `clients` table.

use epic_core::client::{ClientChanges, ClientFilter, ClientStatus, NewClient};
use epic_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::client::ClientRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, first_name, last_name, email, phone, mobile, company_name, \
                       status, sales_contact_id, created_at, updated_at";

pub struct ClientRepo;

impl ClientRepo {
    /// Insert a new client. Status starts at the column default (`Lead`).
    pub async fn create(pool: &PgPool, input: &NewClient) -> Result<ClientRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO clients
                (first_name, last_name, email, phone, mobile, company_name, sales_contact_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ClientRow>(&query)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.mobile)
            .bind(&input.company_name)
            .bind(input.sales_contact_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ClientRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clients WHERE id = $1");
        sqlx::query_as::<_, ClientRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List clients, optionally filtered by company-name substring and exact email.
    /// Both comparisons are case-insensitive.
    pub async fn list(pool: &PgPool, filter: &ClientFilter) -> Result<Vec<ClientRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM clients
             WHERE ($1::text IS NULL OR company_name ILIKE '%' || $1 || '%')
               AND ($2::text IS NULL OR lower(email) = lower($2))
             ORDER BY id"
        );
        sqlx::query_as::<_, ClientRow>(&query)
            .bind(&filter.name)
            .bind(&filter.email)
            .fetch_all(pool)
            .await
    }

    /// Update a client. Only non-`None` fields in `changes` are applied;
    /// `phone` and `mobile` are cleared when set to `Some(None)`.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        changes: &ClientChanges,
    ) -> Result<Option<ClientRow>, sqlx::Error> {
        let query = format!(
            "UPDATE clients SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                email = COALESCE($4, email),
                phone = CASE WHEN $10 THEN $5 ELSE phone END,
                mobile = CASE WHEN $11 THEN $6 ELSE mobile END,
                company_name = COALESCE($7, company_name),
                status = COALESCE($8, status),
                sales_contact_id = COALESCE($9, sales_contact_id),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ClientRow>(&query)
            .bind(id)
            .bind(&changes.first_name)
            .bind(&changes.last_name)
            .bind(&changes.email)
            .bind(changes.phone.clone().flatten())
            .bind(changes.mobile.clone().flatten())
            .bind(&changes.company_name)
            .bind(changes.status.map(|s| s.as_str()))
            .bind(changes.sales_contact_id)
            .bind(changes.phone.is_some())
            .bind(changes.mobile.is_some())
            .fetch_optional(pool)
            .await
    }

    /// Set the status of a client. Usable inside a transaction.
    ///
    /// Returns `true` if the row was updated.
    pub async fn set_status<'e, E>(
        executor: E,
        id: DbId,
        status: ClientStatus,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result =
            sqlx::query("UPDATE clients SET status = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(status.as_str())
                .execute(executor)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a client. Its contracts and their events go with it.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
