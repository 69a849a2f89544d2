//! Repository for the `events` table.

use epic_core::event::{EventChanges, EventFilter, NewEvent};
use epic_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::event::EventRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, contract_id, support_contact_id, completed, attendees, event_date, \
                       notes, created_at, updated_at";

/// Same columns qualified with the table name, for joins.
const QUALIFIED_COLUMNS: &str = "events.id, events.contract_id, events.support_contact_id, \
                                 events.completed, events.attendees, events.event_date, \
                                 events.notes, events.created_at, events.updated_at";

pub struct EventRepo;

impl EventRepo {
    /// Insert a new event. Usable inside a transaction.
    pub async fn create<'e, E>(executor: E, input: &NewEvent) -> Result<EventRow, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO events (contract_id, support_contact_id, attendees, event_date, notes)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EventRow>(&query)
            .bind(input.contract_id)
            .bind(input.support_contact_id)
            .bind(input.attendees)
            .bind(input.event_date)
            .bind(&input.notes)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<EventRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM events WHERE id = $1");
        sqlx::query_as::<_, EventRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List or search events. `event_date` matches the UTC calendar day.
    pub async fn list(pool: &PgPool, filter: &EventFilter) -> Result<Vec<EventRow>, sqlx::Error> {
        let query = format!(
            "SELECT {QUALIFIED_COLUMNS}
             FROM events
             JOIN contracts ON contracts.id = events.contract_id
             JOIN clients ON clients.id = contracts.client_id
             WHERE ($1::bigint IS NULL OR events.contract_id = $1)
               AND ($2::text IS NULL OR clients.company_name ILIKE '%' || $2 || '%')
               AND ($3::text IS NULL OR lower(clients.email) = lower($3))
               AND ($4::date IS NULL OR (events.event_date AT TIME ZONE 'UTC')::date = $4)
             ORDER BY events.id"
        );
        sqlx::query_as::<_, EventRow>(&query)
            .bind(filter.contract_id)
            .bind(&filter.company_name)
            .bind(&filter.client_email)
            .bind(filter.event_date)
            .fetch_all(pool)
            .await
    }

    /// Update an event. Only non-`None` fields in `changes` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        changes: &EventChanges,
    ) -> Result<Option<EventRow>, sqlx::Error> {
        let query = format!(
            "UPDATE events SET
                support_contact_id = COALESCE($2, support_contact_id),
                attendees = COALESCE($3, attendees),
                event_date = COALESCE($4, event_date),
                notes = COALESCE($5, notes),
                completed = COALESCE($6, completed),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EventRow>(&query)
            .bind(id)
            .bind(changes.support_contact_id)
            .bind(changes.attendees)
            .bind(changes.event_date)
            .bind(&changes.notes)
            .bind(changes.completed)
            .fetch_optional(pool)
            .await
    }

    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
