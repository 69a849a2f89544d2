use serde::Serialize;

use crate::types::DbId;

/// Corrective action a caller can follow to unblock a rejected operation.
///
/// Carried by [`CoreError::PreconditionFailed`] so clients can offer the next
/// step (e.g. "activate this client first") without parsing the message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestedAction {
    /// Machine-readable action name, e.g. `"activate_client"`.
    pub action: &'static str,
    /// HTTP method of the corrective endpoint.
    pub method: &'static str,
    /// Path of the corrective endpoint, relative to the API root.
    pub path: String,
}

impl SuggestedAction {
    pub fn activate_client(client_id: DbId) -> Self {
        Self {
            action: "activate_client",
            method: "PATCH",
            path: format!("/clients/{client_id}/activate"),
        }
    }

    pub fn sign_contract(client_id: DbId, contract_id: DbId) -> Self {
        Self {
            action: "sign_contract",
            method: "PATCH",
            path: format!("/clients/{client_id}/contracts/{contract_id}/sign"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Precondition failed: {message}")]
    PreconditionFailed {
        message: String,
        suggested_action: SuggestedAction,
    },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn not_found(entity: &'static str, id: DbId) -> Self {
        Self::NotFound { entity, id }
    }
}

impl From<validator::ValidationErrors> for CoreError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let messages: Vec<String> = errs
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect();
                format!("{field}: {}", messages.join(", "))
            })
            .collect();
        fields.sort();
        CoreError::Validation(fields.join("; "))
    }
}
