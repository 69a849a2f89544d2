//! Role-based authorization policy.
//!
//! [`authorize`] is a pure decision over (actor, action, target). It is
//! consulted before every mutating workflow operation. Precedence:
//!
//! 1. Reads are allowed for any authenticated actor.
//! 2. Staff may do anything.
//! 3. Management may mutate every entity.
//! 4. Sales may mutate what they own: the entity's sales contact, or the
//!    sales contact of the ancestor client for contracts and events.
//! 5. Support may mutate the events they are the support contact of.
//! 6. Everything else is denied.

use crate::client::Client;
use crate::contract::Contract;
use crate::error::CoreError;
use crate::event::Event;
use crate::identity::Actor;
use crate::roles::Role;
use crate::types::DbId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// List or fetch.
    Read,
    Create,
    Update,
    Delete,
}

impl Action {
    pub fn is_read(self) -> bool {
        matches!(self, Action::Read)
    }
}

/// The entity an action is aimed at, with the ancestors the policy needs.
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    Client(&'a Client),
    Contract {
        contract: &'a Contract,
        client: &'a Client,
    },
    Event {
        event: &'a Event,
        client: &'a Client,
    },
}

impl Target<'_> {
    fn kind(&self) -> &'static str {
        match self {
            Target::Client(_) => "client",
            Target::Contract { .. } => "contract",
            Target::Event { .. } => "event",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(String),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// Convert a denial into [`CoreError::Forbidden`].
    pub fn into_result(self) -> Result<(), CoreError> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => Err(CoreError::Forbidden(reason)),
        }
    }
}

pub fn authorize(actor: &Actor, action: Action, target: Target<'_>) -> Decision {
    if action.is_read() || actor.is_staff {
        return Decision::Allow;
    }

    let Some(role) = actor.role else {
        return Decision::Deny("You have no role assigned".into());
    };

    let allowed = match role {
        Role::Management => true,
        Role::Sales => match target {
            Target::Client(client) => actor.is(client.sales_contact_id),
            Target::Contract { contract, client } => {
                actor.is(contract.sales_contact_id) || actor.is(client.sales_contact_id)
            }
            Target::Event { client, .. } => actor.is(client.sales_contact_id),
        },
        Role::Support => match target {
            Target::Event { event, .. } => event.support_contact_id == Some(actor.user_id),
            Target::Client(_) | Target::Contract { .. } => false,
        },
    };

    if allowed {
        Decision::Allow
    } else {
        Decision::Deny(format!(
            "You do not have permission to modify this {}",
            target.kind()
        ))
    }
}

/// Gate for operations reserved to the owner of an entity or to Management.
///
/// Used on top of [`authorize`] for status changes and deletions.
pub fn owner_or_management(actor: &Actor, owner_id: Option<DbId>, what: &str) -> Decision {
    if actor.is_management() || owner_id == Some(actor.user_id) {
        Decision::Allow
    } else {
        Decision::Deny(format!(
            "You do not have permission to {what}, you are not its owner"
        ))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::client::ClientStatus;
    use crate::contract::ContractStatus;

    const SALES_OWNER: DbId = 10;
    const SALES_OTHER: DbId = 11;
    const CONTRACT_SALES: DbId = 12;
    const SUPPORT_ASSIGNED: DbId = 20;
    const SUPPORT_OTHER: DbId = 21;
    const MANAGER: DbId = 30;

    fn actor(user_id: DbId, role: Option<Role>) -> Actor {
        Actor {
            user_id,
            role,
            is_staff: false,
        }
    }

    fn client() -> Client {
        let now = Utc::now();
        Client {
            id: 1,
            first_name: "A".into(),
            last_name: "B".into(),
            email: "a@b.com".into(),
            phone: None,
            mobile: None,
            company_name: "Acme".into(),
            status: ClientStatus::Active,
            sales_contact_id: SALES_OWNER,
            created_at: now,
            updated_at: now,
        }
    }

    fn contract() -> Contract {
        let now = Utc::now();
        Contract {
            id: 2,
            client_id: 1,
            sales_contact_id: CONTRACT_SALES,
            status: ContractStatus::Open,
            amount: 100.0,
            payment_due: now,
            created_at: now,
            updated_at: now,
        }
    }

    fn event(support: Option<DbId>) -> Event {
        let now = Utc::now();
        Event {
            id: 3,
            contract_id: 2,
            support_contact_id: support,
            completed: false,
            attendees: None,
            event_date: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_reads_are_always_allowed() {
        let c = client();
        let nobody = actor(99, None);
        assert!(authorize(&nobody, Action::Read, Target::Client(&c)).is_allowed());
    }

    #[test]
    fn test_staff_may_mutate_anything() {
        let c = client();
        let staff = Actor {
            user_id: 99,
            role: None,
            is_staff: true,
        };
        assert!(authorize(&staff, Action::Delete, Target::Client(&c)).is_allowed());
    }

    #[test]
    fn test_management_may_mutate_everything() {
        let (c, k, e) = (client(), contract(), event(None));
        let m = actor(MANAGER, Some(Role::Management));
        assert!(authorize(&m, Action::Update, Target::Client(&c)).is_allowed());
        assert!(authorize(
            &m,
            Action::Delete,
            Target::Contract {
                contract: &k,
                client: &c
            }
        )
        .is_allowed());
        assert!(authorize(&m, Action::Update, Target::Event { event: &e, client: &c }).is_allowed());
    }

    #[test]
    fn test_sales_owner_may_mutate_client_and_descendants() {
        let (c, k, e) = (client(), contract(), event(None));
        let s = actor(SALES_OWNER, Some(Role::Sales));
        assert!(authorize(&s, Action::Update, Target::Client(&c)).is_allowed());
        assert!(authorize(
            &s,
            Action::Update,
            Target::Contract {
                contract: &k,
                client: &c
            }
        )
        .is_allowed());
        assert!(authorize(&s, Action::Update, Target::Event { event: &e, client: &c }).is_allowed());
    }

    #[test]
    fn test_contract_sales_contact_may_mutate_contract_only() {
        let (c, k) = (client(), contract());
        let s = actor(CONTRACT_SALES, Some(Role::Sales));
        assert!(authorize(
            &s,
            Action::Update,
            Target::Contract {
                contract: &k,
                client: &c
            }
        )
        .is_allowed());
        assert!(!authorize(&s, Action::Update, Target::Client(&c)).is_allowed());
    }

    #[test]
    fn test_unrelated_sales_is_denied() {
        let c = client();
        let s = actor(SALES_OTHER, Some(Role::Sales));
        let decision = authorize(&s, Action::Delete, Target::Client(&c));
        assert_eq!(
            decision,
            Decision::Deny("You do not have permission to modify this client".into())
        );
    }

    #[test]
    fn test_support_limited_to_assigned_events() {
        let c = client();
        let assigned = event(Some(SUPPORT_ASSIGNED));
        let s = actor(SUPPORT_ASSIGNED, Some(Role::Support));
        let other = actor(SUPPORT_OTHER, Some(Role::Support));

        assert!(authorize(
            &s,
            Action::Update,
            Target::Event {
                event: &assigned,
                client: &c
            }
        )
        .is_allowed());
        assert!(!authorize(
            &other,
            Action::Update,
            Target::Event {
                event: &assigned,
                client: &c
            }
        )
        .is_allowed());
        assert!(!authorize(&s, Action::Update, Target::Client(&c)).is_allowed());
    }

    #[test]
    fn test_missing_role_is_denied() {
        let c = client();
        let nobody = actor(SALES_OWNER, None);
        assert!(!authorize(&nobody, Action::Update, Target::Client(&c)).is_allowed());
    }

    #[test]
    fn test_owner_or_management_gate() {
        let m = actor(MANAGER, Some(Role::Management));
        let owner = actor(SALES_OWNER, Some(Role::Sales));
        let stranger = actor(SALES_OTHER, Some(Role::Sales));
        assert!(owner_or_management(&m, Some(SALES_OWNER), "delete this client").is_allowed());
        assert!(owner_or_management(&owner, Some(SALES_OWNER), "delete this client").is_allowed());
        assert!(!owner_or_management(&stranger, Some(SALES_OWNER), "delete this client").is_allowed());
        assert!(!owner_or_management(&stranger, None, "delete this event").is_allowed());
    }

    #[test]
    fn test_deny_converts_to_forbidden() {
        let err = Decision::Deny("nope".into()).into_result().unwrap_err();
        assert!(matches!(err, CoreError::Forbidden(msg) if msg == "nope"));
    }
}
