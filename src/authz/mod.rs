// Store-access authorization evaluator.
//
// Pure decision functions: no persistence, no side effects. Callers are
// responsible for aborting the request on a denial before any write.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

pub type StaffId = i64;
pub type StoreId = i64;

/// Staff role. `SuperAdmin` bypasses the store grant check entirely;
/// SuperAdmin accounts are also immune to store-access mutation (see
/// [`check_staff_mutation_allowed`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "staff_role", rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    StoreAdmin,
    Staff,
}

impl Role {
    /// Staff-account CRUD is restricted to admins.
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::SuperAdmin | Role::StoreAdmin)
    }
}

/// Resolved identity of the caller, constructed once per request by the
/// auth middleware and passed read-only into the evaluators.
#[derive(Debug, Clone)]
pub struct ActorContext {
    pub staff_id: StaffId,
    pub role: Role,
    pub granted_store_ids: HashSet<StoreId>,
}

impl ActorContext {
    pub fn new(staff_id: StaffId, role: Role, granted_store_ids: impl IntoIterator<Item = StoreId>) -> Self {
        Self {
            staff_id,
            role,
            granted_store_ids: granted_store_ids.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthzError {
    #[error("no access grant for store {0}")]
    StoreAccessDenied(StoreId),

    #[error("staff members cannot modify their own store access")]
    SelfMutationForbidden,

    #[error("store access of a super admin account cannot be modified")]
    PermissionDenied,
}

/// Decide whether the actor may operate on resources scoped to
/// `target_store_id`. SuperAdmin always passes; everyone else must hold a
/// grant for the store.
pub fn check_store_access(actor: &ActorContext, target_store_id: StoreId) -> Result<(), AuthzError> {
    if actor.role == Role::SuperAdmin {
        return Ok(());
    }
    if actor.granted_store_ids.contains(&target_store_id) {
        Ok(())
    } else {
        Err(AuthzError::StoreAccessDenied(target_store_id))
    }
}

/// Decide whether the actor may mutate store-access grants of the target
/// staff member.
///
/// Guard order is fixed: the self-mutation check runs first so a
/// self-targeting SuperAdmin is reported as `SelfMutationForbidden`, not
/// `PermissionDenied`. The role ceiling applies to every actor - SuperAdmin
/// grants are immutable through this path.
pub fn check_staff_mutation_allowed(
    actor: &ActorContext,
    target_staff_id: StaffId,
    target_role: Role,
) -> Result<(), AuthzError> {
    if target_staff_id == actor.staff_id {
        return Err(AuthzError::SelfMutationForbidden);
    }
    if target_role == Role::SuperAdmin {
        return Err(AuthzError::PermissionDenied);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(staff_id: StaffId, role: Role, stores: &[StoreId]) -> ActorContext {
        ActorContext::new(staff_id, role, stores.iter().copied())
    }

    #[test]
    fn super_admin_bypasses_grant_set() {
        let a = actor(1, Role::SuperAdmin, &[]);
        assert!(check_store_access(&a, 42).is_ok());
    }

    #[test]
    fn granted_store_is_permitted() {
        let a = actor(1, Role::StoreAdmin, &[10, 20]);
        assert!(check_store_access(&a, 10).is_ok());
        assert!(check_store_access(&a, 20).is_ok());
    }

    #[test]
    fn ungranted_store_is_denied() {
        let a = actor(1, Role::Staff, &[10]);
        assert_eq!(check_store_access(&a, 11), Err(AuthzError::StoreAccessDenied(11)));
    }

    #[test]
    fn empty_grant_set_denies_everything_for_non_super_admin() {
        let a = actor(1, Role::StoreAdmin, &[]);
        assert_eq!(check_store_access(&a, 1), Err(AuthzError::StoreAccessDenied(1)));
    }

    #[test]
    fn self_mutation_is_forbidden_regardless_of_roles() {
        for role in [Role::SuperAdmin, Role::StoreAdmin, Role::Staff] {
            for target_role in [Role::SuperAdmin, Role::StoreAdmin, Role::Staff] {
                let a = actor(7, role, &[1, 2, 3]);
                assert_eq!(
                    check_staff_mutation_allowed(&a, 7, target_role),
                    Err(AuthzError::SelfMutationForbidden),
                );
            }
        }
    }

    #[test]
    fn super_admin_target_is_immutable_even_for_super_admin_actor() {
        let a = actor(1, Role::SuperAdmin, &[]);
        assert_eq!(
            check_staff_mutation_allowed(&a, 2, Role::SuperAdmin),
            Err(AuthzError::PermissionDenied),
        );
    }

    #[test]
    fn self_check_wins_over_role_ceiling() {
        // A SuperAdmin targeting themselves must see the self-mutation error.
        let a = actor(5, Role::SuperAdmin, &[]);
        assert_eq!(
            check_staff_mutation_allowed(&a, 5, Role::SuperAdmin),
            Err(AuthzError::SelfMutationForbidden),
        );
    }

    #[test]
    fn non_self_non_super_admin_target_is_allowed() {
        let a = actor(1, Role::StoreAdmin, &[10]);
        assert!(check_staff_mutation_allowed(&a, 2, Role::Staff).is_ok());
        assert!(check_staff_mutation_allowed(&a, 2, Role::StoreAdmin).is_ok());
    }
}
