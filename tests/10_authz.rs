mod common;

use common::actor;
use salon_admin_api::authz::{
    check_staff_mutation_allowed, check_store_access, AuthzError, Role,
};

#[test]
fn store_access_is_super_admin_or_membership() {
    // ok iff role == SuperAdmin OR target ∈ granted set
    let cases: &[(Role, &[i64], i64, bool)] = &[
        (Role::SuperAdmin, &[], 1, true),
        (Role::SuperAdmin, &[2], 1, true),
        (Role::StoreAdmin, &[1, 2], 1, true),
        (Role::StoreAdmin, &[1, 2], 3, false),
        (Role::Staff, &[5], 5, true),
        (Role::Staff, &[5], 6, false),
        (Role::Staff, &[], 1, false),
    ];

    for &(role, grants, target, expect_ok) in cases {
        let a = actor(99, role, grants);
        assert_eq!(
            check_store_access(&a, target).is_ok(),
            expect_ok,
            "role {:?}, grants {:?}, target {}",
            role,
            grants,
            target,
        );
    }
}

#[test]
fn denied_store_access_names_the_store() {
    let a = actor(1, Role::Staff, &[10]);
    assert_eq!(check_store_access(&a, 11), Err(AuthzError::StoreAccessDenied(11)));
}

#[test]
fn self_mutation_always_fails_first() {
    for actor_role in [Role::SuperAdmin, Role::StoreAdmin, Role::Staff] {
        for target_role in [Role::SuperAdmin, Role::StoreAdmin, Role::Staff] {
            let a = actor(42, actor_role, &[1]);
            assert_eq!(
                check_staff_mutation_allowed(&a, 42, target_role),
                Err(AuthzError::SelfMutationForbidden),
            );
        }
    }
}

#[test]
fn super_admin_targets_are_immutable_for_everyone() {
    for actor_role in [Role::SuperAdmin, Role::StoreAdmin, Role::Staff] {
        let a = actor(1, actor_role, &[1, 2, 3]);
        assert_eq!(
            check_staff_mutation_allowed(&a, 2, Role::SuperAdmin),
            Err(AuthzError::PermissionDenied),
        );
    }
}

#[test]
fn ordinary_targets_pass_the_mutation_guards() {
    let a = actor(1, Role::StoreAdmin, &[1]);
    assert!(check_staff_mutation_allowed(&a, 2, Role::Staff).is_ok());
    assert!(check_staff_mutation_allowed(&a, 3, Role::StoreAdmin).is_ok());
}
