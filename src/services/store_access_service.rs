use std::sync::Arc;
use thiserror::Error;

use crate::authz::{self, ActorContext, AuthzError, StaffId, StoreId};
use crate::cache::{invalidate_actor_context, shared_cache, AuthContextCache};
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::StoreAccessGrant;
use crate::database::repository::{
    PgStaffRepository, PgStoreAccessRepository, RepositoryError, StaffRepository, StoreAccessRepository,
};

#[derive(Debug, Error)]
pub enum StoreAccessError {
    #[error("staff member {0} not found")]
    StaffNotFound(StaffId),

    #[error("no grant for staff {staff_id} on store {store_id}")]
    GrantNotFound { staff_id: StaffId, store_id: StoreId },

    #[error("listing another staff member's grants requires an admin role")]
    ReadForbidden,

    #[error(transparent)]
    Authz(#[from] AuthzError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Grant and revoke staff-to-store access. Every mutation runs the full
/// evaluator chain (staff-mutation guard, then store-access check) before
/// touching the grants table, and invalidates the target's cached
/// authorization context afterwards.
pub struct StoreAccessService {
    staff: Arc<dyn StaffRepository>,
    grants: Arc<dyn StoreAccessRepository>,
    cache: Arc<dyn AuthContextCache>,
}

impl StoreAccessService {
    pub async fn new() -> Result<Self, StoreAccessError> {
        let pool = DatabaseManager::pool().await?;
        Ok(Self::with_parts(
            Arc::new(PgStaffRepository::new(pool.clone())),
            Arc::new(PgStoreAccessRepository::new(pool)),
            shared_cache(),
        ))
    }

    pub fn with_parts(
        staff: Arc<dyn StaffRepository>,
        grants: Arc<dyn StoreAccessRepository>,
        cache: Arc<dyn AuthContextCache>,
    ) -> Self {
        Self { staff, grants, cache }
    }

    pub async fn list_grants(
        &self,
        actor: &ActorContext,
        staff_id: StaffId,
    ) -> Result<Vec<StoreAccessGrant>, StoreAccessError> {
        if actor.staff_id != staff_id && !actor.role.is_admin() {
            return Err(StoreAccessError::ReadForbidden);
        }
        if self.staff.find_by_id(staff_id).await?.is_none() {
            return Err(StoreAccessError::StaffNotFound(staff_id));
        }
        Ok(self.grants.grants_for_staff(staff_id).await?)
    }

    /// Grant the target staff member access to a store. Idempotent: if the
    /// grant pair already exists, the current grant list is returned without
    /// writing a duplicate row and without cache invalidation.
    pub async fn grant(
        &self,
        actor: &ActorContext,
        staff_id: StaffId,
        store_id: StoreId,
    ) -> Result<Vec<StoreAccessGrant>, StoreAccessError> {
        let target = self
            .staff
            .find_by_id(staff_id)
            .await?
            .ok_or(StoreAccessError::StaffNotFound(staff_id))?;

        authz::check_staff_mutation_allowed(actor, staff_id, target.role)?;
        authz::check_store_access(actor, store_id)?;

        if self.grants.grant_exists(staff_id, store_id).await? {
            return Ok(self.grants.grants_for_staff(staff_id).await?);
        }

        match self.grants.create_grant(staff_id, store_id).await {
            Ok(_) => {}
            // A concurrent writer inserted the same pair between our
            // existence check and the insert; the grant is in place either
            // way, so stay idempotent.
            Err(RepositoryError::Conflict(_)) => {
                return Ok(self.grants.grants_for_staff(staff_id).await?);
            }
            Err(e) => return Err(e.into()),
        }

        invalidate_actor_context(self.cache.clone(), staff_id);
        Ok(self.grants.grants_for_staff(staff_id).await?)
    }

    pub async fn revoke(
        &self,
        actor: &ActorContext,
        staff_id: StaffId,
        store_id: StoreId,
    ) -> Result<Vec<StoreAccessGrant>, StoreAccessError> {
        let target = self
            .staff
            .find_by_id(staff_id)
            .await?
            .ok_or(StoreAccessError::StaffNotFound(staff_id))?;

        authz::check_staff_mutation_allowed(actor, staff_id, target.role)?;
        authz::check_store_access(actor, store_id)?;

        if !self.grants.delete_grant(staff_id, store_id).await? {
            return Err(StoreAccessError::GrantNotFound { staff_id, store_id });
        }

        invalidate_actor_context(self.cache.clone(), staff_id);
        Ok(self.grants.grants_for_staff(staff_id).await?)
    }
}
