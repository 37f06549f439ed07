use std::sync::Arc;
use thiserror::Error;

use crate::authz::{ActorContext, Role, StaffId};
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::Staff;
use crate::database::repository::{PgStaffRepository, RepositoryError, StaffRepository};

#[derive(Debug, Error)]
pub enum StaffError {
    #[error("staff member {0} not found")]
    NotFound(StaffId),

    #[error("staff account management requires an admin role")]
    AdminRequired,

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// CRUD over staff accounts. Mutations require a StoreAdmin-or-above actor;
/// store-access grants have their own service with stricter rules.
pub struct StaffService {
    staff: Arc<dyn StaffRepository>,
}

impl StaffService {
    pub async fn new() -> Result<Self, StaffError> {
        let pool = DatabaseManager::pool().await?;
        Ok(Self::with_repository(Arc::new(PgStaffRepository::new(pool))))
    }

    pub fn with_repository(staff: Arc<dyn StaffRepository>) -> Self {
        Self { staff }
    }

    pub async fn list(&self, _actor: &ActorContext) -> Result<Vec<Staff>, StaffError> {
        Ok(self.staff.list().await?)
    }

    pub async fn get(&self, _actor: &ActorContext, staff_id: StaffId) -> Result<Staff, StaffError> {
        self.staff
            .find_by_id(staff_id)
            .await?
            .ok_or(StaffError::NotFound(staff_id))
    }

    pub async fn create(&self, actor: &ActorContext, name: &str, role: Role) -> Result<Staff, StaffError> {
        if !actor.role.is_admin() {
            return Err(StaffError::AdminRequired);
        }
        Ok(self.staff.create(name, role).await?)
    }

    pub async fn update(
        &self,
        actor: &ActorContext,
        staff_id: StaffId,
        name: Option<&str>,
        role: Option<Role>,
    ) -> Result<Staff, StaffError> {
        if !actor.role.is_admin() {
            return Err(StaffError::AdminRequired);
        }
        self.staff
            .update(staff_id, name, role)
            .await?
            .ok_or(StaffError::NotFound(staff_id))
    }

    pub async fn delete(&self, actor: &ActorContext, staff_id: StaffId) -> Result<(), StaffError> {
        if !actor.role.is_admin() {
            return Err(StaffError::AdminRequired);
        }
        if self.staff.soft_delete(staff_id).await? {
            Ok(())
        } else {
            Err(StaffError::NotFound(staff_id))
        }
    }
}
