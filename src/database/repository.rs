// Repository traits and their Postgres implementations. Each method is a
// single-row (or single-query) persistence operation; the services above
// never require cross-call transactions.

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;

use crate::authz::{Role, StaffId, StoreId};
use crate::database::models::{Staff, StoreAccessGrant, TimeSlotItem, TimeSlotTemplate};
use crate::scheduling::{ItemId, SlotInterval};

#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Unique or exclusion constraint violation. The database is the final
    /// guard against writers that raced past the in-process pre-checks;
    /// services map this to the same conflict kind as the pre-check.
    #[error("constraint violation: {0}")]
    Conflict(String),

    #[error(transparent)]
    Sqlx(sqlx::Error),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            // 23505 unique_violation, 23P01 exclusion_violation
            if let Some(code) = db_err.code() {
                if code == "23505" || code == "23P01" {
                    return RepositoryError::Conflict(db_err.to_string());
                }
            }
        }
        RepositoryError::Sqlx(err)
    }
}

#[async_trait]
pub trait StaffRepository: Send + Sync {
    async fn find_by_id(&self, staff_id: StaffId) -> Result<Option<Staff>, RepositoryError>;
    async fn list(&self) -> Result<Vec<Staff>, RepositoryError>;
    async fn create(&self, name: &str, role: Role) -> Result<Staff, RepositoryError>;
    async fn update(
        &self,
        staff_id: StaffId,
        name: Option<&str>,
        role: Option<Role>,
    ) -> Result<Option<Staff>, RepositoryError>;
    async fn soft_delete(&self, staff_id: StaffId) -> Result<bool, RepositoryError>;
}

#[async_trait]
pub trait StoreAccessRepository: Send + Sync {
    async fn granted_store_ids(&self, staff_id: StaffId) -> Result<Vec<StoreId>, RepositoryError>;
    async fn grants_for_staff(&self, staff_id: StaffId) -> Result<Vec<StoreAccessGrant>, RepositoryError>;
    async fn grant_exists(&self, staff_id: StaffId, store_id: StoreId) -> Result<bool, RepositoryError>;
    async fn create_grant(&self, staff_id: StaffId, store_id: StoreId)
        -> Result<StoreAccessGrant, RepositoryError>;
    async fn delete_grant(&self, staff_id: StaffId, store_id: StoreId) -> Result<bool, RepositoryError>;
}

#[async_trait]
pub trait TimeSlotRepository: Send + Sync {
    async fn find_template(&self, template_id: i64) -> Result<Option<TimeSlotTemplate>, RepositoryError>;
    async fn templates_for_store(&self, store_id: StoreId)
        -> Result<Vec<TimeSlotTemplate>, RepositoryError>;
    async fn create_template(&self, store_id: StoreId, name: &str)
        -> Result<TimeSlotTemplate, RepositoryError>;
    async fn soft_delete_template(&self, template_id: i64) -> Result<bool, RepositoryError>;

    async fn items_for_template(&self, template_id: i64) -> Result<Vec<TimeSlotItem>, RepositoryError>;
    async fn find_item(&self, item_id: ItemId) -> Result<Option<TimeSlotItem>, RepositoryError>;
    async fn create_item(&self, template_id: i64, interval: SlotInterval)
        -> Result<TimeSlotItem, RepositoryError>;
    async fn update_item(&self, item_id: ItemId, interval: SlotInterval)
        -> Result<Option<TimeSlotItem>, RepositoryError>;
    async fn delete_item(&self, item_id: ItemId) -> Result<bool, RepositoryError>;
}

pub struct PgStaffRepository {
    pool: PgPool,
}

impl PgStaffRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StaffRepository for PgStaffRepository {
    async fn find_by_id(&self, staff_id: StaffId) -> Result<Option<Staff>, RepositoryError> {
        let staff = sqlx::query_as::<_, Staff>(
            "SELECT id, name, role, created_at, updated_at, deleted_at
             FROM staff WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(staff_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(staff)
    }

    async fn list(&self) -> Result<Vec<Staff>, RepositoryError> {
        let staff = sqlx::query_as::<_, Staff>(
            "SELECT id, name, role, created_at, updated_at, deleted_at
             FROM staff WHERE deleted_at IS NULL ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(staff)
    }

    async fn create(&self, name: &str, role: Role) -> Result<Staff, RepositoryError> {
        let staff = sqlx::query_as::<_, Staff>(
            "INSERT INTO staff (name, role) VALUES ($1, $2)
             RETURNING id, name, role, created_at, updated_at, deleted_at",
        )
        .bind(name)
        .bind(role)
        .fetch_one(&self.pool)
        .await?;
        Ok(staff)
    }

    async fn update(
        &self,
        staff_id: StaffId,
        name: Option<&str>,
        role: Option<Role>,
    ) -> Result<Option<Staff>, RepositoryError> {
        let staff = sqlx::query_as::<_, Staff>(
            "UPDATE staff
             SET name = COALESCE($2, name),
                 role = COALESCE($3, role),
                 updated_at = now()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING id, name, role, created_at, updated_at, deleted_at",
        )
        .bind(staff_id)
        .bind(name)
        .bind(role)
        .fetch_optional(&self.pool)
        .await?;
        Ok(staff)
    }

    async fn soft_delete(&self, staff_id: StaffId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE staff SET deleted_at = now()
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(staff_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

pub struct PgStoreAccessRepository {
    pool: PgPool,
}

impl PgStoreAccessRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StoreAccessRepository for PgStoreAccessRepository {
    async fn granted_store_ids(&self, staff_id: StaffId) -> Result<Vec<StoreId>, RepositoryError> {
        let rows: Vec<(i64,)> = sqlx::query_as(
            "SELECT store_id FROM store_access_grants
             WHERE staff_id = $1 AND deleted_at IS NULL",
        )
        .bind(staff_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    async fn grants_for_staff(&self, staff_id: StaffId) -> Result<Vec<StoreAccessGrant>, RepositoryError> {
        let grants = sqlx::query_as::<_, StoreAccessGrant>(
            "SELECT id, staff_id, store_id, created_at, deleted_at
             FROM store_access_grants
             WHERE staff_id = $1 AND deleted_at IS NULL
             ORDER BY store_id",
        )
        .bind(staff_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(grants)
    }

    async fn grant_exists(&self, staff_id: StaffId, store_id: StoreId) -> Result<bool, RepositoryError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM store_access_grants
             WHERE staff_id = $1 AND store_id = $2 AND deleted_at IS NULL",
        )
        .bind(staff_id)
        .bind(store_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count.0 > 0)
    }

    async fn create_grant(
        &self,
        staff_id: StaffId,
        store_id: StoreId,
    ) -> Result<StoreAccessGrant, RepositoryError> {
        let grant = sqlx::query_as::<_, StoreAccessGrant>(
            "INSERT INTO store_access_grants (staff_id, store_id) VALUES ($1, $2)
             RETURNING id, staff_id, store_id, created_at, deleted_at",
        )
        .bind(staff_id)
        .bind(store_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(grant)
    }

    async fn delete_grant(&self, staff_id: StaffId, store_id: StoreId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE store_access_grants SET deleted_at = now()
             WHERE staff_id = $1 AND store_id = $2 AND deleted_at IS NULL",
        )
        .bind(staff_id)
        .bind(store_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

pub struct PgTimeSlotRepository {
    pool: PgPool,
}

impl PgTimeSlotRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TimeSlotRepository for PgTimeSlotRepository {
    async fn find_template(&self, template_id: i64) -> Result<Option<TimeSlotTemplate>, RepositoryError> {
        let template = sqlx::query_as::<_, TimeSlotTemplate>(
            "SELECT id, store_id, name, created_at, updated_at, deleted_at
             FROM time_slot_templates WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(template_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(template)
    }

    async fn templates_for_store(
        &self,
        store_id: StoreId,
    ) -> Result<Vec<TimeSlotTemplate>, RepositoryError> {
        let templates = sqlx::query_as::<_, TimeSlotTemplate>(
            "SELECT id, store_id, name, created_at, updated_at, deleted_at
             FROM time_slot_templates
             WHERE store_id = $1 AND deleted_at IS NULL
             ORDER BY id",
        )
        .bind(store_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(templates)
    }

    async fn create_template(
        &self,
        store_id: StoreId,
        name: &str,
    ) -> Result<TimeSlotTemplate, RepositoryError> {
        let template = sqlx::query_as::<_, TimeSlotTemplate>(
            "INSERT INTO time_slot_templates (store_id, name) VALUES ($1, $2)
             RETURNING id, store_id, name, created_at, updated_at, deleted_at",
        )
        .bind(store_id)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
        Ok(template)
    }

    async fn soft_delete_template(&self, template_id: i64) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE time_slot_templates SET deleted_at = now()
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(template_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn items_for_template(&self, template_id: i64) -> Result<Vec<TimeSlotItem>, RepositoryError> {
        let items = sqlx::query_as::<_, TimeSlotItem>(
            "SELECT id, template_id, start_time, end_time, created_at, updated_at
             FROM time_slot_items
             WHERE template_id = $1
             ORDER BY start_time",
        )
        .bind(template_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    async fn find_item(&self, item_id: ItemId) -> Result<Option<TimeSlotItem>, RepositoryError> {
        let item = sqlx::query_as::<_, TimeSlotItem>(
            "SELECT id, template_id, start_time, end_time, created_at, updated_at
             FROM time_slot_items WHERE id = $1",
        )
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(item)
    }

    async fn create_item(
        &self,
        template_id: i64,
        interval: SlotInterval,
    ) -> Result<TimeSlotItem, RepositoryError> {
        let item = sqlx::query_as::<_, TimeSlotItem>(
            "INSERT INTO time_slot_items (template_id, start_time, end_time)
             VALUES ($1, $2, $3)
             RETURNING id, template_id, start_time, end_time, created_at, updated_at",
        )
        .bind(template_id)
        .bind(interval.start)
        .bind(interval.end)
        .fetch_one(&self.pool)
        .await?;
        Ok(item)
    }

    async fn update_item(
        &self,
        item_id: ItemId,
        interval: SlotInterval,
    ) -> Result<Option<TimeSlotItem>, RepositoryError> {
        let item = sqlx::query_as::<_, TimeSlotItem>(
            "UPDATE time_slot_items
             SET start_time = $2, end_time = $3, updated_at = now()
             WHERE id = $1
             RETURNING id, template_id, start_time, end_time, created_at, updated_at",
        )
        .bind(item_id)
        .bind(interval.start)
        .bind(interval.end)
        .fetch_optional(&self.pool)
        .await?;
        Ok(item)
    }

    async fn delete_item(&self, item_id: ItemId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM time_slot_items WHERE id = $1")
            .bind(item_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
