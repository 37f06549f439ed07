// In-memory repository and cache mocks so the service layer can be
// exercised without a Postgres instance.
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use salon_admin_api::authz::{ActorContext, Role, StaffId, StoreId};
use salon_admin_api::cache::{AuthContextCache, CacheError};
use salon_admin_api::database::models::{Staff, StoreAccessGrant, TimeSlotItem, TimeSlotTemplate};
use salon_admin_api::database::repository::{
    RepositoryError, StaffRepository, StoreAccessRepository, TimeSlotRepository,
};
use salon_admin_api::scheduling::{ItemId, SlotInterval};

pub fn actor(staff_id: StaffId, role: Role, stores: &[StoreId]) -> ActorContext {
    ActorContext::new(staff_id, role, stores.iter().copied())
}

pub fn staff(id: StaffId, role: Role) -> Staff {
    Staff {
        id,
        name: format!("staff-{}", id),
        role,
        created_at: Utc::now(),
        updated_at: Utc::now(),
        deleted_at: None,
    }
}

#[derive(Default)]
pub struct MockStaffRepository {
    pub staff: Mutex<Vec<Staff>>,
}

impl MockStaffRepository {
    pub fn with_staff(staff: Vec<Staff>) -> Self {
        Self {
            staff: Mutex::new(staff),
        }
    }
}

#[async_trait]
impl StaffRepository for MockStaffRepository {
    async fn find_by_id(&self, staff_id: StaffId) -> Result<Option<Staff>, RepositoryError> {
        Ok(self
            .staff
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == staff_id && s.deleted_at.is_none())
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Staff>, RepositoryError> {
        Ok(self
            .staff
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.deleted_at.is_none())
            .cloned()
            .collect())
    }

    async fn create(&self, name: &str, role: Role) -> Result<Staff, RepositoryError> {
        let mut guard = self.staff.lock().unwrap();
        let id = guard.iter().map(|s| s.id).max().unwrap_or(0) + 1;
        let created = Staff {
            id,
            name: name.to_string(),
            role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        };
        guard.push(created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        staff_id: StaffId,
        name: Option<&str>,
        role: Option<Role>,
    ) -> Result<Option<Staff>, RepositoryError> {
        let mut guard = self.staff.lock().unwrap();
        let found = guard
            .iter_mut()
            .find(|s| s.id == staff_id && s.deleted_at.is_none());
        Ok(found.map(|s| {
            if let Some(name) = name {
                s.name = name.to_string();
            }
            if let Some(role) = role {
                s.role = role;
            }
            s.updated_at = Utc::now();
            s.clone()
        }))
    }

    async fn soft_delete(&self, staff_id: StaffId) -> Result<bool, RepositoryError> {
        let mut guard = self.staff.lock().unwrap();
        let found = guard
            .iter_mut()
            .find(|s| s.id == staff_id && s.deleted_at.is_none());
        Ok(match found {
            Some(s) => {
                s.deleted_at = Some(Utc::now());
                true
            }
            None => false,
        })
    }
}

#[derive(Default)]
pub struct MockStoreAccessRepository {
    pub grants: Mutex<Vec<StoreAccessGrant>>,
    next_id: AtomicI64,
}

impl MockStoreAccessRepository {
    pub fn with_grants(pairs: &[(StaffId, StoreId)]) -> Self {
        let grants = pairs
            .iter()
            .enumerate()
            .map(|(i, &(staff_id, store_id))| StoreAccessGrant {
                id: i as i64 + 1,
                staff_id,
                store_id,
                created_at: Utc::now(),
                deleted_at: None,
            })
            .collect::<Vec<_>>();
        let next = grants.len() as i64 + 1;
        Self {
            grants: Mutex::new(grants),
            next_id: AtomicI64::new(next),
        }
    }

    pub fn active_pair_count(&self, staff_id: StaffId, store_id: StoreId) -> usize {
        self.grants
            .lock()
            .unwrap()
            .iter()
            .filter(|g| g.staff_id == staff_id && g.store_id == store_id && g.deleted_at.is_none())
            .count()
    }
}

#[async_trait]
impl StoreAccessRepository for MockStoreAccessRepository {
    async fn granted_store_ids(&self, staff_id: StaffId) -> Result<Vec<StoreId>, RepositoryError> {
        Ok(self
            .grants
            .lock()
            .unwrap()
            .iter()
            .filter(|g| g.staff_id == staff_id && g.deleted_at.is_none())
            .map(|g| g.store_id)
            .collect())
    }

    async fn grants_for_staff(
        &self,
        staff_id: StaffId,
    ) -> Result<Vec<StoreAccessGrant>, RepositoryError> {
        Ok(self
            .grants
            .lock()
            .unwrap()
            .iter()
            .filter(|g| g.staff_id == staff_id && g.deleted_at.is_none())
            .cloned()
            .collect())
    }

    async fn grant_exists(
        &self,
        staff_id: StaffId,
        store_id: StoreId,
    ) -> Result<bool, RepositoryError> {
        Ok(self.active_pair_count(staff_id, store_id) > 0)
    }

    async fn create_grant(
        &self,
        staff_id: StaffId,
        store_id: StoreId,
    ) -> Result<StoreAccessGrant, RepositoryError> {
        if self.active_pair_count(staff_id, store_id) > 0 {
            // Mirrors the partial unique index on active pairs
            return Err(RepositoryError::Conflict(
                "duplicate active grant pair".to_string(),
            ));
        }
        let grant = StoreAccessGrant {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            staff_id,
            store_id,
            created_at: Utc::now(),
            deleted_at: None,
        };
        self.grants.lock().unwrap().push(grant.clone());
        Ok(grant)
    }

    async fn delete_grant(
        &self,
        staff_id: StaffId,
        store_id: StoreId,
    ) -> Result<bool, RepositoryError> {
        let mut guard = self.grants.lock().unwrap();
        let found = guard
            .iter_mut()
            .find(|g| g.staff_id == staff_id && g.store_id == store_id && g.deleted_at.is_none());
        Ok(match found {
            Some(g) => {
                g.deleted_at = Some(Utc::now());
                true
            }
            None => false,
        })
    }
}

/// Cache mock that counts invalidations so tests can assert the
/// fire-and-forget behavior (or its absence on idempotent grants).
#[derive(Default)]
pub struct CountingCache {
    pub invalidations: AtomicUsize,
}

impl CountingCache {
    pub fn invalidation_count(&self) -> usize {
        self.invalidations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthContextCache for CountingCache {
    async fn get(&self, _staff_id: StaffId) -> Result<Option<Vec<StoreId>>, CacheError> {
        Ok(None)
    }

    async fn put(&self, _staff_id: StaffId, _store_ids: Vec<StoreId>) -> Result<(), CacheError> {
        Ok(())
    }

    async fn invalidate(&self, _staff_id: StaffId) -> Result<(), CacheError> {
        self.invalidations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Default)]
pub struct MockTimeSlotRepository {
    pub templates: Mutex<Vec<TimeSlotTemplate>>,
    pub items: Mutex<Vec<TimeSlotItem>>,
    next_id: AtomicI64,
    /// When set, the next insert fails with a constraint violation, as if a
    /// concurrent writer beat the in-process pre-check.
    pub fail_next_insert: AtomicBool,
}

impl MockTimeSlotRepository {
    pub fn with_template(template_id: i64, store_id: StoreId) -> Self {
        let repo = Self {
            templates: Mutex::new(vec![TimeSlotTemplate {
                id: template_id,
                store_id,
                name: "weekday".to_string(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
                deleted_at: None,
            }]),
            items: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1000),
            fail_next_insert: AtomicBool::new(false),
        };
        repo
    }

    pub fn push_item(&self, id: i64, template_id: i64, interval: SlotInterval) {
        self.items.lock().unwrap().push(TimeSlotItem {
            id,
            template_id,
            start_time: interval.start,
            end_time: interval.end,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        });
    }

    pub fn item_count(&self, template_id: i64) -> usize {
        self.items
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.template_id == template_id)
            .count()
    }
}

#[async_trait]
impl TimeSlotRepository for MockTimeSlotRepository {
    async fn find_template(
        &self,
        template_id: i64,
    ) -> Result<Option<TimeSlotTemplate>, RepositoryError> {
        Ok(self
            .templates
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == template_id && t.deleted_at.is_none())
            .cloned())
    }

    async fn templates_for_store(
        &self,
        store_id: StoreId,
    ) -> Result<Vec<TimeSlotTemplate>, RepositoryError> {
        Ok(self
            .templates
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.store_id == store_id && t.deleted_at.is_none())
            .cloned()
            .collect())
    }

    async fn create_template(
        &self,
        store_id: StoreId,
        name: &str,
    ) -> Result<TimeSlotTemplate, RepositoryError> {
        let template = TimeSlotTemplate {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            store_id,
            name: name.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        };
        self.templates.lock().unwrap().push(template.clone());
        Ok(template)
    }

    async fn soft_delete_template(&self, template_id: i64) -> Result<bool, RepositoryError> {
        let mut guard = self.templates.lock().unwrap();
        let found = guard
            .iter_mut()
            .find(|t| t.id == template_id && t.deleted_at.is_none());
        Ok(match found {
            Some(t) => {
                t.deleted_at = Some(Utc::now());
                true
            }
            None => false,
        })
    }

    async fn items_for_template(
        &self,
        template_id: i64,
    ) -> Result<Vec<TimeSlotItem>, RepositoryError> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.template_id == template_id)
            .cloned()
            .collect())
    }

    async fn find_item(&self, item_id: ItemId) -> Result<Option<TimeSlotItem>, RepositoryError> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .iter()
            .find(|i| i.id == item_id)
            .cloned())
    }

    async fn create_item(
        &self,
        template_id: i64,
        interval: SlotInterval,
    ) -> Result<TimeSlotItem, RepositoryError> {
        if self.fail_next_insert.swap(false, Ordering::SeqCst) {
            return Err(RepositoryError::Conflict(
                "exclusion constraint time_slot_items_no_overlap".to_string(),
            ));
        }
        let item = TimeSlotItem {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            template_id,
            start_time: interval.start,
            end_time: interval.end,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.items.lock().unwrap().push(item.clone());
        Ok(item)
    }

    async fn update_item(
        &self,
        item_id: ItemId,
        interval: SlotInterval,
    ) -> Result<Option<TimeSlotItem>, RepositoryError> {
        let mut guard = self.items.lock().unwrap();
        let found = guard.iter_mut().find(|i| i.id == item_id);
        Ok(found.map(|i| {
            i.start_time = interval.start;
            i.end_time = interval.end;
            i.updated_at = Utc::now();
            i.clone()
        }))
    }

    async fn delete_item(&self, item_id: ItemId) -> Result<bool, RepositoryError> {
        let mut guard = self.items.lock().unwrap();
        let before = guard.len();
        guard.retain(|i| i.id != item_id);
        Ok(guard.len() < before)
    }
}
