use std::sync::Arc;
use thiserror::Error;

use crate::authz::{self, ActorContext, AuthzError, StoreId};
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{TimeSlotItem, TimeSlotTemplate};
use crate::database::repository::{PgTimeSlotRepository, RepositoryError, TimeSlotRepository};
use crate::scheduling::{self, ExistingSlot, ItemId, SlotError, SlotInterval};

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template {0} not found")]
    TemplateNotFound(i64),

    #[error("time slot item {0} not found")]
    ItemNotFound(ItemId),

    #[error(transparent)]
    Authz(#[from] AuthzError),

    #[error("end time must be after start time")]
    InvalidRange,

    #[error("time slot overlaps an existing item in the template")]
    Conflict,

    #[error(transparent)]
    Repository(RepositoryError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<SlotError> for TemplateError {
    fn from(err: SlotError) -> Self {
        match err {
            SlotError::InvalidRange => TemplateError::InvalidRange,
            SlotError::Conflict { .. } => TemplateError::Conflict,
        }
    }
}

impl From<RepositoryError> for TemplateError {
    fn from(err: RepositoryError) -> Self {
        match err {
            // The exclusion constraint caught a writer that raced past the
            // in-process pre-check; same failure kind either way.
            RepositoryError::Conflict(_) => TemplateError::Conflict,
            other => TemplateError::Repository(other),
        }
    }
}

/// Per-store time-slot templates and their items. Every operation checks
/// store access first; item writes additionally run the range and overlap
/// validators before the insert or update.
pub struct TemplateService {
    slots: Arc<dyn TimeSlotRepository>,
}

impl TemplateService {
    pub async fn new() -> Result<Self, TemplateError> {
        let pool = DatabaseManager::pool().await?;
        Ok(Self::with_repository(Arc::new(PgTimeSlotRepository::new(pool))))
    }

    pub fn with_repository(slots: Arc<dyn TimeSlotRepository>) -> Self {
        Self { slots }
    }

    pub async fn list_templates(
        &self,
        actor: &ActorContext,
        store_id: StoreId,
    ) -> Result<Vec<TimeSlotTemplate>, TemplateError> {
        authz::check_store_access(actor, store_id)?;
        Ok(self.slots.templates_for_store(store_id).await?)
    }

    pub async fn create_template(
        &self,
        actor: &ActorContext,
        store_id: StoreId,
        name: &str,
    ) -> Result<TimeSlotTemplate, TemplateError> {
        authz::check_store_access(actor, store_id)?;
        Ok(self.slots.create_template(store_id, name).await?)
    }

    pub async fn delete_template(
        &self,
        actor: &ActorContext,
        store_id: StoreId,
        template_id: i64,
    ) -> Result<(), TemplateError> {
        authz::check_store_access(actor, store_id)?;
        self.template_in_store(store_id, template_id).await?;
        if self.slots.soft_delete_template(template_id).await? {
            Ok(())
        } else {
            Err(TemplateError::TemplateNotFound(template_id))
        }
    }

    pub async fn list_items(
        &self,
        actor: &ActorContext,
        store_id: StoreId,
        template_id: i64,
    ) -> Result<Vec<TimeSlotItem>, TemplateError> {
        authz::check_store_access(actor, store_id)?;
        self.template_in_store(store_id, template_id).await?;
        Ok(self.slots.items_for_template(template_id).await?)
    }

    pub async fn create_item(
        &self,
        actor: &ActorContext,
        store_id: StoreId,
        template_id: i64,
        candidate: SlotInterval,
    ) -> Result<TimeSlotItem, TemplateError> {
        authz::check_store_access(actor, store_id)?;
        self.template_in_store(store_id, template_id).await?;

        scheduling::validate_range(&candidate)?;
        let existing = self.existing_slots(template_id).await?;
        scheduling::validate_no_overlap(&candidate, &existing, None)?;

        Ok(self.slots.create_item(template_id, candidate).await?)
    }

    pub async fn update_item(
        &self,
        actor: &ActorContext,
        store_id: StoreId,
        template_id: i64,
        item_id: ItemId,
        candidate: SlotInterval,
    ) -> Result<TimeSlotItem, TemplateError> {
        authz::check_store_access(actor, store_id)?;
        self.template_in_store(store_id, template_id).await?;

        let item = self
            .slots
            .find_item(item_id)
            .await?
            .filter(|item| item.template_id == template_id)
            .ok_or(TemplateError::ItemNotFound(item_id))?;

        scheduling::validate_range(&candidate)?;
        let existing = self.existing_slots(template_id).await?;
        scheduling::validate_no_overlap(&candidate, &existing, Some(item.id))?;

        self.slots
            .update_item(item_id, candidate)
            .await?
            .ok_or(TemplateError::ItemNotFound(item_id))
    }

    /// Removing an item cannot introduce an overlap, so no validator runs.
    pub async fn delete_item(
        &self,
        actor: &ActorContext,
        store_id: StoreId,
        template_id: i64,
        item_id: ItemId,
    ) -> Result<(), TemplateError> {
        authz::check_store_access(actor, store_id)?;
        self.template_in_store(store_id, template_id).await?;

        let belongs = self
            .slots
            .find_item(item_id)
            .await?
            .map(|item| item.template_id == template_id)
            .unwrap_or(false);
        if !belongs || !self.slots.delete_item(item_id).await? {
            return Err(TemplateError::ItemNotFound(item_id));
        }
        Ok(())
    }

    /// A template reached through a store it does not belong to is treated
    /// as missing, not as a permission failure.
    async fn template_in_store(&self, store_id: StoreId, template_id: i64) -> Result<(), TemplateError> {
        match self.slots.find_template(template_id).await? {
            Some(template) if template.store_id == store_id => Ok(()),
            _ => Err(TemplateError::TemplateNotFound(template_id)),
        }
    }

    async fn existing_slots(&self, template_id: i64) -> Result<Vec<ExistingSlot>, TemplateError> {
        let items = self.slots.items_for_template(template_id).await?;
        Ok(items.iter().map(TimeSlotItem::as_existing_slot).collect())
    }
}
