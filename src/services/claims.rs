//! Claim workflow: hand an item back to its owner

use chrono::Local;

use crate::{
    error::AppResult,
    models::{
        datetime::DISPLAY_FORMAT,
        item::{ClaimForm, Item, ItemStatus},
        Staff,
    },
    repository::Repository,
    services::{
        items::{item_not_found, ItemsService},
        uploads::UploadedFile,
    },
};

#[derive(Clone)]
pub struct ClaimsService {
    repository: Repository,
    items: ItemsService,
}

impl ClaimsService {
    pub fn new(repository: Repository, items: ItemsService) -> Self {
        Self { repository, items }
    }

    /// Item to claim plus the staff who may assist
    pub async fn claim_context(&self, id: i64) -> AppResult<(Item, Vec<Staff>)> {
        let item = self.items.get_item(id).await?;
        let staff = self.repository.staff.all().await?;
        Ok((item, staff))
    }

    /// Mark an item as claimed and record who took it.
    ///
    /// Claiming an already claimed item overwrites the previous claim details.
    /// A proof image from an earlier claim is kept unless a new valid one is sent.
    pub async fn claim_item(
        &self,
        id: i64,
        form: ClaimForm,
        proof: Option<UploadedFile>,
    ) -> AppResult<Item> {
        let now = Local::now().naive_local();
        let proof_image = self.items.store_upload(proof, now).await?;
        let stored = proof_image.clone();

        let result = self
            .repository
            .items
            .modify(move |items| {
                let item = items.find_mut(id).ok_or_else(item_not_found)?;
                if item.is_claimed() {
                    tracing::warn!("Item {} is already claimed; overwriting claim details", id);
                }
                item.status = ItemStatus::Claimed;
                item.assisting_staff = Some(form.staff).filter(|s| !s.trim().is_empty());
                item.claimer_name = Some(form.claimer_name);
                item.college = Some(form.college);
                item.course = Some(form.course);
                item.year_section = Some(form.year_section);
                item.claimed_at = Some(now.format(DISPLAY_FORMAT).to_string());
                if let Some(proof_image) = proof_image {
                    item.proof_image = Some(proof_image);
                    item.proof_uploaded_at = Some(now.format("%Y-%m-%dT%H:%M:%S%.6f").to_string());
                }
                Ok(item.clone())
            })
            .await;
        let item = self.items.keep_upload_on_success(result, stored).await?;

        tracing::info!(
            "Item {} claimed by {}",
            id,
            item.claimer_name.as_deref().unwrap_or_default()
        );
        Ok(item)
    }
}
