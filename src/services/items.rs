//! Found item workflow: listing, filtering, create, update, delete

use std::collections::BTreeSet;

use chrono::{Local, NaiveDateTime};

use crate::{
    error::{AppError, AppResult},
    models::item::{Item, ItemForm, ItemQuery, ItemStatus, ItemView},
    repository::Repository,
    services::uploads::{UploadService, UploadedFile},
};

/// Filtered items plus the category choices for the filter UI
#[derive(Debug)]
pub struct ItemListing {
    pub items: Vec<ItemView>,
    pub categories: Vec<String>,
}

#[derive(Clone)]
pub struct ItemsService {
    repository: Repository,
    uploads: UploadService,
}

impl ItemsService {
    pub fn new(repository: Repository, uploads: UploadService) -> Self {
        Self { repository, uploads }
    }

    /// Load items, apply the search and category filters and derive display state
    pub async fn browse(&self, query: &ItemQuery) -> AppResult<ItemListing> {
        let items = self.repository.items.all().await?;
        let categories = distinct_categories(&items);
        let now = Local::now().naive_local();

        let items = filter_items(items, query)
            .iter()
            .map(|item| item.to_view(now))
            .collect();

        Ok(ItemListing { items, categories })
    }

    /// Every stored item, unfiltered
    pub async fn all(&self) -> AppResult<Vec<Item>> {
        self.repository.items.all().await
    }

    pub async fn get_item(&self, id: i64) -> AppResult<Item> {
        self.repository
            .items
            .get(id)
            .await?
            .ok_or_else(item_not_found)
    }

    /// Log a newly found item. A disallowed image is dropped silently.
    pub async fn create_item(&self, form: ItemForm, image: Option<UploadedFile>) -> AppResult<Item> {
        let now = Local::now().naive_local();
        let image = self.store_upload(image, now).await?;

        let item = self
            .repository
            .items
            .modify(move |items| {
                let item = new_item(items.allocate_id(), form, image, now);
                items.records.push(item.clone());
                Ok(item)
            })
            .await?;

        tracing::info!("Item {} logged: {}", item.id, item.name);
        Ok(item)
    }

    /// Overwrite the editable fields; the image only changes on a valid new upload
    pub async fn update_item(
        &self,
        id: i64,
        form: ItemForm,
        image: Option<UploadedFile>,
    ) -> AppResult<Item> {
        let now = Local::now().naive_local();
        let image = self.store_upload(image, now).await?;
        let stored = image.clone();

        let result = self
            .repository
            .items
            .modify(move |items| {
                let item = items.find_mut(id).ok_or_else(item_not_found)?;
                item.name = form.name;
                item.description = form.description;
                item.category = form.category;
                if image.is_some() {
                    item.image = image;
                }
                Ok(item.clone())
            })
            .await;
        let item = self.keep_upload_on_success(result, stored).await?;

        tracing::info!("Item {} updated", id);
        Ok(item)
    }

    /// Remove an item. Returns whether a record was dropped.
    pub async fn delete_item(&self, id: i64) -> AppResult<bool> {
        let removed = self
            .repository
            .items
            .modify(move |items| Ok(items.remove(id)))
            .await?;

        if removed > 0 {
            tracing::info!("Item {} deleted", id);
        } else {
            tracing::debug!("Delete of unknown item {} ignored", id);
        }
        Ok(removed > 0)
    }

    /// Pass `result` through, deleting `stored` if the record was not written
    pub(crate) async fn keep_upload_on_success<R>(
        &self,
        result: AppResult<R>,
        stored: Option<String>,
    ) -> AppResult<R> {
        if result.is_err() {
            if let Some(stored) = stored {
                self.uploads.discard(&stored).await;
            }
        }
        result
    }

    pub(crate) async fn store_upload(
        &self,
        upload: Option<UploadedFile>,
        now: NaiveDateTime,
    ) -> AppResult<Option<String>> {
        match upload {
            Some(file) => self.uploads.store(&file, now).await,
            None => Ok(None),
        }
    }
}

pub(crate) fn item_not_found() -> AppError {
    AppError::NotFound("Item not found".to_string())
}

fn new_item(id: i64, form: ItemForm, image: Option<String>, now: NaiveDateTime) -> Item {
    Item {
        id,
        name: form.name,
        description: form.description,
        category: form.category,
        date_found: now,
        status: ItemStatus::Unclaimed,
        assisting_staff: None,
        image,
        claimer_name: None,
        college: None,
        course: None,
        year_section: None,
        claimed_at: None,
        proof_image: None,
        proof_uploaded_at: None,
    }
}

/// Apply the search (`q`) and exact category filters, both case-insensitive
pub fn filter_items(items: Vec<Item>, query: &ItemQuery) -> Vec<Item> {
    let search = query
        .q
        .as_deref()
        .map(|q| q.trim().to_lowercase())
        .filter(|q| !q.is_empty());
    let category = query
        .category
        .as_deref()
        .map(|c| c.trim().to_lowercase())
        .filter(|c| !c.is_empty());

    items
        .into_iter()
        .filter(|item| match &search {
            Some(q) => {
                item.name.to_lowercase().contains(q.as_str())
                    || item.category_str().to_lowercase().contains(q.as_str())
            }
            None => true,
        })
        .filter(|item| match &category {
            Some(c) => item.category_str().trim().to_lowercase() == *c,
            None => true,
        })
        .collect()
}

/// Sorted distinct non-empty categories
pub fn distinct_categories(items: &[Item]) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| item.category.as_deref())
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
