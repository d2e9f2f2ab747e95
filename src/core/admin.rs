//! Dashboard operations: editing villas, promoting one to the hero spot, and
//! cleaning up bucket images nobody references any more.

use crate::domain::model::{Item, ItemId, ItemRecord, ItemStatus};
use crate::domain::ports::AdminRepository;
use crate::utils::error::{Result, VillaError};
use crate::utils::validation::{validate_non_empty_string, validate_range, Validate};
use percent_encoding::percent_decode_str;

/// Split a comma separated form field, dropping blanks.
pub fn parse_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn join_list(values: &[String]) -> String {
    values.join(", ")
}

/// Images present in `original` but gone from `updated`.
pub fn removed_images(original: &[String], updated: &[String]) -> Vec<String> {
    original
        .iter()
        .filter(|url| !updated.contains(url))
        .cloned()
        .collect()
}

pub fn is_image_used_elsewhere(url: &str, current_id: Option<ItemId>, items: &[Item]) -> bool {
    items
        .iter()
        .filter(|item| Some(item.id) != current_id)
        .any(|item| item.images.iter().any(|image| image == url))
}

/// Bucket-relative object path of a public storage URL, or `None` when the
/// URL does not point into `bucket`.
pub fn bucket_path(public_url: &str, bucket: &str) -> Option<String> {
    let marker = format!("/{}/", bucket);
    let start = public_url.find(&marker)? + marker.len();
    let path = &public_url[start..];
    let path = path.split(['?', '#']).next().unwrap_or(path);
    if path.is_empty() {
        return None;
    }
    percent_decode_str(path)
        .decode_utf8()
        .ok()
        .map(|decoded| decoded.into_owned())
}

/// Editable villa as entered in the dashboard form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemDraft {
    /// `None` for a new villa.
    pub id: Option<ItemId>,
    pub title: String,
    pub location: String,
    pub price: f64,
    pub rating: f64,
    pub bookings_this_month: u32,
    pub kind: String,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub guests: u32,
    pub size: String,
    pub description: String,
    pub images: Vec<String>,
    pub features: Vec<String>,
    pub amenities: Vec<String>,
    pub status: ItemStatus,
}

impl ItemDraft {
    pub fn from_item(item: &Item) -> Self {
        Self {
            id: Some(item.id),
            title: item.title.clone(),
            location: item.location.clone(),
            price: item.price,
            rating: item.rating,
            bookings_this_month: item.bookings_this_month,
            kind: item.kind.clone(),
            bedrooms: item.bedrooms,
            bathrooms: item.bathrooms,
            guests: item.guests,
            size: item.size.clone(),
            description: item.description.clone(),
            images: item.images.clone(),
            features: item.features.clone(),
            amenities: item.amenities.clone(),
            status: item.status,
        }
    }

    /// Payload for insert/update. The id travels in the request filter.
    pub fn to_record(&self) -> ItemRecord {
        let (is_featured, is_new, is_hot) = self.status.to_flags();
        ItemRecord {
            id: None,
            title: self.title.trim().to_string(),
            location: self.location.trim().to_string(),
            price: self.price,
            rating: self.rating,
            bookings_this_month: self.bookings_this_month,
            kind: self.kind.clone(),
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            guests: self.guests,
            size: self.size.trim().to_string(),
            description: self.description.trim().to_string(),
            images: self.images.clone(),
            features: self.features.clone(),
            amenities: self.amenities.clone(),
            is_featured,
            is_new,
            is_hot,
        }
    }
}

impl Validate for ItemDraft {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("title", &self.title)?;
        if !(self.price.is_finite() && self.price >= 0.0) {
            return Err(VillaError::ValidationError {
                message: format!("Price must be zero or more, got {}", self.price),
            });
        }
        validate_range("rating", self.rating, 0.0, 5.0)?;
        Ok(())
    }
}

pub struct AdminConsole<R: AdminRepository> {
    repo: R,
    bucket: String,
    items: Vec<Item>,
}

impl<R: AdminRepository> AdminConsole<R> {
    pub fn new(repo: R, bucket: impl Into<String>) -> Self {
        Self {
            repo,
            bucket: bucket.into(),
            items: Vec::new(),
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub async fn refresh(&mut self) -> Result<&[Item]> {
        self.items = self.repo.list_items().await?;
        tracing::debug!("Dashboard loaded {} villas", self.items.len());
        Ok(&self.items)
    }

    /// Insert a new villa or update an existing one. After an update, images
    /// dropped from the villa are removed from the bucket unless another
    /// villa still uses them.
    pub async fn save(&mut self, draft: &ItemDraft) -> Result<()> {
        draft.validate()?;
        let record = draft.to_record();

        match draft.id {
            Some(id) => {
                let original = self
                    .items
                    .iter()
                    .find(|item| item.id == id)
                    .map(|item| item.images.clone())
                    .unwrap_or_default();

                self.repo.update_item(id, &record).await?;
                tracing::info!("Updated villa #{}", id);

                let removed = removed_images(&original, &draft.images);
                self.remove_unused_images(&removed, Some(id)).await;
            }
            None => {
                self.repo.insert_item(&record).await?;
                tracing::info!("Inserted villa '{}'", record.title);
            }
        }

        self.refresh().await?;
        Ok(())
    }

    pub async fn delete(&mut self, id: ItemId) -> Result<()> {
        let images = self
            .items
            .iter()
            .find(|item| item.id == id)
            .map(|item| item.images.clone())
            .ok_or(VillaError::ItemNotFound { id })?;

        self.remove_unused_images(&images, Some(id)).await;
        self.repo.delete_item(id).await?;
        tracing::info!("Deleted villa #{}", id);

        self.refresh().await?;
        Ok(())
    }

    /// Make `id` the only featured villa.
    pub async fn promote(&mut self, id: ItemId) -> Result<()> {
        self.repo.clear_featured_except(id).await?;
        self.repo.set_featured(id).await?;
        tracing::info!("Promoted villa #{}", id);

        self.refresh().await?;
        Ok(())
    }

    async fn remove_unused_images(&self, urls: &[String], current_id: Option<ItemId>) {
        let paths: Vec<String> = urls
            .iter()
            .filter(|url| !is_image_used_elsewhere(url, current_id, &self.items))
            .filter_map(|url| bucket_path(url, &self.bucket))
            .collect();

        if paths.is_empty() {
            return;
        }

        tracing::debug!("Removing {} images from bucket '{}'", paths.len(), self.bucket);
        if let Err(e) = self.repo.remove_objects(&paths).await {
            tracing::warn!("Failed to delete some images from storage: {}", e);
        }
    }
}
