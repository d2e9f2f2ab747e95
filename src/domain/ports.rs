use crate::domain::model::{Item, ItemId, ItemRecord, SiteContent};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Read side of the hosted villa table.
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// All villas, ordered by id ascending.
    async fn list_items(&self) -> Result<Vec<Item>>;
    async fn site_content(&self) -> Result<SiteContent>;
}

/// Write side used by the admin dashboard.
#[async_trait]
pub trait AdminRepository: ItemRepository {
    async fn insert_item(&self, record: &ItemRecord) -> Result<()>;
    async fn update_item(&self, id: ItemId, record: &ItemRecord) -> Result<()>;
    async fn delete_item(&self, id: ItemId) -> Result<()>;
    /// Unset `isFeatured` on every villa except `id`.
    async fn clear_featured_except(&self, id: ItemId) -> Result<()>;
    /// Mark `id` featured and clear its other status flags.
    async fn set_featured(&self, id: ItemId) -> Result<()>;
    /// Remove objects from the image bucket. Paths are bucket-relative.
    async fn remove_objects(&self, paths: &[String]) -> Result<()>;
}

pub trait FavoritesStorage: Send + Sync {
    /// Absent storage loads as an empty list.
    fn load(&self) -> Result<Vec<ItemId>>;
    fn save(&self, ids: &[ItemId]) -> Result<()>;
}

pub trait LinkOpener: Send + Sync {
    /// Hand `text` to the chat app for `destination`. Encoding is up to the opener.
    fn open(&self, destination: &str, text: &str);
}

pub trait ConfigProvider: Send + Sync {
    fn backend_url(&self) -> &str;
    fn anon_key(&self) -> &str;
    fn items_table(&self) -> &str;
    fn site_table(&self) -> &str;
    fn image_bucket(&self) -> &str;
    fn request_timeout_seconds(&self) -> u64;
    fn booking_number(&self) -> &str;
    fn inquiry_number(&self) -> &str;
    fn favorites_path(&self) -> &str;
}
