use crate::domain::model::{Item, ItemId, ItemRecord, SiteContent};
use crate::domain::ports::{AdminRepository, ConfigProvider, ItemRepository};
use crate::utils::error::{Result, VillaError};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use std::time::Duration;
use url::Url;

/// Hosted backend: PostgREST tables under `/rest/v1` and object storage
/// under `/storage/v1`.
#[derive(Debug, Clone)]
pub struct RestBackend {
    client: Client,
    base_url: Url,
    anon_key: String,
    items_table: String,
    site_table: String,
    bucket: String,
}

impl RestBackend {
    pub fn new<C: ConfigProvider>(config: &C) -> Result<Self> {
        let base_url = Url::parse(config.backend_url()).map_err(|e| VillaError::ConfigError {
            message: format!("Invalid backend URL '{}': {}", config.backend_url(), e),
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds()))
            .build()?;

        Ok(Self {
            client,
            base_url,
            anon_key: config.anon_key().to_string(),
            items_table: config.items_table().to_string(),
            site_table: config.site_table().to_string(),
            bucket: config.image_bucket().to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{}/{}", base, path)).map_err(|e| VillaError::ConfigError {
            message: format!("Invalid backend endpoint '{}': {}", path, e),
        })
    }

    fn table_url(&self, table: &str) -> Result<Url> {
        self.endpoint(&format!("rest/v1/{}", table))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = self.authorized(request).send().await?;
        let status = response.status();
        tracing::debug!("Backend response status: {}", status);

        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        Err(VillaError::BackendError {
            status: status.as_u16(),
            message,
        })
    }

    async fn patch_items(&self, filter: String, body: serde_json::Value) -> Result<()> {
        let url = self.table_url(&self.items_table)?;
        let request = self
            .client
            .patch(url)
            .query(&[("id", filter)])
            .header("Prefer", "return=minimal")
            .json(&body);
        self.send(request).await?;
        Ok(())
    }
}

#[async_trait]
impl ItemRepository for RestBackend {
    async fn list_items(&self) -> Result<Vec<Item>> {
        let url = self.table_url(&self.items_table)?;
        tracing::debug!("Fetching villas from: {}", url);

        let request = self
            .client
            .get(url)
            .query(&[("select", "*"), ("order", "id.asc")]);
        let mut items: Vec<Item> = self.send(request).await?.json().await?;

        // 後端應已排序，這裡再保證一次
        items.sort_by_key(|item| item.id);
        tracing::debug!("Fetched {} villas", items.len());
        Ok(items)
    }

    async fn site_content(&self) -> Result<SiteContent> {
        let url = self.table_url(&self.site_table)?;
        let request = self
            .client
            .get(url)
            .query(&[("select", "*"), ("limit", "1")]);
        let rows: Vec<SiteContent> = self.send(request).await?.json().await?;

        Ok(rows.into_iter().next().unwrap_or_default())
    }
}

#[async_trait]
impl AdminRepository for RestBackend {
    async fn insert_item(&self, record: &ItemRecord) -> Result<()> {
        let url = self.table_url(&self.items_table)?;
        let request = self
            .client
            .post(url)
            .header("Prefer", "return=minimal")
            .json(record);
        self.send(request).await?;
        Ok(())
    }

    async fn update_item(&self, id: ItemId, record: &ItemRecord) -> Result<()> {
        let body = serde_json::to_value(record)?;
        self.patch_items(format!("eq.{}", id), body).await
    }

    async fn delete_item(&self, id: ItemId) -> Result<()> {
        let url = self.table_url(&self.items_table)?;
        let request = self.client.delete(url).query(&[("id", format!("eq.{}", id))]);
        self.send(request).await?;
        Ok(())
    }

    async fn clear_featured_except(&self, id: ItemId) -> Result<()> {
        let body = serde_json::json!({ "isFeatured": false });
        self.patch_items(format!("neq.{}", id), body).await
    }

    async fn set_featured(&self, id: ItemId) -> Result<()> {
        let body = serde_json::json!({ "isFeatured": true, "isBaru": false, "isHot": false });
        self.patch_items(format!("eq.{}", id), body).await
    }

    async fn remove_objects(&self, paths: &[String]) -> Result<()> {
        let url = self.endpoint(&format!("storage/v1/object/{}", self.bucket))?;
        let request = self
            .client
            .delete(url)
            .json(&serde_json::json!({ "prefixes": paths }));
        self.send(request).await?;
        Ok(())
    }
}
