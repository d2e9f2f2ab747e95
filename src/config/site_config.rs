use crate::core::message::MessageTemplate;
use crate::core::ConfigProvider;
use crate::utils::error::{Result, VillaError};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_phone_number, validate_positive_number,
    validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_ITEMS_TABLE: &str = "villas";
const DEFAULT_SITE_TABLE: &str = "web_intro_images";
const DEFAULT_BUCKET: &str = "villas";
const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub backend: BackendConfig,
    #[serde(default)]
    pub contact: ContactConfig,
    #[serde(default)]
    pub message: MessageTemplate,
    #[serde(default)]
    pub favorites: FavoritesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub url: String,
    pub anon_key: String,
    pub table: Option<String>,
    pub site_table: Option<String>,
    pub bucket: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactConfig {
    pub booking_number: String,
    pub inquiry_number: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            booking_number: "+6282210081028".to_string(),
            inquiry_number: "+6283169371998".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FavoritesConfig {
    pub path: String,
}

impl Default for FavoritesConfig {
    fn default() -> Self {
        Self {
            path: "./favorites.json".to_string(),
        }
    }
}

impl SiteConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(VillaError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| VillaError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SUPABASE_ANON_KEY})，找不到的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| VillaError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_url("backend.url", &self.backend.url)?;
        validate_non_empty_string("backend.anon_key", &self.backend.anon_key)?;
        if self.backend.anon_key.contains("${") {
            return Err(VillaError::MissingConfigError {
                field: format!("backend.anon_key ({})", self.backend.anon_key),
            });
        }

        validate_positive_number("backend.timeout_seconds", self.request_timeout_seconds(), 1)?;
        validate_non_empty_string("backend.table", self.items_table())?;

        validate_phone_number("contact.booking_number", &self.contact.booking_number)?;
        validate_phone_number("contact.inquiry_number", &self.contact.inquiry_number)?;

        validate_path("favorites.path", &self.favorites.path)?;
        Ok(())
    }
}

impl ConfigProvider for SiteConfig {
    fn backend_url(&self) -> &str {
        &self.backend.url
    }

    fn anon_key(&self) -> &str {
        &self.backend.anon_key
    }

    fn items_table(&self) -> &str {
        self.backend.table.as_deref().unwrap_or(DEFAULT_ITEMS_TABLE)
    }

    fn site_table(&self) -> &str {
        self.backend
            .site_table
            .as_deref()
            .unwrap_or(DEFAULT_SITE_TABLE)
    }

    fn image_bucket(&self) -> &str {
        self.backend.bucket.as_deref().unwrap_or(DEFAULT_BUCKET)
    }

    fn request_timeout_seconds(&self) -> u64 {
        self.backend.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    fn booking_number(&self) -> &str {
        &self.contact.booking_number
    }

    fn inquiry_number(&self) -> &str {
        &self.contact.inquiry_number
    }

    fn favorites_path(&self) -> &str {
        &self.favorites.path
    }
}

impl Validate for SiteConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
