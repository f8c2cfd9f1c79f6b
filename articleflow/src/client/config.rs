//! Configuration for the HTTP request client.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::errors::ArticleflowError;

/// Backend routes, relative to `/{plugin}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTable {
    /// generate-title
    #[serde(default = "default_title_route")]
    pub title: String,
    /// generate-paragraph-topics
    #[serde(default = "default_paragraphs_route")]
    pub paragraphs: String,
    /// generate-paragraph-body
    #[serde(default = "default_paragraph_route")]
    pub paragraph: String,
    /// generate-excerpt
    #[serde(default = "default_excerpt_route")]
    pub excerpt: String,
    /// generate-seo
    #[serde(default = "default_seo_route")]
    pub seo: String,
    /// generate-faq
    #[serde(default = "default_faq_route")]
    pub faq: String,
    /// generate-images
    #[serde(default = "default_images_route")]
    pub images: String,
    /// generate-titles
    #[serde(default = "default_titles_route")]
    pub titles: String,
    /// upload-image
    #[serde(default = "default_upload_route")]
    pub upload_image: String,
}

fn default_title_route() -> String {
    "/article/title".to_string()
}

fn default_paragraphs_route() -> String {
    "/article/paragraphs".to_string()
}

fn default_paragraph_route() -> String {
    "/article/paragraph".to_string()
}

fn default_excerpt_route() -> String {
    "/article/excerpt".to_string()
}

fn default_seo_route() -> String {
    "/article/seo".to_string()
}

fn default_faq_route() -> String {
    "/article/faq".to_string()
}

fn default_images_route() -> String {
    "/images".to_string()
}

fn default_titles_route() -> String {
    "/articles/titles".to_string()
}

fn default_upload_route() -> String {
    "/upload-image".to_string()
}

impl Default for RouteTable {
    fn default() -> Self {
        Self {
            title: default_title_route(),
            paragraphs: default_paragraphs_route(),
            paragraph: default_paragraph_route(),
            excerpt: default_excerpt_route(),
            seo: default_seo_route(),
            faq: default_faq_route(),
            images: default_images_route(),
            titles: default_titles_route(),
            upload_image: default_upload_route(),
        }
    }
}

/// Configuration for [`HttpRequestClient`](crate::client::HttpRequestClient).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the CMS, e.g. `http://localhost:1337`.
    pub base_url: String,
    /// Plugin path segment prefixed to every route.
    #[serde(default = "default_plugin")]
    pub plugin: String,
    /// Request timeout in seconds. Generation calls are slow.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: f64,
    /// User agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Bearer token sent as `Authorization`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bearer_token: Option<String>,
    /// Additional headers.
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Route table.
    #[serde(default)]
    pub routes: RouteTable,
}

fn default_plugin() -> String {
    "gpt".to_string()
}

fn default_timeout() -> f64 {
    120.0
}

fn default_user_agent() -> String {
    concat!("articleflow/", env!("CARGO_PKG_VERSION")).to_string()
}

impl ClientConfig {
    /// Creates a configuration for the given base URL with defaults.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            plugin: default_plugin(),
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
            bearer_token: None,
            headers: HashMap::new(),
            routes: RouteTable::default(),
        }
    }

    /// Reads the configuration from `ARTICLEFLOW_*` environment variables.
    pub fn from_env() -> Result<Self, ArticleflowError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Parses a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self, ArticleflowError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ArticleflowError::Config(format!("invalid client config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ArticleflowError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("ARTICLEFLOW_BASE_URL")
            .ok_or_else(|| ArticleflowError::Config("ARTICLEFLOW_BASE_URL is not set".to_string()))?;
        let mut config = Self::new(base_url);
        if let Some(plugin) = lookup("ARTICLEFLOW_PLUGIN") {
            config.plugin = plugin;
        }
        if let Some(timeout) = lookup("ARTICLEFLOW_TIMEOUT_SECONDS") {
            config.timeout_seconds = timeout.parse().map_err(|_| {
                ArticleflowError::Config(format!("invalid ARTICLEFLOW_TIMEOUT_SECONDS: {timeout}"))
            })?;
        }
        config.bearer_token = lookup("ARTICLEFLOW_TOKEN");
        config.validate()?;
        Ok(config)
    }

    /// Sets the plugin path segment.
    #[must_use]
    pub fn with_plugin(mut self, plugin: impl Into<String>) -> Self {
        self.plugin = plugin.into();
        self
    }

    /// Sets the timeout.
    #[must_use]
    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Sets the bearer token.
    #[must_use]
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Replaces the route table.
    #[must_use]
    pub fn with_routes(mut self, routes: RouteTable) -> Self {
        self.routes = routes;
        self
    }

    /// Gets timeout as Duration.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeout_seconds)
    }

    /// Full URL for a route: `{base_url}/{plugin}{route}`.
    #[must_use]
    pub fn url_for(&self, route: &str) -> String {
        format!(
            "{}/{}{}",
            self.base_url.trim_end_matches('/'),
            self.plugin.trim_matches('/'),
            route
        )
    }

    /// Checks the configuration for unusable values.
    pub fn validate(&self) -> Result<(), ArticleflowError> {
        if self.base_url.trim().is_empty() {
            return Err(ArticleflowError::Config("base_url is empty".to_string()));
        }
        if !self.timeout_seconds.is_finite() || self.timeout_seconds <= 0.0 {
            return Err(ArticleflowError::Config(format!(
                "timeout_seconds must be positive, got {}",
                self.timeout_seconds
            )));
        }
        Ok(())
    }
}
