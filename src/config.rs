use std::env;

use crate::error::{GatewayError, Result};

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8787;
pub const DEFAULT_CLOUDFLARE_API_BASE_URL: &str = "https://api.cloudflare.com/client/v4";
pub const DEFAULT_UPLOAD_URL: &str = "https://pic.foxhank.top/upload";
pub const DEFAULT_IMAGE_HOST_BASE_URL: &str = "https://pic.foxhank.top";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub landing_page_path: Option<String>,
}

#[derive(Debug, Clone)]
pub struct WorkersAiConfig {
    pub account_id: Option<String>,
    pub api_token: Option<String>,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct ImageHostConfig {
    pub upload_url: String,
    pub public_base_url: String,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub server: ServerConfig,
    pub workers_ai: WorkersAiConfig,
    pub image_host: ImageHostConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            landing_page_path: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        ServerConfig {
            bind_address: env::var("BIND_ADDRESS").unwrap_or(defaults.bind_address),
            port: env::var("PORT")
                .ok()
                .and_then(|port| port.parse().ok())
                .unwrap_or(defaults.port),
            landing_page_path: env::var("LANDING_PAGE_PATH").ok(),
        }
    }

    pub fn with_address(mut self, bind_address: impl Into<String>, port: u16) -> Self {
        self.bind_address = bind_address.into();
        self.port = port;
        self
    }

    pub fn with_landing_page(mut self, path: impl Into<String>) -> Self {
        self.landing_page_path = Some(path.into());
        self
    }
}

impl Default for WorkersAiConfig {
    fn default() -> Self {
        WorkersAiConfig {
            account_id: None,
            api_token: None,
            base_url: DEFAULT_CLOUDFLARE_API_BASE_URL.to_string(),
        }
    }
}

impl WorkersAiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        WorkersAiConfig {
            account_id: env::var("CF_ACCOUNT_ID").ok(),
            api_token: env::var("CF_API_TOKEN").ok(),
            base_url: env::var("CF_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_CLOUDFLARE_API_BASE_URL.to_string()),
        }
    }

    pub fn with_credentials(
        mut self,
        account_id: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Self {
        self.account_id = Some(account_id.into());
        self.api_token = Some(api_token.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Returns `(account_id, api_token)`; both must be present and non-blank.
    pub fn credentials(&self) -> Result<(&str, &str)> {
        let account_id = non_blank(self.account_id.as_deref())
            .ok_or_else(|| GatewayError::ConfigError("CF_ACCOUNT_ID is required".into()))?;
        let api_token = non_blank(self.api_token.as_deref())
            .ok_or_else(|| GatewayError::ConfigError("CF_API_TOKEN is required".into()))?;
        Ok((account_id, api_token))
    }
}

impl Default for ImageHostConfig {
    fn default() -> Self {
        ImageHostConfig {
            upload_url: DEFAULT_UPLOAD_URL.to_string(),
            public_base_url: DEFAULT_IMAGE_HOST_BASE_URL.to_string(),
        }
    }
}

impl ImageHostConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        ImageHostConfig {
            upload_url: env::var("IMAGE_HOST_UPLOAD_URL").unwrap_or(defaults.upload_url),
            public_base_url: env::var("IMAGE_HOST_BASE_URL").unwrap_or(defaults.public_base_url),
        }
    }

    pub fn with_urls(
        mut self,
        upload_url: impl Into<String>,
        public_base_url: impl Into<String>,
    ) -> Self {
        self.upload_url = upload_url.into();
        self.public_base_url = public_base_url.into();
        self
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        Config {
            server: ServerConfig::from_env(),
            workers_ai: WorkersAiConfig::from_env(),
            image_host: ImageHostConfig::from_env(),
        }
    }

    pub fn with_server(mut self, config: ServerConfig) -> Self {
        self.server = config;
        self
    }

    pub fn with_workers_ai(mut self, config: WorkersAiConfig) -> Self {
        self.workers_ai = config;
        self
    }

    pub fn with_image_host(mut self, config: ImageHostConfig) -> Self {
        self.image_host = config;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.workers_ai.credentials()?;
        if self.image_host.upload_url.trim().is_empty() {
            return Err(GatewayError::ConfigError(
                "IMAGE_HOST_UPLOAD_URL must not be empty".into(),
            ));
        }
        Ok(())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::new();
        assert_eq!(config.server.port, 8787);
        assert_eq!(config.server.bind_address, "0.0.0.0");
        assert_eq!(config.image_host.upload_url, "https://pic.foxhank.top/upload");
        assert_eq!(config.image_host.public_base_url, "https://pic.foxhank.top");
        assert_eq!(
            config.workers_ai.base_url,
            "https://api.cloudflare.com/client/v4"
        );
    }

    #[test]
    fn test_validate_requires_credentials() {
        let config = Config::new();
        assert!(matches!(
            config.validate(),
            Err(GatewayError::ConfigError(_))
        ));

        let blank =
            Config::new().with_workers_ai(WorkersAiConfig::new().with_credentials("acct", "  "));
        assert!(blank.validate().is_err());

        let ready =
            Config::new().with_workers_ai(WorkersAiConfig::new().with_credentials("acct", "token"));
        assert!(ready.validate().is_ok());
        assert_eq!(ready.workers_ai.credentials().unwrap(), ("acct", "token"));
    }

    #[test]
    fn test_builders() {
        let config = Config::new()
            .with_server(
                ServerConfig::default()
                    .with_address("127.0.0.1", 9000)
                    .with_landing_page("page.html"),
            )
            .with_image_host(
                ImageHostConfig::default().with_urls("http://host/upload", "http://host"),
            );
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.landing_page_path.as_deref(), Some("page.html"));
        assert_eq!(config.image_host.public_base_url, "http://host");
    }
}
