//! Configuration loading and management

use crate::core::error::ConfigError;
use crate::core::page::PageSize;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Paging settings shared by every list served by one [`Paginator`](crate::paging::Paginator)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PagingConfig {
    /// Rows per page of full list views
    pub page_size: usize,

    /// Rows per page of picker dialogs
    pub modal_page_size: usize,

    /// Deadline of each individual store call, in milliseconds
    pub query_timeout_ms: u64,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            page_size: PageSize::DEFAULT.get(),
            modal_page_size: PageSize::MODAL.get(),
            query_timeout_ms: 10_000,
        }
    }
}

impl PagingConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.to_string()),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject zero page sizes and a zero deadline
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("page_size", self.page_size),
            ("modal_page_size", self.modal_page_size),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: value.to_string(),
                    message: "must be at least 1".to_string(),
                });
            }
        }
        if self.query_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "query_timeout_ms".to_string(),
                value: "0".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn page_size(&self) -> Result<PageSize, ConfigError> {
        checked_size("page_size", self.page_size)
    }

    pub fn modal_page_size(&self) -> Result<PageSize, ConfigError> {
        checked_size("modal_page_size", self.modal_page_size)
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }

    /// Create a default configuration for testing
    pub fn default_config() -> Self {
        Self::default()
    }
}

fn checked_size(field: &str, value: usize) -> Result<PageSize, ConfigError> {
    PageSize::new(value).map_err(|e| ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        message: e.to_string(),
    })
}
