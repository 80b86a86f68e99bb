//! # Unified Application Configuration
//!
//! This module consolidates all application settings into a single structured
//! configuration object loaded from environment variables, with per-section
//! validation and a redacting summary for startup logging.

use serde::{Deserialize, Serialize};
use std::env;

use crate::errors::{AppError, AppResult};
use crate::generation::GenerationConfig;
use crate::meal_plan::ParserConfig;

/// Unified application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Generation service client configuration
    pub generation: GenerationConfig,
    /// Section extraction configuration
    pub parser: ParserConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> AppResult<Self> {
        let mut config = Self::default();

        config.generation.base_url =
            env::var("GENERATION_API_URL").unwrap_or_else(|_| "http://localhost:8000".to_string());
        config.generation.http_timeout_secs = env::var("HTTP_CLIENT_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .map_err(|_| {
                AppError::Config("HTTP_CLIENT_TIMEOUT_SECS must be a valid number".to_string())
            })?;
        config.generation.max_retries = env::var("GENERATION_MAX_RETRIES")
            .unwrap_or_else(|_| "3".to_string())
            .parse()
            .map_err(|_| {
                AppError::Config("GENERATION_MAX_RETRIES must be a valid number".to_string())
            })?;
        config.generation.base_retry_delay_ms = env::var("GENERATION_BASE_RETRY_DELAY_MS")
            .unwrap_or_else(|_| "1000".to_string())
            .parse()
            .map_err(|_| {
                AppError::Config("GENERATION_BASE_RETRY_DELAY_MS must be a valid number".to_string())
            })?;
        config.generation.max_retry_delay_ms = env::var("GENERATION_MAX_RETRY_DELAY_MS")
            .unwrap_or_else(|_| "10000".to_string())
            .parse()
            .map_err(|_| {
                AppError::Config("GENERATION_MAX_RETRY_DELAY_MS must be a valid number".to_string())
            })?;

        config.parser.min_structured_len = env::var("PARSER_MIN_STRUCTURED_LEN")
            .unwrap_or_else(|_| "50".to_string())
            .parse()
            .map_err(|_| {
                AppError::Config("PARSER_MIN_STRUCTURED_LEN must be a valid number".to_string())
            })?;

        Ok(config)
    }

    /// Validate all configuration sections
    pub fn validate(&self) -> AppResult<()> {
        self.generation.validate()?;
        self.parser.validate()?;
        Ok(())
    }

    /// Get a summary of the current configuration for logging
    pub fn summary(&self) -> String {
        format!(
            "Configuration: generation_url={}, http_timeout_secs={}, max_retries={}, parser_min_structured_len={}",
            self.generation.base_url,
            self.generation.http_timeout_secs,
            self.generation.max_retries,
            self.parser.min_structured_len
        )
    }
}
