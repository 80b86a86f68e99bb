//! Client for the meal-plan generation service
//!
//! The narrative document is produced by an external generative model behind
//! an HTTP endpoint. This module submits the user profile form as a multipart
//! request, along with the genomic data file the service requires, and
//! returns the raw text for the extraction core to work on. Transient
//! failures are retried with exponential backoff and jitter.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::{error_logging, AppError, AppResult};

/// Maximum accepted length for a single profile field
const MAX_FIELD_LEN: usize = 500;

/// User profile fields submitted to the generation service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealPlanRequest {
    /// Diabetes risk level
    pub diabetes: String,
    /// Lactose intolerance (yes/no)
    pub lactose: String,
    /// Calcium intake level
    pub calcium: String,
    /// Ethnicity, used for food recommendations
    pub ethnicity: String,
    /// Free-form special requests
    #[serde(rename = "special")]
    pub special_requests: String,
    /// Path to the genomic data file the service requires with every
    /// submission. Not part of the persisted preferences.
    #[serde(skip)]
    pub genomic_file: PathBuf,
}

impl MealPlanRequest {
    /// Validate profile fields before submission
    pub fn validate(&self) -> AppResult<()> {
        let fields = [
            ("diabetes", &self.diabetes),
            ("lactose", &self.lactose),
            ("calcium", &self.calcium),
            ("ethnicity", &self.ethnicity),
            ("special", &self.special_requests),
        ];

        for (name, value) in fields {
            if value.len() > MAX_FIELD_LEN {
                return Err(AppError::Validation(format!(
                    "profile field '{}' exceeds {} characters",
                    name, MAX_FIELD_LEN
                )));
            }
            if value.chars().any(|c| c.is_control() && c != '\n') {
                return Err(AppError::Validation(format!(
                    "profile field '{}' contains control characters",
                    name
                )));
            }
        }

        // The service rejects submissions without a genomic file.
        if self.genomic_file.as_os_str().is_empty() {
            return Err(AppError::Validation(
                "a genomic file path is required".to_string(),
            ));
        }

        Ok(())
    }
}

/// Raw generation service response body
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationResponse {
    /// The narrative text
    #[serde(default)]
    pub output: String,
    /// Service-side error message, if any
    #[serde(default)]
    pub error: Option<String>,
}

/// Configuration for the generation client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Base URL of the generation service
    pub base_url: String,
    /// HTTP client timeout in seconds
    pub http_timeout_secs: u64,
    /// Maximum number of retries after the first attempt
    pub max_retries: u32,
    /// Base delay for the first retry in milliseconds
    pub base_retry_delay_ms: u64,
    /// Cap on the retry delay in milliseconds
    pub max_retry_delay_ms: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            http_timeout_secs: 30,
            max_retries: 3,
            base_retry_delay_ms: 1000,
            max_retry_delay_ms: 10000,
        }
    }
}

impl GenerationConfig {
    /// Validate generation client configuration
    pub fn validate(&self) -> AppResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(AppError::Config(
                "Generation base URL cannot be empty".to_string(),
            ));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(AppError::Config(
                "Generation base URL must start with 'http://' or 'https://'".to_string(),
            ));
        }

        if self.http_timeout_secs == 0 {
            return Err(AppError::Config("HTTP timeout cannot be 0".to_string()));
        }

        if self.http_timeout_secs > 300 {
            return Err(AppError::Config(
                "HTTP timeout cannot be greater than 300 seconds".to_string(),
            ));
        }

        if self.base_retry_delay_ms == 0 {
            return Err(AppError::Config(
                "Base retry delay cannot be 0".to_string(),
            ));
        }

        if self.base_retry_delay_ms > self.max_retry_delay_ms {
            return Err(AppError::Config(
                "Base retry delay cannot be greater than max retry delay".to_string(),
            ));
        }

        Ok(())
    }
}

/// Calculate retry delay with exponential backoff
///
/// Delay doubles with each attempt up to the configured cap, with random
/// jitter of up to a quarter of the delay added on top:
///
/// ```text
/// delay = min(base_delay * 2^(attempt-1), max_delay)
/// final_delay = delay + random(0, delay/4)
/// ```
pub fn calculate_retry_delay(attempt: u32, config: &GenerationConfig) -> u64 {
    let exponent = attempt.saturating_sub(1).min(16);
    let delay = config
        .base_retry_delay_ms
        .saturating_mul(1u64 << exponent)
        .min(config.max_retry_delay_ms);
    let jitter = rand::random::<u64>() % (delay / 4 + 1);
    delay + jitter
}

/// HTTP client for the generation service
pub struct GenerationClient {
    http: reqwest::Client,
    config: GenerationConfig,
}

impl GenerationClient {
    /// Create a client with the given configuration
    pub fn new(config: GenerationConfig) -> AppResult<Self> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .map_err(|e| AppError::Generation(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Submit the profile form with its genomic file and return the raw
    /// narrative text.
    ///
    /// Failed attempts are retried up to `max_retries` times with
    /// exponentially growing, jittered delays. The genomic file is read once
    /// before the first attempt, so an unreadable file fails fast.
    pub async fn generate(&self, request: &MealPlanRequest) -> AppResult<String> {
        request.validate()?;

        let genomic_data = tokio::fs::read(&request.genomic_file).await.map_err(|e| {
            AppError::Generation(format!(
                "failed to read genomic file '{}': {}",
                request.genomic_file.display(),
                e
            ))
        })?;

        let endpoint = format!(
            "{}/api/meal_plan_submit",
            self.config.base_url.trim_end_matches('/')
        );

        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.submit(&endpoint, request, &genomic_data).await {
                Ok(output) => {
                    info!(
                        attempt,
                        output_len = output.len(),
                        "Generation service returned narrative"
                    );
                    return Ok(output);
                }
                Err(e) if attempt <= self.config.max_retries => {
                    let delay = calculate_retry_delay(attempt, &self.config);
                    warn!(
                        error = %e,
                        attempt,
                        delay_ms = delay,
                        "Generation request failed, retrying"
                    );
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                }
                Err(e) => {
                    error_logging::log_generation_error(
                        &e,
                        "generate",
                        Some(&endpoint),
                        Some(attempt),
                    );
                    return Err(e);
                }
            }
        }
    }

    async fn submit(
        &self,
        endpoint: &str,
        request: &MealPlanRequest,
        genomic_data: &[u8],
    ) -> AppResult<String> {
        let file_name = request
            .genomic_file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "genome.txt".to_string());

        let form = reqwest::multipart::Form::new()
            .text("diabetes", request.diabetes.clone())
            .text("lactose", request.lactose.clone())
            .text("calcium", request.calcium.clone())
            .text("ethnicity", request.ethnicity.clone())
            .text("special", request.special_requests.clone())
            .part(
                "genomicFile",
                reqwest::multipart::Part::bytes(genomic_data.to_vec()).file_name(file_name),
            );

        let response = self.http.post(endpoint).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Generation(format!(
                "generation service returned HTTP {}",
                status
            )));
        }

        let body: GenerationResponse = response.json().await?;
        if let Some(error) = body.error {
            return Err(AppError::Generation(error));
        }
        if body.output.trim().is_empty() {
            return Err(AppError::Generation(
                "generation service returned an empty narrative".to_string(),
            ));
        }

        Ok(body.output)
    }
}
