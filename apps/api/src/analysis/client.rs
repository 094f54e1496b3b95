use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::analysis::models::{AnalysisRequest, AnalysisResult};

/// Endpoint the analysis service was published at.
pub const DEFAULT_ANALYSIS_URL: &str =
    "https://e50a-223-185-129-202.ngrok-free.app/v1/analyze_resume/";

pub const FIELD_RESUME: &str = "resume";
pub const FIELD_TARGET_ROLE: &str = "Target_Role";
pub const FIELD_TARGET_COMPANY: &str = "Target_Company";
pub const FIELD_YEARS_OF_EXPERIENCE: &str = "Years_of_Experience";

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Resume analysis failed: {status_text}")]
    Status { status: u16, status_text: String },

    #[error("Analysis response is not a JSON object: {0}")]
    Parse(String),
}

/// How many times a request that never reached the service is re-sent.
///
/// Only transport failures (connect, timeout, reset) are retried; a status
/// answer from the service, success or not, ends the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn single_attempt() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::from_millis(500),
        }
    }

    /// Backoff before attempt number `attempt` (the first retry is attempt 2).
    /// Doubles from `base_delay` on each further attempt.
    pub fn delay_before(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(2).min(16);
        self.base_delay.saturating_mul(1 << exponent)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::single_attempt()
    }
}

/// HTTP client for the resume-analysis service.
#[derive(Clone)]
pub struct AnalysisClient {
    client: Client,
    url: String,
    retry: RetryPolicy,
}

impl AnalysisClient {
    /// `timeout: None` keeps the transport default.
    pub fn new(
        url: impl Into<String>,
        retry: RetryPolicy,
        timeout: Option<Duration>,
    ) -> Result<Self, AnalysisError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            url: url.into(),
            retry,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Uploads the resume with its target fields and returns the service's
    /// JSON object untouched.
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, AnalysisError> {
        let attempts = self.retry.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            // Forms are consumed by send(); rebuild one per attempt
            let form = build_form(request)?;
            debug!(
                "Sending resume '{}' ({} bytes) for analysis, attempt {attempt}/{attempts}",
                request.resume.file_name,
                request.resume.bytes.len()
            );

            match self.client.post(&self.url).multipart(form).send().await {
                Ok(response) => return read_response(response).await,
                Err(e) if attempt < attempts => {
                    attempt += 1;
                    let delay = self.retry.delay_before(attempt);
                    warn!(
                        "Analysis request failed ({e}), retrying after {}ms...",
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    warn!("Analysis request failed after {attempt} attempt(s): {e}");
                    return Err(AnalysisError::Http(e));
                }
            }
        }
    }
}

fn build_form(request: &AnalysisRequest) -> Result<Form, AnalysisError> {
    let resume = Part::bytes(request.resume.bytes.to_vec())
        .file_name(request.resume.file_name.clone())
        .mime_str(&request.resume.content_type)?;

    Ok(Form::new()
        .part(FIELD_RESUME, resume)
        .text(FIELD_TARGET_ROLE, request.target_role.clone())
        .text(FIELD_TARGET_COMPANY, request.target_company.clone())
        .text(FIELD_YEARS_OF_EXPERIENCE, request.years_of_experience.clone()))
}

async fn read_response(response: Response) -> Result<AnalysisResult, AnalysisError> {
    let status = response.status();

    if !status.is_success() {
        let status_text = status_text(&response);
        warn!("Analysis service returned {} {status_text}", status.as_u16());
        return Err(AnalysisError::Status {
            status: status.as_u16(),
            status_text,
        });
    }

    let body = response.bytes().await?;
    match serde_json::from_slice::<Value>(&body) {
        Ok(Value::Object(map)) => {
            info!("Resume analysis succeeded ({} keys)", map.len());
            Ok(AnalysisResult::from(map))
        }
        Ok(other) => Err(AnalysisError::Parse(format!(
            "expected an object, got {}",
            json_kind(&other)
        ))),
        Err(e) => Err(AnalysisError::Parse(e.to_string())),
    }
}

/// The reason phrase the service actually sent. hyper only records it when it
/// differs from the canonical one for the code.
fn status_text(response: &Response) -> String {
    let status = response.status();
    response
        .extensions()
        .get::<hyper::ext::ReasonPhrase>()
        .map(|reason| String::from_utf8_lossy(reason.as_bytes()).into_owned())
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| status.as_u16().to_string())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
