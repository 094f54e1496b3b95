//! Resume analysis: proxies a resume and the interview target to the
//! external analysis service and hands back whatever JSON it answers with.
//!
//! `AppState` holds an `Arc<dyn ResumeAnalyzer>`; the HTTP-backed
//! `AnalysisClient` is the only production implementation.

use async_trait::async_trait;

pub mod client;
pub mod handlers;
pub mod models;

pub use client::{AnalysisClient, AnalysisError, RetryPolicy};
pub use models::{AnalysisRequest, AnalysisResult};

#[async_trait]
pub trait ResumeAnalyzer: Send + Sync {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, AnalysisError>;
}

#[async_trait]
impl ResumeAnalyzer for AnalysisClient {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, AnalysisError> {
        AnalysisClient::analyze(self, request).await
    }
}
