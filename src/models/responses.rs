use serde::{Deserialize, Serialize};

use crate::models::{BusinessProfile, MatchedRequirement, ReportMetadata};

/// Response for the match endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResponse {
    pub business: BusinessProfile,
    pub matched: Vec<MatchedRequirement>,
}

/// Response for the report endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportResponse {
    pub report: String,
    pub metadata: ReportMetadata,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub requirements: usize,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Configured provider, for the AI status endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderStatusResponse {
    pub provider: String,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
