// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    BusinessProfile, BusinessSize, GeneratorMode, MatchedRequirement, Priority, ProviderKind,
    ReportMetadata, ReportOutcome, Requirement,
};
pub use requests::ReportRequest;
pub use responses::{
    ErrorResponse, HealthResponse, MatchResponse, ProviderStatusResponse, ReportResponse,
};
