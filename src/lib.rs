//! Licensure Algo - requirement matching and report service for Licensure Buddy IL
//!
//! This library matches business profiles against a licensing-requirement
//! catalog and renders the matches into a compliance report through a
//! pluggable provider chain with a deterministic offline fallback.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{evaluate, match_requirements, ConditionSet, Matcher, GENERAL_RULE_REASON};
pub use crate::models::{
    BusinessProfile, BusinessSize, MatchedRequirement, Priority, ProviderKind, ReportOutcome,
    Requirement,
};
