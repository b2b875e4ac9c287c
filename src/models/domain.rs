use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use validator::Validate;

use crate::core::conditions::ConditionSet;

/// Business size category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BusinessSize {
    Small,
    Medium,
    Large,
}

impl fmt::Display for BusinessSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BusinessSize::Small => "small",
            BusinessSize::Medium => "medium",
            BusinessSize::Large => "large",
        };
        write!(f, "{}", s)
    }
}

/// Requirement priority; High sorts before Medium before Low
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Sort rank: High=0, Medium=1, Low=2
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }

    /// Hebrew label used in report prose
    pub fn label_he(&self) -> &'static str {
        match self {
            Priority::High => "גבוהה",
            Priority::Medium => "בינונית",
            Priority::Low => "נמוכה",
        }
    }

    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        };
        write!(f, "{}", s)
    }
}

/// Business profile submitted for matching
///
/// Immutable for the duration of one match/report cycle; never persisted.
/// Features are a set: duplicates collapse and iteration order is stable.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BusinessProfile {
    #[validate(length(min = 1))]
    #[serde(default)]
    pub business_name: String,
    pub size: BusinessSize,
    pub seats: u32,
    pub area_sqm: u32,
    pub staff_count: u32,
    #[serde(default)]
    pub features: BTreeSet<String>,
}

impl BusinessProfile {
    /// Comma-joined feature list for report prose, with the Hebrew
    /// "no special features" placeholder when empty.
    pub fn features_summary(&self) -> String {
        if self.features.is_empty() {
            "ללא מאפיינים מיוחדים".to_string()
        } else {
            self.features.iter().cloned().collect::<Vec<_>>().join(", ")
        }
    }
}

/// One catalog entry describing a licensing obligation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Requirement {
    pub id: String,
    pub title: String,
    pub category: String,
    pub priority: Priority,
    pub description: String,
    #[serde(default)]
    pub conditions: ConditionSet,
}

/// A requirement that matched a profile, with one reason per satisfied
/// condition in evaluation order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedRequirement {
    pub id: String,
    pub title: String,
    pub category: String,
    pub priority: Priority,
    pub description: String,
    #[serde(default)]
    pub reasons: Vec<String>,
}

impl MatchedRequirement {
    pub fn new(requirement: &Requirement, reasons: Vec<String>) -> Self {
        Self {
            id: requirement.id.clone(),
            title: requirement.title.clone(),
            category: requirement.category.clone(),
            priority: requirement.priority,
            description: requirement.description.clone(),
            reasons,
        }
    }
}

/// Configured report provider, fixed at process start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Gemini,
    OpenAi,
    Mock,
}

impl ProviderKind {
    /// Parse a configured provider name; anything unrecognized selects
    /// the offline generator.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "gemini" => ProviderKind::Gemini,
            "openai" => ProviderKind::OpenAi,
            _ => ProviderKind::Mock,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini",
            ProviderKind::OpenAi => "openai",
            ProviderKind::Mock => "mock",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether the report text came from a live provider call or the offline
/// generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorMode {
    Live,
    Mock,
}

/// Report provenance returned alongside the report text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub mode: GeneratorMode,
    pub provider: ProviderKind,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub fallback_reason: Option<String>,
}

impl ReportMetadata {
    /// Offline generator selected by configuration, not by fallback.
    pub fn mock() -> Self {
        Self {
            mode: GeneratorMode::Mock,
            provider: ProviderKind::Mock,
            model: None,
            fallback_reason: None,
        }
    }

    pub fn live(provider: ProviderKind, model: Option<String>) -> Self {
        Self {
            mode: GeneratorMode::Live,
            provider,
            model,
            fallback_reason: None,
        }
    }

    /// Offline generator serving after the requested provider failed.
    /// The mode field is what distinguishes this from a live result.
    pub fn fallback(provider: ProviderKind, reason: String) -> Self {
        Self {
            mode: GeneratorMode::Mock,
            provider,
            model: None,
            fallback_reason: Some(reason),
        }
    }
}

/// Generated report plus its provenance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportOutcome {
    pub report: String,
    pub metadata: ReportMetadata,
}
