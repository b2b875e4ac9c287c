use std::fmt::Write;
use thiserror::Error;

use crate::config::ProviderSettings;
use crate::models::{
    BusinessProfile, MatchedRequirement, Priority, ProviderKind, ReportMetadata, ReportOutcome,
};
use crate::services::gemini::GeminiClient;
use crate::services::offline;
use crate::services::openai::OpenAiClient;

/// Classified provider failures
///
/// `MissingCredential` is a configuration problem; everything else is a
/// transient or remote problem. The orchestrator recovers from all of
/// them by serving the offline report.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("missing API key for provider '{0}'")]
    MissingCredential(&'static str),

    #[error("provider returned HTTP {0}")]
    RemoteStatus(u16),

    #[error("provider returned an empty or malformed response")]
    EmptyResponse,

    #[error("request to provider failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ProviderError {
    /// True for operator misconfiguration, false for remote/transient
    /// failures. Lets logs tell "misconfigured" from "remote outage".
    pub fn is_configuration(&self) -> bool {
        matches!(self, ProviderError::MissingCredential(_))
    }

    /// Short tag recorded in fallback metadata.
    pub fn fallback_reason(&self) -> String {
        match self {
            ProviderError::MissingCredential(_) => "missing_key".to_string(),
            ProviderError::RemoteStatus(status) => format!("http_{}", status),
            ProviderError::EmptyResponse => "empty_response".to_string(),
            ProviderError::Transport(e) if e.is_timeout() => "timeout".to_string(),
            ProviderError::Transport(_) => "transport".to_string(),
        }
    }
}

/// Build the Hebrew prompt embedding the profile summary and the matched
/// requirements grouped by category and priority.
pub fn build_prompt(business: &BusinessProfile, matches: &[MatchedRequirement]) -> String {
    let mut prompt = format!(
        "אתה מומחה לרישוי עסקים בישראל. אנא צור דוח מפורט בעברית לעסק עם הפרופיל הבא:\n\n\
         **פרופיל העסק:**\n{}\n\
         **דרישות רישוי רלוונטיות:**\n",
        offline::profile_block(business)
    );

    for group in offline::group_by_category(matches) {
        let _ = write!(prompt, "\n**{}:**\n", group.category);
        for priority in Priority::ALL {
            let bucket = &group.by_priority[priority.rank() as usize];
            if bucket.is_empty() {
                continue;
            }
            let _ = write!(prompt, "\n{} עדיפות:\n", priority);
            for matched in bucket {
                let _ = writeln!(prompt, "- {}: {}", matched.title, matched.description);
            }
        }
    }

    prompt.push_str(
        "\n\n**אנא צור דוח הכולל:**\n\n\
         1. **סיכום תקנות רלוונטיות** - הסבר פשוט וברור של התקנות החשובות\n\
         2. **ארגון לפי קטגוריות** - חלוקה ברורה לפי תחומי האחריות\n\
         3. **רשימת פעולות לפי עדיפות** - מה צריך לעשות קודם (High עדיפות ראשונה)\n\
         4. **3 צעדים קונקרטיים הבאים** - מה העסק צריך לעשות עכשיו\n\n\
         הדוח צריך להיות מקצועי, ברור ומועיל לעסק להבין מה נדרש ממנו.\n",
    );

    prompt
}

/// Report orchestrator
///
/// Holds the configured provider selector and both external clients.
/// One external attempt per request, no retries; any classified failure
/// falls back to the offline generator. Generation never fails past this
/// boundary.
pub struct ReportService {
    provider: ProviderKind,
    gemini: GeminiClient,
    openai: OpenAiClient,
}

impl ReportService {
    pub fn new(settings: &ProviderSettings) -> Self {
        Self::with_clients(
            ProviderKind::parse(&settings.name),
            GeminiClient::new(settings.gemini_api_key.clone(), settings.timeout_secs),
            OpenAiClient::new(
                settings.openai_api_key.clone(),
                settings.openai_model.clone(),
                settings.timeout_secs,
            ),
        )
    }

    /// Assemble from pre-built clients (used by tests to point the
    /// clients at local servers).
    pub fn with_clients(provider: ProviderKind, gemini: GeminiClient, openai: OpenAiClient) -> Self {
        Self {
            provider,
            gemini,
            openai,
        }
    }

    pub fn provider(&self) -> ProviderKind {
        self.provider
    }

    /// Generate a compliance report for the profile and its matches.
    ///
    /// The only two outcomes are a live provider report or the offline
    /// report; metadata records which one the caller got and why.
    pub async fn generate(
        &self,
        business: &BusinessProfile,
        matches: &[MatchedRequirement],
    ) -> ReportOutcome {
        let attempt = match self.provider {
            ProviderKind::Mock => {
                return ReportOutcome {
                    report: offline::generate_report(business, matches),
                    metadata: ReportMetadata::mock(),
                };
            }
            ProviderKind::Gemini => {
                let prompt = build_prompt(business, matches);
                self.gemini
                    .generate(&prompt)
                    .await
                    .map(|text| (text, self.gemini.model().to_string()))
            }
            ProviderKind::OpenAi => {
                let prompt = build_prompt(business, matches);
                self.openai
                    .generate(&prompt)
                    .await
                    .map(|text| (text, self.openai.model().to_string()))
            }
        };

        match attempt {
            Ok((text, model)) => ReportOutcome {
                report: text,
                metadata: ReportMetadata::live(self.provider, Some(model)),
            },
            Err(e) => {
                if e.is_configuration() {
                    tracing::warn!("Provider {} misconfigured, serving offline report: {}", self.provider, e);
                } else {
                    tracing::warn!("Provider {} failed, serving offline report: {}", self.provider, e);
                }
                ReportOutcome {
                    report: offline::generate_report(business, matches),
                    metadata: ReportMetadata::fallback(self.provider, e.fallback_reason()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BusinessSize;

    fn business() -> BusinessProfile {
        BusinessProfile {
            business_name: "בית קפה".to_string(),
            size: BusinessSize::Small,
            seats: 25,
            area_sqm: 60,
            staff_count: 4,
            features: ["gas"].iter().map(|f| f.to_string()).collect(),
        }
    }

    fn matched(category: &str, priority: Priority) -> MatchedRequirement {
        MatchedRequirement {
            id: "r1".to_string(),
            title: "בטיחות גז".to_string(),
            category: category.to_string(),
            priority,
            description: "דרישות בטיחות למערכות גז".to_string(),
            reasons: vec![],
        }
    }

    #[test]
    fn test_fallback_reason_tags() {
        assert_eq!(
            ProviderError::MissingCredential("gemini").fallback_reason(),
            "missing_key"
        );
        assert_eq!(ProviderError::RemoteStatus(502).fallback_reason(), "http_502");
        assert_eq!(ProviderError::EmptyResponse.fallback_reason(), "empty_response");
    }

    #[test]
    fn test_error_classification() {
        assert!(ProviderError::MissingCredential("openai").is_configuration());
        assert!(!ProviderError::RemoteStatus(500).is_configuration());
        assert!(!ProviderError::EmptyResponse.is_configuration());
    }

    #[test]
    fn test_prompt_embeds_profile_and_requirements() {
        let matches = vec![matched("בטיחות", Priority::High)];
        let prompt = build_prompt(&business(), &matches);
        assert!(prompt.contains("בית קפה"));
        assert!(prompt.contains("בטיחות גז"));
        assert!(prompt.contains("High עדיפות"));
        assert!(prompt.contains("**בטיחות:**"));
    }

    #[test]
    fn test_mock_provider_never_calls_out() {
        let service = ReportService::new(&ProviderSettings::default());
        assert_eq!(service.provider(), ProviderKind::Mock);

        let matches = vec![matched("בטיחות", Priority::High)];
        let outcome = tokio_test::block_on(service.generate(&business(), &matches));
        assert_eq!(outcome.metadata, ReportMetadata::mock());
        assert!(!outcome.report.is_empty());
    }
}
