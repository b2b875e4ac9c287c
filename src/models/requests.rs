use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{BusinessProfile, MatchedRequirement};

/// Request to generate a compliance report from previously matched
/// requirements.
///
/// The `requirements` alias keeps older clients working; `reasons` on each
/// match may be omitted by callers that only carry the requirement fields.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReportRequest {
    #[validate(nested)]
    pub business: BusinessProfile,
    #[serde(alias = "requirements")]
    pub matches: Vec<MatchedRequirement>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requirements_alias_accepted() {
        let request: ReportRequest = serde_json::from_value(serde_json::json!({
            "business": {
                "business_name": "Test Business",
                "size": "small",
                "seats": 10,
                "area_sqm": 50,
                "staff_count": 2,
                "features": ["gas"]
            },
            "requirements": [{
                "id": "req1",
                "title": "Test Requirement",
                "category": "Test",
                "priority": "High",
                "description": "Test description"
            }]
        }))
        .unwrap();

        assert_eq!(request.matches.len(), 1);
        assert_eq!(request.matches[0].id, "req1");
        assert!(request.matches[0].reasons.is_empty());
    }

    #[test]
    fn test_missing_matches_field_is_an_error() {
        let result: Result<ReportRequest, _> = serde_json::from_value(serde_json::json!({
            "business": {
                "business_name": "Test Business",
                "size": "small",
                "seats": 10,
                "area_sqm": 50,
                "staff_count": 2
            }
        }));
        assert!(result.is_err());
    }
}
