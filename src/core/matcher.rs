use std::sync::Arc;

use crate::core::conditions::evaluate;
use crate::models::{BusinessProfile, MatchedRequirement, Requirement};

/// Matches business profiles against the loaded requirement catalog.
///
/// The catalog is read-only for the process lifetime, so the matcher can
/// be cloned freely across workers; clones share the same backing slice.
#[derive(Debug, Clone)]
pub struct Matcher {
    catalog: Arc<[Requirement]>,
}

impl Matcher {
    pub fn new(catalog: Vec<Requirement>) -> Self {
        Self {
            catalog: catalog.into(),
        }
    }

    pub fn catalog(&self) -> &[Requirement] {
        &self.catalog
    }

    /// Match a profile against the catalog.
    ///
    /// Deterministic: identical (profile, catalog) inputs yield
    /// byte-identical output, reason text included.
    pub fn find_matches(&self, profile: &BusinessProfile) -> Vec<MatchedRequirement> {
        match_requirements(profile, &self.catalog)
    }
}

/// Evaluate every requirement against the profile, keep the ones that
/// match, and order them by (priority, category, title). The sort is
/// stable so catalog order breaks any remaining ties.
pub fn match_requirements(
    profile: &BusinessProfile,
    requirements: &[Requirement],
) -> Vec<MatchedRequirement> {
    let mut matched: Vec<MatchedRequirement> = requirements
        .iter()
        .filter_map(|requirement| {
            let evaluation = evaluate(profile, &requirement.conditions);
            evaluation
                .matched
                .then(|| MatchedRequirement::new(requirement, evaluation.reasons))
        })
        .collect();

    matched.sort_by(|a, b| {
        a.priority
            .rank()
            .cmp(&b.priority.rank())
            .then_with(|| a.category.cmp(&b.category))
            .then_with(|| a.title.cmp(&b.title))
    });

    matched
}
