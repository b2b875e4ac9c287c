use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::models::{BusinessProfile, BusinessSize};

/// Reason emitted for a rule with an empty condition set.
pub const GENERAL_RULE_REASON: &str = "general rule — no conditions";

/// A single predicate a business profile must satisfy for a requirement
/// to apply.
///
/// The set of kinds is closed: catalog entries with an unrecognized
/// condition key fail at deserialization, they do not silently pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    SizeAny(BTreeSet<BusinessSize>),
    MinSeats(u32),
    MaxSeats(u32),
    MinArea(u32),
    MaxArea(u32),
    MinStaff(u32),
    MaxStaff(u32),
    FeaturesAny(BTreeSet<String>),
    FeaturesAll(BTreeSet<String>),
    FeaturesNone(BTreeSet<String>),
}

impl Condition {
    /// Catalog key for this condition kind, also the tag that terminates
    /// each reason string.
    pub fn key(&self) -> &'static str {
        match self {
            Condition::SizeAny(_) => "size_any",
            Condition::MinSeats(_) => "min_seats",
            Condition::MaxSeats(_) => "max_seats",
            Condition::MinArea(_) => "min_area_sqm",
            Condition::MaxArea(_) => "max_area_sqm",
            Condition::MinStaff(_) => "min_staff",
            Condition::MaxStaff(_) => "max_staff",
            Condition::FeaturesAny(_) => "features_any",
            Condition::FeaturesAll(_) => "features_all",
            Condition::FeaturesNone(_) => "features_none",
        }
    }

    /// Position in the fixed evaluation order.
    fn rank(&self) -> usize {
        match self {
            Condition::SizeAny(_) => 0,
            Condition::MinSeats(_) => 1,
            Condition::MaxSeats(_) => 2,
            Condition::MinArea(_) => 3,
            Condition::MaxArea(_) => 4,
            Condition::MinStaff(_) => 5,
            Condition::MaxStaff(_) => 6,
            Condition::FeaturesAny(_) => 7,
            Condition::FeaturesAll(_) => 8,
            Condition::FeaturesNone(_) => 9,
        }
    }

    /// Evaluate against a profile. `Some(reason)` when the condition holds,
    /// `None` when it does not. Numeric bounds are inclusive.
    ///
    /// Reason strings are a committed interface: numeric reasons carry
    /// `<value> ≥/≤ <threshold>` and the condition key; feature reasons
    /// name every relevant tag as `feature '<tag>'` so the UI can mine
    /// individual feature tokens out of them.
    pub fn evaluate(&self, profile: &BusinessProfile) -> Option<String> {
        match self {
            Condition::SizeAny(sizes) => sizes.contains(&profile.size).then(|| {
                let listed = sizes
                    .iter()
                    .map(|s| s.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("size '{}' in {{{}}} ⇒ size_any", profile.size, listed)
            }),
            Condition::MinSeats(n) => (profile.seats >= *n)
                .then(|| format!("seats {} ≥ {} ⇒ min_seats", profile.seats, n)),
            Condition::MaxSeats(n) => (profile.seats <= *n)
                .then(|| format!("seats {} ≤ {} ⇒ max_seats", profile.seats, n)),
            Condition::MinArea(n) => (profile.area_sqm >= *n)
                .then(|| format!("area {} ≥ {} ⇒ min_area_sqm", profile.area_sqm, n)),
            Condition::MaxArea(n) => (profile.area_sqm <= *n)
                .then(|| format!("area {} ≤ {} ⇒ max_area_sqm", profile.area_sqm, n)),
            Condition::MinStaff(n) => (profile.staff_count >= *n)
                .then(|| format!("staff {} ≥ {} ⇒ min_staff", profile.staff_count, n)),
            Condition::MaxStaff(n) => (profile.staff_count <= *n)
                .then(|| format!("staff {} ≤ {} ⇒ max_staff", profile.staff_count, n)),
            Condition::FeaturesAny(wanted) => {
                let present: Vec<&String> = wanted
                    .iter()
                    .filter(|f| profile.features.contains(*f))
                    .collect();
                if present.is_empty() {
                    None
                } else {
                    Some(format!(
                        "{} present ⇒ features_any",
                        feature_list(present.into_iter())
                    ))
                }
            }
            Condition::FeaturesAll(wanted) => {
                wanted.is_subset(&profile.features).then(|| {
                    format!("{} present ⇒ features_all", feature_list(wanted.iter()))
                })
            }
            Condition::FeaturesNone(forbidden) => {
                forbidden.is_disjoint(&profile.features).then(|| {
                    format!("{} absent ⇒ features_none", feature_list(forbidden.iter()))
                })
            }
        }
    }
}

fn feature_list<'a>(features: impl Iterator<Item = &'a String>) -> String {
    features
        .map(|f| format!("feature '{}'", f))
        .collect::<Vec<_>>()
        .join(", ")
}

/// The conditions attached to one requirement, held in canonical
/// evaluation order. The logical AND of all members; empty means the
/// requirement applies to every profile.
///
/// Serializes to and from the catalog's JSON object form, e.g.
/// `{"min_seats": 30, "features_any": ["gas"]}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "ConditionSetRepr", into = "ConditionSetRepr")]
pub struct ConditionSet(Vec<Condition>);

impl ConditionSet {
    /// Build a set from arbitrary-order conditions; canonical order is
    /// restored so evaluation and reason order stay fixed.
    pub fn new(mut conditions: Vec<Condition>) -> Self {
        conditions.sort_by_key(|c| c.rank());
        Self(conditions)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Condition> {
        self.0.iter()
    }
}

impl From<Vec<Condition>> for ConditionSet {
    fn from(conditions: Vec<Condition>) -> Self {
        Self::new(conditions)
    }
}

/// Wire form of a condition set: one optional field per kind, unknown
/// keys rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConditionSetRepr {
    #[serde(skip_serializing_if = "Option::is_none")]
    size_any: Option<BTreeSet<BusinessSize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    min_seats: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_seats: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    min_area_sqm: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_area_sqm: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    min_staff: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_staff: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    features_any: Option<BTreeSet<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    features_all: Option<BTreeSet<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    features_none: Option<BTreeSet<String>>,
}

impl From<ConditionSetRepr> for ConditionSet {
    fn from(repr: ConditionSetRepr) -> Self {
        let mut conditions = Vec::new();
        if let Some(sizes) = repr.size_any {
            conditions.push(Condition::SizeAny(sizes));
        }
        if let Some(n) = repr.min_seats {
            conditions.push(Condition::MinSeats(n));
        }
        if let Some(n) = repr.max_seats {
            conditions.push(Condition::MaxSeats(n));
        }
        if let Some(n) = repr.min_area_sqm {
            conditions.push(Condition::MinArea(n));
        }
        if let Some(n) = repr.max_area_sqm {
            conditions.push(Condition::MaxArea(n));
        }
        if let Some(n) = repr.min_staff {
            conditions.push(Condition::MinStaff(n));
        }
        if let Some(n) = repr.max_staff {
            conditions.push(Condition::MaxStaff(n));
        }
        if let Some(features) = repr.features_any {
            conditions.push(Condition::FeaturesAny(features));
        }
        if let Some(features) = repr.features_all {
            conditions.push(Condition::FeaturesAll(features));
        }
        if let Some(features) = repr.features_none {
            conditions.push(Condition::FeaturesNone(features));
        }
        ConditionSet(conditions)
    }
}

impl From<ConditionSet> for ConditionSetRepr {
    fn from(set: ConditionSet) -> Self {
        let mut repr = ConditionSetRepr::default();
        for condition in set.0 {
            match condition {
                Condition::SizeAny(sizes) => repr.size_any = Some(sizes),
                Condition::MinSeats(n) => repr.min_seats = Some(n),
                Condition::MaxSeats(n) => repr.max_seats = Some(n),
                Condition::MinArea(n) => repr.min_area_sqm = Some(n),
                Condition::MaxArea(n) => repr.max_area_sqm = Some(n),
                Condition::MinStaff(n) => repr.min_staff = Some(n),
                Condition::MaxStaff(n) => repr.max_staff = Some(n),
                Condition::FeaturesAny(f) => repr.features_any = Some(f),
                Condition::FeaturesAll(f) => repr.features_all = Some(f),
                Condition::FeaturesNone(f) => repr.features_none = Some(f),
            }
        }
        repr
    }
}

/// Outcome of evaluating one condition set against a profile
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub matched: bool,
    pub reasons: Vec<String>,
}

/// Evaluate a condition set against a profile.
///
/// All present conditions must hold (logical AND). Reasons come out in the
/// fixed kind order size, min_seats, max_seats, min_area, max_area,
/// min_staff, max_staff, features_any, features_all, features_none; that
/// order is observable and relied on downstream. An empty set matches
/// everything with the single general-rule sentinel reason. Never fails:
/// an unsatisfiable set just evaluates to not matched.
pub fn evaluate(profile: &BusinessProfile, conditions: &ConditionSet) -> Evaluation {
    if conditions.is_empty() {
        return Evaluation {
            matched: true,
            reasons: vec![GENERAL_RULE_REASON.to_string()],
        };
    }

    let mut reasons = Vec::with_capacity(conditions.len());
    for condition in conditions.iter() {
        match condition.evaluate(profile) {
            Some(reason) => reasons.push(reason),
            None => {
                return Evaluation {
                    matched: false,
                    reasons: Vec::new(),
                }
            }
        }
    }

    Evaluation {
        matched: true,
        reasons,
    }
}
