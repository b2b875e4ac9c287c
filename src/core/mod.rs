// Core algorithm exports
pub mod conditions;
pub mod matcher;

pub use conditions::{evaluate, Condition, ConditionSet, Evaluation, GENERAL_RULE_REASON};
pub use matcher::{match_requirements, Matcher};
