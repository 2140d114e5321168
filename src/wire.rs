//! JSON request/response shapes for action rules.
//!
//! ```json
//! {
//!   "condition": "OR",
//!   "rules": [
//!     { "condition": "AND",
//!       "expressions": [ { "field": "application", "operator": "equals", "value": "app-1" } ] }
//!   ]
//! }
//! ```
//!
//! Requests and responses share these types. An absent or empty `rules` list
//! on a request means "no conditional rule"; responses for an unconditional
//! action carry no rule object at all.

use serde::{Deserialize, Serialize};

/// Tag carried by the top-level rule object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OrCondition {
    #[default]
    #[serde(rename = "OR")]
    Or,
}

/// Tag carried by each AND-group object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AndCondition {
    #[default]
    #[serde(rename = "AND")]
    And,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OrRule {
    pub condition: OrCondition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<AndRule>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AndRule {
    pub condition: AndCondition,
    #[serde(default)]
    pub expressions: Vec<WireExpression>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WireExpression {
    pub field: String,
    pub operator: String,
    pub value: String,
}

impl OrRule {
    #[must_use]
    pub fn new(rules: Vec<AndRule>) -> Self {
        Self {
            condition: OrCondition::Or,
            rules: Some(rules),
        }
    }
}

impl AndRule {
    #[must_use]
    pub fn new(expressions: Vec<WireExpression>) -> Self {
        Self {
            condition: AndCondition::And,
            expressions,
        }
    }
}

impl WireExpression {
    #[must_use]
    pub fn new(field: &str, operator: &str, value: &str) -> Self {
        Self {
            field: field.to_owned(),
            operator: operator.to_owned(),
            value: value.to_owned(),
        }
    }
}
