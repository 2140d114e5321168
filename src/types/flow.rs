use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ActionRuleError;

/// Action categories known to the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    PreIssueAccessToken,
    PreUpdatePassword,
    PreUpdateProfile,
    PreRegistration,
    Authentication,
}

impl ActionType {
    pub const ALL: [ActionType; 5] = [
        ActionType::PreIssueAccessToken,
        ActionType::PreUpdatePassword,
        ActionType::PreUpdateProfile,
        ActionType::PreRegistration,
        ActionType::Authentication,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ActionType::PreIssueAccessToken => "PRE_ISSUE_ACCESS_TOKEN",
            ActionType::PreUpdatePassword => "PRE_UPDATE_PASSWORD",
            ActionType::PreUpdateProfile => "PRE_UPDATE_PROFILE",
            ActionType::PreRegistration => "PRE_REGISTRATION",
            ActionType::Authentication => "AUTHENTICATION",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown action types have no rule flow, so they fail the same way an
/// unmapped known type does.
impl FromStr for ActionType {
    type Err = ActionRuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ActionRuleError::NotImplemented {
                action_type: s.to_owned(),
            })
    }
}

/// The action category a rule is scoped to. Selects the field/operator vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FlowType {
    PreIssueAccessToken,
}

impl FlowType {
    pub const ALL: [FlowType; 1] = [FlowType::PreIssueAccessToken];

    /// Resolve the rule flow for an action type.
    ///
    /// # Errors
    ///
    /// Returns [`ActionRuleError::NotImplemented`] for action types that have
    /// no rule flow.
    pub fn for_action(action_type: ActionType) -> Result<Self, ActionRuleError> {
        match action_type {
            ActionType::PreIssueAccessToken => Ok(FlowType::PreIssueAccessToken),
            ActionType::PreUpdatePassword
            | ActionType::PreUpdateProfile
            | ActionType::PreRegistration
            | ActionType::Authentication => Err(ActionRuleError::NotImplemented {
                action_type: action_type.to_string(),
            }),
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FlowType::PreIssueAccessToken => "preIssueAccessToken",
        }
    }
}

impl fmt::Display for FlowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
