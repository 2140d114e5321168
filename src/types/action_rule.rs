use super::{Disjunction, FlowType};

/// The condition attached to an action.
///
/// `Unconditional` means the action has no gating and always fires. It is a
/// distinct state from any rule body; an empty rule body is never constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActionRule {
    Unconditional,
    Conditional {
        rule: Disjunction,
        flow_type: FlowType,
        tenant: String,
    },
}

impl ActionRule {
    #[must_use]
    pub fn with_rule(rule: Disjunction, flow_type: FlowType, tenant: impl Into<String>) -> Self {
        ActionRule::Conditional {
            rule,
            flow_type,
            tenant: tenant.into(),
        }
    }

    #[must_use]
    pub fn without_rule() -> Self {
        ActionRule::Unconditional
    }

    #[must_use]
    pub fn rule(&self) -> Option<&Disjunction> {
        match self {
            ActionRule::Conditional { rule, .. } => Some(rule),
            ActionRule::Unconditional => None,
        }
    }

    #[must_use]
    pub fn flow_type(&self) -> Option<FlowType> {
        match self {
            ActionRule::Conditional { flow_type, .. } => Some(*flow_type),
            ActionRule::Unconditional => None,
        }
    }

    #[must_use]
    pub fn tenant(&self) -> Option<&str> {
        match self {
            ActionRule::Conditional { tenant, .. } => Some(tenant),
            ActionRule::Unconditional => None,
        }
    }

    #[must_use]
    pub fn is_conditional(&self) -> bool {
        matches!(self, ActionRule::Conditional { .. })
    }
}
