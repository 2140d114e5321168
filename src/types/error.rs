use thiserror::Error;

use super::{FlowType, Operator};

/// Validation failures raised while constructing or assembling a rule.
///
/// Location wrappers ([`RuleError::AndRule`], [`RuleError::Expression`]) point at
/// the offending node by zero-based position; [`RuleError::root`] strips them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("expression {attribute} must not be empty")]
    MissingAttribute { attribute: &'static str },

    #[error("unknown operator '{operator}'")]
    UnknownOperator { operator: String },

    #[error("AND rule must contain at least one expression")]
    EmptyConjunction,

    #[error("rule must contain at least one AND rule")]
    EmptyDisjunction,

    #[error("OR condition leaves AND rule {group} without expressions")]
    DanglingOrCondition { group: usize },

    #[error("field '{field}' is not supported for flow '{flow_type}'")]
    UnknownField { field: String, flow_type: FlowType },

    #[error("operator '{operator}' is not supported for field '{field}' in flow '{flow_type}'")]
    UnsupportedOperator {
        field: String,
        operator: Operator,
        flow_type: FlowType,
    },

    #[error("AND rule {group}: {source}")]
    AndRule {
        group: usize,
        source: Box<RuleError>,
    },

    #[error("expression {index} of AND rule {group}: {source}")]
    Expression {
        group: usize,
        index: usize,
        source: Box<RuleError>,
    },
}

impl RuleError {
    pub(crate) fn in_group(self, group: usize) -> Self {
        RuleError::AndRule {
            group,
            source: Box::new(self),
        }
    }

    pub(crate) fn at(self, group: usize, index: usize) -> Self {
        RuleError::Expression {
            group,
            index,
            source: Box::new(self),
        }
    }

    /// The underlying failure with all location wrappers removed.
    #[must_use]
    pub fn root(&self) -> &RuleError {
        match self {
            RuleError::AndRule { source, .. } | RuleError::Expression { source, .. } => {
                source.root()
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_attribute_message() {
        let err = RuleError::MissingAttribute { attribute: "field" };
        assert_eq!(err.to_string(), "expression field must not be empty");
    }

    #[test]
    fn unknown_operator_message() {
        let err = RuleError::UnknownOperator {
            operator: "approximately".into(),
        };
        assert_eq!(err.to_string(), "unknown operator 'approximately'");
    }

    #[test]
    fn empty_groups_have_distinct_messages() {
        assert_eq!(
            RuleError::EmptyConjunction.to_string(),
            "AND rule must contain at least one expression"
        );
        assert_eq!(
            RuleError::EmptyDisjunction.to_string(),
            "rule must contain at least one AND rule"
        );
    }

    #[test]
    fn unsupported_operator_message() {
        let err = RuleError::UnsupportedOperator {
            field: "grantType".into(),
            operator: Operator::GreaterThan,
            flow_type: FlowType::PreIssueAccessToken,
        };
        assert_eq!(
            err.to_string(),
            "operator 'greaterThan' is not supported for field 'grantType' in flow 'preIssueAccessToken'"
        );
    }

    #[test]
    fn located_message_names_the_node() {
        let err = RuleError::MissingAttribute { attribute: "value" }.at(1, 2);
        assert_eq!(
            err.to_string(),
            "expression 2 of AND rule 1: expression value must not be empty"
        );

        let err = RuleError::EmptyConjunction.in_group(3);
        assert_eq!(
            err.to_string(),
            "AND rule 3: AND rule must contain at least one expression"
        );
    }

    #[test]
    fn root_strips_wrappers() {
        let err = RuleError::UnknownOperator {
            operator: "like".into(),
        }
        .at(0, 4)
        .in_group(0);
        assert_eq!(
            err.root(),
            &RuleError::UnknownOperator {
                operator: "like".into()
            }
        );
    }
}
