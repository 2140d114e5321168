use crate::builder::expression_groups;
use crate::{Expression, RuleError};

/// One `field operator "value"` term exactly as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedExpression {
    pub field: String,
    pub operator: String,
    pub value: String,
}

/// The result of parsing rule notation: AND-groups in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedRule {
    pub groups: Vec<Vec<ParsedExpression>>,
}

impl ParsedRule {
    /// Validate every term, locating failures by group and position.
    ///
    /// # Errors
    ///
    /// Returns a located [`RuleError`] for the first invalid term.
    pub fn expressions(&self) -> Result<Vec<Vec<Expression>>, RuleError> {
        expression_groups(self.groups.iter().map(|group| {
            group
                .iter()
                .map(|e| (e.field.as_str(), e.operator.as_str(), e.value.as_str()))
        }))
    }
}
