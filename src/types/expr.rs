use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::RuleError;

/// Operators an expression may apply. The wire token is the camelCase name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operator {
    Equals,
    NotEquals,
    Contains,
    In,
    NotIn,
    GreaterThan,
    GreaterThanOrEquals,
    LessThan,
    LessThanOrEquals,
}

impl Operator {
    pub const ALL: [Operator; 9] = [
        Operator::Equals,
        Operator::NotEquals,
        Operator::Contains,
        Operator::In,
        Operator::NotIn,
        Operator::GreaterThan,
        Operator::GreaterThanOrEquals,
        Operator::LessThan,
        Operator::LessThanOrEquals,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Equals => "equals",
            Operator::NotEquals => "notEquals",
            Operator::Contains => "contains",
            Operator::In => "in",
            Operator::NotIn => "notIn",
            Operator::GreaterThan => "greaterThan",
            Operator::GreaterThanOrEquals => "greaterThanOrEquals",
            Operator::LessThan => "lessThan",
            Operator::LessThanOrEquals => "lessThanOrEquals",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| RuleError::UnknownOperator {
                operator: s.to_owned(),
            })
    }
}

/// An atomic `field operator value` predicate.
///
/// The value is kept as the literal string it arrived as; interpreting it is
/// left to whatever evaluates the rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Expression {
    field: String,
    operator: Operator,
    value: String,
}

impl Expression {
    /// Create an expression from a typed operator.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::MissingAttribute`] if `field` is blank or `value`
    /// is empty.
    pub fn new(
        field: impl Into<String>,
        operator: Operator,
        value: impl Into<String>,
    ) -> Result<Self, RuleError> {
        let field = field.into();
        if field.trim().is_empty() {
            return Err(RuleError::MissingAttribute { attribute: "field" });
        }
        let value = value.into();
        if value.is_empty() {
            return Err(RuleError::MissingAttribute { attribute: "value" });
        }
        Ok(Self {
            field,
            operator,
            value,
        })
    }

    /// Create an expression from its three wire strings.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::MissingAttribute`] naming the first blank attribute,
    /// or [`RuleError::UnknownOperator`] if `operator` is not in the vocabulary.
    pub fn parse(field: &str, operator: &str, value: &str) -> Result<Self, RuleError> {
        if field.trim().is_empty() {
            return Err(RuleError::MissingAttribute { attribute: "field" });
        }
        if operator.trim().is_empty() {
            return Err(RuleError::MissingAttribute {
                attribute: "operator",
            });
        }
        let operator = operator.parse()?;
        Self::new(field, operator, value)
    }

    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    #[must_use]
    pub fn operator(&self) -> Operator {
        self.operator
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if is_identifier(&self.field) {
            f.write_str(&self.field)?;
        } else {
            write_quoted(f, &self.field)?;
        }
        write!(f, " {} ", self.operator)?;
        write_quoted(f, &self.value)
    }
}

/// Whether `name` can appear bare in rule notation; anything else is quoted.
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            c => write!(f, "{c}")?,
        }
    }
    f.write_str("\"")
}

/// Intermediate builder for expressions on one field.
/// Created by [`field()`]; each operator method yields a validated [`Expression`].
#[derive(Debug, Clone)]
pub struct FieldExpr {
    name: String,
}

impl FieldExpr {
    /// # Errors
    ///
    /// Returns [`RuleError::MissingAttribute`] if the field name is blank or the value is empty.
    pub fn op(self, operator: Operator, value: impl Into<String>) -> Result<Expression, RuleError> {
        Expression::new(self.name, operator, value)
    }

    /// # Errors
    ///
    /// See [`FieldExpr::op`].
    pub fn equals(self, value: impl Into<String>) -> Result<Expression, RuleError> {
        self.op(Operator::Equals, value)
    }

    /// # Errors
    ///
    /// See [`FieldExpr::op`].
    pub fn not_equals(self, value: impl Into<String>) -> Result<Expression, RuleError> {
        self.op(Operator::NotEquals, value)
    }

    /// # Errors
    ///
    /// See [`FieldExpr::op`].
    pub fn greater_than(self, value: impl Into<String>) -> Result<Expression, RuleError> {
        self.op(Operator::GreaterThan, value)
    }

    /// # Errors
    ///
    /// See [`FieldExpr::op`].
    pub fn less_than(self, value: impl Into<String>) -> Result<Expression, RuleError> {
        self.op(Operator::LessThan, value)
    }
}

#[must_use]
pub fn field(name: &str) -> FieldExpr {
    FieldExpr {
        name: name.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_equals() {
        let expr = field("application").equals("app-1").unwrap();
        assert_eq!(expr.field(), "application");
        assert_eq!(expr.operator(), Operator::Equals);
        assert_eq!(expr.value(), "app-1");
    }

    #[test]
    fn structural_equality() {
        let a = Expression::new("grantType", Operator::NotEquals, "password").unwrap();
        let b = field("grantType").not_equals("password").unwrap();
        assert_eq!(a, b);
        let c = field("grantType").equals("password").unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn blank_field_rejected() {
        assert_eq!(
            Expression::new("", Operator::Equals, "x"),
            Err(RuleError::MissingAttribute { attribute: "field" })
        );
        assert_eq!(
            Expression::new("   ", Operator::Equals, "x"),
            Err(RuleError::MissingAttribute { attribute: "field" })
        );
    }

    #[test]
    fn empty_value_rejected() {
        assert_eq!(
            field("application").equals(""),
            Err(RuleError::MissingAttribute { attribute: "value" })
        );
    }

    #[test]
    fn whitespace_value_kept() {
        let expr = field("application").equals(" ").unwrap();
        assert_eq!(expr.value(), " ");
    }

    #[test]
    fn parse_names_first_missing_attribute() {
        assert_eq!(
            Expression::parse("", "", ""),
            Err(RuleError::MissingAttribute { attribute: "field" })
        );
        assert_eq!(
            Expression::parse("application", "", ""),
            Err(RuleError::MissingAttribute {
                attribute: "operator"
            })
        );
        assert_eq!(
            Expression::parse("application", "equals", ""),
            Err(RuleError::MissingAttribute { attribute: "value" })
        );
    }

    #[test]
    fn parse_rejects_unknown_operator() {
        assert_eq!(
            Expression::parse("application", "EQUALS", "app-1"),
            Err(RuleError::UnknownOperator {
                operator: "EQUALS".into()
            })
        );
    }

    #[test]
    fn operator_tokens_round_trip() {
        for op in Operator::ALL {
            assert_eq!(op.to_string().parse::<Operator>(), Ok(op));
        }
    }

    #[test]
    fn operator_serde_matches_display() {
        for op in Operator::ALL {
            let json = serde_json::to_string(&op).unwrap();
            assert_eq!(json, format!("\"{op}\""));
        }
    }

    #[test]
    fn value_is_not_coerced() {
        let expr = field("riskScore").greater_than("080").unwrap();
        assert_eq!(expr.value(), "080");
    }

    #[test]
    fn display_escapes_value() {
        let expr = field("note").equals("say \"hi\"\\now").unwrap();
        assert_eq!(expr.to_string(), r#"note equals "say \"hi\"\\now""#);
    }

    #[test]
    fn display_quotes_non_identifier_field() {
        let expr = field("user-agent").equals("curl").unwrap();
        assert_eq!(expr.to_string(), r#""user-agent" equals "curl""#);
        let expr = field(" padded \"name\"").equals("x").unwrap();
        assert_eq!(expr.to_string(), r#"" padded \"name\"" equals "x""#);
        let expr = field("user.roles").equals("x").unwrap();
        assert_eq!(expr.to_string(), r#"user.roles equals "x""#);
    }
}
