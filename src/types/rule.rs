use std::fmt;

use super::{Expression, RuleError};

/// An AND-group: every expression must hold.
///
/// Always holds at least one expression. Order is kept for display fidelity only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Conjunction {
    expressions: Vec<Expression>,
}

impl Conjunction {
    /// # Errors
    ///
    /// Returns [`RuleError::EmptyConjunction`] if `expressions` is empty.
    pub fn new(expressions: Vec<Expression>) -> Result<Self, RuleError> {
        if expressions.is_empty() {
            return Err(RuleError::EmptyConjunction);
        }
        Ok(Self { expressions })
    }

    #[must_use]
    pub fn expressions(&self) -> &[Expression] {
        &self.expressions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.expressions.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.expressions.is_empty()
    }
}

/// The canonical rule body: an OR of AND-groups (disjunctive normal form).
///
/// Always holds at least one [`Conjunction`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Disjunction {
    conjunctions: Vec<Conjunction>,
}

impl Disjunction {
    /// # Errors
    ///
    /// Returns [`RuleError::EmptyDisjunction`] if `conjunctions` is empty.
    pub fn new(conjunctions: Vec<Conjunction>) -> Result<Self, RuleError> {
        if conjunctions.is_empty() {
            return Err(RuleError::EmptyDisjunction);
        }
        Ok(Self { conjunctions })
    }

    #[must_use]
    pub fn conjunctions(&self) -> &[Conjunction] {
        &self.conjunctions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.conjunctions.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conjunctions.is_empty()
    }

    /// Total number of expressions across all AND-groups.
    #[must_use]
    pub fn expression_count(&self) -> usize {
        self.conjunctions.iter().map(Conjunction::len).sum()
    }
}

impl fmt::Display for Conjunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, expr) in self.expressions.iter().enumerate() {
            if i > 0 {
                f.write_str(" and ")?;
            }
            write!(f, "{expr}")?;
        }
        Ok(())
    }
}

/// Renders the text notation accepted by [`crate::parse::parse`].
impl fmt::Display for Disjunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, group) in self.conjunctions.iter().enumerate() {
            if i > 0 {
                f.write_str(" or ")?;
            }
            write!(f, "{group}")?;
        }
        Ok(())
    }
}
