use tracing::debug;

use crate::registry::{RegistryError, RuleRegistry, Vocabulary};
use crate::{Conjunction, Disjunction, Expression, FlowType, RuleError};

/// Incrementally assembles a [`Disjunction`] from a flat instruction stream.
///
/// Expressions accumulate in the open AND-group until [`add_or_condition`]
/// closes it. [`build`] closes the last group, checks every expression against
/// the vocabulary, and consumes the builder.
///
/// # Example
///
/// ```
/// use action_rules::{field, FlowType, RuleBuilder, StaticRegistry};
///
/// let rule = RuleBuilder::create(FlowType::PreIssueAccessToken, "carbon.super", &StaticRegistry::default())
///     .unwrap()
///     .add_and_expression(field("application").equals("app-1").unwrap())
///     .add_and_expression(field("grantType").equals("authorization_code").unwrap())
///     .add_or_condition()
///     .unwrap()
///     .add_and_expression(field("grantType").equals("client_credentials").unwrap())
///     .build()
///     .unwrap();
/// assert_eq!(rule.len(), 2);
/// ```
///
/// [`add_or_condition`]: RuleBuilder::add_or_condition
/// [`build`]: RuleBuilder::build
#[derive(Debug)]
#[must_use]
pub struct RuleBuilder {
    flow_type: FlowType,
    tenant: String,
    vocabulary: Vocabulary,
    open: Vec<Expression>,
    closed: Vec<Conjunction>,
}

impl RuleBuilder {
    /// Bind a builder to the vocabulary for `flow_type` within `tenant`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if the registry cannot serve that vocabulary.
    pub fn create<R: RuleRegistry + ?Sized>(
        flow_type: FlowType,
        tenant: &str,
        registry: &R,
    ) -> Result<Self, RegistryError> {
        let vocabulary = registry.vocabulary(flow_type, tenant)?;
        debug!(
            flow_type = %flow_type,
            tenant,
            fields = vocabulary.len(),
            "rule builder created"
        );
        Ok(Self {
            flow_type,
            tenant: tenant.to_owned(),
            vocabulary,
            open: Vec::new(),
            closed: Vec::new(),
        })
    }

    #[must_use]
    pub fn flow_type(&self) -> FlowType {
        self.flow_type
    }

    #[must_use]
    pub fn tenant(&self) -> &str {
        &self.tenant
    }

    /// Append an expression to the open AND-group.
    pub fn add_and_expression(mut self, expr: Expression) -> Self {
        self.open.push(expr);
        self
    }

    /// Close the open AND-group and start a new one.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::DanglingOrCondition`] if the open group is empty,
    /// i.e. the call comes before any expression or directly after another
    /// OR condition.
    pub fn add_or_condition(mut self) -> Result<Self, RuleError> {
        self.close_group()?;
        Ok(self)
    }

    /// Finish the rule.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::EmptyDisjunction`] if nothing was added,
    /// [`RuleError::DanglingOrCondition`] if the last OR condition was never
    /// followed by an expression, or a located [`RuleError::Expression`] if an
    /// expression is outside the vocabulary.
    pub fn build(mut self) -> Result<Disjunction, RuleError> {
        if !self.open.is_empty() || !self.closed.is_empty() {
            self.close_group()?;
        }
        for (group, conjunction) in self.closed.iter().enumerate() {
            for (index, expr) in conjunction.expressions().iter().enumerate() {
                self.vocabulary
                    .check(expr, self.flow_type)
                    .map_err(|e| e.at(group, index))?;
            }
        }
        let rule = Disjunction::new(self.closed)?;
        debug!(
            flow_type = %self.flow_type,
            tenant = %self.tenant,
            groups = rule.len(),
            expressions = rule.expression_count(),
            "rule built"
        );
        Ok(rule)
    }

    fn close_group(&mut self) -> Result<(), RuleError> {
        if self.open.is_empty() {
            return Err(RuleError::DanglingOrCondition {
                group: self.closed.len(),
            });
        }
        let group = std::mem::take(&mut self.open);
        self.closed.push(Conjunction::new(group)?);
        Ok(())
    }
}

/// Feed pre-grouped expressions into a builder: an OR condition goes before
/// every group but the first, so `N` groups issue `N - 1` OR conditions.
pub(crate) fn feed(
    mut builder: RuleBuilder,
    groups: Vec<Vec<Expression>>,
) -> Result<RuleBuilder, RuleError> {
    for (i, group) in groups.into_iter().enumerate() {
        if i > 0 {
            builder = builder.add_or_condition()?;
        }
        for expr in group {
            builder = builder.add_and_expression(expr);
        }
    }
    Ok(builder)
}

/// Validate `(field, operator, value)` triples grouped by AND-group, locating
/// any failure by group and expression index.
pub(crate) fn expression_groups<'a, G, E>(groups: G) -> Result<Vec<Vec<Expression>>, RuleError>
where
    G: IntoIterator<Item = E>,
    E: IntoIterator<Item = (&'a str, &'a str, &'a str)>,
{
    let mut out = Vec::new();
    for (group, triples) in groups.into_iter().enumerate() {
        let exprs = triples
            .into_iter()
            .enumerate()
            .map(|(index, (field, operator, value))| {
                Expression::parse(field, operator, value).map_err(|e| e.at(group, index))
            })
            .collect::<Result<Vec<_>, _>>()?;
        if exprs.is_empty() {
            return Err(RuleError::EmptyConjunction.in_group(group));
        }
        out.push(exprs);
    }
    Ok(out)
}
