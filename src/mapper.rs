//! Conversion between the wire rule tree and [`ActionRule`].
//!
//! Inbound, an [`OrRule`] is validated, flattened into builder instructions and
//! assembled by a [`RuleBuilder`]. Outbound, an [`ActionRule`] is expanded back
//! into the same tree with conjunction and expression order preserved.
//!
//! Every failure leaving this module is an [`ActionRuleError`]; use
//! [`ActionRuleError::kind`] to tell client, not-implemented and server
//! failures apart.

use tracing::{debug, warn};

use crate::builder::{expression_groups, feed};
use crate::registry::RuleRegistry;
use crate::wire::{AndRule, OrRule, WireExpression};
use crate::{ActionRule, ActionRuleError, ActionType, Expression, FlowType, RuleBuilder};

/// Convert a rule to its wire tree. `None` means the action has no rule.
#[must_use]
pub fn to_wire(action_rule: &ActionRule) -> Option<OrRule> {
    let rule = action_rule.rule()?;
    let rules = rule
        .conjunctions()
        .iter()
        .map(|conjunction| {
            AndRule::new(
                conjunction
                    .expressions()
                    .iter()
                    .map(|expr| {
                        WireExpression::new(expr.field(), expr.operator().as_str(), expr.value())
                    })
                    .collect(),
            )
        })
        .collect();
    Some(OrRule::new(rules))
}

/// Convert a wire tree into a rule for `action_type` within `tenant`.
///
/// An absent or empty `rules` list yields [`ActionRule::without_rule`] without
/// touching the registry.
///
/// # Errors
///
/// Returns [`ActionRuleError`] if the action type has no rule flow, the tree is
/// invalid, or the registry cannot serve a vocabulary.
pub fn to_action_rule<R: RuleRegistry + ?Sized>(
    request: &OrRule,
    action_type: ActionType,
    tenant: &str,
    registry: &R,
) -> Result<ActionRule, ActionRuleError> {
    let and_rules = match request.rules.as_deref() {
        Some(rules) if !rules.is_empty() => rules,
        _ => {
            debug!(action_type = %action_type, tenant, "no rule in request");
            return Ok(ActionRule::without_rule());
        }
    };

    let flow_type = FlowType::for_action(action_type)?;
    let groups = expression_groups(and_rules.iter().map(|and_rule| {
        and_rule
            .expressions
            .iter()
            .map(|e| (e.field.as_str(), e.operator.as_str(), e.value.as_str()))
    }))?;
    assemble(groups, flow_type, tenant, registry)
}

/// Parse a JSON request body and convert it with [`to_action_rule`].
///
/// # Errors
///
/// Returns [`ActionRuleError::Malformed`] for JSON that does not match the wire
/// shape, otherwise as [`to_action_rule`].
pub fn from_json<R: RuleRegistry + ?Sized>(
    input: &str,
    action_type: ActionType,
    tenant: &str,
    registry: &R,
) -> Result<ActionRule, ActionRuleError> {
    let request: OrRule = serde_json::from_str(input)?;
    to_action_rule(&request, action_type, tenant, registry)
}

/// Render the JSON response body for a rule, or `None` if there is no rule.
///
/// # Errors
///
/// Returns [`ActionRuleError::Encode`] if serialization fails.
pub fn to_json(action_rule: &ActionRule) -> Result<Option<String>, ActionRuleError> {
    to_wire(action_rule)
        .map(|tree| serde_json::to_string(&tree).map_err(ActionRuleError::Encode))
        .transpose()
}

/// Convert rule notation (see [`crate::parse`]) into a rule. Input with no
/// groups yields [`ActionRule::without_rule`].
///
/// # Errors
///
/// Returns [`ActionRuleError::Parse`] for invalid notation, otherwise as
/// [`to_action_rule`].
pub fn from_dsl<R: RuleRegistry + ?Sized>(
    input: &str,
    action_type: ActionType,
    tenant: &str,
    registry: &R,
) -> Result<ActionRule, ActionRuleError> {
    let parsed = crate::parse::parse(input)?;
    if parsed.groups.is_empty() {
        debug!(action_type = %action_type, tenant, "no rule in notation");
        return Ok(ActionRule::without_rule());
    }
    let flow_type = FlowType::for_action(action_type)?;
    let groups = parsed.expressions()?;
    assemble(groups, flow_type, tenant, registry)
}

fn assemble<R: RuleRegistry + ?Sized>(
    groups: Vec<Vec<Expression>>,
    flow_type: FlowType,
    tenant: &str,
    registry: &R,
) -> Result<ActionRule, ActionRuleError> {
    let builder = RuleBuilder::create(flow_type, tenant, registry).map_err(|err| {
        warn!(error = %err, flow_type = %flow_type, tenant, "failed to initialize rule builder");
        ActionRuleError::from(err)
    })?;
    let rule = feed(builder, groups)?.build()?;
    Ok(ActionRule::with_rule(rule, flow_type, tenant))
}
