//! Field/operator vocabularies and the registry a [`RuleBuilder`](crate::RuleBuilder)
//! is constructed from.
//!
//! A [`Vocabulary`] lists which fields a rule may test for one flow and
//! tenant, and which operators are legal on each field. [`StaticRegistry`]
//! serves vocabularies from built-in defaults, optionally overridden by a
//! TOML document:
//!
//! ```toml
//! [[flows]]
//! flow = "preIssueAccessToken"
//! [[flows.fields]]
//! name = "application"
//! operators = ["equals", "notEquals"]
//!
//! [tenants."acme.com"]
//! unavailable = false
//! [[tenants."acme.com".fields]]
//! name = "riskScore"
//! operators = ["greaterThan", "lessThan"]
//!
//! [tenants."globex.com"]
//! [[tenants."globex.com".flows]]
//! flow = "preIssueAccessToken"
//! [[tenants."globex.com".flows.fields]]
//! name = "scope"
//! operators = ["contains"]
//! ```
//!
//! Tenant `fields` extend every flow for that tenant; tenant `flows` extend
//! only the flow they name.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::{Expression, FlowType, Operator, RuleError};

/// Failures acquiring a vocabulary. These are infrastructure problems, not
/// problems with the rule being built.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("rule vocabulary for flow '{flow_type}' is unavailable for tenant '{tenant}'")]
    Unavailable { flow_type: FlowType, tenant: String },

    #[error("invalid registry configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Source of vocabularies keyed by flow type and tenant.
pub trait RuleRegistry {
    /// Look up the vocabulary for a flow within a tenant.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if no vocabulary can be served for the pair.
    fn vocabulary(&self, flow_type: FlowType, tenant: &str) -> Result<Vocabulary, RegistryError>;
}

impl<R: RuleRegistry + ?Sized> RuleRegistry for &R {
    fn vocabulary(&self, flow_type: FlowType, tenant: &str) -> Result<Vocabulary, RegistryError> {
        (**self).vocabulary(flow_type, tenant)
    }
}

/// Maps field names to the operators legal on them, in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    index: HashMap<String, usize>,
    fields: Vec<(String, Vec<Operator>)>,
}

impl Vocabulary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a field, returning its index. Registering a known field adds
    /// any operators it does not already allow and keeps the existing index.
    pub fn register(&mut self, field: &str, operators: impl IntoIterator<Item = Operator>) -> usize {
        let idx = match self.index.get(field) {
            Some(&idx) => idx,
            None => {
                let idx = self.fields.len();
                self.index.insert(field.to_owned(), idx);
                self.fields.push((field.to_owned(), Vec::new()));
                idx
            }
        };
        let allowed = &mut self.fields[idx].1;
        for op in operators {
            if !allowed.contains(&op) {
                allowed.push(op);
            }
        }
        idx
    }

    #[must_use]
    pub fn with_field(mut self, field: &str, operators: impl IntoIterator<Item = Operator>) -> Self {
        self.register(field, operators);
        self
    }

    /// Operators allowed on a field, or `None` if the field is unknown.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[Operator]> {
        self.index
            .get(field)
            .map(|&idx| self.fields[idx].1.as_slice())
    }

    #[must_use]
    pub fn permits(&self, field: &str, operator: Operator) -> bool {
        self.get(field).is_some_and(|ops| ops.contains(&operator))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Operator])> {
        self.fields
            .iter()
            .map(|(name, ops)| (name.as_str(), ops.as_slice()))
    }

    pub(crate) fn check(&self, expr: &Expression, flow_type: FlowType) -> Result<(), RuleError> {
        let Some(allowed) = self.get(expr.field()) else {
            return Err(RuleError::UnknownField {
                field: expr.field().to_owned(),
                flow_type,
            });
        };
        if !allowed.contains(&expr.operator()) {
            return Err(RuleError::UnsupportedOperator {
                field: expr.field().to_owned(),
                operator: expr.operator(),
                flow_type,
            });
        }
        Ok(())
    }
}

/// Top-level shape of a registry TOML document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    #[serde(default)]
    pub flows: Vec<FlowConfig>,
    #[serde(default)]
    pub tenants: HashMap<String, TenantConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlowConfig {
    pub flow: FlowType,
    #[serde(default)]
    pub fields: Vec<FieldConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldConfig {
    pub name: String,
    pub operators: Vec<Operator>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TenantConfig {
    /// Marks the tenant's vocabulary store as down; every lookup fails.
    #[serde(default)]
    pub unavailable: bool,
    /// Fields added on top of every flow's defaults for this tenant.
    #[serde(default)]
    pub fields: Vec<FieldConfig>,
    /// Fields added on top of one flow's defaults for this tenant.
    #[serde(default)]
    pub flows: Vec<FlowConfig>,
}

/// In-process [`RuleRegistry`] backed by flow defaults plus per-tenant extensions.
#[derive(Debug, Clone)]
pub struct StaticRegistry {
    flows: HashMap<FlowType, Vocabulary>,
    tenant_fields: HashMap<(String, FlowType), Vocabulary>,
    unavailable: HashSet<String>,
}

impl Default for StaticRegistry {
    /// Built-in vocabulary: access-token issuance may be gated on the
    /// requesting application and the grant type.
    fn default() -> Self {
        let pre_issue = Vocabulary::new()
            .with_field("application", [Operator::Equals, Operator::NotEquals])
            .with_field("grantType", [Operator::Equals, Operator::NotEquals]);
        Self {
            flows: HashMap::from([(FlowType::PreIssueAccessToken, pre_issue)]),
            tenant_fields: HashMap::new(),
            unavailable: HashSet::new(),
        }
    }
}

impl StaticRegistry {
    /// A registry serving no vocabulary for any flow.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            flows: HashMap::new(),
            tenant_fields: HashMap::new(),
            unavailable: HashSet::new(),
        }
    }

    /// Apply a parsed configuration on top of the built-in defaults.
    /// A flow listed in the configuration replaces that flow's default fields.
    #[must_use]
    pub fn from_config(config: RegistryConfig) -> Self {
        let mut registry = Self::default();
        for flow in config.flows {
            let mut vocabulary = Vocabulary::new();
            for f in flow.fields {
                vocabulary.register(&f.name, f.operators);
            }
            registry.flows.insert(flow.flow, vocabulary);
        }
        for (tenant, tenant_config) in config.tenants {
            if tenant_config.unavailable {
                registry.unavailable.insert(tenant.clone());
            }
            for f in tenant_config.fields {
                for flow_type in FlowType::ALL {
                    registry = registry.with_tenant_field(
                        &tenant,
                        flow_type,
                        &f.name,
                        f.operators.iter().copied(),
                    );
                }
            }
            for flow in tenant_config.flows {
                for f in flow.fields {
                    registry = registry.with_tenant_field(&tenant, flow.flow, &f.name, f.operators);
                }
            }
        }
        registry
    }

    /// Parse a TOML registry document.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Config`] if the document is not valid.
    pub fn from_toml(input: &str) -> Result<Self, RegistryError> {
        let config: RegistryConfig =
            toml::from_str(input).map_err(|e| RegistryError::Config(e.to_string()))?;
        Ok(Self::from_config(config))
    }

    /// Read and parse a TOML registry file.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] on I/O or configuration failure.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let input = std::fs::read_to_string(path)?;
        Self::from_toml(&input)
    }

    /// Allow a field for every tenant of a flow.
    #[must_use]
    pub fn with_field(
        mut self,
        flow_type: FlowType,
        field: &str,
        operators: impl IntoIterator<Item = Operator>,
    ) -> Self {
        self.flows
            .entry(flow_type)
            .or_default()
            .register(field, operators);
        self
    }

    /// Allow a field for one tenant of a flow, on top of the flow defaults.
    #[must_use]
    pub fn with_tenant_field(
        mut self,
        tenant: &str,
        flow_type: FlowType,
        field: &str,
        operators: impl IntoIterator<Item = Operator>,
    ) -> Self {
        self.tenant_fields
            .entry((tenant.to_owned(), flow_type))
            .or_default()
            .register(field, operators);
        self
    }

    /// Make every lookup for `tenant` fail with [`RegistryError::Unavailable`].
    #[must_use]
    pub fn with_unavailable_tenant(mut self, tenant: &str) -> Self {
        self.unavailable.insert(tenant.to_owned());
        self
    }
}

impl RuleRegistry for StaticRegistry {
    fn vocabulary(&self, flow_type: FlowType, tenant: &str) -> Result<Vocabulary, RegistryError> {
        let unavailable = || RegistryError::Unavailable {
            flow_type,
            tenant: tenant.to_owned(),
        };
        if self.unavailable.contains(tenant) {
            return Err(unavailable());
        }
        let mut vocabulary = self.flows.get(&flow_type).cloned().ok_or_else(unavailable)?;
        if let Some(extra) = self.tenant_fields.get(&(tenant.to_owned(), flow_type)) {
            for (field, ops) in extra.iter() {
                vocabulary.register(field, ops.iter().copied());
            }
        }
        Ok(vocabulary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field;

    const TENANT: &str = "carbon.super";

    #[test]
    fn register_and_get() {
        let mut vocab = Vocabulary::new();
        let idx = vocab.register("application", [Operator::Equals]);
        assert_eq!(idx, 0);
        assert_eq!(vocab.get("application"), Some(&[Operator::Equals][..]));
    }

    #[test]
    fn duplicate_register_merges_operators() {
        let mut vocab = Vocabulary::new();
        let a = vocab.register("application", [Operator::Equals]);
        let b = vocab.register("application", [Operator::NotEquals, Operator::Equals]);
        assert_eq!(a, b);
        assert_eq!(vocab.len(), 1);
        assert_eq!(
            vocab.get("application"),
            Some(&[Operator::Equals, Operator::NotEquals][..])
        );
    }

    #[test]
    fn iteration_follows_registration_order() {
        let vocab = Vocabulary::new()
            .with_field("grantType", [Operator::Equals])
            .with_field("application", [Operator::Equals]);
        let names: Vec<&str> = vocab.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["grantType", "application"]);
    }

    #[test]
    fn get_missing_returns_none() {
        let vocab = Vocabulary::new();
        assert!(vocab.is_empty());
        assert_eq!(vocab.get("application"), None);
        assert!(!vocab.permits("application", Operator::Equals));
    }

    #[test]
    fn check_reports_unknown_field() {
        let vocab = Vocabulary::new().with_field("application", [Operator::Equals]);
        let expr = field("riskScore").greater_than("80").unwrap();
        assert_eq!(
            vocab.check(&expr, FlowType::PreIssueAccessToken),
            Err(RuleError::UnknownField {
                field: "riskScore".into(),
                flow_type: FlowType::PreIssueAccessToken,
            })
        );
    }

    #[test]
    fn check_reports_unsupported_operator() {
        let vocab = Vocabulary::new().with_field("application", [Operator::Equals]);
        let expr = field("application").not_equals("app-1").unwrap();
        assert!(matches!(
            vocab.check(&expr, FlowType::PreIssueAccessToken),
            Err(RuleError::UnsupportedOperator { operator: Operator::NotEquals, .. })
        ));
    }

    #[test]
    fn default_registry_serves_pre_issue_fields() {
        let vocab = StaticRegistry::default()
            .vocabulary(FlowType::PreIssueAccessToken, TENANT)
            .unwrap();
        assert!(vocab.permits("application", Operator::Equals));
        assert!(vocab.permits("grantType", Operator::NotEquals));
        assert!(!vocab.permits("grantType", Operator::GreaterThan));
    }

    #[test]
    fn empty_registry_is_unavailable() {
        let err = StaticRegistry::empty()
            .vocabulary(FlowType::PreIssueAccessToken, TENANT)
            .unwrap_err();
        assert!(matches!(err, RegistryError::Unavailable { .. }));
    }

    #[test]
    fn unavailable_tenant_fails_lookup() {
        let registry = StaticRegistry::default().with_unavailable_tenant("down.example");
        let err = registry
            .vocabulary(FlowType::PreIssueAccessToken, "down.example")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "rule vocabulary for flow 'preIssueAccessToken' is unavailable for tenant 'down.example'"
        );
        assert!(registry
            .vocabulary(FlowType::PreIssueAccessToken, TENANT)
            .is_ok());
    }

    #[test]
    fn tenant_fields_extend_defaults_for_that_tenant_only() {
        let registry = StaticRegistry::default().with_tenant_field(
            "acme.com",
            FlowType::PreIssueAccessToken,
            "riskScore",
            [Operator::GreaterThan],
        );
        let acme = registry
            .vocabulary(FlowType::PreIssueAccessToken, "acme.com")
            .unwrap();
        assert!(acme.permits("riskScore", Operator::GreaterThan));
        assert!(acme.permits("application", Operator::Equals));

        let other = registry
            .vocabulary(FlowType::PreIssueAccessToken, TENANT)
            .unwrap();
        assert!(!other.permits("riskScore", Operator::GreaterThan));
    }

    #[test]
    fn from_toml_replaces_flow_and_extends_tenant() {
        let registry = StaticRegistry::from_toml(
            r#"
[[flows]]
flow = "preIssueAccessToken"
[[flows.fields]]
name = "role"
operators = ["equals", "in"]

[tenants."acme.com"]
[[tenants."acme.com".flows]]
flow = "preIssueAccessToken"
[[tenants."acme.com".flows.fields]]
name = "riskScore"
operators = ["greaterThan"]

[tenants."down.example"]
unavailable = true
"#,
        )
        .unwrap();

        let base = registry
            .vocabulary(FlowType::PreIssueAccessToken, TENANT)
            .unwrap();
        assert!(base.permits("role", Operator::In));
        assert!(base.get("application").is_none());

        let acme = registry
            .vocabulary(FlowType::PreIssueAccessToken, "acme.com")
            .unwrap();
        assert!(acme.permits("riskScore", Operator::GreaterThan));
        assert!(acme.permits("role", Operator::Equals));

        assert!(registry
            .vocabulary(FlowType::PreIssueAccessToken, "down.example")
            .is_err());
    }

    #[test]
    fn from_toml_tenant_level_fields() {
        let registry = StaticRegistry::from_toml(
            r#"
[[flows]]
flow = "preIssueAccessToken"
[[flows.fields]]
name = "application"
operators = ["equals", "notEquals"]

[tenants."acme.com"]
unavailable = false
[[tenants."acme.com".fields]]
name = "riskScore"
operators = ["greaterThan"]
"#,
        )
        .unwrap();

        let acme = registry
            .vocabulary(FlowType::PreIssueAccessToken, "acme.com")
            .unwrap();
        assert!(acme.permits("application", Operator::NotEquals));
        assert!(acme.permits("riskScore", Operator::GreaterThan));
        assert!(!acme.permits("riskScore", Operator::LessThan));

        let other = registry
            .vocabulary(FlowType::PreIssueAccessToken, TENANT)
            .unwrap();
        assert!(other.get("riskScore").is_none());
    }

    #[test]
    fn from_toml_rejects_unknown_operator() {
        let err = StaticRegistry::from_toml(
            r#"
[[flows]]
flow = "preIssueAccessToken"
[[flows.fields]]
name = "role"
operators = ["approximately"]
"#,
        )
        .unwrap_err();
        assert!(matches!(err, RegistryError::Config(_)));
    }

    #[test]
    fn from_file_missing_is_io_error() {
        let err = StaticRegistry::from_file("/nonexistent/registry.toml").unwrap_err();
        assert!(matches!(err, RegistryError::Io(_)));
    }
}
