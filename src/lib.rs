mod builder;
mod error;
pub mod mapper;
pub mod parse;
mod registry;
mod types;
pub mod wire;

pub use builder::RuleBuilder;
pub use error::{ActionRuleError, ErrorKind};
pub use registry::{
    FieldConfig, FlowConfig, RegistryConfig, RegistryError, RuleRegistry, StaticRegistry,
    TenantConfig, Vocabulary,
};
pub use types::{
    ActionRule, ActionType, Conjunction, Disjunction, Expression, FieldExpr, FlowType, Operator,
    RuleError, field,
};
