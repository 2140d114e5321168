mod action_rule;
mod error;
mod expr;
mod flow;
mod rule;

pub use action_rule::ActionRule;
pub use error::RuleError;
pub use expr::{Expression, FieldExpr, Operator, field};
pub use flow::{ActionType, FlowType};
pub use rule::{Conjunction, Disjunction};
