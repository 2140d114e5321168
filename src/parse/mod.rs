//! Text notation for rule bodies.
//!
//! ```text
//! application equals "app-1" and grantType notEquals "password"
//!     or grantType equals "client_credentials"
//! ```
//!
//! `and` binds tighter than `or`, so the notation is always an OR of
//! AND-groups. Keywords match in any letter case. A field that is not a plain
//! identifier is written as a quoted string, like values. `#` starts a
//! comment that runs to the end of the line. Empty input (or input holding
//! only comments) parses to zero groups, the no-rule sentinel.

mod error;
mod grammar;
mod parser;

pub use error::ParseError;
pub use parser::{ParsedExpression, ParsedRule};

/// Parse rule notation into a [`ParsedRule`].
///
/// # Errors
///
/// Returns [`ParseError`] if the input is not valid notation.
pub fn parse(input: &str) -> Result<ParsedRule, ParseError> {
    use winnow::Parser;
    grammar::parse_rule
        .parse(input)
        .map_err(|e| ParseError::new(e.to_string()))
}
