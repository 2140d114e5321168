use winnow::ascii::{multispace1, till_line_ending, Caseless};
use winnow::combinator::{alt, cut_err, preceded, repeat};
use winnow::error::{ModalResult, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{any, literal, take_while};

use super::parser::{ParsedExpression, ParsedRule};

// -- Whitespace & comments --------------------------------------------------

fn ws(input: &mut &str) -> ModalResult<()> {
    let _: () = repeat(
        0..,
        alt((
            take_while(1.., |c: char| c.is_ascii_whitespace()).void(),
            ('#', till_line_ending).void(),
        )),
    )
    .parse_next(input)?;
    Ok(())
}

// -- Tokens -----------------------------------------------------------------

fn ident<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        take_while(1.., |c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| {
            c.is_ascii_alphanumeric() || c == '_' || c == '.'
        }),
    )
        .take()
        .parse_next(input)
}

fn string_literal(input: &mut &str) -> ModalResult<String> {
    '"'.parse_next(input)?;
    let mut s = String::new();
    loop {
        let ch = any.parse_next(input)?;
        match ch {
            '"' => return Ok(s),
            '\\' => {
                let esc = any.parse_next(input)?;
                match esc {
                    '"' => s.push('"'),
                    '\\' => s.push('\\'),
                    'n' => s.push('\n'),
                    't' => s.push('\t'),
                    other => {
                        s.push('\\');
                        s.push(other);
                    }
                }
            }
            c => s.push(c),
        }
    }
}

fn and_keyword(input: &mut &str) -> ModalResult<()> {
    ws.parse_next(input)?;
    (literal(Caseless("and")), multispace1).void().parse_next(input)
}

fn or_keyword(input: &mut &str) -> ModalResult<()> {
    ws.parse_next(input)?;
    (literal(Caseless("or")), multispace1).void().parse_next(input)
}

// -- Expressions ------------------------------------------------------------

/// A bare identifier, or a quoted name for fields that are not identifiers.
fn field_name(input: &mut &str) -> ModalResult<String> {
    alt((ident.map(|name: &str| name.to_owned()), string_literal)).parse_next(input)
}

fn expression(input: &mut &str) -> ModalResult<ParsedExpression> {
    ws.parse_next(input)?;
    let field = field_name
        .context(StrContext::Expected(StrContextValue::Description(
            "field name",
        )))
        .parse_next(input)?;
    ws.parse_next(input)?;
    let operator = cut_err(ident)
        .context(StrContext::Expected(StrContextValue::Description(
            "operator",
        )))
        .parse_next(input)?;
    ws.parse_next(input)?;
    let value = cut_err(string_literal)
        .context(StrContext::Expected(StrContextValue::Description(
            "quoted value",
        )))
        .parse_next(input)?;
    Ok(ParsedExpression {
        field,
        operator: operator.to_owned(),
        value,
    })
}

fn and_group(input: &mut &str) -> ModalResult<Vec<ParsedExpression>> {
    let first = expression(input)?;
    let rest: Vec<ParsedExpression> =
        repeat(0.., preceded(and_keyword, cut_err(expression))).parse_next(input)?;
    let mut group = Vec::with_capacity(rest.len() + 1);
    group.push(first);
    group.extend(rest);
    Ok(group)
}

// -- Top-level parser -------------------------------------------------------

pub fn parse_rule(input: &mut &str) -> ModalResult<ParsedRule> {
    ws.parse_next(input)?;
    if input.is_empty() {
        return Ok(ParsedRule::default());
    }

    let first = and_group(input)?;
    let rest: Vec<Vec<ParsedExpression>> =
        repeat(0.., preceded(or_keyword, cut_err(and_group))).parse_next(input)?;

    ws.parse_next(input)?;

    let mut groups = Vec::with_capacity(rest.len() + 1);
    groups.push(first);
    groups.extend(rest);
    Ok(ParsedRule { groups })
}
