// Entry points that compile filter text into typed expressions

use super::parser::Parser;
use crate::expression::{evaluate_expression, Expr, ParseResult};
use crate::header::Header;
use crate::value::{Affinity, Variant};
use std::fmt;

/// Compile a boolean filter against `header`.
///
/// Returns `Ok(None)` when the text holds no tokens at all.
pub fn parse(filter: &str, header: &Header) -> ParseResult<Option<Expr>> {
    parse_as(filter, header, Affinity::Boolean)
}

/// Compile an expression whose root must have `affinity`.
///
/// With `Affinity::Unknown` the root keeps whatever affinity its operands
/// settle on, and falls back to STRING if they settle on none.
pub fn parse_as(filter: &str, header: &Header, affinity: Affinity) -> ParseResult<Option<Expr>> {
    let Some(mut expr) = Parser::new(filter, header).parse()? else {
        log::debug!("Empty filter {:?}", filter);
        return Ok(None);
    };

    if !expr.narrow_affinity(affinity)?.is_known() {
        expr.narrow_affinity(Affinity::String)?;
    }
    log::debug!("Compiled filter {:?} as {} ({})", filter, expr, expr.affinity());
    Ok(Some(expr))
}

/// Compiled row filter. An empty filter accepts every row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Filter {
    expr: Option<Expr>,
}

impl Filter {
    pub fn compile(filter: &str, header: &Header) -> ParseResult<Self> {
        Ok(Self {
            expr: parse(filter, header)?,
        })
    }

    pub fn expression(&self) -> Option<&Expr> {
        self.expr.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.expr.is_none()
    }

    pub fn evaluate(&self, row: &[Variant]) -> Variant {
        match &self.expr {
            Some(expr) => evaluate_expression(expr, row),
            None => Variant::Boolean(true),
        }
    }

    pub fn matches(&self, row: &[Variant]) -> bool {
        self.evaluate(row).expect_bool()
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.expr {
            Some(expr) => write!(f, "{}", expr),
            None => f.write_str("true"),
        }
    }
}
