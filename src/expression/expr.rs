//! Expression tree definitions.

use crate::expression::operator::{Notation, Operation};
use crate::expression::{ParseError, ParseResult};
use crate::value::{Affinity, Variant};
use std::fmt::{self, Write};

/// Literal from the filter text.
///
/// Holds its source text until its affinity is narrowed, at which point the
/// value is converted to the matching representation.
#[derive(Debug, Clone, PartialEq)]
pub struct Constant {
    pub(crate) value: Variant,
    pub(crate) text: String,
    pub(crate) affinity: Affinity,
    pub(crate) position: usize,
}

impl Constant {
    pub fn new(text: impl Into<String>, position: usize) -> Self {
        let text = text.into();
        Self {
            value: Variant::String(text.clone()),
            text,
            affinity: Affinity::Unknown,
            position,
        }
    }

    pub fn value(&self) -> &Variant {
        &self.value
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Column reference bound to a header entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    /// Column index in the row (0-based)
    pub(crate) index: usize,
    /// Column token as written in the filter
    pub(crate) name: String,
    pub(crate) affinity: Affinity,
    pub(crate) position: usize,
}

impl ColumnRef {
    pub fn new(index: usize, name: impl Into<String>, affinity: Affinity, position: usize) -> Self {
        Self {
            index,
            name: name.into(),
            affinity,
            position,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Deepest nesting accepted in a tree or in the filter text
pub const MAX_DEPTH: usize = 256;

/// Application of a built-in operation to exactly `arity` arguments
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub(crate) operation: &'static Operation,
    pub(crate) affinity: Affinity,
    pub(crate) args: Vec<Expr>,
    pub(crate) token: String,
    pub(crate) position: usize,
    depth: usize,
}

impl Call {
    pub fn new(
        operation: &'static Operation,
        token: impl Into<String>,
        position: usize,
        args: Vec<Expr>,
    ) -> ParseResult<Self> {
        let token = token.into();
        if args.len() != operation.arity() {
            return Err(ParseError::syntax(
                token,
                position,
                format!(
                    "Invalid number of arguments, expected {}, got {}",
                    operation.arity(),
                    args.len()
                ),
            ));
        }
        let depth = 1 + args.iter().map(Expr::depth).max().unwrap_or(0);
        if depth > MAX_DEPTH {
            return Err(ParseError::syntax(
                token,
                position,
                "Expression is nested too deeply",
            ));
        }
        Ok(Self {
            operation,
            affinity: operation.returns,
            args,
            token,
            position,
            depth,
        })
    }

    pub fn operation(&self) -> &'static Operation {
        self.operation
    }

    pub fn args(&self) -> &[Expr] {
        &self.args
    }
}

/// Expression tree node
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Constant(Constant),
    Column(ColumnRef),
    Call(Call),
}

impl Expr {
    /// Create an untyped literal
    pub fn constant(text: impl Into<String>, position: usize) -> Self {
        Expr::Constant(Constant::new(text, position))
    }

    /// Create a column reference
    pub fn column(index: usize, name: impl Into<String>, affinity: Affinity, position: usize) -> Self {
        Expr::Column(ColumnRef::new(index, name, affinity, position))
    }

    /// Create a call, checking the argument count against the operation's arity
    pub fn call(
        operation: &'static Operation,
        token: impl Into<String>,
        position: usize,
        args: Vec<Expr>,
    ) -> ParseResult<Self> {
        Call::new(operation, token, position, args).map(Expr::Call)
    }

    pub fn affinity(&self) -> Affinity {
        match self {
            Expr::Constant(constant) => constant.affinity,
            Expr::Column(column) => column.affinity,
            Expr::Call(call) => call.affinity,
        }
    }

    /// Token text this node was created from
    pub fn token(&self) -> &str {
        match self {
            Expr::Constant(constant) => &constant.text,
            Expr::Column(column) => &column.name,
            Expr::Call(call) => &call.token,
        }
    }

    /// Character offset of the token in the filter text
    pub fn position(&self) -> usize {
        match self {
            Expr::Constant(constant) => constant.position,
            Expr::Column(column) => column.position,
            Expr::Call(call) => call.position,
        }
    }

    /// Height of the tree; a leaf has depth 1
    pub fn depth(&self) -> usize {
        match self {
            Expr::Constant(_) | Expr::Column(_) => 1,
            Expr::Call(call) => call.depth,
        }
    }

    /// Canonical parenthesized form. Re-parsing it against the same header
    /// yields an equivalent expression.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    f.write_char('"')?;
    for c in text.chars() {
        if c == '"' || c == '\\' {
            f.write_char('\\')?;
        }
        f.write_char(c)?;
    }
    f.write_char('"')
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Constant(constant) => write_quoted(f, &constant.text),
            Expr::Column(column) => f.write_str(&column.name),
            Expr::Call(call) => {
                let name = call.operation.name;
                match call.operation.notation {
                    Notation::Prefix => write!(f, "{}({})", name, call.args[0]),
                    Notation::Infix => {
                        write!(f, "({} {} {})", call.args[0], name, call.args[1])
                    }
                    Notation::Function => {
                        write!(f, "{}(", name)?;
                        for (i, arg) in call.args.iter().enumerate() {
                            if i != 0 {
                                f.write_str(", ")?;
                            }
                            write!(f, "{}", arg)?;
                        }
                        f.write_char(')')
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::operator;
    use crate::expression::ErrorKind;

    #[test]
    fn test_constant_starts_untyped() {
        let constant = Constant::new("42", 3);
        assert_eq!(constant.text(), "42");
        assert_eq!(constant.value(), &Variant::String("42".to_string()));
        assert_eq!(Expr::Constant(constant).affinity(), Affinity::Unknown);
    }

    #[test]
    fn test_column_ref() {
        let expr = Expr::column(1, "Qty", Affinity::Integer, 0);
        assert_eq!(expr.affinity(), Affinity::Integer);
        assert_eq!(expr.token(), "Qty");
        match expr {
            Expr::Column(column) => {
                assert_eq!(column.index(), 1);
                assert_eq!(column.name(), "Qty");
            }
            other => panic!("expected a column, got {:?}", other),
        }
    }

    #[test]
    fn test_call_takes_return_affinity() -> ParseResult<()> {
        let expr = Expr::call(
            &operator::GREATER,
            ">",
            2,
            vec![
                Expr::column(0, "x", Affinity::Double, 0),
                Expr::constant("3", 4),
            ],
        )?;
        assert_eq!(expr.affinity(), Affinity::Boolean);
        assert_eq!(expr.position(), 2);

        let expr = Expr::call(
            &operator::MIN,
            "min",
            0,
            vec![Expr::constant("1", 4), Expr::constant("2", 7)],
        )?;
        assert_eq!(expr.affinity(), Affinity::Unknown);
        Ok(())
    }

    #[test]
    fn test_call_checks_arity() {
        let err = Expr::call(
            &operator::CONTAINS,
            "contains",
            0,
            vec![Expr::column(0, "x", Affinity::String, 9)],
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax);
        assert_eq!(err.reason(), "Invalid number of arguments, expected 2, got 1");
    }

    #[test]
    fn test_depth_is_capped() -> ParseResult<()> {
        let mut expr = Expr::column(0, "x", Affinity::Double, 0);
        assert_eq!(expr.depth(), 1);
        for _ in 1..MAX_DEPTH {
            expr = Expr::call(&operator::NEGATE, "-", 0, vec![expr])?;
        }
        assert_eq!(expr.depth(), MAX_DEPTH);

        let err = Expr::call(&operator::NEGATE, "-", 7, vec![expr]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax);
        assert_eq!(err.position(), 7);
        assert_eq!(err.reason(), "Expression is nested too deeply");
        Ok(())
    }

    #[test]
    fn test_render() -> ParseResult<()> {
        let x = || Expr::column(0, "x", Affinity::Double, 0);

        let expr = Expr::call(&operator::GREATER, ">", 2, vec![x(), Expr::constant("3", 4)])?;
        assert_eq!(expr.render(), r#"(x > "3")"#);

        let expr = Expr::call(&operator::NEGATE, "-", 0, vec![x()])?;
        assert_eq!(expr.render(), "-(x)");

        let expr = Expr::call(&operator::NOT, "!", 0, vec![Expr::constant("true", 1)])?;
        assert_eq!(expr.render(), r#"not("true")"#);

        let expr = Expr::call(
            &operator::IF,
            "IF",
            0,
            vec![Expr::constant("1", 3), x(), Expr::constant("0", 9)],
        )?;
        assert_eq!(expr.render(), r#"if("1", x, "0")"#);
        Ok(())
    }

    #[test]
    fn test_render_escapes_quotes() {
        let expr = Expr::constant(r#"say "hi" \o/"#, 0);
        assert_eq!(expr.render(), r#""say \"hi\" \\o/""#);
    }
}
