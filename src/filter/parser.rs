// Filter parser - turns filter text into an expression tree
//
// Each nesting level (the whole filter, a parenthesized group, a function
// argument) is parsed into a flat sequence. Operators other than the boolean
// connectives take their operands as soon as they are recognized; connectives
// are left as placeholders and spliced with their neighbours once the level is
// complete, one priority at a time.

use super::lexer::Lexer;
use super::registry::{Priority, Registry, Syntax};
use super::token::{visible, Token, TokenClass};
use crate::expression::{Expr, Operation, ParseError, ParseResult, MAX_DEPTH};
use crate::header::Header;

/// Connective waiting for its operands
#[derive(Debug, Clone, PartialEq)]
pub struct Placeholder {
    pub operation: &'static Operation,
    pub priority: Priority,
    pub token: String,
    pub position: usize,
}

/// Entry of the flat sequence of one nesting level
#[derive(Debug, Clone, PartialEq)]
pub enum Pending {
    Node(Expr),
    Placeholder(Placeholder),
}

pub struct Parser<'a> {
    lexer: Lexer,
    header: &'a Header,
    registry: &'static Registry,
    /// Tokens currently being recognized, one per nesting level
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(filter: &str, header: &'a Header) -> Self {
        Parser {
            lexer: Lexer::new(filter),
            header,
            registry: Registry::global(),
            depth: 0,
        }
    }

    /// Parse the whole filter text.
    ///
    /// Returns `None` for a filter with no tokens. Affinities are left as
    /// far as construction fixed them; narrowing the root is up to the
    /// caller.
    pub fn parse(&mut self) -> ParseResult<Option<Expr>> {
        let (expr, _) = self.parse_sequence(&[None])?;
        Ok(expr)
    }

    /// Parse tokens until one of `terminators` (`None` is the end of input),
    /// consume the terminator and resolve the deferred connectives.
    fn parse_sequence(
        &mut self,
        terminators: &[Option<char>],
    ) -> ParseResult<(Option<Expr>, Option<char>)> {
        let mut sequence = Vec::new();
        while let Some(token) = self.lexer.next_token() {
            let item = self.parse_token(token, &mut sequence)?;
            sequence.push(item);
        }

        let end = self.lexer.peek();
        if !terminators.contains(&end) {
            let expected: Vec<String> = terminators.iter().map(|t| visible(*t)).collect();
            return Err(ParseError::syntax(
                end.map(String::from).unwrap_or_default(),
                self.lexer.position(),
                format!(
                    "Expecting {} and current token is {}",
                    expected.join(" or "),
                    visible(end)
                ),
            ));
        }
        self.lexer.advance();

        for priority in Priority::RESOLUTION_ORDER {
            resolve_priority(&mut sequence, priority)?;
        }
        Ok((finish(sequence)?, end))
    }

    /// Recognize one token, consuming whatever else it needs from the input
    fn parse_token(&mut self, token: Token, sequence: &mut Vec<Pending>) -> ParseResult<Pending> {
        if self.depth == MAX_DEPTH {
            return Err(ParseError::syntax(
                token.text,
                token.position,
                "Expression is nested too deeply",
            ));
        }
        self.depth += 1;
        let result = self.dispatch(token, sequence);
        self.depth -= 1;
        result
    }

    fn dispatch(&mut self, token: Token, sequence: &mut Vec<Pending>) -> ParseResult<Pending> {
        log::trace!("token {:?} at {}", token.text, token.position);

        match self.registry.lookup(&token.spelling()) {
            Some(Syntax::Quote) => {
                let text = self.lexer.read_quoted(token.position)?;
                Ok(Pending::Node(Expr::constant(text, token.position)))
            }
            Some(Syntax::Group) => self.parse_group(&token).map(Pending::Node),
            Some(Syntax::Prefix(operation)) => self.parse_prefix(operation, token).map(Pending::Node),
            Some(Syntax::Function(operation)) => {
                self.parse_function(operation, token).map(Pending::Node)
            }
            Some(Syntax::Infix(operation)) => {
                self.parse_infix(operation, token, sequence).map(Pending::Node)
            }
            Some(Syntax::PrefixOrInfix { prefix, infix }) => {
                if matches!(sequence.last(), Some(Pending::Node(_))) {
                    self.parse_infix(infix, token, sequence).map(Pending::Node)
                } else {
                    self.parse_prefix(prefix, token).map(Pending::Node)
                }
            }
            Some(Syntax::Deferred(operation, priority)) => Ok(Pending::Placeholder(Placeholder {
                operation,
                priority,
                token: token.text,
                position: token.position,
            })),
            None if token.class == TokenClass::Text => Ok(Pending::Node(self.parse_free_text(token))),
            None => Err(ParseError::lexical(
                token.text,
                token.position,
                "Unknown operator",
            )),
        }
    }

    /// Column reference if the text names a column, string literal otherwise
    fn parse_free_text(&self, token: Token) -> Expr {
        match self.header.find(&token.text) {
            Some((index, item)) => Expr::column(index, token.text, item.affinity, token.position),
            None => Expr::constant(token.text, token.position),
        }
    }

    fn parse_group(&mut self, token: &Token) -> ParseResult<Expr> {
        let (expr, _) = self.parse_sequence(&[Some(')')])?;
        expr.ok_or_else(|| {
            ParseError::syntax(&token.text, token.position, "Empty parenthesized expression")
        })
    }

    /// The single token following an operator, fully resolved
    fn parse_operand(&mut self, token: &Token) -> ParseResult<Expr> {
        let Some(next) = self.lexer.next_token() else {
            return Err(ParseError::syntax(
                &token.text,
                token.position,
                "Right hand side of operator is empty",
            ));
        };
        match self.parse_token(next, &mut Vec::new())? {
            Pending::Node(expr) => Ok(expr),
            Pending::Placeholder(_) => Err(ParseError::syntax(
                &token.text,
                token.position,
                "Right hand side of operator is not fully resolved",
            )),
        }
    }

    fn parse_prefix(&mut self, operation: &'static Operation, token: Token) -> ParseResult<Expr> {
        let operand = self.parse_operand(&token)?;
        Expr::call(operation, token.text, token.position, vec![operand])
    }

    fn parse_infix(
        &mut self,
        operation: &'static Operation,
        token: Token,
        sequence: &mut Vec<Pending>,
    ) -> ParseResult<Expr> {
        let lhs = match sequence.pop() {
            Some(Pending::Node(expr)) => expr,
            Some(Pending::Placeholder(_)) => {
                return Err(ParseError::syntax(
                    token.text,
                    token.position,
                    "Left hand side of operator is not fully resolved",
                ))
            }
            None => {
                return Err(ParseError::syntax(
                    token.text,
                    token.position,
                    "Left hand side of operator is empty",
                ))
            }
        };
        let rhs = self.parse_operand(&token)?;
        Expr::call(operation, token.text, token.position, vec![lhs, rhs])
    }

    fn parse_function(&mut self, operation: &'static Operation, token: Token) -> ParseResult<Expr> {
        self.lexer.skip_whitespace();
        if self.lexer.peek() != Some('(') {
            return Err(ParseError::syntax(
                token.text,
                token.position,
                format!(
                    "Expecting a '(' and current token is {}",
                    visible(self.lexer.peek())
                ),
            ));
        }
        self.lexer.advance();

        let mut args = Vec::new();
        loop {
            let (arg, end) = self.parse_sequence(&[Some(','), Some(')')])?;
            match arg {
                Some(arg) => args.push(arg),
                // `f()`
                None if end == Some(')') && args.is_empty() => break,
                None => {
                    return Err(ParseError::syntax(
                        token.text,
                        token.position,
                        format!("Argument {} is empty", args.len() + 1),
                    ))
                }
            }
            if end == Some(')') {
                break;
            }
        }
        Expr::call(operation, token.text, token.position, args)
    }
}

/// Splice every placeholder of `priority` with its two neighbours, left to
/// right, into a single call node.
pub fn resolve_priority(sequence: &mut Vec<Pending>, priority: Priority) -> ParseResult<()> {
    let mut i = 0;
    while i < sequence.len() {
        let placeholder = match &sequence[i] {
            Pending::Placeholder(placeholder) if placeholder.priority == priority => {
                placeholder.clone()
            }
            _ => {
                i += 1;
                continue;
            }
        };
        let error = |reason: &str| {
            ParseError::syntax(&placeholder.token, placeholder.position, reason)
        };

        if i == 0 {
            return Err(error("Left hand side of operator is empty"));
        }
        if i + 1 == sequence.len() {
            return Err(error("Right hand side of operator is empty"));
        }
        if let Pending::Placeholder(_) = sequence[i - 1] {
            return Err(error("Left hand side of operator is not fully resolved"));
        }
        if let Pending::Placeholder(_) = sequence[i + 1] {
            return Err(error("Right hand side of operator is not fully resolved"));
        }

        let operands: Vec<Expr> = sequence
            .drain(i - 1..=i + 1)
            .filter_map(|pending| match pending {
                Pending::Node(expr) => Some(expr),
                Pending::Placeholder(_) => None,
            })
            .collect();
        log::trace!("resolved '{}' at {}", placeholder.token, placeholder.position);
        let call = Expr::call(
            placeholder.operation,
            placeholder.token,
            placeholder.position,
            operands,
        )?;
        sequence.insert(i - 1, Pending::Node(call));
    }
    Ok(())
}

/// A resolved sequence holds at most one node
fn finish(sequence: Vec<Pending>) -> ParseResult<Option<Expr>> {
    let mut entries = sequence.into_iter();
    let first = entries.next();
    if let Some(extra) = entries.next() {
        let (token, position) = match extra {
            Pending::Node(expr) => (expr.token().to_string(), expr.position()),
            Pending::Placeholder(placeholder) => (placeholder.token, placeholder.position),
        };
        return Err(ParseError::syntax(
            token,
            position,
            "Another operator has been detected after parsing",
        ));
    }
    match first {
        None => Ok(None),
        Some(Pending::Node(expr)) => Ok(Some(expr)),
        Some(Pending::Placeholder(placeholder)) => Err(ParseError::syntax(
            placeholder.token,
            placeholder.position,
            "Operator is missing its operands",
        )),
    }
}
