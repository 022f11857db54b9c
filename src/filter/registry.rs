//! Token spellings recognized by the parser and how each one is parsed.

use crate::expression::operator::{self, Operation};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Precedence level of a deferred connective. Levels are resolved in
/// declaration order, so `And` binds tighter than `Or`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    And,
    Or,
}

impl Priority {
    pub const RESOLUTION_ORDER: [Priority; 2] = [Priority::And, Priority::Or];
}

/// Parse routine selected by a token spelling
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Syntax {
    /// `"..."` string literal
    Quote,
    /// `( ... )` sub-expression
    Group,
    /// Operator applied to the single token that follows it
    Prefix(&'static Operation),
    /// Named function with a parenthesized argument list
    Function(&'static Operation),
    /// Operator between the pending left operand and the following token
    Infix(&'static Operation),
    /// Prefix when no left operand is pending, infix otherwise
    PrefixOrInfix {
        prefix: &'static Operation,
        infix: &'static Operation,
    },
    /// Connective left in place and resolved once the sequence is complete
    Deferred(&'static Operation, Priority),
}

static BUILTINS: &[(&str, Syntax)] = &[
    ("\"", Syntax::Quote),
    ("(", Syntax::Group),
    ("!", Syntax::Prefix(&operator::NOT)),
    ("not", Syntax::Prefix(&operator::NOT)),
    ("|", Syntax::Deferred(&operator::OR, Priority::Or)),
    ("||", Syntax::Deferred(&operator::OR, Priority::Or)),
    ("or", Syntax::Deferred(&operator::OR, Priority::Or)),
    ("&", Syntax::Deferred(&operator::AND, Priority::And)),
    ("&&", Syntax::Deferred(&operator::AND, Priority::And)),
    ("and", Syntax::Deferred(&operator::AND, Priority::And)),
    ("=", Syntax::Infix(&operator::EQUAL)),
    ("==", Syntax::Infix(&operator::EQUAL)),
    ("!=", Syntax::Infix(&operator::NOT_EQUAL)),
    (">", Syntax::Infix(&operator::GREATER)),
    ("<", Syntax::Infix(&operator::LESS)),
    (">=", Syntax::Infix(&operator::GREATER_EQUAL)),
    ("<=", Syntax::Infix(&operator::LESS_EQUAL)),
    (
        "+",
        Syntax::PrefixOrInfix {
            prefix: &operator::PLUS,
            infix: &operator::ADD,
        },
    ),
    (
        "-",
        Syntax::PrefixOrInfix {
            prefix: &operator::NEGATE,
            infix: &operator::SUBTRACT,
        },
    ),
    ("*", Syntax::Infix(&operator::MULTIPLY)),
    ("/", Syntax::Infix(&operator::DIVIDE)),
    ("contains", Syntax::Function(&operator::CONTAINS)),
    ("startswith", Syntax::Function(&operator::STARTS_WITH)),
    ("min", Syntax::Function(&operator::MIN)),
    ("max", Syntax::Function(&operator::MAX)),
    ("uc", Syntax::Function(&operator::UPPER)),
    ("lc", Syntax::Function(&operator::LOWER)),
    ("log", Syntax::Function(&operator::LOG)),
    ("exp", Syntax::Function(&operator::EXP)),
    ("abs", Syntax::Function(&operator::ABS)),
    ("if", Syntax::Function(&operator::IF)),
];

/// Lookup table from lower-cased spelling to parse routine
#[derive(Debug)]
pub struct Registry {
    entries: HashMap<&'static str, Syntax>,
}

impl Registry {
    /// Registry holding every built-in spelling
    pub fn builtin() -> Self {
        Self {
            entries: BUILTINS.iter().copied().collect(),
        }
    }

    /// Shared built-in registry
    pub fn global() -> &'static Registry {
        static REGISTRY: OnceLock<Registry> = OnceLock::new();
        REGISTRY.get_or_init(Registry::builtin)
    }

    /// Look up a spelling, which must already be lower-cased
    pub fn lookup(&self, spelling: &str) -> Option<Syntax> {
        self.entries.get(spelling).copied()
    }
}
