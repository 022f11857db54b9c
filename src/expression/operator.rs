//! Built-in operations: arity, affinities and the native function behind
//! every operator and function a filter can call.

use crate::value::{Affinity, Variant};
use std::fmt;

const B: Affinity = Affinity::Boolean;
const D: Affinity = Affinity::Double;
const S: Affinity = Affinity::String;
const U: Affinity = Affinity::Unknown;

/// How an operation is written when rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notation {
    /// `not(x)`, `-(x)`
    Prefix,
    /// `(a + b)`
    Infix,
    /// `name(a, b)`
    Function,
}

/// Metadata and implementation of one built-in operation.
///
/// A parameter affinity of `Unknown` means the argument inherits whatever
/// affinity the operation negotiates for it.
pub struct Operation {
    pub name: &'static str,
    pub notation: Notation,
    pub returns: Affinity,
    pub params: &'static [Affinity],
    apply: fn(&[Variant]) -> Variant,
}

impl Operation {
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Apply the native operation to already evaluated arguments.
    ///
    /// Panics if an argument does not carry the tag its parameter affinity
    /// promised.
    pub fn apply(&self, args: &[Variant]) -> Variant {
        debug_assert_eq!(args.len(), self.arity(), "arity of '{}'", self.name);
        (self.apply)(args)
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("name", &self.name)
            .field("notation", &self.notation)
            .field("returns", &self.returns)
            .field("params", &self.params)
            .finish()
    }
}

impl PartialEq for Operation {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

pub static NOT: Operation = Operation {
    name: "not",
    notation: Notation::Prefix,
    returns: B,
    params: &[B],
    apply: |args| Variant::Boolean(!args[0].expect_bool()),
};

pub static AND: Operation = Operation {
    name: "and",
    notation: Notation::Infix,
    returns: B,
    params: &[B, B],
    apply: |args| Variant::Boolean(args[0].expect_bool() && args[1].expect_bool()),
};

pub static OR: Operation = Operation {
    name: "or",
    notation: Notation::Infix,
    returns: B,
    params: &[B, B],
    apply: |args| Variant::Boolean(args[0].expect_bool() || args[1].expect_bool()),
};

pub static EQUAL: Operation = Operation {
    name: "==",
    notation: Notation::Infix,
    returns: B,
    params: &[U, U],
    apply: |args| Variant::Boolean(args[0] == args[1]),
};

pub static NOT_EQUAL: Operation = Operation {
    name: "!=",
    notation: Notation::Infix,
    returns: B,
    params: &[U, U],
    apply: |args| Variant::Boolean(args[0] != args[1]),
};

pub static GREATER: Operation = Operation {
    name: ">",
    notation: Notation::Infix,
    returns: B,
    params: &[U, U],
    apply: |args| Variant::Boolean(args[0] > args[1]),
};

pub static LESS: Operation = Operation {
    name: "<",
    notation: Notation::Infix,
    returns: B,
    params: &[U, U],
    apply: |args| Variant::Boolean(args[0] < args[1]),
};

pub static GREATER_EQUAL: Operation = Operation {
    name: ">=",
    notation: Notation::Infix,
    returns: B,
    params: &[U, U],
    apply: |args| Variant::Boolean(args[0] >= args[1]),
};

pub static LESS_EQUAL: Operation = Operation {
    name: "<=",
    notation: Notation::Infix,
    returns: B,
    params: &[U, U],
    apply: |args| Variant::Boolean(args[0] <= args[1]),
};

pub static PLUS: Operation = Operation {
    name: "+",
    notation: Notation::Prefix,
    returns: D,
    params: &[D],
    apply: |args| Variant::Double(args[0].expect_double()),
};

pub static NEGATE: Operation = Operation {
    name: "-",
    notation: Notation::Prefix,
    returns: D,
    params: &[D],
    apply: |args| Variant::Double(-args[0].expect_double()),
};

pub static ADD: Operation = Operation {
    name: "+",
    notation: Notation::Infix,
    returns: D,
    params: &[D, D],
    apply: |args| Variant::Double(args[0].expect_double() + args[1].expect_double()),
};

pub static SUBTRACT: Operation = Operation {
    name: "-",
    notation: Notation::Infix,
    returns: D,
    params: &[D, D],
    apply: |args| Variant::Double(args[0].expect_double() - args[1].expect_double()),
};

pub static MULTIPLY: Operation = Operation {
    name: "*",
    notation: Notation::Infix,
    returns: D,
    params: &[D, D],
    apply: |args| Variant::Double(args[0].expect_double() * args[1].expect_double()),
};

pub static DIVIDE: Operation = Operation {
    name: "/",
    notation: Notation::Infix,
    returns: D,
    params: &[D, D],
    apply: divide,
};

pub static CONTAINS: Operation = Operation {
    name: "contains",
    notation: Notation::Function,
    returns: B,
    params: &[S, S],
    apply: |args| Variant::Boolean(args[0].expect_str().contains(args[1].expect_str())),
};

pub static STARTS_WITH: Operation = Operation {
    name: "startswith",
    notation: Notation::Function,
    returns: B,
    params: &[S, S],
    apply: |args| Variant::Boolean(args[0].expect_str().starts_with(args[1].expect_str())),
};

pub static MIN: Operation = Operation {
    name: "min",
    notation: Notation::Function,
    returns: U,
    params: &[U, U],
    apply: |args| {
        if args[0] < args[1] {
            args[0].clone()
        } else {
            args[1].clone()
        }
    },
};

pub static MAX: Operation = Operation {
    name: "max",
    notation: Notation::Function,
    returns: U,
    params: &[U, U],
    apply: |args| {
        if args[0] > args[1] {
            args[0].clone()
        } else {
            args[1].clone()
        }
    },
};

pub static UPPER: Operation = Operation {
    name: "uc",
    notation: Notation::Function,
    returns: S,
    params: &[S],
    apply: |args| Variant::String(args[0].expect_str().to_uppercase()),
};

pub static LOWER: Operation = Operation {
    name: "lc",
    notation: Notation::Function,
    returns: S,
    params: &[S],
    apply: |args| Variant::String(args[0].expect_str().to_lowercase()),
};

pub static LOG: Operation = Operation {
    name: "log",
    notation: Notation::Function,
    returns: D,
    params: &[D],
    apply: logarithm,
};

pub static EXP: Operation = Operation {
    name: "exp",
    notation: Notation::Function,
    returns: D,
    params: &[D],
    apply: |args| Variant::Double(args[0].expect_double().exp()),
};

pub static ABS: Operation = Operation {
    name: "abs",
    notation: Notation::Function,
    returns: D,
    params: &[D],
    apply: |args| Variant::Double(args[0].expect_double().abs()),
};

pub static IF: Operation = Operation {
    name: "if",
    notation: Notation::Function,
    returns: U,
    params: &[B, U, U],
    apply: |args| {
        if args[0].expect_bool() {
            args[1].clone()
        } else {
            args[2].clone()
        }
    },
};

/// Division by zero yields 0.0
fn divide(args: &[Variant]) -> Variant {
    let divisor = args[1].expect_double();
    if divisor == 0.0 {
        return Variant::Double(0.0);
    }
    Variant::Double(args[0].expect_double() / divisor)
}

/// Natural logarithm; non-positive input yields 0.0
fn logarithm(args: &[Variant]) -> Variant {
    let value = args[0].expect_double();
    if value > 0.0 {
        Variant::Double(value.ln())
    } else {
        Variant::Double(0.0)
    }
}
