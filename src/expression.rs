//! Expression trees produced by the filter compiler.
//!
//! This module provides:
//! - The typed expression tree (constants, column references, calls)
//! - The table of built-in operations
//! - Affinity narrowing
//! - Evaluation against rows

pub mod affinity;
pub mod error;
pub mod eval;
pub mod expr;
pub mod operator;

pub use error::{ErrorKind, ParseError, ParseResult};
pub use eval::evaluate_expression;
pub use expr::{Call, ColumnRef, Constant, Expr, MAX_DEPTH};
pub use operator::{Notation, Operation};
