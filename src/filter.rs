//! Filter compiler.
//!
//! This module provides:
//! - Tokenizing filter text
//! - The registry of recognized spellings
//! - The hybrid eager/deferred parser
//! - Compiled filters ready to evaluate rows

pub mod compiled;
pub mod lexer;
pub mod parser;
pub mod registry;
pub mod token;

pub use compiled::{parse, parse_as, Filter};
pub use lexer::Lexer;
pub use parser::{resolve_priority, Parser, Pending, Placeholder};
pub use registry::{Priority, Registry, Syntax};
pub use token::{Token, TokenClass};
