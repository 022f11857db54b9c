pub mod expression;
pub mod filter;
pub mod header;
pub mod value;

pub use expression::{evaluate_expression, Expr, ParseError, ParseResult};
pub use filter::{parse, parse_as, Filter};
pub use header::{Header, HeaderItem};
pub use value::{Affinity, Row, Variant};
