//! Affinity narrowing.
//!
//! Affinities are negotiated in both directions: a parent pushes the affinity
//! it needs into its children, and children with a known affinity (column
//! references, mostly) pull untyped siblings along with them. Narrowing is
//! monotonic: once fixed, an affinity can only be confirmed, never changed.

use crate::expression::expr::{Call, ColumnRef, Constant, Expr};
use crate::expression::{ParseError, ParseResult};
use crate::value::{Affinity, Variant};

impl Expr {
    /// Narrow this subtree towards `target` and return its resulting affinity.
    ///
    /// `Affinity::Unknown` as a target asks the node to resolve what it can
    /// on its own.
    pub fn narrow_affinity(&mut self, target: Affinity) -> ParseResult<Affinity> {
        match self {
            Expr::Constant(constant) => constant.narrow_affinity(target),
            Expr::Column(column) => column.narrow_affinity(target),
            Expr::Call(call) => call.narrow_affinity(target),
        }
    }
}

impl Constant {
    fn narrow_affinity(&mut self, target: Affinity) -> ParseResult<Affinity> {
        if !self.affinity.is_known() {
            if target.is_known() {
                self.value = convert_literal(&self.text, target).ok_or_else(|| {
                    ParseError::type_error(
                        &self.text,
                        self.position,
                        format!("Cannot convert '{}' to {}", self.text, target),
                    )
                })?;
                self.affinity = target;
            }
        } else if target.is_known() && target != self.affinity {
            return Err(ParseError::affinity_conflict(
                &self.text,
                self.position,
                target,
                self.affinity,
            ));
        }
        Ok(self.affinity)
    }
}

impl ColumnRef {
    fn narrow_affinity(&self, target: Affinity) -> ParseResult<Affinity> {
        if target.is_known() && target != self.affinity {
            return Err(ParseError::affinity_conflict(
                &self.name,
                self.position,
                target,
                self.affinity,
            ));
        }
        Ok(self.affinity)
    }
}

impl Call {
    fn narrow_affinity(&mut self, target: Affinity) -> ParseResult<Affinity> {
        let params = self.operation.params;

        // Top-down: the return affinity decides the inheriting parameters.
        if !self.affinity.is_known() && target.is_known() {
            self.affinity = target;
            for (arg, &param) in self.args.iter_mut().zip(params) {
                arg.narrow_affinity(if param.is_known() { param } else { target })?;
            }
            return Ok(self.affinity);
        }

        if target.is_known() && target != self.affinity {
            return Err(ParseError::affinity_conflict(
                &self.token,
                self.position,
                target,
                self.affinity,
            ));
        }

        // Bottom-up: an argument that resolved on its own decides for the
        // other inheriting arguments.
        let mut found = Affinity::Unknown;
        for (arg, &param) in self.args.iter_mut().zip(params) {
            let resolved = arg.narrow_affinity(param)?;
            if resolved != param {
                found = resolved;
            }
        }
        if !found.is_known() && self.affinity.is_known() {
            found = Affinity::String;
        }
        if found.is_known() {
            if !self.affinity.is_known() {
                self.affinity = found;
            }
            for (arg, &param) in self.args.iter_mut().zip(params) {
                if !param.is_known() {
                    arg.narrow_affinity(found)?;
                }
            }
        }
        Ok(self.affinity)
    }
}

/// Convert literal text to a value of the given affinity
pub(crate) fn convert_literal(text: &str, affinity: Affinity) -> Option<Variant> {
    match affinity {
        Affinity::Boolean => parse_bool(text).map(Variant::Boolean),
        Affinity::Integer => text.parse().ok().map(Variant::Integer),
        Affinity::Double => text.parse().ok().map(Variant::Double),
        Affinity::String => Some(Variant::String(text.to_string())),
        Affinity::Unknown => None,
    }
}

/// Accepts `0`, `1`, `true`, `TRUE`, `false` and `FALSE`
pub(crate) fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "1" | "true" | "TRUE" => Some(true),
        "0" | "false" | "FALSE" => Some(false),
        _ => None,
    }
}
