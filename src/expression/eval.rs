//! Expression evaluation implementation.

use crate::expression::Expr;
use crate::value::Variant;

impl Expr {
    /// Evaluate this expression against a row.
    ///
    /// The row must be aligned with the header the expression was compiled
    /// against. Arguments of a call are all evaluated, left to right, before
    /// the operation is applied.
    pub fn evaluate(&self, row: &[Variant]) -> Variant {
        match self {
            Expr::Constant(constant) => constant.value.clone(),
            Expr::Column(column) => row[column.index].clone(),
            Expr::Call(call) => {
                let args: Vec<Variant> = call.args.iter().map(|arg| arg.evaluate(row)).collect();
                call.operation.apply(&args)
            }
        }
    }
}

/// Helper function to evaluate an expression against a row
pub fn evaluate_expression(expr: &Expr, row: &[Variant]) -> Variant {
    expr.evaluate(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::operator;
    use crate::value::Affinity;

    fn typed(mut expr: Expr, affinity: Affinity) -> Expr {
        expr.narrow_affinity(affinity).unwrap();
        expr
    }

    #[test]
    fn test_constant_evaluation() {
        let row = vec![];
        assert_eq!(
            typed(Expr::constant("42", 0), Affinity::Integer).evaluate(&row),
            Variant::Integer(42)
        );
        assert_eq!(
            typed(Expr::constant("TRUE", 0), Affinity::Boolean).evaluate(&row),
            Variant::Boolean(true)
        );
        assert_eq!(
            typed(Expr::constant("hello", 0), Affinity::String).evaluate(&row),
            Variant::String("hello".to_string())
        );
    }

    #[test]
    fn test_column_evaluation() {
        let row = vec![
            Variant::Integer(1),
            Variant::String("test".to_string()),
            Variant::Boolean(true),
        ];
        assert_eq!(
            Expr::column(0, "a", Affinity::Integer, 0).evaluate(&row),
            Variant::Integer(1)
        );
        assert_eq!(
            Expr::column(2, "c", Affinity::Boolean, 0).evaluate(&row),
            Variant::Boolean(true)
        );
    }

    #[test]
    fn test_call_evaluation() {
        // (price * 2) > 10
        let price = Expr::column(0, "price", Affinity::Double, 0);
        let doubled =
            Expr::call(&operator::MULTIPLY, "*", 6, vec![price, Expr::constant("2", 8)]).unwrap();
        let expr = Expr::call(
            &operator::GREATER,
            ">",
            11,
            vec![doubled, Expr::constant("10", 13)],
        )
        .unwrap();
        let expr = typed(expr, Affinity::Boolean);

        assert_eq!(expr.evaluate(&[Variant::Double(6.0)]), Variant::Boolean(true));
        assert_eq!(expr.evaluate(&[Variant::Double(5.0)]), Variant::Boolean(false));
    }

    #[test]
    fn test_division_by_zero_evaluates_to_zero() {
        let expr = typed(
            Expr::call(
                &operator::DIVIDE,
                "/",
                3,
                vec![Expr::constant("10", 0), Expr::constant("0", 5)],
            )
            .unwrap(),
            Affinity::Double,
        );
        assert_eq!(evaluate_expression(&expr, &[]), Variant::Double(0.0));
    }

    #[test]
    #[should_panic]
    fn test_row_shorter_than_header_panics() {
        Expr::column(3, "d", Affinity::Integer, 0).evaluate(&[Variant::Integer(1)]);
    }
}
