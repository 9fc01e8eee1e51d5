use matcalc_lexer::BinOp;
use matcalc_matrix::Value;

use crate::Term;

/// Rewrites every `-` acting as unary negation into the explicit term
/// `( -1 ) *`, recursing over the remainder, so the combiner only ever sees
/// binary subtraction. A minus is unary when it is not immediately preceded
/// by a number, a matrix operand or a closing bracket:
/// `[-, A, -, B]` becomes `[(, -1, ), *, A, -, B]`.
pub fn normalize_signs(expr: Vec<Term>) -> Vec<Term> {
    for idx in 0..expr.len() {
        let unary = matches!(expr[idx], Term::Op(BinOp::Sub))
            && (idx == 0 || !matches!(expr[idx - 1], Term::Value(_) | Term::RParen));
        if unary {
            let mut out = Vec::with_capacity(expr.len() + 4);
            out.extend_from_slice(&expr[..idx]);
            out.extend([
                Term::LParen,
                Term::Value(Value::Num(-1.0)),
                Term::RParen,
                Term::Op(BinOp::Mul),
            ]);
            out.extend(normalize_signs(expr[idx + 1..].to_vec()));
            return out;
        }
    }
    expr
}
