//! Native scalar arithmetic behind operators and the function catalog.

use matcalc_lexer::{BinOp, MathFn};

/// Scalar evaluation of one binary operator. Between plain numbers both `*`
/// and `%` are multiplication.
pub fn scalar_op(op: BinOp, lhs: f64, rhs: f64) -> f64 {
    match op {
        BinOp::Pow => lhs.powf(rhs),
        BinOp::Div => lhs / rhs,
        BinOp::Mul | BinOp::ElemMul => lhs * rhs,
        BinOp::Sub => lhs - rhs,
        BinOp::Add => lhs + rhs,
    }
}

/// Scalar evaluation of one catalog function against a single argument.
/// `log` is the natural logarithm; `max`/`min` of one argument are the
/// identity; `pow` needs a second argument and yields NaN without one.
pub fn scalar_fn(func: MathFn, x: f64) -> f64 {
    match func {
        MathFn::Abs => x.abs(),
        MathFn::Acos => x.acos(),
        MathFn::Acosh => x.acosh(),
        MathFn::Asin => x.asin(),
        MathFn::Asinh => x.asinh(),
        MathFn::Atan => x.atan(),
        MathFn::Atanh => x.atanh(),
        MathFn::Ceil => x.ceil(),
        MathFn::Cbrt => x.cbrt(),
        MathFn::Cos => x.cos(),
        MathFn::Cosh => x.cosh(),
        MathFn::Exp => x.exp(),
        MathFn::Floor => x.floor(),
        MathFn::Log => x.ln(),
        MathFn::Log1p => x.ln_1p(),
        MathFn::Log2 => x.log2(),
        MathFn::Log10 => x.log10(),
        MathFn::Max | MathFn::Min => x,
        MathFn::Pow => f64::NAN,
        MathFn::Round => x.round(),
        // signum(0.0) is 1.0, but the catalog's sign keeps zero (and its
        // sign bit) as-is.
        MathFn::Sign => {
            if x == 0.0 {
                x
            } else {
                x.signum()
            }
        }
        MathFn::Sin => x.sin(),
        MathFn::Sinh => x.sinh(),
        MathFn::Sqrt => x.sqrt(),
        MathFn::Tan => x.tan(),
        MathFn::Tanh => x.tanh(),
        MathFn::Trunc => x.trunc(),
    }
}

/// N-ary scalar evaluation for argument lists. `max` and `min` reduce over
/// all arguments and poison on NaN; `pow` uses the first two arguments;
/// every other function applies to the first argument, extras ignored.
pub fn nary_fn(func: MathFn, args: &[f64]) -> f64 {
    match func {
        MathFn::Max => reduce_extreme(args, f64::NEG_INFINITY, f64::max),
        MathFn::Min => reduce_extreme(args, f64::INFINITY, f64::min),
        MathFn::Pow => {
            let base = args.first().copied().unwrap_or(f64::NAN);
            let exp = args.get(1).copied().unwrap_or(f64::NAN);
            base.powf(exp)
        }
        _ => args
            .first()
            .copied()
            .map(|x| scalar_fn(func, x))
            .unwrap_or(f64::NAN),
    }
}

fn reduce_extreme(args: &[f64], init: f64, pick: fn(f64, f64) -> f64) -> f64 {
    let mut best = init;
    for &v in args {
        if v.is_nan() {
            return f64::NAN;
        }
        best = pick(best, v);
    }
    best
}
