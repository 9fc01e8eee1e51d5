use log::trace;
use matcalc_lexer::{BinOp, MathFn};
use matcalc_matrix::{filled, mat, Matrix, Value};

use crate::scalar::{nary_fn, scalar_fn, scalar_op};
use crate::{CalcError, Term};

/// Reduces a bracket-free, comma-free term sequence to a single value.
///
/// Function applications bind tightest and are reduced rightmost-first, so
/// an adjacent chain applies inside-out; each function consumes exactly its
/// right-hand operand. The binary operator classes then reduce in the fixed
/// precedence order, leftmost occurrence first within each class, which gives
/// left-associativity within a class and strict precedence across classes.
pub fn combine(mut expr: Vec<Term>) -> Result<Value, CalcError> {
    loop {
        let func_at = expr.iter().enumerate().rev().find_map(|(idx, t)| match t {
            Term::Func(f) => Some((idx, *f)),
            _ => None,
        });
        let Some((idx, func)) = func_at else { break };
        let arg = expr
            .get(idx + 1)
            .cloned()
            .ok_or_else(|| CalcError::Parse(format!("function `{func}` is missing its argument")))?;
        trace!("applying function `{func}`");
        let result = evaluate_fn(func, &arg)?;
        expr.splice(idx..=idx + 1, [Term::Value(result)]);
    }

    for op in BinOp::PRECEDENCE {
        while let Some(idx) = expr
            .iter()
            .position(|t| matches!(t, Term::Op(o) if *o == op))
        {
            if idx == 0 || idx + 1 >= expr.len() {
                return Err(CalcError::Parse(format!(
                    "operator `{op}` is missing an operand"
                )));
            }
            let lhs = operand_at(&expr, idx - 1, op)?;
            let rhs = operand_at(&expr, idx + 1, op)?;
            trace!("reducing `{op}` at {idx}");
            let result = evaluate_op(op, &lhs, &rhs)?;
            expr.splice(idx - 1..=idx + 1, [Term::Value(result)]);
        }
    }

    if expr.len() != 1 {
        return Err(CalcError::Parse(
            "expression does not reduce to a single value".to_string(),
        ));
    }
    match expr.remove(0) {
        Term::Value(v) => Ok(v),
        Term::List(_) => Err(CalcError::Parse(
            "argument list used outside a function call".to_string(),
        )),
        _ => Err(CalcError::Parse(
            "expression does not reduce to a value".to_string(),
        )),
    }
}

fn operand_at(expr: &[Term], idx: usize, op: BinOp) -> Result<Value, CalcError> {
    match &expr[idx] {
        Term::Value(v) => Ok(v.clone()),
        _ => Err(CalcError::Parse(format!(
            "operator `{op}` applied to a non-value operand"
        ))),
    }
}

/// Evaluates one binary operator application.
///
/// Number-number follows ordinary scalar arithmetic. A number paired with a
/// matrix broadcasts to the matrix's shape; `*` and `%` short-circuit that
/// broadcast into a direct per-cell scalar multiplication.
pub fn evaluate_op(op: BinOp, lhs: &Value, rhs: &Value) -> Result<Value, CalcError> {
    let (l, r) = match (lhs, rhs) {
        (Value::Num(a), Value::Num(b)) => return Ok(Value::Num(scalar_op(op, *a, *b))),
        (Value::Num(s), Value::Matrix(m)) | (Value::Matrix(m), Value::Num(s))
            if matches!(op, BinOp::Mul | BinOp::ElemMul) =>
        {
            let s = *s;
            return Ok(Value::Matrix(
                m.apply(move |v, _, _| v.unwrap_or(f64::NAN) * s)?,
            ));
        }
        (Value::Num(s), Value::Matrix(m)) => (filled(m.rows(), m.cols(), *s), m.clone()),
        (Value::Matrix(m), Value::Num(s)) => (m.clone(), filled(m.rows(), m.cols(), *s)),
        (Value::Matrix(a), Value::Matrix(b)) => (a.clone(), b.clone()),
    };
    let out = match op {
        BinOp::Pow => l.power(&r)?,
        BinOp::Div => l.divide(&r)?,
        BinOp::Mul => l.times(&r)?,
        BinOp::ElemMul => l.elem_w_times(&r)?,
        BinOp::Sub => l.minus(&r)?,
        BinOp::Add => l.plus(&r)?,
    };
    Ok(Value::Matrix(out))
}

/// Evaluates one function application against its resolved argument.
///
/// A matrix argument maps the function over its visible cells; a number is
/// evaluated natively; an argument list without matrices is evaluated by the
/// native n-ary function (two- and three-argument `max`/`min`/`pow`); a list
/// containing a matrix broadcasts every scalar element to that shape and
/// evaluates per cell in lockstep across all arguments.
pub fn evaluate_fn(func: MathFn, arg: &Term) -> Result<Value, CalcError> {
    match arg {
        Term::Value(Value::Num(n)) => Ok(Value::Num(scalar_fn(func, *n))),
        Term::Value(Value::Matrix(m)) => Ok(Value::Matrix(
            m.apply(|v, _, _| scalar_fn(func, v.unwrap_or(f64::NAN)))?,
        )),
        Term::List(args) => {
            let first_matrix = args.iter().find_map(|v| match v {
                Value::Matrix(m) => Some(m),
                Value::Num(_) => None,
            });
            match first_matrix {
                None => {
                    let nums: Vec<f64> = args
                        .iter()
                        .filter_map(|v| match v {
                            Value::Num(n) => Some(*n),
                            Value::Matrix(_) => None,
                        })
                        .collect();
                    Ok(Value::Num(nary_fn(func, &nums)))
                }
                Some(first) => {
                    let mats: Vec<Matrix> = args
                        .iter()
                        .map(|v| match v {
                            Value::Num(n) => filled(first.rows(), first.cols(), *n),
                            Value::Matrix(m) => m.clone(),
                        })
                        .collect();
                    Ok(Value::Matrix(evaluate_multi_arg_fn(func, &mats)?))
                }
            }
        }
        _ => Err(CalcError::Parse(format!(
            "function `{func}` applied to a non-value argument"
        ))),
    }
}

/// Evaluates `func` cell-by-cell across several same-shaped matrices,
/// producing one output cell per coordinate.
pub fn evaluate_multi_arg_fn(func: MathFn, args: &[Matrix]) -> Result<Matrix, CalcError> {
    let first = args.first().ok_or_else(|| {
        CalcError::Parse(format!("function `{func}` called with an empty argument list"))
    })?;
    let mut out = mat(first.rows(), first.cols());
    for row in 0..out.rows() {
        for col in 0..out.cols() {
            let mut cell_args = Vec::with_capacity(args.len());
            for m in args {
                cell_args.push(m.get(row, col)?.unwrap_or(f64::NAN));
            }
            out.set(row, col, nary_fn(func, &cell_args))?;
        }
    }
    Ok(out)
}
