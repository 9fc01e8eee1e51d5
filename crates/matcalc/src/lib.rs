//! Embedded expression language for matrix arithmetic.
//!
//! An expression arrives as an ordered list of literal text fragments plus an
//! ordered list of already-evaluated operands (numbers or matrices), the way
//! a tagged template interleaves them. [`calc`] tokenizes the fragments,
//! splices the operands in at their interpolation points, rewrites unary
//! minus, reduces brackets and argument lists, and combines the remainder by
//! operator precedence:
//!
//! ```
//! use matcalc::{calc, filled, Value};
//!
//! let a = filled(2, 2, 1.0);
//! let b = filled(2, 2, 1.0);
//! let sum = calc(&["", "+", ""], vec![a.into(), b.into()]).unwrap();
//! match sum {
//!     Some(Value::Matrix(m)) => assert_eq!(m.get(0, 0).unwrap(), Some(2.0)),
//!     other => panic!("unexpected result {other:?}"),
//! }
//! ```
//!
//! An assignment form (`target = expr`) evaluates the right-hand side and
//! copies it into the target matrix through its view, so windows and filters
//! on the target restrict what is written.

mod combine;
mod error;
mod resolve;
mod scalar;
mod sign;

pub use combine::{combine, evaluate_fn, evaluate_multi_arg_fn, evaluate_op};
pub use error::CalcError;
pub use resolve::{find_closing_bracket, resolve, split_components};
pub use scalar::{nary_fn, scalar_fn, scalar_op};
pub use sign::normalize_signs;

pub use matcalc_lexer::{self as lexer, BinOp, LexError, MathFn, Token};
pub use matcalc_matrix::{
    self as matrix, filled, from_rows, mat, randu, zeros, Cell, Matrix, MatrixError, Value,
};

use log::debug;

/// Evaluation-level token: a literal token with operands spliced in, plus the
/// list form produced by resolving a comma-separated argument group.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    Value(Value),
    List(Vec<Value>),
    Op(BinOp),
    Func(MathFn),
    LParen,
    RParen,
    Comma,
    Assign,
}

impl From<Token> for Term {
    fn from(token: Token) -> Self {
        match token {
            Token::Assign => Term::Assign,
            Token::LParen => Term::LParen,
            Token::RParen => Term::RParen,
            Token::Comma => Term::Comma,
            Token::Op(op) => Term::Op(op),
            Token::Func(f) => Term::Func(f),
            Token::Number(n) => Term::Value(Value::Num(n)),
        }
    }
}

/// Tokenizes the literal fragments and splices the operands in at their
/// interpolation points: `fragment[0], operand[0], fragment[1], ...`.
/// Requires `fragments.len() == operands.len() + 1`, the tagged-template
/// contract.
pub fn tokenize_template(fragments: &[&str], operands: Vec<Value>) -> Result<Vec<Term>, CalcError> {
    if fragments.len() != operands.len() + 1 {
        return Err(CalcError::Parse(format!(
            "{} fragments require {} interpolated operands, got {}",
            fragments.len(),
            fragments.len().saturating_sub(1),
            operands.len()
        )));
    }
    let mut terms = Vec::new();
    let mut operands = operands.into_iter();
    for fragment in fragments {
        for token in matcalc_lexer::tokenize(fragment)? {
            terms.push(Term::from(token));
        }
        if let Some(value) = operands.next() {
            terms.push(Term::Value(value));
        }
    }
    Ok(terms)
}

/// Evaluates a complete expression template.
///
/// If the token after the first one is `=`, the first must be a matrix
/// operand; the remainder is evaluated and copied into it and `None` is
/// returned. Otherwise the evaluated value is returned; a single matrix
/// operand comes back as an independent copy.
pub fn calc(fragments: &[&str], operands: Vec<Value>) -> Result<Option<Value>, CalcError> {
    let expr = normalize_signs(tokenize_template(fragments, operands)?);
    debug!("evaluating expression of {} terms", expr.len());
    if matches!(expr.get(1), Some(Term::Assign)) {
        let mut target = match expr.first() {
            Some(Term::Value(Value::Matrix(m))) => m.clone(),
            _ => {
                return Err(CalcError::Parse(
                    "assignment target must be a matrix operand".to_string(),
                ))
            }
        };
        let value = single(resolve(expr[2..].to_vec())?)?;
        assign_value(&mut target, &value)?;
        Ok(None)
    } else if expr.len() > 1 {
        Ok(Some(single(resolve(expr)?)?))
    } else {
        match expr.into_iter().next() {
            Some(Term::Value(Value::Matrix(m))) => Ok(Some(Value::Matrix(m.copy()))),
            Some(Term::Value(v)) => Ok(Some(v)),
            Some(_) => Err(CalcError::Parse(
                "expression does not reduce to a value".to_string(),
            )),
            None => Err(CalcError::Parse("empty expression".to_string())),
        }
    }
}

fn single(mut values: Vec<Value>) -> Result<Value, CalcError> {
    if values.len() == 1 {
        Ok(values.remove(0))
    } else {
        Err(CalcError::Parse(
            "comma-separated list outside a function call".to_string(),
        ))
    }
}

/// Copies an evaluated value into the target view: a number fills every
/// visible target cell; a matrix copies each of its visible cells to the same
/// view-local coordinate of the target (unset source cells unset the target
/// cell). Source and target view shapes are assumed conformant.
pub fn assign_value(target: &mut Matrix, value: &Value) -> Result<(), CalcError> {
    match value {
        Value::Num(n) => {
            target.fill(*n);
        }
        Value::Matrix(src) => {
            for cell in src.iter() {
                match cell.value {
                    Some(v) => target.set(cell.row, cell.col, v)?,
                    None => target.unset(cell.row, cell.col)?,
                }
            }
        }
    }
    Ok(())
}
