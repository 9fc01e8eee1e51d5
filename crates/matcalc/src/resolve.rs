use log::trace;
use matcalc_matrix::Value;

use crate::{combine, CalcError, Term};

/// Collapses a token sequence containing nested brackets and comma groups
/// into the ordered results of its top-level components. A single result is
/// the expression's value; multiple results form the argument list of a
/// multi-argument function call.
pub fn resolve(mut expr: Vec<Term>) -> Result<Vec<Value>, CalcError> {
    while let Some(start) = expr.iter().position(|t| matches!(t, Term::LParen)) {
        let end = find_closing_bracket(&expr, start)?;
        trace!("resolving bracketed span {start}..{end}");
        let mut inner = resolve(expr[start + 1..end].to_vec())?;
        let resolution = if inner.len() == 1 {
            Term::Value(inner.remove(0))
        } else {
            Term::List(inner)
        };
        expr.splice(start..=end, [resolution]);
    }
    split_components(expr).into_iter().map(combine).collect()
}

/// Index of the bracket matching the opening one at `start`, by depth
/// counting.
pub fn find_closing_bracket(expr: &[Term], start: usize) -> Result<usize, CalcError> {
    let mut depth = 1usize;
    for (offset, term) in expr[start + 1..].iter().enumerate() {
        match term {
            Term::LParen => depth += 1,
            Term::RParen => {
                depth -= 1;
                if depth == 0 {
                    return Ok(start + 1 + offset);
                }
            }
            _ => {}
        }
    }
    Err(CalcError::BracketMismatch)
}

/// Splits a bracket-free sequence on its top-level comma separators:
/// `[a, `,`, b, `,`, c]` becomes `[[a], [b], [c]]`.
pub fn split_components(expr: Vec<Term>) -> Vec<Vec<Term>> {
    let mut groups = Vec::new();
    let mut current = Vec::new();
    for term in expr {
        if matches!(term, Term::Comma) {
            groups.push(std::mem::take(&mut current));
        } else {
            current.push(term);
        }
    }
    groups.push(current);
    groups
}
