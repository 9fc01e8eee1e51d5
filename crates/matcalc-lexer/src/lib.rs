use std::fmt;

use logos::Logos;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Binary operators of the expression surface.
///
/// The declaration order defines the operator precedence, highest first.
/// `%` is element-wise multiplication, `*` is the linear-algebra product;
/// between plain numbers both degenerate to multiplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinOp {
    Pow,
    Div,
    Mul,
    ElemMul,
    Sub,
    Add,
}

impl BinOp {
    /// Precedence classes in evaluation order. The combiner walks this list
    /// once per reduction instead of re-sorting the catalog per call.
    pub const PRECEDENCE: [BinOp; 6] = [
        BinOp::Pow,
        BinOp::Div,
        BinOp::Mul,
        BinOp::ElemMul,
        BinOp::Sub,
        BinOp::Add,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Pow => "^",
            BinOp::Div => "/",
            BinOp::Mul => "*",
            BinOp::ElemMul => "%",
            BinOp::Sub => "-",
            BinOp::Add => "+",
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// The fixed catalog of built-in math functions.
///
/// All of them consume a single right-hand argument; `max`, `min` and `pow`
/// additionally accept a comma-separated argument list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MathFn {
    Abs,
    Acos,
    Acosh,
    Asin,
    Asinh,
    Atan,
    Atanh,
    Ceil,
    Cbrt,
    Cos,
    Cosh,
    Exp,
    Floor,
    Log,
    Log1p,
    Log2,
    Log10,
    Max,
    Min,
    Pow,
    Round,
    Sign,
    Sin,
    Sinh,
    Sqrt,
    Tan,
    Tanh,
    Trunc,
}

impl MathFn {
    pub fn name(self) -> &'static str {
        match self {
            MathFn::Abs => "abs",
            MathFn::Acos => "acos",
            MathFn::Acosh => "acosh",
            MathFn::Asin => "asin",
            MathFn::Asinh => "asinh",
            MathFn::Atan => "atan",
            MathFn::Atanh => "atanh",
            MathFn::Ceil => "ceil",
            MathFn::Cbrt => "cbrt",
            MathFn::Cos => "cos",
            MathFn::Cosh => "cosh",
            MathFn::Exp => "exp",
            MathFn::Floor => "floor",
            MathFn::Log => "log",
            MathFn::Log1p => "log1p",
            MathFn::Log2 => "log2",
            MathFn::Log10 => "log10",
            MathFn::Max => "max",
            MathFn::Min => "min",
            MathFn::Pow => "pow",
            MathFn::Round => "round",
            MathFn::Sign => "sign",
            MathFn::Sin => "sin",
            MathFn::Sinh => "sinh",
            MathFn::Sqrt => "sqrt",
            MathFn::Tan => "tan",
            MathFn::Tanh => "tanh",
            MathFn::Trunc => "trunc",
        }
    }
}

impl fmt::Display for MathFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Literal tokens of an expression fragment.
///
/// The catalog is compiled into a single automaton, so `sinh` wins over its
/// prefix `sin` by longest match without any runtime symbol sorting.
/// Whitespace is insignificant.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
pub enum Token {
    #[token("=")]
    Assign,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,

    #[token("^", |_| BinOp::Pow)]
    #[token("/", |_| BinOp::Div)]
    #[token("*", |_| BinOp::Mul)]
    #[token("%", |_| BinOp::ElemMul)]
    #[token("-", |_| BinOp::Sub)]
    #[token("+", |_| BinOp::Add)]
    Op(BinOp),

    #[token("abs", |_| MathFn::Abs)]
    #[token("acos", |_| MathFn::Acos)]
    #[token("acosh", |_| MathFn::Acosh)]
    #[token("asin", |_| MathFn::Asin)]
    #[token("asinh", |_| MathFn::Asinh)]
    #[token("atan", |_| MathFn::Atan)]
    #[token("atanh", |_| MathFn::Atanh)]
    #[token("ceil", |_| MathFn::Ceil)]
    #[token("cbrt", |_| MathFn::Cbrt)]
    #[token("cos", |_| MathFn::Cos)]
    #[token("cosh", |_| MathFn::Cosh)]
    #[token("exp", |_| MathFn::Exp)]
    #[token("floor", |_| MathFn::Floor)]
    #[token("log", |_| MathFn::Log)]
    #[token("log1p", |_| MathFn::Log1p)]
    #[token("log2", |_| MathFn::Log2)]
    #[token("log10", |_| MathFn::Log10)]
    #[token("max", |_| MathFn::Max)]
    #[token("min", |_| MathFn::Min)]
    #[token("pow", |_| MathFn::Pow)]
    #[token("round", |_| MathFn::Round)]
    #[token("sign", |_| MathFn::Sign)]
    #[token("sin", |_| MathFn::Sin)]
    #[token("sinh", |_| MathFn::Sinh)]
    #[token("sqrt", |_| MathFn::Sqrt)]
    #[token("tan", |_| MathFn::Tan)]
    #[token("tanh", |_| MathFn::Tanh)]
    #[token("trunc", |_| MathFn::Trunc)]
    Func(MathFn),

    #[regex(r"(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?", |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),
}

/// Raised when a residual piece of a fragment is neither a catalog symbol
/// nor a decimal numeral.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot parse `{0}` as an operator, function or number")]
pub struct LexError(pub String);

/// Tokenizes one literal fragment of an expression template.
pub fn tokenize(src: &str) -> Result<Vec<Token>, LexError> {
    let mut lex = Token::lexer(src);
    let mut out = Vec::new();
    while let Some(res) = lex.next() {
        match res {
            Ok(token) => out.push(token),
            Err(()) => return Err(LexError(lex.slice().to_string())),
        }
    }
    Ok(out)
}
