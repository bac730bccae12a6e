//! Arithmetic expressions in one variable `x`.
//!
//! Function graphs carry their curve as text such as `2x^2 - 3`, `sin(x)/x`
//! or `sqrt(abs(x))`. [`Expression::parse`] turns that text into a tree once;
//! [`Expression::eval`] is then called for every sample.
//!
//! Grammar, loosest binding first:
//!
//! ```text
//! sum      = product (("+" | "-") product)*
//! product  = unary (("*" | "/") unary | power)*     ; juxtaposition multiplies
//! unary    = ("-" | "+") unary | power
//! power    = primary ("^" unary)?                   ; right associative
//! primary  = number | "(" sum ")" | call | "x" | "pi" | "e"
//! call     = name "(" sum ")"
//! ```
//!
//! Evaluation never fails: domain errors produce `NaN` or infinities, which
//! callers treat as gaps.
//!
//! Text is limited to [`MAX_LENGTH`] characters and nesting (parentheses,
//! signs and exponents) to [`MAX_DEPTH`] levels, which bounds the recursion
//! of both parsing and evaluation.

use std::f64::consts::{E, PI};

use thiserror::Error;
use winnow::{
    Parser as _,
    ascii::multispace0,
    combinator::{alt, cut_err, delimited, eof, fail, opt, peek, preceded, terminated},
    error::{ContextError, ErrMode, ModalResult},
    stream::{LocatingSlice, Location, Stateful},
    token::{one_of, take_while},
};

/// Longest accepted expression text, in characters.
pub const MAX_LENGTH: usize = 512;
/// Deepest accepted nesting of parentheses, signs and exponents.
pub const MAX_DEPTH: usize = 64;

/// Current nesting level while parsing.
#[derive(Debug, Clone, Copy, Default)]
struct Depth(usize);

type Input<'a> = Stateful<LocatingSlice<&'a str>, Depth>;
type IResult<O> = ModalResult<O, ContextError<&'static str>>;

/// An expression that failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot parse expression `{expression}` at offset {offset}: {reason}")]
pub struct ExprError {
    expression: String,
    offset: usize,
    reason: &'static str,
}

impl ExprError {
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn reason(&self) -> &'static str {
        self.reason
    }
}

/// Functions callable by name inside an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Func {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sqrt,
    Abs,
    /// Natural logarithm.
    Ln,
    /// Base-10 logarithm.
    Log,
    Exp,
    Floor,
    Ceil,
}

impl Func {
    fn from_name(name: &str) -> Option<Self> {
        let func = match name {
            "sin" => Self::Sin,
            "cos" => Self::Cos,
            "tan" => Self::Tan,
            "asin" | "arcsin" => Self::Asin,
            "acos" | "arccos" => Self::Acos,
            "atan" | "arctan" => Self::Atan,
            "sqrt" => Self::Sqrt,
            "abs" => Self::Abs,
            "ln" => Self::Ln,
            "log" => Self::Log,
            "exp" => Self::Exp,
            "floor" => Self::Floor,
            "ceil" => Self::Ceil,
            _ => return None,
        };
        Some(func)
    }

    fn apply(self, value: f64) -> f64 {
        match self {
            Self::Sin => value.sin(),
            Self::Cos => value.cos(),
            Self::Tan => value.tan(),
            Self::Asin => value.asin(),
            Self::Acos => value.acos(),
            Self::Atan => value.atan(),
            Self::Sqrt => value.sqrt(),
            Self::Abs => value.abs(),
            Self::Ln => value.ln(),
            Self::Log => value.log10(),
            Self::Exp => value.exp(),
            Self::Floor => value.floor(),
            Self::Ceil => value.ceil(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Number(f64),
    Variable,
    Negate(Box<Node>),
    Binary(BinaryOp, Box<Node>, Box<Node>),
    Call(Func, Box<Node>),
}

impl Node {
    fn binary(op: BinaryOp, lhs: Node, rhs: Node) -> Self {
        Self::Binary(op, Box::new(lhs), Box::new(rhs))
    }

    fn eval(&self, x: f64) -> f64 {
        match self {
            Self::Number(value) => *value,
            Self::Variable => x,
            Self::Negate(inner) => -inner.eval(x),
            Self::Binary(op, lhs, rhs) => {
                let (a, b) = (lhs.eval(x), rhs.eval(x));
                match op {
                    BinaryOp::Add => a + b,
                    BinaryOp::Sub => a - b,
                    BinaryOp::Mul => a * b,
                    BinaryOp::Div => a / b,
                    BinaryOp::Pow => a.powf(b),
                }
            }
            Self::Call(func, arg) => func.apply(arg.eval(x)),
        }
    }
}

/// A parsed expression in `x`.
///
/// # Examples
///
/// ```
/// use lessonviz::expr::Expression;
///
/// let expr = Expression::parse("2x^2 - 3").unwrap();
/// assert_eq!(expr.eval(2.0), 5.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    root: Node,
}

impl Expression {
    /// Parses expression text.
    ///
    /// # Errors
    ///
    /// Returns an [`ExprError`] naming the offset where parsing stopped when
    /// the text is not a complete expression.
    pub fn parse(text: &str) -> Result<Self, ExprError> {
        if let Some((offset, _)) = text.char_indices().nth(MAX_LENGTH) {
            return Err(ExprError {
                expression: text.to_string(),
                offset,
                reason: "expression longer than 512 characters",
            });
        }
        let mut input = Input {
            input: LocatingSlice::new(text),
            state: Depth::default(),
        };
        let result = terminated(sum, (multispace0, eof.context("end of expression"))).parse_next(&mut input);
        match result {
            Ok(root) => Ok(Self { root }),
            Err(err) => {
                let context = match err {
                    ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx,
                    ErrMode::Incomplete(_) => ContextError::new(),
                };
                Err(ExprError {
                    expression: text.to_string(),
                    offset: input.current_token_start(),
                    reason: context.context().next().copied().unwrap_or("unexpected input"),
                })
            }
        }
    }

    /// Evaluates the expression at `x`.
    pub fn eval(&self, x: f64) -> f64 {
        self.root.eval(x)
    }
}

fn sum(input: &mut Input<'_>) -> IResult<Node> {
    let mut node = product.parse_next(input)?;
    while let Some(op) = opt(preceded(multispace0, one_of(['+', '-']))).parse_next(input)? {
        let rhs = cut_err(product).context("operand").parse_next(input)?;
        let op = if op == '+' { BinaryOp::Add } else { BinaryOp::Sub };
        node = Node::binary(op, node, rhs);
    }
    Ok(node)
}

fn product(input: &mut Input<'_>) -> IResult<Node> {
    let mut node = unary.parse_next(input)?;
    loop {
        if let Some(op) = opt(preceded(multispace0, one_of(['*', '/']))).parse_next(input)? {
            let rhs = cut_err(unary).context("operand").parse_next(input)?;
            let op = if op == '*' { BinaryOp::Mul } else { BinaryOp::Div };
            node = Node::binary(op, node, rhs);
            continue;
        }
        let juxtaposed = opt(peek(preceded(
            multispace0,
            one_of(|c: char| c.is_ascii_alphabetic() || c == '('),
        )))
        .parse_next(input)?;
        if juxtaposed.is_none() {
            return Ok(node);
        }
        let rhs = power.parse_next(input)?;
        node = Node::binary(BinaryOp::Mul, node, rhs);
    }
}

/// Every recursive rule passes through [`unary`], so its nesting level is the
/// nesting level of the expression.
fn unary(input: &mut Input<'_>) -> IResult<Node> {
    if input.state.0 >= MAX_DEPTH {
        return cut_err(fail).context("expression nested too deeply").parse_next(input);
    }
    input.state.0 += 1;
    let result = signed(input);
    input.state.0 -= 1;
    result
}

fn signed(input: &mut Input<'_>) -> IResult<Node> {
    let sign = opt(preceded(multispace0, one_of(['-', '+']))).parse_next(input)?;
    match sign {
        Some('-') => Ok(Node::Negate(Box::new(cut_err(unary).context("operand").parse_next(input)?))),
        Some(_) => cut_err(unary).context("operand").parse_next(input),
        None => power.parse_next(input),
    }
}

fn power(input: &mut Input<'_>) -> IResult<Node> {
    let base = primary.parse_next(input)?;
    if opt(preceded(multispace0, '^')).parse_next(input)?.is_some() {
        let exponent = cut_err(unary).context("exponent").parse_next(input)?;
        return Ok(Node::binary(BinaryOp::Pow, base, exponent));
    }
    Ok(base)
}

fn primary(input: &mut Input<'_>) -> IResult<Node> {
    preceded(multispace0, alt((number, parenthesized, call, name)))
        .context("number, `x` or `(`")
        .parse_next(input)
}

fn number(input: &mut Input<'_>) -> IResult<Node> {
    take_while(1.., |c: char| c.is_ascii_digit() || c == '.')
        .try_map(str::parse::<f64>)
        .map(Node::Number)
        .parse_next(input)
}

fn parenthesized(input: &mut Input<'_>) -> IResult<Node> {
    delimited(
        '(',
        cut_err(sum),
        cut_err(preceded(multispace0, ')')).context("closing `)`"),
    )
    .parse_next(input)
}

fn identifier<'a>(input: &mut Input<'a>) -> IResult<&'a str> {
    take_while(1.., |c: char| c.is_ascii_alphabetic()).parse_next(input)
}

fn call(input: &mut Input<'_>) -> IResult<Node> {
    (
        identifier.verify_map(Func::from_name),
        preceded(multispace0, parenthesized),
    )
        .map(|(func, arg)| Node::Call(func, Box::new(arg)))
        .parse_next(input)
}

fn name(input: &mut Input<'_>) -> IResult<Node> {
    identifier
        .verify_map(|name| match name {
            "x" | "X" => Some(Node::Variable),
            "pi" | "PI" => Some(Node::Number(PI)),
            "e" => Some(Node::Number(E)),
            _ => None,
        })
        .parse_next(input)
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    fn eval(text: &str, x: f64) -> f64 {
        Expression::parse(text).unwrap().eval(x)
    }

    #[test]
    fn test_linear() {
        assert_approx_eq!(f64, eval("2*x + 1", 3.0), 7.0);
        assert_approx_eq!(f64, eval("  2 * x+1 ", -1.0), -1.0);
    }

    #[test]
    fn test_precedence() {
        assert_approx_eq!(f64, eval("1 + 2 * 3", 0.0), 7.0);
        assert_approx_eq!(f64, eval("(1 + 2) * 3", 0.0), 9.0);
        assert_approx_eq!(f64, eval("10 - 4 - 3", 0.0), 3.0);
        assert_approx_eq!(f64, eval("12 / 3 / 2", 0.0), 2.0);
    }

    #[test]
    fn test_power_is_right_associative() {
        assert_approx_eq!(f64, eval("2^3^2", 0.0), 512.0);
        assert_approx_eq!(f64, eval("x^2", -3.0), 9.0);
    }

    #[test]
    fn test_unary_minus_binds_looser_than_power() {
        assert_approx_eq!(f64, eval("-x^2", 3.0), -9.0);
        assert_approx_eq!(f64, eval("2^-1", 0.0), 0.5);
        assert_approx_eq!(f64, eval("--x", 4.0), 4.0);
    }

    #[test]
    fn test_implicit_multiplication() {
        assert_approx_eq!(f64, eval("2x", 5.0), 10.0);
        assert_approx_eq!(f64, eval("3(x+1)", 1.0), 6.0);
        assert_approx_eq!(f64, eval("2x^2", 3.0), 18.0);
        assert_approx_eq!(f64, eval("2 sin(x)", 0.0), 0.0);
        assert_approx_eq!(f64, eval("(x+1)(x-1)", 3.0), 8.0);
    }

    #[test]
    fn test_functions_and_constants() {
        assert_approx_eq!(f64, eval("sin(x)", PI / 2.0), 1.0);
        assert_approx_eq!(f64, eval("cos(pi)", 0.0), -1.0);
        assert_approx_eq!(f64, eval("sqrt(abs(x))", -16.0), 4.0);
        assert_approx_eq!(f64, eval("ln(e)", 0.0), 1.0);
        assert_approx_eq!(f64, eval("log(1000)", 0.0), 3.0);
        assert_approx_eq!(f64, eval("floor(x) + ceil(x)", 1.5), 3.0);
        assert_approx_eq!(f64, eval("exp(0)", 0.0), 1.0);
    }

    #[test]
    fn test_domain_errors_are_not_finite() {
        assert!(eval("1/x", 0.0).is_infinite());
        assert!(eval("sqrt(x)", -1.0).is_nan());
    }

    #[test]
    fn test_rejects_unbalanced_parentheses() {
        let err = Expression::parse("(x + 1").unwrap_err();
        assert_eq!(err.reason(), "closing `)`");
        assert!(Expression::parse("x + 1)").is_err());
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(Expression::parse("").is_err());
        assert!(Expression::parse("x +").is_err());
        assert!(Expression::parse("foo(x)").is_err());
        assert!(Expression::parse("y + 1").is_err());
        assert!(Expression::parse("1..2").is_err());
    }

    #[test]
    fn test_error_message_names_expression() {
        let err = Expression::parse("x + * 2").unwrap_err();
        assert!(err.to_string().contains("`x + * 2`"));
        assert!(err.offset() <= "x + * 2".len());
    }

    #[test]
    fn test_rejects_deep_nesting() {
        let deep = format!("{}x{}", "(".repeat(200), ")".repeat(200));
        let err = Expression::parse(&deep).unwrap_err();
        assert_eq!(err.reason(), "expression nested too deeply");

        let signs = format!("{}x", "-".repeat(100));
        assert_eq!(Expression::parse(&signs).unwrap_err().reason(), "expression nested too deeply");

        let shallow = format!("{}x{}", "(".repeat(20), ")".repeat(20));
        assert_eq!(eval(&shallow, 3.0), 3.0);
    }

    #[test]
    fn test_rejects_long_text() {
        let nested = format!("{}x{}", "(".repeat(3000), ")".repeat(3000));
        let err = Expression::parse(&nested).unwrap_err();
        assert_eq!(err.offset(), MAX_LENGTH);

        let sum = vec!["1"; 300].join("+");
        assert!(Expression::parse(&sum).is_err());
        let sum = vec!["1"; 200].join("+");
        assert_eq!(eval(&sum, 0.0), 200.0);
    }
}
