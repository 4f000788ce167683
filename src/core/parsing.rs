use std::{
    collections::HashMap,
    f64::consts::{E, PI},
};

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, multispace0, satisfy},
    combinator::{all_consuming, map, opt, recognize},
    multi::{many0, separated_list1},
    number::complete::double,
    sequence::{delimited, pair, preceded, separated_pair},
    IResult,
};

use crate::errors::ParseError;

pub const VALID_VARIABLE_SYMBOLS: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyzαβγεζηϝθλμνξρστωψφυ";

/// Deepest nesting of parentheses, signs and exponents accepted in one expression.
pub const MAX_NESTING: usize = 64;

type UnaryFn = fn(f64) -> f64;

/// Names available while compiling an expression: variables bound to argument
/// slots, named constants and single argument functions.
#[derive(Debug, Clone)]
pub struct DefaultContext {
    vars: HashMap<String, usize>,
    consts: HashMap<String, f64>,
    funcs: HashMap<String, UnaryFn>,
}

impl Default for DefaultContext {
    fn default() -> Self {
        let mut consts = HashMap::new();
        consts.insert("pi".to_string(), PI);
        consts.insert("π".to_string(), PI);
        consts.insert("e".to_string(), E);

        let builtins: [(&str, UnaryFn); 16] = [
            ("sin", f64::sin),
            ("cos", f64::cos),
            ("tan", f64::tan),
            ("asin", f64::asin),
            ("acos", f64::acos),
            ("atan", f64::atan),
            ("sinh", f64::sinh),
            ("cosh", f64::cosh),
            ("tanh", f64::tanh),
            ("asinh", f64::asinh),
            ("acosh", f64::acosh),
            ("atanh", f64::atanh),
            ("sqrt", f64::sqrt),
            ("abs", f64::abs),
            ("ln", f64::ln),
            ("exp", f64::exp),
        ];
        let funcs = builtins
            .into_iter()
            .map(|(name, func)| (name.to_string(), func))
            .collect();

        Self {
            vars: HashMap::new(),
            consts,
            funcs,
        }
    }
}

impl DefaultContext {
    /// Binds `name` to argument slot `index` of [`CompiledExpression::eval`].
    pub fn add_var(&mut self, name: &str, index: usize) -> Result<(), ParseError> {
        if name.is_empty() || !name.chars().all(|c| VALID_VARIABLE_SYMBOLS.contains(c)) {
            return Err(ParseError::InvalidVariable {
                var: name.to_string(),
            });
        }
        if self.vars.contains_key(name) || self.consts.contains_key(name) {
            return Err(ParseError::VariableTaken {
                var: name.to_string(),
                in_var_decs: true,
            });
        }
        if self.funcs.contains_key(name) {
            return Err(ParseError::VariableTaken {
                var: name.to_string(),
                in_var_decs: false,
            });
        }
        self.vars.insert(name.to_string(), index);
        Ok(())
    }

    fn arity(&self) -> usize {
        self.vars.values().map(|i| i + 1).max().unwrap_or(0)
    }
}

#[derive(Debug, Clone)]
enum Expr {
    Num(f64),
    Var(usize),
    Neg(Box<Expr>),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Pow(Box<Expr>, Box<Expr>),
    Call(UnaryFn, Box<Expr>),
}

impl Expr {
    fn is_constant(&self) -> bool {
        match self {
            Expr::Num(_) => true,
            Expr::Var(_) => false,
            Expr::Neg(e) | Expr::Call(_, e) => e.is_constant(),
            Expr::Add(l, r)
            | Expr::Sub(l, r)
            | Expr::Mul(l, r)
            | Expr::Div(l, r)
            | Expr::Pow(l, r) => l.is_constant() && r.is_constant(),
        }
    }

    fn eval(&self, xv: &[f64]) -> f64 {
        match self {
            Expr::Num(v) => *v,
            Expr::Var(i) => xv.get(*i).copied().unwrap_or(f64::NAN),
            Expr::Neg(e) => -e.eval(xv),
            Expr::Add(l, r) => l.eval(xv) + r.eval(xv),
            Expr::Sub(l, r) => l.eval(xv) - r.eval(xv),
            Expr::Mul(l, r) => l.eval(xv) * r.eval(xv),
            Expr::Div(l, r) => l.eval(xv) / r.eval(xv),
            Expr::Pow(l, r) => l.eval(xv).powf(r.eval(xv)),
            Expr::Call(func, e) => func(e.eval(xv)),
        }
    }
}

/// An expression compiled against a [`DefaultContext`].
#[derive(Debug, Clone)]
pub struct CompiledExpression {
    expr: Expr,
    arity: usize,
}

impl CompiledExpression {
    /// Evaluates the expression with variable slot `i` set to `xv[i]`.
    /// Slots missing from `xv` evaluate to NaN.
    pub fn eval(&self, xv: &[f64]) -> f64 {
        self.expr.eval(xv)
    }

    /// The number of argument slots referenced by the context it was compiled in.
    pub fn arity(&self) -> usize {
        self.arity
    }
}

/* Grammar */

// Identifiers are resolved after parsing so errors can name them.
#[derive(Debug, Clone)]
enum Raw {
    Num(f64),
    Ident(String),
    Neg(Box<Raw>),
    Bin(char, Box<Raw>, Box<Raw>),
    Call(String, Box<Raw>),
}

fn ws<'a, O>(
    inner: impl FnMut(&'a str) -> IResult<&'a str, O>,
) -> impl FnMut(&'a str) -> IResult<&'a str, O> {
    delimited(multispace0, inner, multispace0)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|c| c.is_alphabetic() || c == '_' || VALID_VARIABLE_SYMBOLS.contains(c)),
        many0(satisfy(|c| c.is_alphanumeric() || c == '_')),
    ))(input)
}

fn atom<'a>(input: &'a str, depth: usize) -> IResult<&'a str, Raw> {
    ws(alt((
        map(
            pair(
                identifier,
                opt(delimited(ws(char('(')), move |i: &'a str| expr(i, depth), char(')'))),
            ),
            |(name, arg)| match arg {
                Some(arg) => Raw::Call(name.to_string(), Box::new(arg)),
                None => Raw::Ident(name.to_string()),
            },
        ),
        map(double, Raw::Num),
        delimited(char('('), move |i: &'a str| expr(i, depth), char(')')),
    )))(input)
}

fn power<'a>(input: &'a str, depth: usize) -> IResult<&'a str, Raw> {
    let (input, base) = atom(input, depth)?;
    let (input, exp) = opt(preceded(
        alt((tag("**"), tag("^"))),
        move |i: &'a str| unary(i, depth),
    ))(input)?;
    Ok(match exp {
        Some(exp) => (input, Raw::Bin('^', Box::new(base), Box::new(exp))),
        None => (input, base),
    })
}

// Every recursive path of the grammar (signs, exponents, parentheses) passes
// through here, so this is the only place the nesting depth grows.
fn unary<'a>(input: &'a str, depth: usize) -> IResult<&'a str, Raw> {
    if depth >= MAX_NESTING {
        return Err(nom::Err::Failure(nom::error::Error::new(
            input,
            nom::error::ErrorKind::TooLarge,
        )));
    }
    let depth = depth + 1;
    alt((
        map(
            preceded(ws(char('-')), move |i: &'a str| unary(i, depth)),
            |e| Raw::Neg(Box::new(e)),
        ),
        preceded(ws(char('+')), move |i: &'a str| unary(i, depth)),
        move |i: &'a str| power(i, depth),
    ))(input)
}

fn fold_binary<'a>(
    input: &'a str,
    depth: usize,
    operand: fn(&'a str, usize) -> IResult<&'a str, Raw>,
    ops: (char, char),
) -> IResult<&'a str, Raw> {
    let (input, first) = operand(input, depth)?;
    let (input, rest) = many0(pair(
        ws(alt((char(ops.0), char(ops.1)))),
        move |i: &'a str| operand(i, depth),
    ))(input)?;
    Ok((
        input,
        rest.into_iter()
            .fold(first, |acc, (op, rhs)| Raw::Bin(op, Box::new(acc), Box::new(rhs))),
    ))
}

fn term(input: &str, depth: usize) -> IResult<&str, Raw> {
    // `**` is consumed by `power` before `*` is tried here.
    fold_binary(input, depth, unary, ('*', '/'))
}

fn expr(input: &str, depth: usize) -> IResult<&str, Raw> {
    fold_binary(input, depth, term, ('+', '-'))
}

fn top_expr(input: &str) -> IResult<&str, Raw> {
    expr(input, 0)
}

fn interval(input: &str) -> IResult<&str, (Raw, Raw)> {
    ws(delimited(
        char('['),
        separated_pair(top_expr, char(','), top_expr),
        char(']'),
    ))(input)
}

fn syntax_error(err: nom::Err<nom::error::Error<&str>>) -> ParseError {
    match err {
        nom::Err::Error(e) | nom::Err::Failure(e) => {
            if e.code == nom::error::ErrorKind::TooLarge {
                ParseError::NestingTooDeep { limit: MAX_NESTING }
            } else if e.code == nom::error::ErrorKind::Eof {
                ParseError::TrailingInput {
                    rest: e.input.to_string(),
                }
            } else {
                ParseError::Syntax {
                    near: e.input.to_string(),
                }
            }
        }
        nom::Err::Incomplete(_) => ParseError::Syntax {
            near: String::new(),
        },
    }
}

fn resolve(raw: Raw, ctx: &DefaultContext) -> Result<Expr, ParseError> {
    Ok(match raw {
        Raw::Num(v) => Expr::Num(v),
        Raw::Ident(name) => {
            if let Some(&i) = ctx.vars.get(&name) {
                Expr::Var(i)
            } else if let Some(&v) = ctx.consts.get(&name) {
                Expr::Num(v)
            } else {
                return Err(ParseError::UnknownIdentifier { name });
            }
        }
        Raw::Neg(e) => Expr::Neg(Box::new(resolve(*e, ctx)?)),
        Raw::Call(name, arg) => match ctx.funcs.get(&name) {
            Some(&func) => Expr::Call(func, Box::new(resolve(*arg, ctx)?)),
            None => return Err(ParseError::UnknownFunction { name }),
        },
        Raw::Bin(op, l, r) => {
            let l = Box::new(resolve(*l, ctx)?);
            let r = Box::new(resolve(*r, ctx)?);
            match op {
                '+' => Expr::Add(l, r),
                '-' => Expr::Sub(l, r),
                '*' => Expr::Mul(l, r),
                '/' => Expr::Div(l, r),
                _ => Expr::Pow(l, r),
            }
        }
    })
}

/// Compiles `expr_str` into an evaluable expression over the variables of `ctx`.
pub fn compile_expression(
    expr_str: &str,
    ctx: &DefaultContext,
) -> Result<CompiledExpression, ParseError> {
    let (_, raw) = all_consuming(top_expr)(expr_str).map_err(syntax_error)?;
    Ok(CompiledExpression {
        expr: resolve(raw, ctx)?,
        arity: ctx.arity(),
    })
}

/// Compiles a comma separated list of `[lo, hi]` intervals. The bounds may be
/// any constant expression, e.g. `"[0, pi/2], [1, e^2]"`. Bounds referring to
/// a variable of `ctx` are rejected.
pub fn compile_interval_list(
    intervals: &str,
    ctx: &DefaultContext,
) -> Result<Vec<[f64; 2]>, ParseError> {
    let (_, raw) = all_consuming(separated_list1(char(','), interval))(intervals)
        .map_err(syntax_error)?;
    raw.into_iter()
        .enumerate()
        .map(|(index, (lo, hi))| -> Result<[f64; 2], ParseError> {
            let mut bounds = [0f64; 2];
            for (bound, raw) in bounds.iter_mut().zip([lo, hi]) {
                let resolved = resolve(raw, ctx)?;
                if !resolved.is_constant() {
                    return Err(ParseError::NonConstantBound { interval: index });
                }
                *bound = resolved.eval(&[]);
            }
            Ok(bounds)
        })
        .collect()
}
