use std::{fmt::Display, str::FromStr};

use log::{debug, trace};

use crate::errors::IntegError;

/// Subdivision count used when the caller does not choose one.
pub const DEFAULT_SUBDIVISIONS: usize = 1000;

/// The closed set of composite quadrature rules the dispatcher knows about.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Method {
    #[default]
    Trapezoidal,
    Simpsons,
    Midpoint,
}

impl Method {
    pub const ALL: [Method; 3] = [Method::Trapezoidal, Method::Simpsons, Method::Midpoint];

    /// The textual identifier accepted by [`integrate_named`].
    pub fn name(&self) -> &'static str {
        match self {
            Method::Trapezoidal => "trapezoidal",
            Method::Simpsons => "simpsons",
            Method::Midpoint => "midpoint",
        }
    }

    /// Applies this rule to `f` over `[a, b]` with `n` subintervals.
    pub fn apply(&self, f: impl Fn(f64) -> f64, a: f64, b: f64, n: usize) -> Result<f64, IntegError> {
        match self {
            Method::Trapezoidal => trapezoidal(f, a, b, n),
            Method::Simpsons => simpsons(f, a, b, n),
            Method::Midpoint => midpoint(f, a, b, n),
        }
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Method {
    type Err = IntegError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| IntegError::UnknownMethod {
                method: s.to_string(),
            })
    }
}

/// Quadrature settings with the library defaults: the trapezoidal rule over
/// [`DEFAULT_SUBDIVISIONS`] subintervals.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct QuadratureConfig {
    pub method: Method,
    pub n: usize,
}

impl Default for QuadratureConfig {
    fn default() -> Self {
        Self {
            method: Method::default(),
            n: DEFAULT_SUBDIVISIONS,
        }
    }
}

impl QuadratureConfig {
    pub fn integrate(&self, f: impl Fn(f64) -> f64, a: f64, b: f64) -> Result<f64, IntegError> {
        integrate(f, a, b, self.method, self.n)
    }
}

fn check_positive(n: usize) -> Result<(), IntegError> {
    if n == 0 {
        return Err(IntegError::NonPositiveSubdivisions { n: 0 });
    }
    Ok(())
}

/// Composite trapezoidal rule.
///
/// Samples `f` at the `n + 1` points `a + i * h`, `h = (b - a) / n`, halving
/// the weight of both endpoints. A degenerate interval (`a == b`) returns
/// `0.0` without evaluating `f`.
///
/// * `f` - The function to integrate
/// * `a` - Lower integration bound
/// * `b` - Upper integration bound
/// * `n` - Number of subintervals, must be positive
pub fn trapezoidal(f: impl Fn(f64) -> f64, a: f64, b: f64, n: usize) -> Result<f64, IntegError> {
    check_positive(n)?;
    if a == b {
        return Ok(0f64);
    }
    let h = (b - a) / n as f64;
    trace!("trapezoidal: n = {}, h = {}", n, h);

    let ends = 0.5 * (f(a) + f(b));
    let interior: f64 = (1..n).map(|i| f(a + i as f64 * h)).sum();
    Ok((ends + interior) * h)
}

/// Composite Simpson's 1/3 rule.
///
/// Samples `f` at the `n + 1` points `a + i * h`. Interior samples at odd
/// indices are weighted by 4 and at even indices by 2. A degenerate interval
/// (`a == b`) returns `0.0` without evaluating `f`.
///
/// * `f` - The function to integrate
/// * `a` - Lower integration bound
/// * `b` - Upper integration bound
/// * `n` - Number of subintervals, must be positive and even
pub fn simpsons(f: impl Fn(f64) -> f64, a: f64, b: f64, n: usize) -> Result<f64, IntegError> {
    if n % 2 != 0 {
        return Err(IntegError::OddSubdivisions { n });
    }
    check_positive(n)?;
    if a == b {
        return Ok(0f64);
    }
    let h = (b - a) / n as f64;
    trace!("simpsons: n = {}, h = {}", n, h);

    let ends = f(a) + f(b);
    let interior: f64 = (1..n)
        .map(|i| {
            let fx = f(a + i as f64 * h);
            if i & 0b1 == 1 {
                4f64 * fx
            } else {
                2f64 * fx
            }
        })
        .sum();
    Ok((ends + interior) * h / 3f64)
}

/// Composite midpoint rule. Evaluates `f` once at the centre of each of the
/// `n` subintervals, or not at all when `a == b`, which yields `0.0`.
///
/// * `f` - The function to integrate
/// * `a` - Lower integration bound
/// * `b` - Upper integration bound
/// * `n` - Number of subintervals, must be positive
pub fn midpoint(f: impl Fn(f64) -> f64, a: f64, b: f64, n: usize) -> Result<f64, IntegError> {
    check_positive(n)?;
    if a == b {
        return Ok(0f64);
    }
    let h = (b - a) / n as f64;
    trace!("midpoint: n = {}, h = {}", n, h);

    let s: f64 = (0..n).map(|i| f(a + (i as f64 + 0.5) * h)).sum();
    Ok(s * h)
}

/// Integrates `f` over `[a, b]` with the rule selected by `method`.
pub fn integrate(
    f: impl Fn(f64) -> f64,
    a: f64,
    b: f64,
    method: Method,
    n: usize,
) -> Result<f64, IntegError> {
    debug!("integrating over [{}, {}] with {} (n = {})", a, b, method, n);
    method.apply(f, a, b, n)
}

/// Same as [`integrate`], but with the method given by its textual identifier.
///
/// An unknown identifier is rejected before `f` is evaluated or `n` is checked.
pub fn integrate_named(
    f: impl Fn(f64) -> f64,
    a: f64,
    b: f64,
    method: &str,
    n: usize,
) -> Result<f64, IntegError> {
    let method = method.parse::<Method>().map_err(|err| {
        debug!("{}", err);
        err
    })?;
    integrate(f, a, b, method, n)
}

/// Sums the rule over every `[a, b]` interval in `intervals`, using `n`
/// subintervals for each.
pub fn integrate_intervals(
    f: impl Fn(f64) -> f64,
    intervals: &[[f64; 2]],
    method: Method,
    n: usize,
) -> Result<f64, IntegError> {
    intervals
        .iter()
        .map(|&[a, b]| integrate(&f, a, b, method, n))
        .sum()
}
