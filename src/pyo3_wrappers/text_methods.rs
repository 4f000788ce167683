use crate::core::integrate::{integrate, integrate_intervals, Method};
use crate::core::parsing::{compile_expression, compile_interval_list, CompiledExpression, DefaultContext};
use crate::errors::{IntegError, PyProxyError};

/// Converts a caller supplied subdivision count, which may be negative, into
/// the count the rules take.
pub fn subdivisions(n: i64) -> Result<usize, IntegError> {
    if n <= 0 {
        return Err(IntegError::NonPositiveSubdivisions { n });
    }
    usize::try_from(n).map_err(|_| IntegError::NonPositiveSubdivisions { n })
}

fn compile_integrand(f_expr: &str) -> Result<CompiledExpression, PyProxyError> {
    let mut context = DefaultContext::default();
    context.add_var("x", 0)?;
    Ok(compile_expression(f_expr, &context)?)
}

/// Integrates a text integrand over `[a, b]` with the given rule.
///
/// The method is resolved first, then `n`, then the integrand is compiled.
///
/// * `f_expr` - The integrand. Must be written in terms of x.
/// * `a` - Lower integration bound
/// * `b` - Upper integration bound
/// * `method` - One of "trapezoidal", "simpsons" or "midpoint"
/// * `n` - Number of subintervals
pub fn integrate_text(
    f_expr: &str,
    a: f64,
    b: f64,
    method: &str,
    n: i64,
) -> Result<f64, PyProxyError> {
    let method: Method = method.parse()?;
    let n = subdivisions(n)?;
    let f = compile_integrand(f_expr)?;
    Ok(integrate(move |x| f.eval(&[x]), a, b, method, n)?)
}

/// Integrates a text integrand over every interval of a text interval list,
/// such as `"[0, 1], [2, pi]"`, and returns the sum.
///
/// * `f_expr` - The integrand. Must be written in terms of x.
/// * `intervals` - The set of intervals over which to integrate
/// * `method` - One of "trapezoidal", "simpsons" or "midpoint"
/// * `n` - Number of subintervals used on each interval
pub fn integrate_intervals_text(
    f_expr: &str,
    intervals: &str,
    method: &str,
    n: i64,
) -> Result<f64, PyProxyError> {
    let method: Method = method.parse()?;
    let n = subdivisions(n)?;
    let f = compile_integrand(f_expr)?;
    let intervals = compile_interval_list(intervals, &DefaultContext::default())?;
    Ok(integrate_intervals(
        move |x| f.eval(&[x]),
        &intervals,
        method,
        n,
    )?)
}
