use std::cell::RefCell;

use pyo3::exceptions::PyTypeError;
use pyo3::prelude::*;

use pyo3::PyResult;

use crate::core::integrate::{integrate, integrate_intervals, Method, DEFAULT_SUBDIVISIONS};
use crate::core::parsing::{compile_interval_list, DefaultContext};
use crate::errors::PyProxyError;

use super::text_methods::{integrate_intervals_text, integrate_text, subdivisions};

const DEFAULT_N: i64 = DEFAULT_SUBDIVISIONS as i64;

/// Runs `integrator` over a Python callable. The first exception raised by
/// `f` stops further calls and is returned in place of the result.
fn with_callable(
    f: &PyAny,
    integrator: impl FnOnce(&dyn Fn(f64) -> f64) -> Result<f64, PyProxyError>,
) -> PyResult<f64> {
    if !f.is_callable() {
        return Err(PyTypeError::new_err(
            "f must be a callable or an expression string in x",
        ));
    }
    let raised: RefCell<Option<PyErr>> = RefCell::new(None);
    let g = |x: f64| -> f64 {
        if raised.borrow().is_some() {
            return f64::NAN;
        }
        match f.call1((x,)).and_then(|v| v.extract::<f64>()) {
            Ok(v) => v,
            Err(err) => {
                *raised.borrow_mut() = Some(err);
                f64::NAN
            }
        }
    };
    let res = integrator(&g)?;
    match raised.into_inner() {
        Some(err) => Err(err),
        None => Ok(res),
    }
}

/// Integrates `f`, either a Python callable or an expression string in x.
fn integrate_any(f: &PyAny, a: f64, b: f64, method: &str, n: i64) -> PyResult<f64> {
    if let Ok(f_expr) = f.extract::<String>() {
        return Ok(integrate_text(&f_expr, a, b, method, n)?);
    }
    let method: Method = method.parse().map_err(PyProxyError::from)?;
    let n = subdivisions(n).map_err(PyProxyError::from)?;
    with_callable(f, |g| Ok(integrate(g, a, b, method, n)?))
}

#[pyfunction]
#[pyo3(name = "trapezoidal", signature = (f, a, b, n = DEFAULT_N))]
pub fn wrapped_trapezoidal(f: &PyAny, a: f64, b: f64, n: i64) -> PyResult<f64> {
    integrate_any(f, a, b, Method::Trapezoidal.name(), n)
}

#[pyfunction]
#[pyo3(name = "simpsons", signature = (f, a, b, n = DEFAULT_N))]
pub fn wrapped_simpsons(f: &PyAny, a: f64, b: f64, n: i64) -> PyResult<f64> {
    integrate_any(f, a, b, Method::Simpsons.name(), n)
}

#[pyfunction]
#[pyo3(name = "midpoint", signature = (f, a, b, n = DEFAULT_N))]
pub fn wrapped_midpoint(f: &PyAny, a: f64, b: f64, n: i64) -> PyResult<f64> {
    integrate_any(f, a, b, Method::Midpoint.name(), n)
}

#[pyfunction]
#[pyo3(
    name = "integrate",
    signature = (f, a, b, method = "trapezoidal", n = DEFAULT_N)
)]
pub fn wrapped_integrate(f: &PyAny, a: f64, b: f64, method: &str, n: i64) -> PyResult<f64> {
    integrate_any(f, a, b, method, n)
}

#[pyfunction]
#[pyo3(
    name = "integrate_intervals",
    signature = (f, intervals, method = "trapezoidal", n = DEFAULT_N)
)]
pub fn wrapped_integrate_intervals(
    f: &PyAny,
    intervals: String,
    method: &str,
    n: i64,
) -> PyResult<f64> {
    if let Ok(f_expr) = f.extract::<String>() {
        return Ok(integrate_intervals_text(&f_expr, &intervals, method, n)?);
    }
    let method: Method = method.parse().map_err(PyProxyError::from)?;
    let n = subdivisions(n).map_err(PyProxyError::from)?;
    let intervals =
        compile_interval_list(&intervals, &DefaultContext::default()).map_err(PyProxyError::from)?;
    with_callable(f, |g| Ok(integrate_intervals(g, &intervals, method, n)?))
}
