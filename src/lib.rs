pub mod core;
pub mod errors;
pub mod pyo3_wrappers;

#[cfg(feature = "python")]
use pyo3::prelude::*;

#[cfg(feature = "python")]
#[pymodule]
fn numint(_py: Python<'_>, m: &PyModule) -> PyResult<()> {
    use crate::pyo3_wrappers::wrappers::{
        wrapped_integrate, wrapped_integrate_intervals, wrapped_midpoint, wrapped_simpsons,
        wrapped_trapezoidal,
    };

    m.add_function(wrap_pyfunction!(wrapped_trapezoidal, m)?)?;
    m.add_function(wrap_pyfunction!(wrapped_simpsons, m)?)?;
    m.add_function(wrap_pyfunction!(wrapped_midpoint, m)?)?;
    m.add_function(wrap_pyfunction!(wrapped_integrate, m)?)?;
    m.add_function(wrap_pyfunction!(wrapped_integrate_intervals, m)?)?;
    Ok(())
}
