use thiserror::Error;

use crate::core::integrate::Method;

/// An invalid argument passed to one of the quadrature rules or the dispatcher.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum IntegError {
    #[error("Number of subintervals (n) must be positive, got {n}")]
    NonPositiveSubdivisions { n: i64 },

    #[error("Number of subintervals (n) must be even for Simpson's rule, got {n}")]
    OddSubdivisions { n: usize },

    #[error(
        "Unknown method: '{}'. Available methods: [{}]",
        method,
        Method::ALL.map(|m| format!("'{}'", m.name())).join(", "),
    )]
    UnknownMethod { method: String },
}

/// An error that can occur during parsing
#[derive(Debug, Error, PartialEq, Clone)]
pub enum ParseError {
    /// Variable is not in list of allowed variables.
    #[error("Variable '{}' not allowed", var)]
    InvalidVariable { var: String },

    /// Variable has been previously declared.
    #[error(
        "Variable '{}' already present in {} declarations",
        var,
        if *in_var_decs {"variable"} else {"function"},
    )]
    VariableTaken { var: String, in_var_decs: bool },

    #[error("Unknown identifier '{}'", name)]
    UnknownIdentifier { name: String },

    #[error("Unknown function '{}'", name)]
    UnknownFunction { name: String },

    #[error("Syntax error near '{}'", near)]
    Syntax { near: String },

    #[error("Unexpected trailing input '{}'", rest)]
    TrailingInput { rest: String },

    #[error("Expression nested deeper than {} levels", limit)]
    NestingTooDeep { limit: usize },

    #[error("Bound of interval {} is not a constant expression", interval)]
    NonConstantBound { interval: usize },
}

/// Any error raised while integrating a text integrand.
#[derive(Debug, Error, PartialEq, Clone)]
pub enum PyProxyError {
    #[error("{0}")]
    Integ(#[from] IntegError),

    #[error("{0}")]
    Parse(#[from] ParseError),
}

#[cfg(feature = "python")]
impl From<PyProxyError> for pyo3::PyErr {
    fn from(err: PyProxyError) -> Self {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}
