//! Error surface towards the script
//!
//! Driver errors become Python exceptions through `From<BridgeError> for
//! PyErr`. Under the legacy policy the factory and inserts hand the exception
//! object back as their return value instead of raising it, so scripts can
//! branch on it.

use loadx_common::BridgeError;
use loadx_mongodb::ErrorPolicy;
use pyo3::exceptions::{PyTypeError, PyValueError};
use pyo3::prelude::*;

/// Deliver an error whose disposition is "return to the script"
pub fn returned_error(py: Python<'_>, policy: ErrorPolicy, err: BridgeError) -> PyResult<PyObject> {
    let py_err = PyErr::from(err);
    if policy.errors_as_values() {
        Ok(py_err.into_value(py).into_any())
    } else {
        Err(py_err)
    }
}

/// Script passed something that cannot become BSON
pub fn argument_error(what: &str, value: &Bound<'_, PyAny>) -> PyErr {
    let type_name = value
        .get_type()
        .name()
        .map(|s| s.to_string())
        .unwrap_or_default();
    PyTypeError::new_err(format!("{} must be a dict, got {}", what, type_name))
}

/// Options dict did not match the recognised client options
pub fn options_error<E: std::fmt::Display>(err: E) -> PyErr {
    PyValueError::new_err(format!("Invalid client options: {}", err))
}
