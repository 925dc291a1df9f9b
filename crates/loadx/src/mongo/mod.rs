//! Mongo namespace module for Python bindings
//!
//! Exposes the `Client` factory. The handle class is exported for type checks
//! only; scripts obtain instances through the factory.

use pyo3::prelude::*;

pub mod client;
pub mod conversion;

/// Register the mongo module
pub fn register_module(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(client::new_client, m)?)?;
    m.add_class::<client::MongoClient>()?;

    m.add("__doc__", "MongoDB client for load-test scripts")?;

    Ok(())
}
