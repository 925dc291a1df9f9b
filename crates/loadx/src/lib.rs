//! loadx: MongoDB for scripted load tests
//!
//! Python extension that lets load-test scripts talk to MongoDB through a
//! Rust client. Each virtual user builds (or shares) a client during setup and
//! then calls blocking CRUD operations from its iterations.
//!
//! # Usage
//! ```python
//! from loadx.mongo import Client
//!
//! client = Client("mongodb://localhost:27017/?connect=direct")
//!
//! client.insert("shop", "orders", {"sku": "A-1", "qty": "2"})
//! order = client.find_one("shop", "orders", {"sku": "A-1"})
//! recent = client.find("shop", "orders", {"qty": {"$gt": "1"}}, 10)
//! ```

use pyo3::prelude::*;

pub mod error_handling;
pub mod logging;

mod mongo;

/// Import name scripts use to reach the Mongo namespace
pub const IMPORT_NAME: &str = "loadx.mongo";

/// loadx Python module
#[pymodule]
fn loadx(py: Python, m: &Bound<'_, PyModule>) -> PyResult<()> {
    logging::init_logging();

    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    let mongo_module = PyModule::new(py, "mongo")?;
    mongo::register_module(&mongo_module)?;
    m.add_submodule(&mongo_module)?;

    // add_submodule alone does not make `import loadx.mongo` resolvable
    py.import("sys")?
        .getattr("modules")?
        .set_item(IMPORT_NAME, &mongo_module)?;

    Ok(())
}
