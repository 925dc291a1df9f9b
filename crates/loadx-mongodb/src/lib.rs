//! MongoDB adapter for loadx
//!
//! The host-independent half of the bridge: client construction from a
//! connection URI, the operation surface exposed to scripts, coercion helpers
//! and the error-surface policy. The Python extension is a thin layer on top.
//!
//! # Example
//!
//! ```ignore
//! use bson::doc;
//! use loadx_mongodb::{connect, ClientConfig};
//!
//! let client = connect("mongodb://localhost:27017", ClientConfig::default()).await?;
//! client.insert("t", "c", doc! { "name": "a" }).await?;
//! let docs = client.find_all("t", "c").await?;
//! ```

pub mod client;
pub mod coercion;
pub mod config;
pub mod connection;
pub mod policy;

pub use client::ClientHandle;
pub use config::ClientConfig;
pub use connection::connect;
pub use loadx_common::{BridgeError, Result};
pub use policy::{Disposition, ErrorPolicy, Operation};
