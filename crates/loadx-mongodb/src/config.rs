//! Per-client configuration
//!
//! Options are supplied by the script alongside the connection URI, e.g.
//!
//! ```python
//! from loadx.mongo import Client
//!
//! client = Client(
//!     "mongodb://localhost:27017",
//!     {"operationTimeoutMs": 2000, "errorPolicy": "raise"},
//! )
//! ```
//!
//! Everything is optional. Without options the client behaves exactly like an
//! unconfigured one: no deadlines and the legacy error surface.

use serde::Deserialize;
use std::time::Duration;

use crate::policy::ErrorPolicy;

/// Application name reported to the server when the URI does not set one
pub const DEFAULT_APP_NAME: &str = "loadx";

/// Client options accepted by the factory
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ClientConfig {
    /// Deadline for each operation in milliseconds (0 or absent: unbounded)
    pub operation_timeout_ms: Option<u64>,
    /// Deadline for URI parsing and pool creation in milliseconds
    pub factory_timeout_ms: Option<u64>,
    /// How driver errors reach the script
    pub error_policy: ErrorPolicy,
    pub max_pool_size: Option<u32>,
    pub min_pool_size: Option<u32>,
    pub app_name: Option<String>,
}

impl ClientConfig {
    /// Per-operation deadline, if one is configured
    pub fn operation_timeout(&self) -> Option<Duration> {
        non_zero_millis(self.operation_timeout_ms)
    }

    /// Factory deadline, if one is configured
    pub fn factory_timeout(&self) -> Option<Duration> {
        non_zero_millis(self.factory_timeout_ms)
    }
}

fn non_zero_millis(ms: Option<u64>) -> Option<Duration> {
    ms.filter(|ms| *ms > 0).map(Duration::from_millis)
}
