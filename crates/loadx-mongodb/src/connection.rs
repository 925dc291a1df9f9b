//! Client factory: connection URI + options to a client handle

use loadx_common::{BridgeError, Result};
use mongodb::{options::ClientOptions, Client};
use std::borrow::Cow;
use std::time::Duration;

use crate::client::ClientHandle;
use crate::config::{ClientConfig, DEFAULT_APP_NAME};

/// Create a client handle from a MongoDB connection URI.
///
/// The URI is parsed by the driver after the legacy `connect=` option is
/// rewritten (see [`normalize_uri`]); pool settings from `config` override the
/// URI's. Sockets are opened lazily by the driver, so a reachable server is not
/// required here. On failure no handle exists.
pub async fn connect(conn_uri: &str, config: ClientConfig) -> Result<ClientHandle> {
    let client = match config.factory_timeout() {
        Some(limit) => tokio::time::timeout(limit, build_client(conn_uri, &config))
            .await
            .map_err(|_| deadline_exceeded("client construction", limit))??,
        None => build_client(conn_uri, &config).await?,
    };

    tracing::debug!(
        "MongoDB client ready (operation timeout: {:?}, policy: {:?})",
        config.operation_timeout(),
        config.error_policy
    );

    Ok(ClientHandle::new(client, config))
}

async fn build_client(conn_uri: &str, config: &ClientConfig) -> Result<Client> {
    let mut client_options = ClientOptions::parse(normalize_uri(conn_uri).as_ref()).await?;
    apply_config(&mut client_options, config);
    Ok(Client::with_options(client_options)?)
}

/// Rewrite the legacy `connect` query option into its current form.
///
/// `connect=direct` becomes `directConnection=true` and `connect=automatic` is
/// dropped, since automatic discovery is already the driver default. Other
/// values are left for the driver to reject.
pub(crate) fn normalize_uri(conn_uri: &str) -> Cow<'_, str> {
    let Some((base, query)) = conn_uri.split_once('?') else {
        return Cow::Borrowed(conn_uri);
    };

    let mut rewritten = false;
    let params: Vec<&str> = query
        .split('&')
        .filter_map(|param| match param.split_once('=') {
            Some((key, value)) if key.eq_ignore_ascii_case("connect") => {
                if value.eq_ignore_ascii_case("direct") {
                    rewritten = true;
                    Some("directConnection=true")
                } else if value.eq_ignore_ascii_case("automatic") {
                    rewritten = true;
                    None
                } else {
                    Some(param)
                }
            }
            _ => Some(param),
        })
        .collect();

    if !rewritten {
        return Cow::Borrowed(conn_uri);
    }
    if params.is_empty() {
        Cow::Owned(base.to_string())
    } else {
        Cow::Owned(format!("{}?{}", base, params.join("&")))
    }
}

/// Overlay configured pool settings on the options parsed from the URI
fn apply_config(client_options: &mut ClientOptions, config: &ClientConfig) {
    if let Some(max) = config.max_pool_size {
        client_options.max_pool_size = Some(max);
    }
    if let Some(min) = config.min_pool_size {
        client_options.min_pool_size = Some(min);
    }
    if let Some(app) = &config.app_name {
        client_options.app_name = Some(app.clone());
    } else if client_options.app_name.is_none() {
        client_options.app_name = Some(DEFAULT_APP_NAME.to_string());
    }
}

pub(crate) fn deadline_exceeded(what: &str, limit: Duration) -> BridgeError {
    BridgeError::Timeout(format!("{} exceeded {}ms", what, limit.as_millis()))
}
