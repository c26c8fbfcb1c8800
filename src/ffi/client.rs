//! Client handle lifecycle.

use tracing::{debug, info, warn};

use super::result::SmcClientResult;
use super::run_exported;
use crate::client::SecretClient;
use crate::config::ClientConfig;
use crate::error::Status;
use crate::observability::{logging, metrics};

/// Opaque client handle
///
/// C callers only ever see a pointer to this type.
#[derive(Debug)]
pub struct SmcClient {
    pub(crate) inner: SecretClient,
}

/// Move a client onto the heap and hand ownership to a C caller
///
/// The pointer must eventually be passed to [`smc_destroy_client`].
pub fn into_handle(client: SecretClient) -> *mut SmcClient {
    metrics::increment_clients_live();
    Box::into_raw(Box::new(SmcClient { inner: client }))
}

/// Create a client connected to GCP Secret Manager
///
/// Configuration comes from the environment. No request is sent until the
/// first operation.
#[no_mangle]
pub extern "C" fn smc_create_client() -> SmcClientResult {
    run_exported("create_client", || {
        logging::init_logging();
        let config = ClientConfig::from_env();
        debug!("Creating client with {:?}", config);

        match SecretClient::connect(&config) {
            Ok(client) => {
                info!("Secret Manager client created for {}", config.endpoint);
                SmcClientResult::ok(into_handle(client))
            }
            Err(e) => {
                warn!("Failed to create client: {}", e);
                SmcClientResult::err(Status::AllocationError, 0, e.caller_message())
            }
        }
    })
}

/// Destroy a client handle; null is a no-op
///
/// # Safety
/// `client` must be null or a handle from this library that has not been
/// destroyed yet. It must not be used afterwards.
#[no_mangle]
pub unsafe extern "C" fn smc_destroy_client(client: *mut SmcClient) {
    if client.is_null() {
        return;
    }
    // A panic while dropping must not unwind across the C boundary
    let _ = run_exported("destroy_client", || {
        metrics::decrement_clients_live();
        // SAFETY: per the contract `client` came from `into_handle` and is live
        drop(unsafe { Box::from_raw(client) });
        Status::Ok
    });
}
