//! Leak check for buffers handed across the C boundary
//!
//! The live-allocation counter is process-wide, so this binary holds a
//! single test that drives every result shape and checks the counter
//! returns to its starting value once everything is released.

mod common;

use common::FakeSecretStore;
use secret_manager_ffi::ffi::{
    into_handle, live_allocations, smc_access_secret, smc_access_secret_by_name,
    smc_destroy_client, smc_free, smc_get_secret_metadata, smc_make_resource_name,
    smc_metrics_text,
};
use secret_manager_ffi::{SecretClient, Status};
use std::ptr;

#[test]
fn test_every_result_is_released_exactly_once() {
    let store = FakeSecretStore::new();
    store.add_version("p", "s", b"payload", 100);
    store.add_version("p", "empty", b"", 100);
    let client = SecretClient::with_service(store.clone()).unwrap();
    let handle = into_handle(client);

    let baseline = live_allocations();

    // SAFETY: live handle and 'static strings; every pointer is released once
    unsafe {
        let ok = smc_access_secret(handle, c"p".as_ptr(), c"s".as_ptr(), ptr::null());
        assert_eq!(ok.status, Status::Ok);
        let empty = smc_access_secret(handle, c"p".as_ptr(), c"empty".as_ptr(), ptr::null());
        assert_eq!(empty.status, Status::Ok);
        let invalid = smc_access_secret_by_name(handle, c"".as_ptr());
        assert_eq!(invalid.status, Status::ArgumentError);
        let metadata = smc_get_secret_metadata(handle, c"p".as_ptr(), c"s".as_ptr(), ptr::null());
        assert_eq!(metadata.status, Status::Ok);
        let name = smc_make_resource_name(c"p".as_ptr(), c"s".as_ptr(), c"2".as_ptr());
        assert_eq!(name.status, Status::Ok);
        let metrics = smc_metrics_text();
        assert_eq!(metrics.status, Status::Ok);

        assert_eq!(live_allocations(), baseline + 6);

        smc_free(ok.data.cast());
        smc_free(empty.data.cast());
        smc_free(invalid.error.cast());
        smc_free(metadata.value.cast());
        smc_free(name.value.cast());
        smc_free(metrics.value.cast());
    }
    assert_eq!(live_allocations(), baseline);

    store.fail_with(5, "not found");
    for _ in 0..100 {
        // SAFETY: as above
        unsafe {
            let failed = smc_access_secret(handle, c"p".as_ptr(), c"s".as_ptr(), ptr::null());
            assert_eq!(failed.status, Status::RemoteError);
            assert!(failed.data.is_null());
            smc_free(failed.data.cast());
            smc_free(failed.error.cast());
        }
    }
    assert_eq!(live_allocations(), baseline);

    // SAFETY: destroyed once
    unsafe { smc_destroy_client(handle) };
    assert_eq!(live_allocations(), baseline);
}
