//! Caller-owned buffers.
//!
//! Every payload, value and error pointer handed to a C caller is allocated
//! here and must come back through [`release`] exactly once. Each block is
//! prefixed with its length so one release function can free buffers of any
//! size without the caller passing the length back.
//!
//! ```text
//! base                     returned pointer
//! v                        v
//! +------------------------+-------------------------------+
//! | len: usize             | len bytes (at least one byte) |
//! +------------------------+-------------------------------+
//! ```
//!
//! Allocation failure is reported as a null pointer, never as an abort, so
//! callers can downgrade the result to `AllocationError`.

use std::alloc::Layout;
use std::ffi::{c_char, c_void};
use std::ptr;
use std::sync::atomic::{AtomicUsize, Ordering};
use zeroize::Zeroize;

const HEADER: usize = std::mem::size_of::<usize>();
const ALIGN: usize = std::mem::align_of::<usize>();

static LIVE_ALLOCATIONS: AtomicUsize = AtomicUsize::new(0);

#[cfg(test)]
thread_local! {
    static FAIL_NEXT: std::cell::Cell<usize> = const { std::cell::Cell::new(0) };
}

/// Make the next `count` allocations on this thread fail
#[cfg(test)]
pub(crate) fn fail_next_allocations(count: usize) {
    FAIL_NEXT.with(|n| n.set(count));
}

#[cfg(test)]
fn injected_failure() -> bool {
    FAIL_NEXT.with(|n| {
        let remaining = n.get();
        if remaining > 0 {
            n.set(remaining - 1);
            true
        } else {
            false
        }
    })
}

#[cfg(not(test))]
fn injected_failure() -> bool {
    false
}

/// Number of buffers handed out and not yet released
pub fn live_allocations() -> usize {
    LIVE_ALLOCATIONS.load(Ordering::SeqCst)
}

fn layout_for(len: usize) -> Option<Layout> {
    let total = HEADER.checked_add(len.max(1))?;
    Layout::from_size_align(total, ALIGN).ok()
}

/// Copy `bytes` into a new block, optionally followed by a NUL terminator
fn alloc_copy(bytes: &[u8], nul_terminate: bool) -> *mut u8 {
    let Some(len) = bytes.len().checked_add(usize::from(nul_terminate)) else {
        return ptr::null_mut();
    };
    let Some(layout) = layout_for(len) else {
        return ptr::null_mut();
    };
    if injected_failure() {
        return ptr::null_mut();
    }

    // SAFETY: `layout` always has a non-zero size (header plus at least one byte).
    let base = unsafe { std::alloc::alloc(layout) };
    if base.is_null() {
        return ptr::null_mut();
    }

    // SAFETY: `base` is valid for `HEADER + max(len, 1)` bytes and aligned for
    // `usize`; `data` has room for `len` bytes, which covers the copied bytes
    // and the optional terminator. The source slice cannot overlap a fresh block.
    unsafe {
        base.cast::<usize>().write(len);
        let data = base.add(HEADER);
        ptr::copy_nonoverlapping(bytes.as_ptr(), data, bytes.len());
        if nul_terminate {
            data.add(bytes.len()).write(0);
        }
        LIVE_ALLOCATIONS.fetch_add(1, Ordering::SeqCst);
        data
    }
}

/// Allocate a caller-owned copy of `bytes`
///
/// The pointer is non-null on success even when `bytes` is empty.
pub(crate) fn alloc_bytes(bytes: &[u8]) -> *mut u8 {
    alloc_copy(bytes, false)
}

/// Allocate a caller-owned NUL-terminated copy of `s`
///
/// C strings cannot carry interior NULs, so the copy stops at the first one.
pub(crate) fn alloc_c_string(s: &str) -> *mut c_char {
    let bytes = s.as_bytes();
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    alloc_copy(&bytes[..end], true).cast()
}

/// Wipe and free a block returned by this module
///
/// Null is a no-op.
///
/// # Safety
/// `ptr` must be null or a pointer previously returned by this module that
/// has not been released yet.
pub(crate) unsafe fn release(ptr: *mut c_void) {
    if ptr.is_null() {
        return;
    }

    // SAFETY: per the contract `ptr` sits `HEADER` bytes into a live block
    // whose header holds the data length written by `alloc_copy`.
    unsafe {
        let data = ptr.cast::<u8>();
        let base = data.sub(HEADER);
        let len = base.cast::<usize>().read();
        let Some(layout) = layout_for(len) else {
            return;
        };
        std::slice::from_raw_parts_mut(data, len).zeroize();
        std::alloc::dealloc(base, layout);
    }
    LIVE_ALLOCATIONS.fetch_sub(1, Ordering::SeqCst);
}
