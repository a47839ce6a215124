mod common;

use std::ffi::CString;
use std::sync::Arc;
use std::time::Duration;

use indykit_core::callbacks::{on_bytes, on_empty, on_handle, on_text, on_text_bytes};
use indykit_core::{CommandHandle, Correlator, ErrorKind};

/// Every test in this binary shares the process-wide correlator.
fn correlator() -> &'static Arc<Correlator> {
    common::init_tracing();
    Correlator::installed_or_default()
}

#[test]
fn test_handle_callback_from_native_thread() {
    let correlator = correlator();
    let call = correlator.issue::<i32, _>("open_wallet", |handle| {
        let raw = handle.raw();
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(5));
            unsafe { on_handle(raw, 0, 11) };
        });
        0
    });
    assert_eq!(call.wait().unwrap(), 11);
}

#[test]
fn test_text_is_copied_before_callback_returns() {
    let correlator = correlator();
    let call = correlator.issue::<String, _>("create_key", |handle| {
        let raw = handle.raw();
        std::thread::spawn(move || {
            let verkey = CString::new("GJ1SzoWzavQYfNL9XkaJdrQejfztN4XqdsiV4ct3LXKL").unwrap();
            unsafe { on_text(raw, 0, verkey.as_ptr()) };
            drop(verkey);
        });
        0
    });
    assert_eq!(
        call.wait().unwrap(),
        "GJ1SzoWzavQYfNL9XkaJdrQejfztN4XqdsiV4ct3LXKL"
    );
}

#[test]
fn test_callback_on_issuing_thread_before_return() {
    let correlator = correlator();
    let call = correlator.issue::<(), _>("close_wallet", |handle| {
        unsafe { on_empty(handle.raw(), 0) };
        0
    });
    let handle = call.handle().unwrap();
    call.wait().unwrap();
    assert!(!correlator.is_pending(handle));
}

#[test]
fn test_error_status_ignores_pointers() {
    let correlator = correlator();
    let call = correlator.issue::<Vec<u8>, _>("crypto_sign", |handle| {
        let raw = handle.raw();
        std::thread::spawn(move || unsafe {
            on_bytes(raw, 200, std::ptr::dangling(), 64);
        });
        0
    });
    let err = call.wait().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::WalletInvalidHandle);
}

#[test]
fn test_text_and_bytes_payload() {
    let correlator = correlator();
    let call = correlator.issue::<(String, Vec<u8>), _>("auth_decrypt", |handle| {
        let raw = handle.raw();
        std::thread::spawn(move || {
            let sender = CString::new("sender-vk").unwrap();
            let message = b"hello".to_vec();
            let len = u32::try_from(message.len()).unwrap();
            unsafe { on_text_bytes(raw, 0, sender.as_ptr(), message.as_ptr(), len) };
        });
        0
    });
    let (sender, message) = call.wait().unwrap();
    assert_eq!(sender, "sender-vk");
    assert_eq!(message, b"hello");
}

#[test]
fn test_unknown_handle_through_callback_is_logged_and_ignored() {
    let correlator = correlator();
    let unknown = CommandHandle::from_raw(i32::MAX - 7);
    assert!(!correlator.is_pending(unknown));
    unsafe { on_empty(unknown.raw(), 0) };
    assert!(!correlator.is_pending(unknown));
}
