mod common;

use std::collections::HashSet;
use std::sync::{Arc, Barrier};
use std::time::Duration;

use common::{Recorder, SimulatedLibrary};
use indykit_core::{BoundaryConfig, CommandHandle, Correlator, ErrorKind, Payload};

#[test]
fn test_open_wallet_completes_with_handle() {
    common::init_tracing();
    let correlator = Arc::new(Correlator::new());
    let library = SimulatedLibrary::new(Arc::clone(&correlator));
    let recorder = Recorder::new();

    let handle = correlator
        .submit("open_wallet", recorder.continuation(), |handle| {
            library.accept(handle)
        })
        .expect("issued");
    assert_eq!(library.accepted(), vec![handle]);
    assert_eq!(recorder.calls(), 0);

    library
        .complete_later(handle, 0, Payload::Handle(7), Duration::from_millis(5))
        .join()
        .unwrap()
        .expect("delivered");

    assert_eq!(recorder.calls(), 1);
    assert_eq!(recorder.last(), Some(Ok(Payload::Handle(7))));
    assert_eq!(correlator.pending_count(), 0);
}

#[test]
fn test_open_already_opened_wallet_fails_immediately() {
    common::init_tracing();
    let correlator = Correlator::new();
    let recorder = Recorder::new();

    let err = correlator
        .submit("open_wallet", recorder.continuation(), |_| 206)
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::WalletAlreadyOpened);
    assert_eq!(err.code(), 206);
    assert_eq!(recorder.calls(), 1);
    assert_eq!(correlator.pending_count(), 0);
}

#[test]
fn test_wallet_already_opened_override_for_legacy_builds() {
    let config = BoundaryConfig::from_json(r#"{ "overrides": { "112": "wallet_already_opened" } }"#)
        .unwrap();
    let correlator = Correlator::from_config(&config).unwrap();

    let err = correlator
        .submit("open_wallet", Box::new(|_| {}), |_| 112)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::WalletAlreadyOpened);
    assert_eq!(err.code(), 112);
}

#[test]
fn test_concurrent_issue_yields_distinct_handles() {
    const THREADS: usize = 8;
    const PER_THREAD: usize = 250;

    common::init_tracing();
    let correlator = Arc::new(Correlator::new());
    let library = Arc::new(SimulatedLibrary::new(Arc::clone(&correlator)));
    let recorder = Recorder::new();
    let barrier = Arc::new(Barrier::new(THREADS));

    let workers: Vec<_> = (0..THREADS)
        .map(|_| {
            let correlator = Arc::clone(&correlator);
            let library = Arc::clone(&library);
            let recorder = recorder.clone();
            let barrier = Arc::clone(&barrier);
            std::thread::spawn(move || {
                barrier.wait();
                (0..PER_THREAD)
                    .map(|_| {
                        correlator
                            .submit("create_key", recorder.continuation(), |handle| {
                                library.accept(handle)
                            })
                            .unwrap()
                    })
                    .collect::<Vec<CommandHandle>>()
            })
        })
        .collect();

    let issued: Vec<CommandHandle> = workers
        .into_iter()
        .flat_map(|worker| worker.join().unwrap())
        .collect();
    let distinct: HashSet<CommandHandle> = issued.iter().copied().collect();
    assert_eq!(issued.len(), THREADS * PER_THREAD);
    assert_eq!(distinct.len(), issued.len());
    assert!(issued.iter().all(|handle| handle.raw() > 0));
    assert_eq!(correlator.pending_count(), issued.len());

    for completion in library.complete_all(&Payload::Text("verkey".into())) {
        completion.join().unwrap().unwrap();
    }
    assert_eq!(recorder.calls(), issued.len());
    assert!(recorder.outcomes().iter().all(Result::is_ok));
    assert_eq!(correlator.pending_count(), 0);
}

#[test]
fn test_completions_in_any_order_resolve_their_own_caller() {
    let correlator = Arc::new(Correlator::new());
    let library = SimulatedLibrary::new(Arc::clone(&correlator));

    let recorders: Vec<Recorder> = (0..16).map(|_| Recorder::new()).collect();
    let handles: Vec<CommandHandle> = recorders
        .iter()
        .map(|recorder| {
            correlator
                .submit("open_pool_ledger", recorder.continuation(), |handle| {
                    library.accept(handle)
                })
                .unwrap()
        })
        .collect();

    let completions: Vec<_> = handles
        .iter()
        .rev()
        .map(|handle| {
            library.complete_later(
                *handle,
                0,
                Payload::Handle(handle.raw() * 10),
                Duration::from_millis(1),
            )
        })
        .collect();
    for completion in completions {
        completion.join().unwrap().unwrap();
    }

    for (recorder, handle) in recorders.iter().zip(&handles) {
        assert_eq!(recorder.outcomes(), vec![Ok(Payload::Handle(handle.raw() * 10))]);
    }
}

#[test]
fn test_duplicate_completion_is_reported_not_dropped() {
    common::init_tracing();
    let correlator = Arc::new(Correlator::new());
    let library = SimulatedLibrary::new(Arc::clone(&correlator));
    let recorder = Recorder::new();

    let handle = correlator
        .submit("close_wallet", recorder.continuation(), |handle| {
            library.accept(handle)
        })
        .unwrap();
    library
        .complete_later(handle, 0, Payload::Empty, Duration::ZERO)
        .join()
        .unwrap()
        .unwrap();

    let err = library
        .complete_later(handle, 0, Payload::Empty, Duration::ZERO)
        .join()
        .unwrap()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DanglingCompletion);
    assert!(err.kind().is_integrity_violation());
    assert_eq!(recorder.calls(), 1);
}

#[test]
fn test_completion_for_unknown_handle_is_dangling() {
    let correlator = Correlator::new();
    let err = correlator
        .deliver(CommandHandle::from_raw(4242), 0, Payload::Empty)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DanglingCompletion);
    assert_eq!(correlator.pending_count(), 0);
}

#[test]
fn test_expiry_sweep_then_late_completion_is_absorbed() {
    common::init_tracing();
    let config = BoundaryConfig::from_json(r#"{ "call_timeout_ms": 10 }"#).unwrap();
    let correlator = Arc::new(Correlator::from_config(&config).unwrap());
    let library = SimulatedLibrary::new(Arc::clone(&correlator));
    let recorder = Recorder::new();

    let handle = correlator
        .submit("open_pool_ledger", recorder.continuation(), |handle| {
            library.accept(handle)
        })
        .unwrap();
    std::thread::sleep(Duration::from_millis(20));

    let timeout = correlator.call_timeout().unwrap();
    assert_eq!(correlator.expire_older_than(timeout), vec![handle]);
    assert!(correlator.expire_older_than(timeout).is_empty());
    assert!(correlator.is_pending(handle));

    library
        .complete_later(handle, 0, Payload::Handle(1), Duration::ZERO)
        .join()
        .unwrap()
        .expect("late completion is absorbed, not dangling");

    assert_eq!(recorder.calls(), 1);
    assert_eq!(
        recorder.last().unwrap().unwrap_err().kind(),
        ErrorKind::Timeout
    );
    assert_eq!(correlator.pending_count(), 0);
}

#[test]
fn test_shutdown_resolves_everything_once() {
    common::init_tracing();
    let correlator = Arc::new(Correlator::new());
    let library = SimulatedLibrary::new(Arc::clone(&correlator));
    let recorder = Recorder::new();

    for _ in 0..5 {
        correlator
            .submit("open_wallet", recorder.continuation(), |handle| {
                library.accept(handle)
            })
            .unwrap();
    }
    assert_eq!(correlator.shutdown(), 5);
    assert_eq!(recorder.calls(), 5);
    assert!(recorder
        .outcomes()
        .iter()
        .all(|outcome| outcome.as_ref().unwrap_err().kind() == ErrorKind::ShutDown));

    for completion in library.complete_all(&Payload::Handle(1)) {
        let err = completion.join().unwrap().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DanglingCompletion);
    }
    assert_eq!(recorder.calls(), 5);
}

#[test]
fn test_dropped_correlator_resolves_pending_as_shut_down() {
    common::init_tracing();
    let correlator = Correlator::new();
    let recorder = Recorder::new();

    correlator
        .submit("open_wallet", recorder.continuation(), |_| 0)
        .unwrap();
    assert_eq!(recorder.calls(), 0);
    drop(correlator);

    assert_eq!(recorder.calls(), 1);
    assert_eq!(
        recorder.last().unwrap().unwrap_err().kind(),
        ErrorKind::ShutDown
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_issued_call_resolves_from_library_thread() {
    common::init_tracing();
    let correlator = Arc::new(Correlator::new());
    let library = SimulatedLibrary::new(Arc::clone(&correlator));

    let call = correlator.issue::<(String, String), _>("create_and_store_my_did", |handle| {
        library.accept(handle)
    });
    let handle = call.handle().unwrap();
    let _completion = library.complete_later(
        handle,
        0,
        Payload::TextPair("did".into(), "verkey".into()),
        Duration::from_millis(5),
    );

    let (did, verkey) = call.await.unwrap();
    assert_eq!(did, "did");
    assert_eq!(verkey, "verkey");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_default_timeout_from_config() {
    let config = BoundaryConfig::from_json(r#"{ "call_timeout_ms": 20 }"#).unwrap();
    let correlator = Arc::new(Correlator::from_config(&config).unwrap());
    let library = SimulatedLibrary::new(Arc::clone(&correlator));

    let call = correlator.issue::<i32, _>("open_pool_ledger", |handle| library.accept(handle));
    let handle = call.handle().unwrap();

    let err = call.with_default_timeout().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Timeout);
    assert!(correlator.is_pending(handle));
    assert!(!correlator.expire(handle));

    library
        .complete_later(handle, 303, Payload::Empty, Duration::ZERO)
        .join()
        .unwrap()
        .unwrap();
    assert!(!correlator.is_pending(handle));
}
