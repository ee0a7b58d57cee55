use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::mpsc::unbounded_channel;
use tokio::time::timeout;

use super::*;

#[tokio::test]
async fn submitted_action_runs() {
    let dispatcher = Dispatcher::spawn(&Handle::current(), 8);
    let (tx, mut rx) = unbounded_channel();
    dispatcher
        .submit(action(move || {
            let _ = tx.send("ran");
        }))
        .unwrap();

    let got = timeout(Duration::from_secs(5), rx.recv()).await.unwrap();
    assert_eq!(got, Some("ran"));
}

#[tokio::test]
async fn actions_can_run_repeatedly() {
    let dispatcher = Dispatcher::spawn(&Handle::current(), 8);
    let count = Arc::new(AtomicUsize::new(0));
    let (tx, mut rx) = unbounded_channel();
    let counted = {
        let count = Arc::clone(&count);
        action(move || {
            count.fetch_add(1, Ordering::SeqCst);
            let _ = tx.send(());
        })
    };

    for _ in 0..3 {
        assert!(dispatcher.dispatch(Some(&counted)));
    }
    for _ in 0..3 {
        timeout(Duration::from_secs(5), rx.recv()).await.unwrap();
    }
    assert_eq!(count.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn dispatch_without_action_is_a_no_op() {
    let dispatcher = Dispatcher::spawn(&Handle::current(), 1);
    assert!(!dispatcher.dispatch(None));
}

#[tokio::test]
async fn full_queue_rejects_without_blocking() {
    // The current-thread runtime does not run the worker until we yield.
    let dispatcher = Dispatcher::spawn(&Handle::current(), 1);
    dispatcher.submit(action(|| {})).unwrap();
    let err = dispatcher.submit(action(|| {})).unwrap_err();
    assert!(matches!(err, DispatchError::QueueFull { capacity: 1 }));
}

#[tokio::test]
async fn zero_capacity_is_raised_to_one() {
    let dispatcher = Dispatcher::spawn(&Handle::current(), 0);
    assert!(dispatcher.submit(action(|| {})).is_ok());
}

#[tokio::test]
async fn panicking_action_does_not_stop_the_worker() {
    let dispatcher = Dispatcher::spawn(&Handle::current(), 4);
    let (tx, mut rx) = unbounded_channel();
    dispatcher.submit(action(|| panic!("action failure"))).unwrap();
    dispatcher
        .submit(action(move || {
            let _ = tx.send(());
        }))
        .unwrap();

    assert!(timeout(Duration::from_secs(5), rx.recv()).await.unwrap().is_some());
}
