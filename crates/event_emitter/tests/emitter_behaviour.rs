//! End-to-end behaviour of listener ordering, one-shot listeners,
//! stop-propagation and unsubscription.

use event_emitter::{EventEmitter, Handler, Propagation};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

fn counting(counter: &Arc<AtomicUsize>) -> impl Fn(&String) + Send + Sync + 'static {
    let counter = counter.clone();
    move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    }
}

fn counting_stop(
    counter: &Arc<AtomicUsize>,
) -> impl Fn(&String) -> Propagation + Send + Sync + 'static {
    let counter = counter.clone();
    move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Propagation::Stop
    }
}

fn message() -> String {
    "test message".to_string()
}

#[test_log::test]
fn invokes_all_on_listeners_without_stop_propagation() {
    let emitter: EventEmitter<String> = EventEmitter::new();
    let invoke_count = Arc::new(AtomicUsize::new(0));

    emitter.on("test", counting(&invoke_count));
    emitter.on("test", counting(&invoke_count));

    emitter.emit("test", &message()).unwrap();
    assert_eq!(invoke_count.load(Ordering::SeqCst), 2);
    emitter.emit("test", &message()).unwrap();
    assert_eq!(invoke_count.load(Ordering::SeqCst), 4);
}

#[test]
fn on_listeners_run_in_reverse_registration_order() {
    let emitter: EventEmitter<String> = EventEmitter::new();
    let order = Arc::new(Mutex::new(Vec::new()));

    for tag in ["A", "B", "C"] {
        let order = order.clone();
        emitter.on("test", move |payload: &String| {
            order.lock().unwrap().push(format!("{}:{}", tag, payload));
        });
    }

    emitter.emit("test", &"msg".to_string()).unwrap();
    assert_eq!(*order.lock().unwrap(), vec!["C:msg", "B:msg", "A:msg"]);
}

#[test]
fn invokes_all_once_listeners_without_stop_propagation() {
    let emitter: EventEmitter<String> = EventEmitter::new();
    let invoke_count = Arc::new(AtomicUsize::new(0));

    emitter.once("test", counting(&invoke_count));
    emitter.once("test", counting(&invoke_count));

    emitter.emit("test", &message()).unwrap();
    assert_eq!(invoke_count.load(Ordering::SeqCst), 2);
}

#[test_log::test]
fn stopper_registered_first_runs_last() {
    let emitter: EventEmitter<String> = EventEmitter::new();
    let invoke_count = Arc::new(AtomicUsize::new(0));
    let order = Arc::new(Mutex::new(Vec::new()));

    let log = order.clone();
    let counter = invoke_count.clone();
    emitter.once("test", move |_: &String| {
        counter.fetch_add(1, Ordering::SeqCst);
        log.lock().unwrap().push("A");
        Propagation::Stop
    });
    let log = order.clone();
    let counter = invoke_count.clone();
    emitter.once("test", move |_: &String| {
        counter.fetch_add(1, Ordering::SeqCst);
        log.lock().unwrap().push("B");
    });

    // B is newer, so it runs before the stopper
    emitter.emit("test", &message()).unwrap();
    assert_eq!(invoke_count.load(Ordering::SeqCst), 2);
    assert_eq!(*order.lock().unwrap(), vec!["B", "A"]);
    assert!(!emitter.has_listeners("test"));
}

#[test]
fn once_listener_behind_a_stopper_survives_until_next_emit() {
    let emitter: EventEmitter<String> = EventEmitter::new();
    let invoke_count = Arc::new(AtomicUsize::new(0));

    emitter.once("test", counting(&invoke_count));
    emitter.once("test", counting_stop(&invoke_count));

    emitter.emit("test", &message()).unwrap();
    assert_eq!(invoke_count.load(Ordering::SeqCst), 1);
    assert_eq!(emitter.listener_count("test"), 1);

    emitter.emit("test", &message()).unwrap();
    assert_eq!(invoke_count.load(Ordering::SeqCst), 2);
    assert!(!emitter.has_listeners("test"));
}

#[test]
fn once_listeners_fire_only_once() {
    let emitter: EventEmitter<String> = EventEmitter::new();
    let invoke_count = Arc::new(AtomicUsize::new(0));

    emitter.once("test", counting(&invoke_count));
    emitter.once("test", counting(&invoke_count));

    emitter.emit("test", &message()).unwrap();
    assert_eq!(invoke_count.load(Ordering::SeqCst), 2);
    emitter.emit("test", &message()).unwrap();
    assert_eq!(invoke_count.load(Ordering::SeqCst), 2);
}

#[test]
fn unsubscribes_via_returned_subscription() {
    let emitter: EventEmitter<String> = EventEmitter::new();
    let invoke_count = Arc::new(AtomicUsize::new(0));
    let subscription = emitter.on("test", counting(&invoke_count));

    emitter.emit("test", &message()).unwrap();
    assert_eq!(invoke_count.load(Ordering::SeqCst), 1);

    assert!(subscription.unsubscribe());
    assert!(!subscription.unsubscribe());

    emitter.emit("test", &message()).unwrap();
    assert_eq!(invoke_count.load(Ordering::SeqCst), 1);
}

#[test]
fn unsubscribes_via_off() {
    let emitter: EventEmitter<String> = EventEmitter::new();
    let invoke_count = Arc::new(AtomicUsize::new(0));
    let listener = Handler::new(counting(&invoke_count));

    emitter.on_handler("test", 0, &listener);

    emitter.emit("test", &message()).unwrap();
    assert_eq!(invoke_count.load(Ordering::SeqCst), 1);

    emitter.off("test", &listener);

    emitter.emit("test", &message()).unwrap();
    assert_eq!(invoke_count.load(Ordering::SeqCst), 1);
}

#[test]
fn stop_propagation_skips_remaining_on_listeners() {
    let emitter: EventEmitter<String> = EventEmitter::new();
    let invoke_count = Arc::new(AtomicUsize::new(0));

    emitter.on("test", counting(&invoke_count));
    emitter.on("test", counting_stop(&invoke_count));

    emitter.emit("test", &message()).unwrap();
    assert_eq!(invoke_count.load(Ordering::SeqCst), 1);

    emitter.emit("test", &message()).unwrap();
    assert_eq!(invoke_count.load(Ordering::SeqCst), 2);
}

#[test]
fn respects_listener_priority() {
    let emitter: EventEmitter<String> = EventEmitter::new();
    let invoke_order = Arc::new(Mutex::new(Vec::new()));

    for priority in [4, 3, 3, 2] {
        let invoke_order = invoke_order.clone();
        emitter.on_with_priority("test", priority, move |_: &String| {
            invoke_order.lock().unwrap().push(priority);
        });
    }

    emitter.emit("test", &message()).unwrap();
    assert_eq!(*invoke_order.lock().unwrap(), vec![4, 3, 3, 2]);
}

#[test]
fn priority_registration_order_does_not_matter() {
    let emitter: EventEmitter<String> = EventEmitter::new();
    let invoke_order = Arc::new(Mutex::new(Vec::new()));

    for priority in [-5, 10, 0, 7, -1] {
        let invoke_order = invoke_order.clone();
        emitter.on_with_priority("test", priority, move |_: &String| {
            invoke_order.lock().unwrap().push(priority);
        });
    }

    emitter.emit("test", &message()).unwrap();
    assert_eq!(*invoke_order.lock().unwrap(), vec![10, 7, 0, -1, -5]);
}

#[test]
fn once_and_on_listeners_share_priority_buckets() {
    let emitter: EventEmitter<String> = EventEmitter::new();
    let order = Arc::new(Mutex::new(Vec::new()));

    let log = order.clone();
    emitter.on_with_priority("test", 1, move |_: &String| log.lock().unwrap().push("on@1"));
    let log = order.clone();
    emitter.once_with_priority("test", 1, move |_: &String| log.lock().unwrap().push("once@1"));
    let log = order.clone();
    emitter.once_with_priority("test", 2, move |_: &String| log.lock().unwrap().push("once@2"));

    emitter.emit("test", &message()).unwrap();
    emitter.emit("test", &message()).unwrap();
    assert_eq!(
        *order.lock().unwrap(),
        vec!["once@2", "once@1", "on@1", "on@1"]
    );
}

#[test]
fn events_are_independent() {
    let emitter: EventEmitter<String> = EventEmitter::new();
    let invoke_count = Arc::new(AtomicUsize::new(0));

    emitter.on("open", counting(&invoke_count));
    emitter.on("close", counting_stop(&invoke_count));

    emitter.emit("close", &message()).unwrap();
    emitter.emit("open", &message()).unwrap();
    emitter.emit("other", &message()).unwrap();
    assert_eq!(invoke_count.load(Ordering::SeqCst), 2);

    let mut events = emitter.registered_events();
    events.sort();
    assert_eq!(events, vec!["close", "open"]);
}
