//! Cross-instance open broadcast
//!
//! When a participating modal finishes opening it announces its id; every
//! other participating modal closes itself in response, which runs that
//! modal's own cleanup pop if it owned an entry. Implemented as an explicit
//! observer registry scoped to the process rather than a global event
//! target, so subscription lifetime is owned by the subscriber and disposal
//! stays explicit.
//!
//! Dispatch is synchronous and single-threaded. No ordering is guaranteed
//! between receivers; each reacts independently and idempotently.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Notification that a participating modal finished opening.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalOpened {
    pub id: String,
}

type Observer = Rc<dyn Fn(&ModalOpened)>;

thread_local! {
    static REGISTRY: RefCell<Vec<(u64, Observer)>> = RefCell::new(Vec::new());
}

static SUBSCRIPTION_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Announce an open to every live subscriber, including the broadcaster's
/// own observer if it registered one.
///
/// Observers are snapshotted before dispatch, so a callback that closes a
/// modal (and touches the registry again) cannot invalidate the iteration.
pub fn publish(event: &ModalOpened) {
    let observers: Vec<Observer> = REGISTRY.with(|registry| {
        registry
            .borrow()
            .iter()
            .map(|(_, observer)| observer.clone())
            .collect()
    });
    for observer in observers {
        observer(event);
    }
}

/// Register an observer. Dropping the returned subscription unregisters it.
pub fn subscribe(observer: impl Fn(&ModalOpened) + 'static) -> OpenSubscription {
    let token = SUBSCRIPTION_COUNTER.fetch_add(1, Ordering::Relaxed);
    REGISTRY.with(|registry| {
        registry.borrow_mut().push((token, Rc::new(observer)));
    });
    OpenSubscription { token }
}

/// RAII guard for a coordinator subscription; removal is idempotent.
pub struct OpenSubscription {
    token: u64,
}

impl Drop for OpenSubscription {
    fn drop(&mut self) {
        REGISTRY.with(|registry| {
            registry
                .borrow_mut()
                .retain(|(token, _)| *token != self.token);
        });
    }
}
