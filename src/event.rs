//! Assignment notifications
//!
//! Object fields announce an assignment before it happens. Subscribers run
//! synchronously, in subscription order, and may replace the value being
//! assigned.

use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use tracing::trace;

use crate::value::Value;

/// An object value is about to be assigned to `name` on `context`
#[derive(Debug, Clone)]
pub struct BeforeObjectAssigned {
    /// The value to assign; subscribers may replace it
    pub object: Value,
    pub name: String,
    /// The object receiving the assignment
    pub context: Value,
}

type Subscriber = Arc<dyn Fn(&mut BeforeObjectAssigned) + Send + Sync>;

#[derive(Default)]
pub struct EventChannel {
    subscribers: RwLock<Vec<Subscriber>>,
}

impl EventChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, subscriber: F)
    where
        F: Fn(&mut BeforeObjectAssigned) + Send + Sync + 'static,
    {
        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(subscriber));
    }

    /// Dispatch to every subscriber. Subscribers may themselves subscribe or
    /// assign; they see the list as it was when dispatch started.
    pub fn notify(&self, event: &mut BeforeObjectAssigned) {
        let subscribers = self
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        trace!(name = %event.name, subscribers = subscribers.len(), "Publishing BeforeObjectAssigned");
        for subscriber in &subscribers {
            subscriber(event);
        }
    }

    pub fn len(&self) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl std::fmt::Debug for EventChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventChannel")
            .field("subscribers", &self.len())
            .finish()
    }
}

/// The process-wide channel used by `Field::set`
pub fn channel() -> &'static EventChannel {
    static CHANNEL: OnceLock<EventChannel> = OnceLock::new();
    CHANNEL.get_or_init(EventChannel::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn event() -> BeforeObjectAssigned {
        BeforeObjectAssigned {
            object: Value::Int(1),
            name: "child".to_string(),
            context: Value::Missing,
        }
    }

    #[test]
    fn test_subscribers_run_in_order() {
        let channel = EventChannel::new();
        channel.subscribe(|e| e.object = Value::Int(2));
        channel.subscribe(|e| {
            if e.object == Value::Int(2) {
                e.object = Value::Int(3);
            }
        });

        let mut e = event();
        channel.notify(&mut e);
        assert_eq!(e.object, Value::Int(3));
        assert_eq!(channel.len(), 2);
    }

    #[test]
    fn test_clear() {
        let calls = Arc::new(AtomicUsize::new(0));
        let channel = EventChannel::new();
        let counter = calls.clone();
        channel.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        channel.notify(&mut event());
        channel.clear();
        channel.notify(&mut event());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(channel.is_empty());
    }
}
