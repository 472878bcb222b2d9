use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::subscriber::Route;
use crate::{Event, EventKey, Executor, Interests, Subscriber, Synchronous};

/// Identifies one registry entry (one subscriber, one event type).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Outcome of a single [`EventBus::publish`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Delivery {
    /// Deliveries handed to the executor.
    pub delivered: usize,

    /// Dead entries removed from the registry after delivery.
    pub pruned: usize,
}

struct Entry {
    id: SubscriptionId,
    route: Arc<dyn Route>,
}

/// Process-wide registry from event type to weakly-held subscribers.
///
/// Share it behind an `Arc`. The bus never owns a subscriber; entries whose
/// subscriber was dropped are pruned on the next publish to their type.
///
/// Re-subscribing the same subscriber registers it again and it will receive
/// every event once per registration. Avoiding that is up to the caller.
pub struct EventBus {
    subscribers: Mutex<HashMap<EventKey, Vec<Entry>>>,
    next_id: AtomicU64,
    executor: Arc<dyn Executor>,
}

impl EventBus {
    /// Create a bus that delivers synchronously on the publishing thread.
    pub fn new() -> Self {
        Self::with_executor(Synchronous)
    }

    /// Create a bus with a custom delivery strategy.
    pub fn with_executor(executor: impl Executor + 'static) -> Self {
        Self {
            subscribers: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(0),
            executor: Arc::new(executor),
        }
    }

    /// Register a subscriber for every event type it declares.
    ///
    /// Returns one id per declared interest, in declaration order. A
    /// subscriber with no interests is ignored.
    pub fn subscribe<S: Subscriber>(&self, subscriber: &Arc<S>) -> Vec<SubscriptionId> {
        let mut interests = Interests::new(subscriber);
        S::interests(&mut interests);
        let routes = interests.into_routes();

        if routes.is_empty() {
            debug!(
                subscriber = std::any::type_name::<S>(),
                "subscriber declared no interests, nothing to register"
            );
            return Vec::new();
        }

        let mut registry = self.registry();
        routes
            .into_iter()
            .map(|(key, route)| {
                let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
                debug!(event = %key, subscriber = route.subscriber_name(), %id, "subscribed");
                registry.entry(key).or_default().push(Entry { id, route });
                id
            })
            .collect()
    }

    /// Deliver an event to every live subscriber of its type, in registration order.
    ///
    /// Handlers run outside the registry lock, so they may subscribe or
    /// publish themselves. Dead entries found during delivery are removed
    /// once delivery is done.
    pub fn publish<E: Event>(&self, event: E) -> Delivery {
        let key = EventKey::of::<E>();
        let snapshot: Vec<(SubscriptionId, Arc<dyn Route>)> = self
            .registry()
            .entry(key)
            .or_default()
            .iter()
            .map(|entry| (entry.id, Arc::clone(&entry.route)))
            .collect();

        let event: Arc<dyn Any + Send + Sync> = Arc::new(event);
        let mut delivery = Delivery::default();
        let mut dead = Vec::new();

        for (id, route) in snapshot {
            match route.bind(&event) {
                Some(job) => {
                    self.executor.execute(job);
                    delivery.delivered += 1;
                }
                None => dead.push(id),
            }
        }

        if !dead.is_empty() {
            if let Some(entries) = self.registry().get_mut(&key) {
                entries.retain(|entry| !dead.contains(&entry.id));
            }
            delivery.pruned = dead.len();
        }

        debug!(
            event = %key,
            delivered = delivery.delivered,
            pruned = delivery.pruned,
            "published"
        );
        delivery
    }

    /// Number of registry entries for `E`, including dead ones not yet pruned.
    pub fn subscriber_count<E: Event>(&self) -> usize {
        self.registry()
            .get(&EventKey::of::<E>())
            .map_or(0, Vec::len)
    }

    /// Check if the registry holds no entries at all.
    pub fn is_empty(&self) -> bool {
        self.registry().values().all(Vec::is_empty)
    }

    fn registry(&self) -> MutexGuard<'_, HashMap<EventKey, Vec<Entry>>> {
        // Handlers never run under this lock, so a poisoned guard still holds a consistent map.
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.registry();
        let mut map = f.debug_map();
        for (key, entries) in registry.iter() {
            map.entry(&key.short_name(), &entries.len());
        }
        map.finish()
    }
}
