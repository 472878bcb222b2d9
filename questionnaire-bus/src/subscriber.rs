use std::any::Any;
use std::marker::PhantomData;
use std::sync::{Arc, Weak};

use tracing::debug;

use crate::{Event, EventKey, HandlerError, Job};

/// Handles events of type `E`.
///
/// Implement this once per event type a subscriber is interested in, then
/// list those types in [`Subscriber::interests`].
pub trait Handler<E: Event>: Send + Sync + 'static {
    /// React to a published event.
    fn on_event(&self, event: &E) -> Result<(), HandlerError>;
}

/// A type that can be registered on an [`EventBus`](crate::EventBus).
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use questionnaire_bus::{EventBus, Handler, HandlerError, Interests, Subscriber};
///
/// struct Saved;
///
/// struct Autosave;
///
/// impl Handler<Saved> for Autosave {
///     fn on_event(&self, _event: &Saved) -> Result<(), HandlerError> {
///         Ok(())
///     }
/// }
///
/// impl Subscriber for Autosave {
///     fn interests(interests: &mut Interests<Self>) {
///         interests.on::<Saved>();
///     }
/// }
///
/// let bus = EventBus::new();
/// let autosave = Arc::new(Autosave);
/// bus.subscribe(&autosave);
/// assert_eq!(bus.publish(Saved).delivered, 1);
/// ```
pub trait Subscriber: Send + Sync + Sized + 'static {
    /// Declare every event type this subscriber handles.
    ///
    /// Declaring nothing makes subscription a no-op.
    fn interests(interests: &mut Interests<Self>);
}

/// Collects the event types a subscriber declared.
pub struct Interests<S> {
    subscriber: Weak<S>,
    routes: Vec<(EventKey, Arc<dyn Route>)>,
}

impl<S: Subscriber> Interests<S> {
    pub(crate) fn new(subscriber: &Arc<S>) -> Self {
        Self {
            subscriber: Arc::downgrade(subscriber),
            routes: Vec::new(),
        }
    }

    /// Route events of type `E` to this subscriber.
    pub fn on<E: Event>(&mut self) -> &mut Self
    where
        S: Handler<E>,
    {
        let route: Arc<dyn Route> = Arc::new(TypedRoute::<S, E> {
            subscriber: self.subscriber.clone(),
            event: PhantomData,
        });
        self.routes.push((EventKey::of::<E>(), route));
        self
    }

    pub(crate) fn into_routes(self) -> Vec<(EventKey, Arc<dyn Route>)> {
        self.routes
    }
}

/// Type-erased, non-owning link from a registry entry to one handler.
pub(crate) trait Route: Send + Sync {
    /// Bind the event to a live subscriber, or `None` if the subscriber is gone.
    ///
    /// The job only holds a weak reference and upgrades it when run, so a
    /// deferred delivery never keeps its subscriber alive.
    fn bind(&self, event: &Arc<dyn Any + Send + Sync>) -> Option<Job>;

    fn subscriber_name(&self) -> &'static str;
}

struct TypedRoute<S, E> {
    subscriber: Weak<S>,
    event: PhantomData<fn(E)>,
}

impl<S, E> Route for TypedRoute<S, E>
where
    S: Handler<E>,
    E: Event,
{
    fn bind(&self, event: &Arc<dyn Any + Send + Sync>) -> Option<Job> {
        if self.subscriber.strong_count() == 0 {
            return None;
        }
        let subscriber = Weak::clone(&self.subscriber);
        let event = Arc::clone(event).downcast::<E>().ok()?;
        let name = self.subscriber_name();
        Some(Job::new(EventKey::of::<E>(), name, move || {
            match subscriber.upgrade() {
                Some(subscriber) => subscriber.on_event(&event),
                None => {
                    debug!(
                        event = %EventKey::of::<E>(),
                        subscriber = name,
                        "subscriber dropped before delivery"
                    );
                    Ok(())
                }
            }
        }))
    }

    fn subscriber_name(&self) -> &'static str {
        std::any::type_name::<S>()
    }
}
