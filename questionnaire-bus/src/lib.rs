//! Type-routed event bus for questionnaire prompts.
//!
//! This crate provides the publish/subscribe plumbing the prompt model is built on:
//! - `EventBus` - Registry from event type to weakly-held subscribers
//! - `Subscriber` and `Handler` - Static declaration of which events a type handles
//! - `Executor` - Pluggable delivery strategy (`Synchronous` or `Queued`)
//!
//! The bus never keeps a subscriber alive. Once every other owner drops it,
//! the next publish for one of its event types skips and prunes its entry.

mod event;
pub use event::{Event, EventKey};

mod error;
pub use error::HandlerError;

mod subscriber;
pub use subscriber::{Handler, Interests, Subscriber};

mod executor;
pub use executor::{Executor, Job, QueueWorker, Queued, Synchronous};

mod bus;
pub use bus::{Delivery, EventBus, SubscriptionId};
