//! Event recorder for testing activation cascades.
//!
//! `Recorder` subscribes to one event type and keeps every event it receives,
//! in delivery order.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use questionnaire::{EventBus, Prompt, PromptDeactivated, Questionnaire, Recorder};
//!
//! let answer = Prompt::boolean("Yes");
//! let bus = Arc::new(EventBus::new());
//! let _survey = Questionnaire::new("Survey", vec![Arc::clone(&answer)], Arc::clone(&bus)).unwrap();
//!
//! let recorder = Recorder::<PromptDeactivated>::subscribe(&bus);
//! answer.set_active(false);
//!
//! assert_eq!(recorder.prompt_ids(), vec![answer.id()]);
//! ```

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use questionnaire_bus::{Event, EventBus, Handler, HandlerError, Interests, Subscriber};
use questionnaire_types::{PromptEvent, PromptId};

/// A subscriber that records every `E` it receives.
///
/// The bus only holds it weakly: keep the returned `Arc` alive for as long as
/// events should be recorded.
pub struct Recorder<E> {
    events: Mutex<Vec<E>>,
}

impl<E: Event + Clone> Recorder<E> {
    /// Create a recorder that is not subscribed anywhere yet.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            events: Mutex::new(Vec::new()),
        })
    }

    /// Create a recorder and subscribe it to `bus`.
    pub fn subscribe(bus: &EventBus) -> Arc<Self> {
        let recorder = Self::new();
        bus.subscribe(&recorder);
        recorder
    }

    /// All events received so far.
    pub fn events(&self) -> Vec<E> {
        self.lock().clone()
    }

    /// Number of events received so far.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<E>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<E: PromptEvent + Clone> Recorder<E> {
    /// Ids of the prompts in the recorded events.
    pub fn prompt_ids(&self) -> Vec<PromptId> {
        self.lock().iter().map(|event| event.prompt().id()).collect()
    }

    /// Texts of the prompts in the recorded events.
    pub fn prompt_texts(&self) -> Vec<String> {
        self.lock()
            .iter()
            .map(|event| event.prompt().text().to_string())
            .collect()
    }
}

impl<E: Event + Clone> Handler<E> for Recorder<E> {
    fn on_event(&self, event: &E) -> Result<(), HandlerError> {
        self.lock().push(event.clone());
        Ok(())
    }
}

impl<E: Event + Clone> Subscriber for Recorder<E> {
    fn interests(interests: &mut Interests<Self>) {
        interests.on::<E>();
    }
}

impl<E> fmt::Debug for Recorder<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let recorded = self
            .events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        f.debug_struct("Recorder")
            .field("event", &std::any::type_name::<E>())
            .field("recorded", &recorded)
            .finish()
    }
}
