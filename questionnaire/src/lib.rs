//! # questionnaire
//!
//! Survey prompt trees whose prompts react to each other's activation state.
//!
//! Prompts publish `PromptActivated` / `PromptDeactivated` on an [`EventBus`]
//! whenever their state changes. A prompt that watches another one
//! deactivates itself when the watched prompt is deactivated, which may in
//! turn deactivate prompts watching it.
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use questionnaire::{EventBus, Prompt, Questionnaire, render};
//!
//! let yes = Prompt::boolean("Yes");
//! let follow_up = Prompt::question(2, "Why?", vec![Prompt::text_answer(500)]);
//! let survey = Questionnaire::new(
//!     "Feedback",
//!     vec![
//!         Prompt::question(1, "Did you enjoy it?", vec![Prompt::single_choice(vec![Arc::clone(&yes)])]),
//!         Arc::clone(&follow_up),
//!     ],
//!     Arc::new(EventBus::new()),
//! )?;
//!
//! survey.watch_deactivation(&yes, &follow_up)?;
//! yes.set_active(false);
//!
//! assert!(!follow_up.is_active());
//! assert!(!render(&survey).contains("Why?"));
//! # Ok::<(), questionnaire::WiringError>(())
//! ```
//!
//! ## Crates
//!
//! - `questionnaire-bus` - the event bus and delivery executors
//! - `questionnaire-types` - prompts, questionnaires, validation rules
//! - `questionnaire-text` - indented text rendering

// Re-export all types from questionnaire-types
pub use questionnaire_types::*;

// Re-export the bus, for custom subscribers and executors
pub use questionnaire_bus::{
    Delivery, Event, EventKey, Executor, Handler, HandlerError, Interests, Job, QueueWorker,
    Queued, Subscriber, SubscriptionId, Synchronous,
};

// Re-export rendering
pub use questionnaire_text::{TextOptions, render, render_prompt, render_with_options};

// Event recorder for testing cascades without hand-written subscribers
mod recorder;
pub use recorder::Recorder;
