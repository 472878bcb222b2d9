//! Core types for questionnaires.
//!
//! This crate provides the prompt model and its activation protocol:
//! - `Questionnaire` - The root of a prompt tree, owning the event bus
//! - `Prompt` and `PromptKind` - Individual prompts and their shapes
//! - `PromptActivated` / `PromptDeactivated` - Events published on every state change
//! - `BusinessRule` - Validation rules attached to prompts
//!
//! A prompt that watches another prompt deactivates itself when that prompt
//! is deactivated. Reactivation never cascades.

mod prompt_id;
pub use prompt_id::PromptId;

mod kind;
pub use kind::{
    HelpLinkPrompt, InfoPrompt, PromptKind, QuestionPrompt, SingleChoicePrompt, TextPrompt,
};

mod events;
pub use events::{PromptActivated, PromptDeactivated, PromptEvent};

mod rule;
pub use rule::{BusinessRule, MaxLength, Required};

mod prompt;
pub use prompt::{Prompt, PromptBuilder};

mod questionnaire;
pub use questionnaire::Questionnaire;

mod error;
pub use error::WiringError;

pub use questionnaire_bus::EventBus;
