use std::sync::Arc;

use questionnaire_bus::EventBus;
use tracing::debug;

use crate::{Prompt, PromptId, WiringError};

/// The root of a prompt tree.
///
/// A questionnaire owns the event bus its prompts publish on. Every prompt
/// in the tree is attached to that bus when the questionnaire is created.
#[derive(Debug)]
pub struct Questionnaire {
    /// Title shown above all prompts.
    title: String,

    /// Top-level prompts (help links, questions, ...).
    prompts: Vec<Arc<Prompt>>,

    bus: Arc<EventBus>,
}

impl Questionnaire {
    /// Create a questionnaire and attach every prompt in the tree to `bus`.
    ///
    /// Fails if a prompt is already attached to another live bus. The whole
    /// tree is checked before anything is attached, so a rejected
    /// questionnaire leaves its prompts untouched.
    pub fn new(
        title: impl Into<String>,
        prompts: Vec<Arc<Prompt>>,
        bus: Arc<EventBus>,
    ) -> Result<Self, WiringError> {
        let questionnaire = Self {
            title: title.into(),
            prompts,
            bus,
        };
        for prompt in questionnaire.walk() {
            prompt.can_attach(&questionnaire.bus)?;
        }
        let mut attached = 0;
        for prompt in questionnaire.walk() {
            prompt.attach(&questionnaire.bus)?;
            attached += 1;
        }
        debug!(title = %questionnaire.title, attached, "questionnaire attached to bus");
        Ok(questionnaire)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Get the top-level prompts.
    pub fn prompts(&self) -> &[Arc<Prompt>] {
        &self.prompts
    }

    /// The bus every prompt of this questionnaire publishes on.
    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    /// Check if the questionnaire has any prompts.
    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }

    /// Get the number of top-level prompts.
    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    /// Iterate over every prompt in the tree, depth-first, parents before children.
    pub fn walk(&self) -> impl Iterator<Item = &Arc<Prompt>> {
        let mut stack: Vec<&Arc<Prompt>> = self.prompts.iter().rev().collect();
        std::iter::from_fn(move || {
            let prompt = stack.pop()?;
            stack.extend(prompt.children().iter().rev());
            Some(prompt)
        })
    }

    /// Find a prompt anywhere in the tree.
    pub fn find(&self, id: PromptId) -> Option<&Arc<Prompt>> {
        self.walk().find(|prompt| prompt.id() == id)
    }

    /// Deactivate `dependent` whenever `dependency` is deactivated.
    ///
    /// Both prompts must belong to this questionnaire's bus.
    pub fn watch_deactivation(
        &self,
        dependency: &Arc<Prompt>,
        dependent: &Arc<Prompt>,
    ) -> Result<(), WiringError> {
        if dependent.bus().is_none() {
            return Err(WiringError::NotAttached(dependent.id()));
        }
        if !dependent.is_attached_to(&self.bus) {
            return Err(WiringError::ForeignBus(dependent.id()));
        }
        dependent.watch(dependency)
    }

    /// Check the business rules of every active prompt.
    pub fn is_valid(&self) -> bool {
        self.walk()
            .filter(|prompt| prompt.is_active())
            .all(|prompt| prompt.is_valid())
    }
}
