use std::sync::Arc;

use questionnaire_bus::Event;

use crate::Prompt;

/// An event about a state change of one prompt.
pub trait PromptEvent: Event {
    /// The prompt whose state changed.
    fn prompt(&self) -> &Arc<Prompt>;
}

/// Published when a prompt becomes active.
#[derive(Debug, Clone)]
pub struct PromptActivated {
    pub prompt: Arc<Prompt>,
}

/// Published when a prompt becomes inactive.
#[derive(Debug, Clone)]
pub struct PromptDeactivated {
    pub prompt: Arc<Prompt>,
}

impl PromptEvent for PromptActivated {
    fn prompt(&self) -> &Arc<Prompt> {
        &self.prompt
    }
}

impl PromptEvent for PromptDeactivated {
    fn prompt(&self) -> &Arc<Prompt> {
        &self.prompt
    }
}
