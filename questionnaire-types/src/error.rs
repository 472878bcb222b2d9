use crate::PromptId;

/// Error type for wiring prompts together.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum WiringError {
    /// A prompt was asked to watch itself.
    #[error("Prompt {0} cannot depend on itself")]
    SelfDependency(PromptId),

    /// The prompt is not attached to any event bus.
    #[error("Prompt {0} is not attached to an event bus")]
    NotAttached(PromptId),

    /// The prompt is attached to a different event bus.
    #[error("Prompt {0} is attached to a different event bus")]
    ForeignBus(PromptId),
}

impl WiringError {
    /// The prompt the error is about.
    pub fn prompt(&self) -> PromptId {
        match self {
            Self::SelfDependency(id) | Self::NotAttached(id) | Self::ForeignBus(id) => *id,
        }
    }
}
