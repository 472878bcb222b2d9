use crate::Prompt;

/// A validation rule attached to a prompt.
///
/// Closures of the form `Fn(&Prompt) -> bool` are rules as well.
pub trait BusinessRule: Send + Sync {
    /// Check whether the prompt currently satisfies the rule.
    fn is_valid(&self, prompt: &Prompt) -> bool;
}

impl<F> BusinessRule for F
where
    F: Fn(&Prompt) -> bool + Send + Sync,
{
    fn is_valid(&self, prompt: &Prompt) -> bool {
        self(prompt)
    }
}

/// The prompt must hold a non-empty value.
#[derive(Debug, Clone, Copy, Default)]
pub struct Required;

impl BusinessRule for Required {
    fn is_valid(&self, prompt: &Prompt) -> bool {
        prompt.value().is_some_and(|value| !value.trim().is_empty())
    }
}

/// The prompt's value, if any, must not exceed this many characters.
#[derive(Debug, Clone, Copy)]
pub struct MaxLength(pub usize);

impl BusinessRule for MaxLength {
    fn is_valid(&self, prompt: &Prompt) -> bool {
        prompt
            .value()
            .is_none_or(|value| value.chars().count() <= self.0)
    }
}
