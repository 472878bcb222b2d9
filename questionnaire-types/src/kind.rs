use std::sync::Arc;

use crate::Prompt;

/// The kind of prompt, determining how it is presented and what it contains.
#[derive(Debug, Clone)]
pub enum PromptKind {
    /// A numbered question with nested answer prompts.
    Question(QuestionPrompt),

    /// Pick exactly one of several options.
    SingleChoice(SingleChoicePrompt),

    /// A checkable answer; its value is `"true"` or `"false"`.
    Boolean,

    /// Free text input.
    Text(TextPrompt),

    /// A short remark attached to a question.
    Note,

    /// Informational text, optionally emphasized.
    Info(InfoPrompt),

    /// A titled group of help texts.
    HelpLink(HelpLinkPrompt),
}

impl PromptKind {
    /// Nested prompts, empty for leaf kinds.
    pub fn children(&self) -> &[Arc<Prompt>] {
        match self {
            Self::Question(question) => question.prompts.as_slice(),
            Self::SingleChoice(choice) => choice.options.as_slice(),
            Self::HelpLink(link) => link.prompts.as_slice(),
            Self::Boolean | Self::Text(_) | Self::Note | Self::Info(_) => &[],
        }
    }

    /// Check if this kind collects an answer.
    pub fn is_answer(&self) -> bool {
        matches!(self, Self::SingleChoice(_) | Self::Boolean | Self::Text(_))
    }

    /// Check if this kind contains other prompts.
    pub fn is_composite(&self) -> bool {
        matches!(
            self,
            Self::Question(_) | Self::SingleChoice(_) | Self::HelpLink(_)
        )
    }
}

/// Configuration for a numbered question.
#[derive(Debug, Clone)]
pub struct QuestionPrompt {
    /// Position shown next to the title.
    pub number: u32,

    /// Whether an answer is required. Defaults to `true`.
    pub mandatory: bool,

    /// Answers, notes and other prompts under this question.
    pub prompts: Vec<Arc<Prompt>>,
}

impl QuestionPrompt {
    /// Create a mandatory question with the given number and prompts.
    pub fn new(number: u32, prompts: Vec<Arc<Prompt>>) -> Self {
        Self {
            number,
            mandatory: true,
            prompts,
        }
    }

    /// Mark the question as optional.
    pub fn optional(mut self) -> Self {
        self.mandatory = false;
        self
    }
}

/// Configuration for a single-choice answer.
#[derive(Debug, Clone)]
pub struct SingleChoicePrompt {
    /// The options, usually boolean answers.
    pub options: Vec<Arc<Prompt>>,
}

impl SingleChoicePrompt {
    /// Create a single-choice answer with the given options.
    pub fn new(options: Vec<Arc<Prompt>>) -> Self {
        Self { options }
    }
}

/// Configuration for a free text answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextPrompt {
    /// Maximum number of characters accepted.
    pub max_length: usize,
}

impl TextPrompt {
    /// Answers up to this length fit on a single input line.
    pub const SINGLE_LINE_LIMIT: usize = 100;

    pub fn new(max_length: usize) -> Self {
        Self { max_length }
    }

    /// Check if the answer fits on a single input line.
    pub fn is_single_line(&self) -> bool {
        self.max_length <= Self::SINGLE_LINE_LIMIT
    }
}

/// Configuration for informational text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InfoPrompt {
    /// Render the text emphasized.
    pub bold: bool,
}

impl InfoPrompt {
    pub fn plain() -> Self {
        Self { bold: false }
    }

    pub fn bold() -> Self {
        Self { bold: true }
    }
}

/// Configuration for a help link.
#[derive(Debug, Clone)]
pub struct HelpLinkPrompt {
    /// The help texts shown under the link title.
    pub prompts: Vec<Arc<Prompt>>,
}

impl HelpLinkPrompt {
    pub fn new(prompts: Vec<Arc<Prompt>>) -> Self {
        Self { prompts }
    }
}
