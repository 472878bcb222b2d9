//! Plain-text generator implementation.

use std::sync::Arc;

use questionnaire_types::{Prompt, PromptKind, Questionnaire};

/// Options for text generation.
#[derive(Debug, Clone)]
pub struct TextOptions {
    /// String repeated once per nesting level.
    pub indent: String,
}

impl TextOptions {
    /// Create new options with default values (one tab per level).
    pub fn new() -> Self {
        Self {
            indent: "\t".to_string(),
        }
    }

    /// Set the string used for one level of indentation.
    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }
}

impl Default for TextOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a questionnaire with default options.
pub fn render(questionnaire: &Questionnaire) -> String {
    render_with_options(questionnaire, &TextOptions::new())
}

/// Render a questionnaire with custom options.
pub fn render_with_options(questionnaire: &Questionnaire, options: &TextOptions) -> String {
    let mut text = String::new();
    push_line(
        &mut text,
        options,
        0,
        &format!("Title: '{}'", questionnaire.title()),
    );
    render_all(&mut text, questionnaire.prompts(), options, 1);
    text
}

/// Render a single prompt (and what is nested under it) at the given level.
pub fn render_prompt(prompt: &Prompt, options: &TextOptions, level: usize) -> String {
    let mut text = String::new();
    generate_prompt(&mut text, prompt, options, level);
    text
}

fn render_all(text: &mut String, prompts: &[Arc<Prompt>], options: &TextOptions, level: usize) {
    for prompt in prompts {
        generate_prompt(text, prompt, options, level);
    }
}

fn generate_prompt(text: &mut String, prompt: &Prompt, options: &TextOptions, level: usize) {
    match prompt.kind() {
        PromptKind::Question(question) => {
            if !prompt.is_active() {
                return;
            }
            let marker = if question.mandatory { "*" } else { " " };
            push_line(
                text,
                options,
                level,
                &format!("{marker}{}. {}", question.number, prompt.text()),
            );
            render_all(text, &question.prompts, options, level + 1);
        }
        PromptKind::HelpLink(link) => {
            push_line(text, options, level, &format!("'{}'", prompt.text()));
            render_all(text, &link.prompts, options, level + 1);
        }
        PromptKind::SingleChoice(choice) => {
            for option in &choice.options {
                push_line(
                    text,
                    options,
                    level,
                    &format!("<radio>{}</radio>", option.text()),
                );
            }
        }
        PromptKind::Info(info) => {
            let line = if info.bold {
                format!("Info: <b>'{}'</b>", prompt.text())
            } else {
                format!("Info: '{}'", prompt.text())
            };
            push_line(text, options, level, &line);
        }
        PromptKind::Note => {
            push_line(text, options, level, &format!("<b>Note:</b> {}", prompt.text()));
        }
        PromptKind::Text(answer) => {
            let input = if answer.is_single_line() {
                "input"
            } else {
                "textarea"
            };
            push_line(text, options, level, &format!("Answer: {input}"));
        }
        PromptKind::Boolean => push_line(text, options, level, prompt.text()),
    }
}

fn push_line(text: &mut String, options: &TextOptions, level: usize, line: &str) {
    for _ in 0..level {
        text.push_str(&options.indent);
    }
    text.push_str(line);
    text.push('\n');
}
