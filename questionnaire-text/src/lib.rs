//! # questionnaire-text
//!
//! Render a questionnaire as indented plain text.
//!
//! Each prompt becomes one line, nested prompts are indented one level
//! deeper than their parent. Inactive questions are left out together with
//! everything under them. Rendering only reads prompt state.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use questionnaire_text::{render, TextOptions, render_with_options};
//!
//! println!("{}", render(&questionnaire));
//! println!("{}", render_with_options(&questionnaire, &TextOptions::new().with_indent("  ")));
//! ```

mod generator;

pub use generator::{TextOptions, render, render_prompt, render_with_options};
