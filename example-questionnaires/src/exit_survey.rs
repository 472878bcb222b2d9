//! "Family Relationship with your Employer" exit survey.
//!
//! Question 3 only makes sense while the first answer of question 2 is
//! available, and question 4 only while question 3 is.

use std::sync::Arc;

use questionnaire::{
    EventBus, Prompt, PromptKind, QuestionPrompt, Questionnaire, Required, TextPrompt,
    WiringError,
};
use tracing::info;

pub const TITLE: &str = "Family Relationship with your Employer";

/// The exit survey, with handles to the prompts involved in its dependencies.
#[derive(Debug)]
pub struct ExitSurvey {
    pub questionnaire: Questionnaire,

    /// Q2's first option: "my father, mother, grandparent ...".
    pub parent_owned: Arc<Prompt>,

    /// Q3: insurability ruling in the last three years.
    pub ruling: Arc<Prompt>,

    /// Q4: decision on insurability.
    pub decision: Arc<Prompt>,
}

impl ExitSurvey {
    /// Build the survey on its own synchronous bus.
    pub fn build() -> Result<Self, WiringError> {
        Self::build_on(Arc::new(EventBus::new()))
    }

    /// Build the survey on the given bus.
    pub fn build_on(bus: Arc<EventBus>) -> Result<Self, WiringError> {
        let parent_owned = Prompt::boolean(
            "my father, mother, grandparent or great-grandparent (including adoptive, step and in-law)",
        );
        let ruling = question_three(3);
        let decision = question_four(4);

        let questionnaire = Questionnaire::new(
            TITLE,
            vec![
                help_link(),
                question_one(1),
                question_two(2, Arc::clone(&parent_owned)),
                Arc::clone(&ruling),
                Arc::clone(&decision),
            ],
            bus,
        )?;

        Ok(Self {
            questionnaire,
            parent_owned,
            ruling,
            decision,
        })
    }

    /// Q3 follows Q2's first answer, Q4 follows Q3.
    pub fn wire_dependencies(&self) -> Result<(), WiringError> {
        self.questionnaire
            .watch_deactivation(&self.parent_owned, &self.ruling)?;
        self.questionnaire
            .watch_deactivation(&self.ruling, &self.decision)?;
        info!("exit survey dependencies wired");
        Ok(())
    }
}

fn help_link() -> Arc<Prompt> {
    Prompt::help_link(
        "Help for this page",
        vec![
            Prompt::bold_info("Ruling from CRA"),
            Prompt::info(
                "A ruling is an official decision issued by an authorized officer of the CRA.",
            ),
            Prompt::bold_info("Appeal to the CRA, Tax Court or Federal Court"),
            Prompt::info("If the appeal is not finalized, provide the decision being appealed."),
        ],
    )
}

fn question_one(number: u32) -> Arc<Prompt> {
    let employer = Prompt::builder("", PromptKind::Text(TextPrompt::new(500)))
        .rule(Required)
        .build();

    Prompt::question(
        number,
        "To which employer are you related?",
        vec![
            Prompt::note("Provide the name of the business not the name of the individual."),
            employer,
        ],
    )
}

fn question_two(number: u32, parent_owned: Arc<Prompt>) -> Arc<Prompt> {
    let owners = Prompt::single_choice(vec![
        parent_owned,
        Prompt::boolean("my brother or sister (including step or in-law)"),
        Prompt::boolean(
            "my son, daughter, grandchild or great-grandchild (including adoptive, step and in-law)",
        ),
        Prompt::boolean("my spouse (including common law)"),
        Prompt::boolean("my aunt, uncle, niece, nephew or cousin"),
    ]);

    Prompt::new(
        "The business is owned by:",
        PromptKind::Question(QuestionPrompt::new(number, vec![owners]).optional()),
    )
}

fn question_three(number: u32) -> Arc<Prompt> {
    Prompt::question(
        number,
        "Was there an insurability ruling made in the last three years by the Canada Revenue Agency (CRA) for this employment?",
        vec![Prompt::single_choice(vec![
            Prompt::boolean("Yes"),
            Prompt::boolean("No"),
        ])],
    )
}

fn question_four(number: u32) -> Arc<Prompt> {
    Prompt::question(
        number,
        "What was the decision on the insurability of this employment?",
        vec![
            Prompt::single_choice(vec![
                Prompt::boolean("The employment was insurable"),
                Prompt::boolean("The employment was not insurable"),
                Prompt::boolean("No decision has been made yet"),
            ]),
            Prompt::note(
                "If the CRA insurability decision is currently under appeal, refer to the help text.",
            ),
        ],
    )
}
