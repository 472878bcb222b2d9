pub mod exit_survey;

pub use exit_survey::ExitSurvey;
