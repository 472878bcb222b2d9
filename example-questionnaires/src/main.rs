use example_questionnaires::ExitSurvey;
use questionnaire::render;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let survey = ExitSurvey::build()?;

    println!("=== Complete questionnaire ===");
    print!("{}", render(&survey.questionnaire));

    survey.wire_dependencies()?;

    println!("\n=== Deactivating: {} ===", survey.parent_owned.text());
    survey.parent_owned.set_active(false);

    println!("\n=== Questionnaire with wired dependencies ===");
    print!("{}", render(&survey.questionnaire));

    Ok(())
}
