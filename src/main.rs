use std::sync::Arc;

use secrecy::SecretString;

use daybrief::agents::{
    AgentRegistry, CalendarAgent, EmailAgent, NotesAgent, NotificationAgent,
};
use daybrief::config::WorkflowConfig;
use daybrief::error::ConfigError;
use daybrief::gateway::{Gateway, LlmConfig, create_provider};
use daybrief::providers::{CalendarClient, DocsClient, GmailClient, SlackClient};
use daybrief::workflow::{Orchestrator, RunOutcome, parse_schedule, run_on_schedule};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let llm_config = LlmConfig::from_env()?;
    let workflow_config = WorkflowConfig::from_env();

    let google_token = std::env::var("GOOGLE_ACCESS_TOKEN")
        .map_err(|_| ConfigError::MissingEnvVar("GOOGLE_ACCESS_TOKEN".to_string()))?;
    let slack_token = std::env::var("SLACK_BOT_TOKEN")
        .map_err(|_| ConfigError::MissingEnvVar("SLACK_BOT_TOKEN".to_string()))?;
    let schedule = std::env::var("DAYBRIEF_SCHEDULE").ok();

    eprintln!("📋 Daybrief v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Model: {}", llm_config.model);
    eprintln!("   Channel: {}", workflow_config.default_channel);
    eprintln!(
        "   Lookahead: {}h, reminder window: {}-{} min",
        workflow_config.lookahead_hours,
        workflow_config.reminder_window_min,
        workflow_config.reminder_window_max,
    );

    let provider = create_provider(&llm_config);
    let gateway = Arc::new(Gateway::new(provider, workflow_config.prompt_char_limit));

    let mail = Arc::new(GmailClient::new(SecretString::from(google_token.clone())));
    let calendar = Arc::new(CalendarClient::new(SecretString::from(
        google_token.clone(),
    )));
    let docs = Arc::new(DocsClient::new(SecretString::from(google_token)));
    let chat = Arc::new(SlackClient::new(SecretString::from(slack_token)));

    let registry = AgentRegistry::new(
        EmailAgent::new(
            gateway.clone(),
            mail,
            workflow_config.email_fallback_chars,
        ),
        CalendarAgent::new(gateway.clone(), calendar),
        NotesAgent::new(gateway, docs, workflow_config.notes_fallback_chars),
        NotificationAgent::new(chat, workflow_config.default_channel.clone()),
    );

    let mut orchestrator = Orchestrator::initialize(workflow_config, registry)?;

    match schedule {
        Some(expr) => {
            let schedule = parse_schedule(&expr)?;
            eprintln!("   Schedule: {expr}\n");
            run_on_schedule(&mut orchestrator, &schedule).await;
        }
        None => {
            eprintln!("   Schedule: none (single run)\n");
            let report = orchestrator.run_daily_workflow().await?;
            match report.outcome {
                RunOutcome::Completed => eprintln!(
                    "Done: {} emails ({} high priority), {} meetings, {} reminders",
                    report.emails_processed,
                    report.high_priority,
                    report.meetings_upcoming,
                    report.reminders_sent,
                ),
                RunOutcome::Failed(reason) => eprintln!("Workflow failed: {reason}"),
            }
        }
    }

    Ok(())
}
