//! Workflow orchestrator — sequences the daily pipeline and isolates
//! stage failures.
//!
//! One linear pipeline per run: fetch email → fetch calendar → send digest
//! → evaluate reminders. Any stage error is caught once here, logged,
//! reported through a single urgent notification, and the run ends
//! cleanly. Only initialization is allowed to fail the caller.

use chrono::Utc;
use tracing::{error, info};

use crate::agents::types::{MeetingNote, MeetingRecord, Priority};
use crate::agents::{AgentRegistry, Capability};
use crate::config::WorkflowConfig;
use crate::error::{ConfigError, WorkflowError};
use crate::workflow::digest::build_digest;
use crate::workflow::reminders::due_reminders;

/// Lifecycle of the orchestrator.
///
/// `Failed` is terminal and reachable only from initialization; a running
/// workflow degrades instead of failing the instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Uninitialized,
    Initialized,
    Running,
    Idle,
    Failed,
}

impl WorkflowState {
    /// Whether a new run may start from this state.
    pub fn can_run(self) -> bool {
        matches!(self, Self::Initialized | Self::Idle)
    }
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    Failed(String),
}

/// Counters from one daily-workflow run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub emails_processed: usize,
    pub high_priority: usize,
    pub meetings_upcoming: usize,
    pub reminders_sent: usize,
    pub outcome: RunOutcome,
}

impl RunReport {
    fn failed(reason: String) -> Self {
        Self {
            emails_processed: 0,
            high_priority: 0,
            meetings_upcoming: 0,
            reminders_sent: 0,
            outcome: RunOutcome::Failed(reason),
        }
    }
}

/// Owns the agent registry and runs the daily pipeline.
pub struct Orchestrator {
    config: WorkflowConfig,
    registry: AgentRegistry,
    state: WorkflowState,
}

impl Orchestrator {
    /// Wire the registry and validate configuration.
    ///
    /// This is the one fatal path: a config violation propagates to the
    /// caller instead of degrading.
    pub fn initialize(
        config: WorkflowConfig,
        registry: AgentRegistry,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let names: Vec<&str> = Capability::ALL
            .iter()
            .map(|c| registry.agent_name(*c))
            .collect();
        info!(agents = ?names, "workflow system initialized");

        Ok(Self {
            config,
            registry,
            state: WorkflowState::Initialized,
        })
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn registry(&self) -> &AgentRegistry {
        &self.registry
    }

    /// Execute one daily run.
    ///
    /// Returns `Err` only when called from a non-runnable state; stage
    /// failures are absorbed into the report's `Failed` outcome after the
    /// failure notification goes out.
    pub async fn run_daily_workflow(&mut self) -> Result<RunReport, WorkflowError> {
        if !self.state.can_run() {
            return Err(WorkflowError::InvalidState { state: self.state });
        }
        self.state = WorkflowState::Running;
        info!("starting daily workflow");

        let report = match self.execute_stages().await {
            Ok(report) => report,
            Err(e) => {
                error!(error = %e, "daily workflow failed");
                self.report_failure(&e).await;
                RunReport::failed(e.to_string())
            }
        };

        self.state = WorkflowState::Idle;
        info!(
            emails = report.emails_processed,
            meetings = report.meetings_upcoming,
            reminders = report.reminders_sent,
            "daily workflow finished"
        );
        Ok(report)
    }

    /// The four stages, in strict sequence. Each stage completes before
    /// the next begins; there is no fan-out between them.
    async fn execute_stages(&self) -> Result<RunReport, WorkflowError> {
        // Stage 1: process unread email.
        let emails = self.registry.email().execute(self.config.max_emails).await;
        let high_priority = emails
            .iter()
            .filter(|e| e.priority == Priority::High)
            .count();

        // Stage 2: surface upcoming meetings.
        let meetings = self
            .registry
            .calendar()
            .execute(self.config.lookahead_hours)
            .await;

        // Stage 3: send the digest — always, even when both lists are empty.
        let digest = build_digest(&emails, &meetings, self.config.digest_meeting_preview);
        self.registry.notification().execute(&digest, None, false).await;

        // Stage 4: evaluate reminder triggers over stage 2's meetings.
        let due = due_reminders(&meetings, Utc::now(), self.config.reminder_window());
        let reminders_sent = due.len();
        for reminder in due {
            self.registry
                .notification()
                .execute(&reminder.message, None, true)
                .await;
        }

        Ok(RunReport {
            emails_processed: emails.len(),
            high_priority,
            meetings_upcoming: meetings.len(),
            reminders_sent,
            outcome: RunOutcome::Completed,
        })
    }

    /// One best-effort urgent notification describing a failed run.
    async fn report_failure(&self, error: &WorkflowError) {
        self.registry
            .notification()
            .execute(&format!("Daily workflow failed: {error}"), None, true)
            .await;
    }

    /// Process a meeting transcript into persisted notes and announce the
    /// result. Returns `None` when no analysis was available.
    pub async fn process_meeting_transcript(
        &self,
        transcript: &str,
        meeting: &MeetingRecord,
    ) -> Option<MeetingNote> {
        let note = self.registry.notes().execute(transcript, meeting).await?;
        self.registry
            .notification()
            .execute(
                &format!("📝 Meeting notes completed for '{}'", note.title),
                None,
                false,
            )
            .await;
        Some(note)
    }
}
