//! Workflow orchestration — the daily pipeline, digest, reminder window,
//! and periodic scheduling.

pub mod digest;
pub mod orchestrator;
pub mod reminders;
pub mod schedule;

pub use digest::build_digest;
pub use orchestrator::{Orchestrator, RunOutcome, RunReport, WorkflowState};
pub use reminders::{Reminder, ReminderWindow, due_reminders};
pub use schedule::{parse_schedule, run_on_schedule};
