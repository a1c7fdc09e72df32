//! Daybrief — multi-agent daily work automation core.
//!
//! Four capability agents (email, calendar, notes, notification) wrap one
//! external collaborator each, share a language-model gateway for turning
//! raw content into structured records, and are sequenced by a workflow
//! orchestrator that aggregates a daily digest and evaluates time-windowed
//! meeting reminders.

pub mod agents;
pub mod config;
pub mod error;
pub mod gateway;
pub mod providers;
pub mod workflow;
