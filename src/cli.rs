//! Command-line surface: argument definitions, operand validation, and
//! rendering of repository results to the terminal.

use std::io::Write;

use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::repository::TaskRepository;
use crate::task::Status;

#[derive(Debug, Parser)]
#[command(
    name = "task-tracker",
    version,
    about = "Track short tasks from the command line"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Raw subcommands as clap parses them. Id and status operands stay strings
/// here so validation failures surface as our own diagnostics instead of
/// clap's.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Add a new task
    Add { description: String },
    /// Replace the description of an existing task
    Update { id: String, description: String },
    /// Delete a task
    Delete { id: String },
    /// Move a task to in-progress
    MarkInProgress { id: String },
    /// Move a task to done
    MarkDone { id: String },
    /// List tasks, optionally filtered by status
    List { status: Option<String> },
}

/// Operand validation failures. Reported before the repository is
/// constructed, so no file access happens for a malformed invocation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UsageError {
    #[error("invalid id")]
    InvalidId,
    #[error("invalid status")]
    InvalidStatus,
}

/// A command whose operands have been validated into domain types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Add { description: String },
    Update { id: u32, description: String },
    Delete { id: u32 },
    MarkInProgress { id: u32 },
    MarkDone { id: u32 },
    List { status: Option<Status> },
}

impl TryFrom<Command> for Action {
    type Error = UsageError;

    fn try_from(command: Command) -> Result<Self, Self::Error> {
        Ok(match command {
            Command::Add { description } => Action::Add { description },
            Command::Update { id, description } => Action::Update {
                id: parse_id(&id)?,
                description,
            },
            Command::Delete { id } => Action::Delete { id: parse_id(&id)? },
            Command::MarkInProgress { id } => Action::MarkInProgress { id: parse_id(&id)? },
            Command::MarkDone { id } => Action::MarkDone { id: parse_id(&id)? },
            Command::List { status } => Action::List {
                status: status.as_deref().map(parse_status).transpose()?,
            },
        })
    }
}

fn parse_id(raw: &str) -> Result<u32, UsageError> {
    raw.parse().map_err(|_| UsageError::InvalidId)
}

fn parse_status(raw: &str) -> Result<Status, UsageError> {
    raw.parse().map_err(|_| UsageError::InvalidStatus)
}

/// Runs one validated action against the repository and writes any success
/// output to `out`.
///
/// Only `add` and `list` produce output; the other mutations signal success
/// by exit code alone.
pub fn execute(
    action: Action,
    repo: &mut dyn TaskRepository,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match action {
        Action::Add { description } => {
            let task = repo.add(&description)?;
            writeln!(out, "task added successfully (ID: {})", task.id)?;
        }
        Action::Update { id, description } => repo.update(id, &description)?,
        Action::Delete { id } => repo.delete(id)?,
        Action::MarkInProgress { id } => repo.mark_in_progress(id)?,
        Action::MarkDone { id } => repo.mark_done(id)?,
        Action::List { status } => {
            for task in repo.list(status) {
                writeln!(out, "{} {} {}", task.id, task.description, task.status)?;
            }
        }
    }
    Ok(())
}
