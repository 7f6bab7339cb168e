//! Core components of the task tracker: the task data model, the JSON
//! file-backed repository, and the command dispatch layer.

pub mod cli;
pub mod repository;
pub mod task;
