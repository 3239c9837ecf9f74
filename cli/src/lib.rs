//! Please CLI - containerized command-line tool catalog.

pub mod commands;
pub mod output;
pub mod resolve;
