//! Stacks Tag CLI - tag, merge and inspect docker-stacks images.

pub mod commands;
pub mod output;
