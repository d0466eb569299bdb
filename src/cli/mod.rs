//! CLI module
//!
//! Command-line interface for inferring document schemas.
//!
//! # Commands
//!
//! - `infer` - Merge every input document and print the aggregate schema
//! - `fields` - List the property names at a field path
//! - `show` - Print the schema node at a field path

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
