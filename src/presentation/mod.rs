// Presentation layer - CLI entry points
pub mod app_state;
pub mod cli;
pub mod prompt;
