pub mod cli;
pub mod headless;
pub mod runtime;
pub mod tui_runner;
