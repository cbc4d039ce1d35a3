pub mod app;
pub mod backend;
pub mod event;
pub mod screens;
mod title;
pub mod ui;

#[cfg(test)]
mod test_support;

pub use app::App;
pub use backend::Backends;
pub use event::EventHandler;
pub use title::{title_for, TerminalTitleManager};
