//! mcpdeck TUI - terminal console
//!
//! Ratatui front-end over [`mcpdeck_core::console::Console`], organised in
//! the Elm style: [`app`] holds the model, [`message`] the events,
//! [`handler`] the update function and [`render`] the view.

pub mod app;
pub mod event;
pub mod handler;
pub mod logging;
pub mod message;
pub mod render;
pub mod runner;
pub mod terminal;

pub use runner::run;
