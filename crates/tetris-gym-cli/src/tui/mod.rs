//! Minimal terminal game loop: fixed-rate ticks, paced redraws and key input.

pub use self::{app::App, event_loop::RenderMode, runtime::Tui};

mod app;
mod event;
mod event_loop;
mod runtime;
