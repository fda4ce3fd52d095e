use std::time::Duration;

use crate::tui::{
    App,
    event::TuiEvent,
    event_loop::{EventLoop, RenderMode},
};

/// Owns the event loop and drives an [`App`] inside the terminal.
#[derive(Debug, Default)]
pub struct Tui {
    events: EventLoop,
}

impl Tui {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how often [`App::update`] runs; `None` stops ticking.
    pub fn set_tick_interval(&mut self, interval: Option<Duration>) {
        self.events.set_tick_interval(interval);
    }

    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.events.set_render_mode(mode);
    }

    /// Enters the alternate screen and dispatches events until the app exits.
    ///
    /// The terminal is restored on return, including on error.
    pub fn run<A>(mut self, app: &mut A) -> anyhow::Result<()>
    where
        A: App,
    {
        app.init(&mut self);

        ratatui::run(|terminal| {
            while !app.should_exit() {
                match self.events.next()? {
                    TuiEvent::Tick => app.update(&mut self),
                    TuiEvent::Render => _ = terminal.draw(|frame| app.draw(frame))?,
                    TuiEvent::Terminal(event) => app.handle_event(&mut self, &event),
                }
            }
            Ok(())
        })
    }
}
