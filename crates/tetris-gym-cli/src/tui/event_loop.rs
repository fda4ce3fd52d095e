use std::time::{Duration, Instant};

use crossterm::event;

use crate::tui::event::TuiEvent;

/// When the loop emits render events.
#[derive(Debug, Clone, Copy, Default)]
pub enum RenderMode {
    /// At a fixed frame interval.
    Interval(Duration),
    /// Once after each tick or terminal event.
    #[default]
    OnChange,
}

impl RenderMode {
    #[must_use]
    pub fn from_frame_rate(fps: f64) -> Self {
        Self::Interval(Duration::from_secs_f64(1.0 / fps))
    }

    const fn interval(self) -> Option<Duration> {
        match self {
            Self::Interval(interval) => Some(interval),
            Self::OnChange => None,
        }
    }
}

/// Multiplexes tick deadlines, render deadlines and terminal input.
#[derive(Debug)]
pub(super) struct EventLoop {
    tick_interval: Option<Duration>,
    render_mode: RenderMode,
    last_tick: Instant,
    last_render: Instant,
    // The first frame has to be drawn before any input arrives.
    needs_render: bool,
}

impl Default for EventLoop {
    fn default() -> Self {
        let now = Instant::now();
        Self {
            tick_interval: None,
            render_mode: RenderMode::default(),
            last_tick: now,
            last_render: now,
            needs_render: true,
        }
    }
}

impl EventLoop {
    pub(super) fn set_tick_interval(&mut self, interval: Option<Duration>) {
        self.tick_interval = interval;
    }

    pub(super) fn set_render_mode(&mut self, mode: RenderMode) {
        self.render_mode = mode;
    }

    /// Blocks until the next tick, render or terminal event is due.
    pub(super) fn next(&mut self) -> anyhow::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            if let Some(interval) = self.tick_interval
                && now.duration_since(self.last_tick) >= interval
            {
                self.last_tick = now;
                self.needs_render = true;
                return Ok(TuiEvent::Tick);
            }

            let render_due = match self.render_mode {
                RenderMode::Interval(interval) => now.duration_since(self.last_render) >= interval,
                RenderMode::OnChange => self.needs_render,
            };
            if render_due {
                self.last_render = now;
                self.needs_render = false;
                return Ok(TuiEvent::Render);
            }

            if let Some(timeout) = self.time_until_deadline(now)
                && !event::poll(timeout)?
            {
                continue;
            }

            self.needs_render = true;
            return Ok(event::read()?.into());
        }
    }

    fn time_until_deadline(&self, now: Instant) -> Option<Duration> {
        let tick_at = self.tick_interval.map(|i| self.last_tick + i);
        let render_at = self.render_mode.interval().map(|i| self.last_render + i);
        let deadline = tick_at.into_iter().chain(render_at).min()?;
        Some(deadline.saturating_duration_since(now))
    }
}
