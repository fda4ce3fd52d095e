use crossterm::event::Event;

#[derive(Debug, Clone, derive_more::From)]
pub(super) enum TuiEvent {
    Tick,
    Render,
    Terminal(Event),
}
