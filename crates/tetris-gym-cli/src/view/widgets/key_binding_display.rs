use ratatui::{
    prelude::{Buffer, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Widget,
};

/// Keys that trigger an action, and what the action does.
pub type KeyBinding<'a> = (&'a [&'a str], &'a str);

/// One-line help bar such as `←/a Move | p Pause`.
#[derive(Debug)]
pub struct KeyBindingDisplay<'a> {
    bindings: &'a [KeyBinding<'a>],
}

impl<'a> KeyBindingDisplay<'a> {
    pub fn new(bindings: &'a [KeyBinding<'a>]) -> Self {
        Self { bindings }
    }

    fn spans(&self) -> Vec<Span<'a>> {
        let mut spans = vec![];
        for (i, (keys, description)) in self.bindings.iter().copied().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" | ", SEPARATOR_STYLE));
            }
            for (j, key) in keys.iter().copied().enumerate() {
                if j > 0 {
                    spans.push(Span::styled("/", SEPARATOR_STYLE));
                }
                spans.push(Span::styled(key, KEY_STYLE));
            }
            spans.push(Span::raw(" "));
            spans.push(Span::styled(description, DESCRIPTION_STYLE));
        }
        spans
    }
}

const KEY_STYLE: Style = Style::new().fg(Color::Cyan);
const SEPARATOR_STYLE: Style = Style::new().fg(Color::DarkGray);
const DESCRIPTION_STYLE: Style = Style::new().fg(Color::White);

impl Widget for KeyBindingDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Line::from(self.spans()).centered().render(area, buf);
    }
}
