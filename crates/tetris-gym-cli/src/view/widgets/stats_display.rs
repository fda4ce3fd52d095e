use std::iter;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};
use tetris_gym_engine::GameStats;

use crate::view::widgets::style;

pub struct StatsDisplay<'a> {
    stats: &'a GameStats,
    block: Option<BlockWidget<'a>>,
}

impl<'a> StatsDisplay<'a> {
    pub fn new(stats: &'a GameStats) -> Self {
        Self { stats, block: None }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        20 + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        super::cells_to_u16(ROWS.len()) + super::block_vertical_margin(self.block.as_ref())
    }
}

type Value = &'static dyn Fn(&GameStats) -> String;

#[derive(Clone, Copy)]
enum Row {
    Empty,
    Label(&'static str),
    Value(Value),
    LabelValue(&'static str, Value),
}

const ROWS: &[Row] = &[
    Row::Label("SCORE:"),
    Row::Value(&|stats| stats.score().to_string()),
    Row::Empty,
    Row::LabelValue("LINES:", &|stats| stats.lines_cleared().to_string()),
    Row::LabelValue("PIECES:", &|stats| stats.locked_pieces().to_string()),
    Row::Empty,
    Row::LabelValue("SINGLES:", &|stats| stats.line_clear_counter()[1].to_string()),
    Row::LabelValue("DOUBLES:", &|stats| stats.line_clear_counter()[2].to_string()),
    Row::LabelValue("TRIPLES:", &|stats| stats.line_clear_counter()[3].to_string()),
    Row::LabelValue("TETRIS:", &|stats| stats.line_clear_counter()[4].to_string()),
];

impl Widget for StatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let style = style::DEFAULT;
        let row_areas = area.layout_vec(&Layout::vertical(
            ROWS.iter().map(|_| Constraint::Length(1)),
        ));

        for (row, area) in iter::zip(ROWS.iter().copied(), row_areas) {
            match row {
                Row::Empty => {}
                Row::Label(label) => {
                    Line::styled(label, style).left_aligned().render(area, buf);
                }
                Row::Value(value) => {
                    Line::styled(value(self.stats), style)
                        .right_aligned()
                        .render(area, buf);
                }
                Row::LabelValue(label, value) => {
                    let [label_area, value_area] = area.layout(&Layout::horizontal([
                        Constraint::Fill(1),
                        Constraint::Fill(1),
                    ]));
                    Line::styled(label, style)
                        .left_aligned()
                        .render(label_area, buf);
                    Line::styled(value(self.stats), style)
                        .right_aligned()
                        .render(value_area, buf);
                }
            }
        }
    }
}
