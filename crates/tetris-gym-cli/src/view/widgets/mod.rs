use ratatui::{layout::Rect, widgets::Block as BlockWidget};

pub use self::{
    board_display::*, cell_display::*, game_display::*, key_binding_display::*,
    piece_display::*, stats_display::*,
};

mod board_display;
mod cell_display;
mod game_display;
mod key_binding_display;
mod piece_display;
mod stats_display;

mod color {
    use ratatui::style::Color;

    pub const CYAN: Color = Color::Rgb(0, 255, 255);
    pub const YELLOW: Color = Color::Rgb(255, 255, 0);
    pub const GREEN: Color = Color::Rgb(0, 255, 0);
    pub const RED: Color = Color::Rgb(255, 0, 0);
    pub const BLUE: Color = Color::Rgb(0, 0, 255);
    pub const ORANGE: Color = Color::Rgb(255, 127, 0);
    pub const MAGENTA: Color = Color::Rgb(255, 0, 255);
    pub const GRAY: Color = Color::Rgb(127, 127, 127);
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);
}

pub mod style {
    use ratatui::style::{Color, Style};
    use tetris_gym_engine::PieceKind;

    use super::color;

    const fn fg_bg(fg: Color, bg: Color) -> Style {
        Style::new().fg(fg).bg(bg)
    }

    const fn solid(color: Color) -> Style {
        Style::new().fg(color).bg(color)
    }

    pub const DEFAULT: Style = fg_bg(color::WHITE, color::BLACK);
    pub const EMPTY: Style = solid(color::BLACK);
    pub const EMPTY_DOT: Style = fg_bg(color::GRAY, color::BLACK);
    pub const GHOST: Style = fg_bg(color::WHITE, color::BLACK);

    #[must_use]
    pub const fn piece(kind: PieceKind) -> Style {
        solid(match kind {
            PieceKind::T => color::MAGENTA,
            PieceKind::I => color::CYAN,
            PieceKind::O => color::YELLOW,
            PieceKind::L => color::ORANGE,
            PieceKind::J => color::BLUE,
            PieceKind::S => color::GREEN,
            PieceKind::Z => color::RED,
        })
    }
}

fn block_vertical_margin(block: Option<&BlockWidget>) -> u16 {
    let probe = Rect::new(0, 0, 100, 100);
    probe.height - block.map_or(probe, |block| block.inner(probe)).height
}

fn block_horizontal_margin(block: Option<&BlockWidget>) -> u16 {
    let probe = Rect::new(0, 0, 100, 100);
    probe.width - block.map_or(probe, |block| block.inner(probe)).width
}

/// Terminal sizes are `u16`; larger counts saturate.
fn cells_to_u16(count: usize) -> u16 {
    u16::try_from(count).unwrap_or(u16::MAX)
}
