//! Terminal widgets and the frame layout

pub mod commands;
pub mod composer;
pub mod history;
pub mod indicator;
pub mod sidebar;

pub use commands::{SlashCommand, help_line};
pub use composer::{Composer, ComposerResult};
pub use history::{HistoryContent, HistoryView};
pub use sidebar::Sidebar;

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Screen regions for one frame
pub struct FrameLayout {
    pub sidebar: Option<Rect>,
    pub history: Rect,
    pub composer: Rect,
    pub status: Rect,
}

const SIDEBAR_WIDTH: u16 = 30;
const SIDEBAR_MIN_TOTAL: u16 = 80;

/// Split the screen: sidebar on the left when there is room, history above
/// the composer, one status line at the bottom.
pub fn frame_layout(area: Rect, composer_height: u16) -> FrameLayout {
    let (sidebar, main) = if area.width >= SIDEBAR_MIN_TOTAL {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
            .split(area);
        (Some(columns[0]), columns[1])
    } else {
        (None, area)
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(composer_height),
            Constraint::Length(1),
        ])
        .split(main);

    FrameLayout {
        sidebar,
        history: rows[0],
        composer: rows[1],
        status: rows[2],
    }
}
