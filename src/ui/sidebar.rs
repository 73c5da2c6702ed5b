use crate::session::ChatList;
use chrono::{DateTime, Local};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Widget},
};

/// Sidebar listing conversations, newest first
pub struct Sidebar<'a> {
    chat_list: &'a ChatList,
    now: DateTime<Local>,
}

impl<'a> Sidebar<'a> {
    pub fn new(chat_list: &'a ChatList, now: DateTime<Local>) -> Self {
        Self { chat_list, now }
    }
}

impl Widget for Sidebar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let items: Vec<ListItem> = self
            .chat_list
            .entries()
            .iter()
            .map(|entry| {
                let title_style = if entry.active {
                    Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(entry.title.clone(), title_style),
                        Span::styled(format!("  {}", entry.time_label(self.now)), Style::default().fg(Color::DarkGray)),
                    ]),
                    Line::from(Span::styled(entry.snippet.clone(), Style::default().fg(Color::Gray))),
                    Line::default(),
                ])
            })
            .collect();

        List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Chats · Ctrl+N new"))
            .render(area, buf);
    }
}
