//! Conversation history display component

use crate::events::Role;
use crate::session::{Bubble, ConversationLog};
use crate::ui::indicator::{reveal_cursor, typing_line};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Everything the history pane shows, already laid out for one width
pub struct HistoryContent<'a> {
    pub log: &'a ConversationLog,
    pub welcome_visible: bool,
    pub typing: bool,
    pub quick_actions: &'a [String],
    pub now_ms: u128,
}

impl HistoryContent<'_> {
    /// Lines for a pane whose inner width is `width`
    pub fn lines(&self, width: u16) -> Vec<Line<'static>> {
        let mut lines = Vec::new();

        if self.welcome_visible {
            lines.extend(welcome_lines(self.quick_actions));
        }

        for bubble in self.log.bubbles() {
            lines.extend(bubble_lines(bubble, width, self.now_ms));
            lines.push(Line::default());
        }

        if self.typing {
            lines.push(typing_line(self.now_ms));
        }

        lines
    }
}

fn welcome_lines(quick_actions: &[String]) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            "Welcome! 👋 Describe your problem and I'll help you sort it out.",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(Span::styled(
            "Enter sends. Shift+Enter, Alt+Enter or Ctrl+J starts a new line. /help lists commands.",
            Style::default().fg(Color::DarkGray),
        )),
        Line::default(),
    ];

    for (i, action) in quick_actions.iter().take(4).enumerate() {
        lines.push(Line::from(vec![
            Span::styled(format!("  F{} ", i + 1), Style::default().fg(Color::Cyan)),
            Span::styled(action.clone(), Style::default().fg(Color::Gray)),
        ]));
    }
    if !quick_actions.is_empty() {
        lines.push(Line::default());
    }
    lines
}

fn bubble_lines(bubble: &Bubble, width: u16, now_ms: u128) -> Vec<Line<'static>> {
    let role = bubble.message().role();
    let mut lines = vec![Line::from(Span::styled(
        format!("{} {} {}", role.avatar(), role, "─".repeat(20)),
        Style::default().fg(Color::DarkGray),
    ))];

    let content_lines = wrap_text(bubble.rendered(), width.saturating_sub(2) as usize);
    let last = content_lines.len() - 1;
    for (i, content_line) in content_lines.into_iter().enumerate() {
        let mut spans = vec![Span::raw("  "), Span::styled(content_line, content_style(role))];
        if i == last && bubble.is_revealing() {
            spans.push(Span::styled(reveal_cursor(now_ms), Style::default().fg(Color::Yellow)));
        }
        lines.push(Line::from(spans));
    }
    lines
}

fn content_style(role: Role) -> Style {
    match role {
        Role::User => Style::default().fg(Color::Blue),
        Role::Assistant => Style::default().fg(Color::Green),
    }
}

/// Wrap text to fit within the given width, keeping explicit line breaks
/// and the spacing inside each line. A line only ever breaks at a run of
/// whitespace, which is dropped, or inside a word longer than the width.
/// Always returns at least one line.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current_line = String::new();
        let mut current_len = 0;

        for run in whitespace_runs(paragraph) {
            let run_len = run.chars().count();
            let is_space = run.starts_with(char::is_whitespace);
            if current_len + run_len > width && !current_line.trim().is_empty() {
                lines.push(current_line.trim_end().to_string());
                current_line.clear();
                current_len = 0;
                if is_space {
                    continue;
                }
            }
            // Hard-split runs longer than the line
            for c in run.chars() {
                if current_len == width {
                    lines.push(std::mem::take(&mut current_line));
                    current_len = 0;
                }
                current_line.push(c);
                current_len += 1;
            }
        }
        lines.push(current_line);
    }
    lines
}

/// Split `s` into alternating runs of whitespace and non-whitespace.
fn whitespace_runs(s: &str) -> Vec<&str> {
    let mut runs = Vec::new();
    let mut start = 0;
    let mut in_space = None;
    for (i, c) in s.char_indices() {
        let space = c.is_whitespace();
        if in_space.is_some_and(|prev| prev != space) {
            runs.push(&s[start..i]);
            start = i;
        }
        in_space = Some(space);
    }
    if start < s.len() {
        runs.push(&s[start..]);
    }
    runs
}

/// Bordered, scrolled view over prepared history lines
pub struct HistoryView {
    lines: Vec<Line<'static>>,
    offset: usize,
}

impl HistoryView {
    pub fn new(lines: Vec<Line<'static>>, offset: usize) -> Self {
        Self { lines, offset }
    }

    pub fn block() -> Block<'static> {
        Block::default().borders(Borders::ALL).title("💬 Conversation")
    }
}

impl Widget for HistoryView {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let offset = u16::try_from(self.offset).unwrap_or(u16::MAX);
        Paragraph::new(self.lines)
            .block(Self::block())
            .scroll((offset, 0))
            .render(area, buf);
    }
}
