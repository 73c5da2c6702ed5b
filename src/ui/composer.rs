use crate::ui::commands::{SlashCommand, parse_slash_command};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

/// Result returned when the user interacts with the composer
#[derive(Debug, PartialEq)]
pub enum ComposerResult {
    /// Enter was pressed; the text stays in the box until the session accepts it
    Submitted(String),
    Command(SlashCommand),
    None,
}

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices().nth(char_idx).map(|(i, _)| i).unwrap_or(s.len())
}

/// Multi-line input box. The cursor is a character index.
#[derive(Debug, Clone)]
pub struct Composer {
    content: String,
    cursor: usize,
    placeholder: String,
    has_focus: bool,
    submit_enabled: bool,
}

impl Composer {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            content: String::new(),
            cursor: 0,
            placeholder: placeholder.into(),
            has_focus: true,
            submit_enabled: true,
        }
    }

    /// Handle key input
    pub fn handle_key(&mut self, key: KeyEvent) -> ComposerResult {
        if key.kind != KeyEventKind::Press {
            return ComposerResult::None;
        }

        match key.code {
            KeyCode::Enter => {
                if key.modifiers.intersects(KeyModifiers::SHIFT | KeyModifiers::ALT) {
                    self.insert_char('\n');
                } else if let Some(command) = parse_slash_command(&self.content) {
                    self.clear();
                    return ComposerResult::Command(command);
                } else {
                    return ComposerResult::Submitted(self.content.clone());
                }
            }
            // Ctrl+J is the newline key terminals without the kitty protocol can still tell apart
            KeyCode::Char('j') if key.modifiers.contains(KeyModifiers::CONTROL) => self.insert_char('\n'),
            KeyCode::Char(c) => {
                if !key.modifiers.contains(KeyModifiers::CONTROL) {
                    self.insert_char(c);
                }
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let at = char_to_byte_index(&self.content, self.cursor);
                    self.content.remove(at);
                }
            }
            KeyCode::Delete => {
                if self.cursor < self.char_len() {
                    let at = char_to_byte_index(&self.content, self.cursor);
                    self.content.remove(at);
                }
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyCode::Right => {
                if self.cursor < self.char_len() {
                    self.cursor += 1;
                }
            }
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.char_len(),
            _ => {}
        }

        ComposerResult::None
    }

    /// Insert pasted text at the cursor
    pub fn insert_str(&mut self, text: &str) {
        for c in text.chars() {
            if c != '\r' {
                self.insert_char(c);
            }
        }
    }

    fn insert_char(&mut self, c: char) {
        let at = char_to_byte_index(&self.content, self.cursor);
        self.content.insert(at, c);
        self.cursor += 1;
    }

    fn char_len(&self) -> usize {
        self.content.chars().count()
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn set_focus(&mut self, has_focus: bool) {
        self.has_focus = has_focus;
    }

    /// Mirror of the typing indicator: the send affordance is greyed out while a reply is pending.
    pub fn set_submit_enabled(&mut self, enabled: bool) {
        self.submit_enabled = enabled;
    }

    /// Box height: grows with the text, capped at `max_lines`, plus borders.
    pub fn desired_height(&self, max_lines: u16) -> u16 {
        let lines = self.content.split('\n').count().max(1) as u16;
        lines.min(max_lines.max(1)) + 2
    }
}

impl Widget for &Composer {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (title, title_style) = if self.submit_enabled {
            ("Message · Enter to send", Style::default().fg(Color::Green))
        } else {
            ("Message · waiting for reply", Style::default().fg(Color::DarkGray))
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(title, title_style))
            .border_style(if self.has_focus {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::Gray)
            });

        if self.content.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                self.placeholder.as_str(),
                Style::default().fg(Color::DarkGray),
            )))
            .block(block)
            .render(area, buf);
            return;
        }

        let mut content = self.content.clone();
        if self.has_focus {
            content.insert(char_to_byte_index(&content, self.cursor), '▌');
        }
        let lines: Vec<Line> = content.split('\n').map(|l| Line::from(l.to_string())).collect();

        // Keep the cursor line visible once the box stops growing
        let inner_height = area.height.saturating_sub(2) as usize;
        let cursor_line = self.content.chars().take(self.cursor).filter(|c| *c == '\n').count();
        let scroll = cursor_line.saturating_sub(inner_height.saturating_sub(1)) as u16;

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0))
            .render(area, buf);
    }
}
