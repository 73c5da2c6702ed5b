use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
};

/// Milliseconds since the epoch, used to phase the animations
pub fn now_millis() -> u128 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}

/// "Assistant is typing" line with animated dots
pub fn typing_line(now_ms: u128) -> Line<'static> {
    let dots = match (now_ms / 300) % 4 {
        0 => ".",
        1 => "..",
        2 => "...",
        _ => "   ",
    };

    Line::from(vec![
        Span::styled("🤖 ", Style::default().fg(Color::Green)),
        Span::styled("Assistant is typing", Style::default().fg(Color::Green)),
        Span::styled(dots, Style::default().fg(Color::Yellow)),
    ])
}

/// Blinking block cursor drawn after text that is still being revealed
pub fn reveal_cursor(now_ms: u128) -> &'static str {
    if (now_ms / 500) % 2 == 0 { "▋" } else { " " }
}
