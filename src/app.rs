use crate::config::Config;
use crate::endpoint::MessageEndpoint;
use crate::events::{SessionEvent, TuiEvent};
use crate::session::{ChatSession, IgnoreReason, RevealAnimator, SubmitOutcome};
use crate::tui::{EventHandler, Tui};
use crate::ui::{
    Composer, ComposerResult, HistoryContent, HistoryView, Sidebar, SlashCommand, frame_layout, help_line,
    indicator::now_millis,
};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use tokio::sync::mpsc;
use tracing::debug;

const PAGE_LINES: usize = 10;

/// Terminal front end around one [`ChatSession`]: translates keys into
/// session calls and draws the result.
pub struct App<E: MessageEndpoint> {
    session: ChatSession<E>,
    session_rx: mpsc::UnboundedReceiver<SessionEvent>,
    composer: Composer,
    quick_actions: Vec<String>,
    max_input_lines: u16,
    status: Option<String>,
    should_quit: bool,
}

impl<E: MessageEndpoint> App<E> {
    pub fn new(config: &Config, endpoint: E) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            session: ChatSession::new(endpoint, RevealAnimator::new(config.reveal), tx),
            session_rx: rx,
            composer: Composer::new("Type your message..."),
            quick_actions: config.ui.quick_actions.clone(),
            max_input_lines: config.ui.max_input_lines,
            status: None,
            should_quit: false,
        }
    }

    pub fn handle_tui_event(&mut self, event: TuiEvent) {
        match event {
            TuiEvent::Key(key) => self.handle_key(key),
            TuiEvent::Paste(text) => self.composer.insert_str(&text),
            TuiEvent::Focus(focused) => self.composer.set_focus(focused),
            TuiEvent::Resize | TuiEvent::Tick => {}
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => self.should_quit = true,
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('n') if ctrl => self.run_command(SlashCommand::New),
            KeyCode::Char('l') if ctrl => self.run_command(SlashCommand::Clear),
            KeyCode::PageUp => self.session.scroll_mut().scroll_up(PAGE_LINES),
            KeyCode::PageDown => self.session.scroll_mut().scroll_down(PAGE_LINES),
            KeyCode::F(n @ 1..=4) => self.quick_action(usize::from(n - 1)),
            _ => match self.composer.handle_key(key) {
                ComposerResult::Submitted(text) => self.submit(&text),
                ComposerResult::Command(command) => self.run_command(command),
                ComposerResult::None => {}
            },
        }
    }

    pub fn handle_session_event(&mut self, event: SessionEvent) {
        self.session.handle_event(event);
    }

    fn submit(&mut self, text: &str) {
        match self.session.submit(text) {
            SubmitOutcome::Accepted => {
                self.composer.clear();
                self.status = None;
            }
            SubmitOutcome::Ignored(IgnoreReason::AwaitingReply) => {
                self.status = Some("Still waiting for the last reply...".to_string());
            }
            SubmitOutcome::Ignored(IgnoreReason::Empty) => {}
        }
    }

    fn quick_action(&mut self, index: usize) {
        if let Some(prompt) = self.quick_actions.get(index).cloned() {
            debug!(index, "quick action");
            self.submit(&prompt);
        }
    }

    fn run_command(&mut self, command: SlashCommand) {
        match command {
            SlashCommand::New => {
                self.session.new_chat();
                self.status = None;
            }
            SlashCommand::Clear => {
                self.session.clear_chat();
                self.status = None;
            }
            SlashCommand::Help => self.status = Some(help_line()),
            SlashCommand::Quit => self.should_quit = true,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    #[cfg(test)]
    fn session(&self) -> &ChatSession<E> {
        &self.session
    }

    #[cfg(test)]
    fn composer(&self) -> &Composer {
        &self.composer
    }

    pub fn draw(&mut self, frame: &mut Frame) {
        let now_ms = now_millis();
        self.composer
            .set_submit_enabled(self.session.indicator().submit_enabled());

        let layout = frame_layout(frame.size(), self.composer.desired_height(self.max_input_lines));

        if let Some(area) = layout.sidebar {
            frame.render_widget(Sidebar::new(self.session.chat_list(), chrono::Local::now()), area);
        }

        let inner = HistoryView::block().inner(layout.history);
        let lines = HistoryContent {
            log: self.session.log(),
            welcome_visible: self.session.welcome().is_visible(),
            typing: self.session.indicator().is_visible(),
            quick_actions: &self.quick_actions,
            now_ms,
        }
        .lines(inner.width);
        let offset = self
            .session
            .scroll_mut()
            .layout(lines.len(), usize::from(inner.height));
        frame.render_widget(HistoryView::new(lines, offset), layout.history);

        frame.render_widget(&self.composer, layout.composer);
        frame.render_widget(Paragraph::new(self.status_line()), layout.status);
    }

    fn status_line(&self) -> Line<'static> {
        if let Some(status) = &self.status {
            return Line::from(Span::styled(status.clone(), Style::default().fg(Color::Yellow)));
        }
        let state = self.session.conversation_state();
        let mut text = format!(
            "{} messages · Ctrl+N new chat · Ctrl+L clear · /help",
            state.message_count
        );
        if state.is_awaiting_reply {
            text.push_str(" · waiting for reply");
        }
        if !self.session.scroll().is_pinned() {
            text.push_str(" · scrolled back, PgDn to follow");
        }
        Line::from(Span::styled(text, Style::default().fg(Color::DarkGray)))
    }
}

enum Step {
    Input(Option<TuiEvent>),
    Session(Option<SessionEvent>),
}

/// Main loop: draw, then wait for either terminal input or session work.
pub async fn run<E: MessageEndpoint>(terminal: &mut Tui, app: &mut App<E>, events: &mut EventHandler) -> Result<()> {
    loop {
        terminal.draw(|frame| app.draw(frame))?;

        let step = tokio::select! {
            event = events.next() => Step::Input(event),
            event = app.session_rx.recv() => Step::Session(event),
        };

        match step {
            Step::Input(Some(event)) => app.handle_tui_event(event),
            Step::Session(Some(event)) => app.handle_session_event(event),
            // The session holds its own sender, so only the input side can close.
            Step::Input(None) | Step::Session(None) => return Ok(()),
        }

        if app.should_quit() {
            return Ok(());
        }
    }
}
