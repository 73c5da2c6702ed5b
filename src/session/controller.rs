use crate::endpoint::{MessageEndpoint, Outcome};
use crate::events::{BubbleId, Role, SessionEvent};
use crate::session::{
    ChatList, ConversationLog, ConversationState, Render, RevealAnimator, RevealHandle, ScrollCoordinator,
    TypingIndicator, WelcomePlaceholder,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

/// Shown in place of a reply whenever the endpoint fails.
pub const FALLBACK_MESSAGE: &str = "Sorry, I encountered an error. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Submitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    Empty,
    AwaitingReply,
}

/// What `submit` did with the text. The input box is cleared only on `Accepted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted,
    Ignored(IgnoreReason),
}

struct PendingRequest {
    generation: u64,
    task: JoinHandle<()>,
}

/// Owns the conversation and the submit/idle state machine.
///
/// All mutation happens through `&mut self`; background work (the endpoint
/// round trip, reveal ticks) reports back as [`SessionEvent`]s that the owner
/// feeds into [`ChatSession::handle_event`].
pub struct ChatSession<E: MessageEndpoint> {
    endpoint: Arc<E>,
    animator: RevealAnimator,
    events: mpsc::UnboundedSender<SessionEvent>,
    state: SessionState,
    pending: Option<PendingRequest>,
    generation: u64,
    log: ConversationLog,
    indicator: TypingIndicator,
    scroll: ScrollCoordinator,
    chat_list: ChatList,
    welcome: WelcomePlaceholder,
    reveals: Vec<RevealHandle>,
}

impl<E: MessageEndpoint> ChatSession<E> {
    pub fn new(endpoint: E, animator: RevealAnimator, events: mpsc::UnboundedSender<SessionEvent>) -> Self {
        Self {
            endpoint: Arc::new(endpoint),
            animator,
            events,
            state: SessionState::Idle,
            pending: None,
            generation: 0,
            log: ConversationLog::new(),
            indicator: TypingIndicator::new(),
            scroll: ScrollCoordinator::new(),
            chat_list: ChatList::new(),
            welcome: WelcomePlaceholder::default(),
            reveals: Vec::new(),
        }
    }

    /// Send `text` unless it is blank or a reply is still outstanding.
    pub fn submit(&mut self, text: &str) -> SubmitOutcome {
        let text = text.trim();
        if text.is_empty() {
            debug!("ignoring empty submit");
            return SubmitOutcome::Ignored(IgnoreReason::Empty);
        }
        if self.state == SessionState::Submitting {
            debug!("ignoring submit while awaiting reply");
            return SubmitOutcome::Ignored(IgnoreReason::AwaitingReply);
        }

        self.state = SessionState::Submitting;
        self.log.append(Role::User, text, Render::Whole, &mut self.chat_list);
        self.scroll.pin_to_bottom();
        self.welcome.hide();
        self.indicator.show();
        self.scroll.pin_to_bottom();

        self.generation += 1;
        let generation = self.generation;
        let endpoint = Arc::clone(&self.endpoint);
        let events = self.events.clone();
        let text = text.to_string();
        let task = tokio::spawn(async move {
            let outcome = endpoint.send(text).await;
            let _ = events.send(SessionEvent::Settled { generation, outcome });
        });
        self.pending = Some(PendingRequest { generation, task });

        info!(generation, message_count = self.log.message_count(), "message submitted");
        SubmitOutcome::Accepted
    }

    /// Apply the result of background work.
    pub fn handle_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Settled { generation, outcome } => self.settle(generation, outcome),
            SessionEvent::RevealTick { target, prefix } => {
                if self.log.apply_reveal(target, prefix) {
                    self.scroll.pin_to_bottom();
                } else {
                    trace!(?target, "tick for detached bubble");
                    self.cancel_reveal(target);
                }
            }
            SessionEvent::RevealFinished { target } => {
                if self.log.finish_reveal(target) {
                    self.scroll.pin_to_bottom();
                }
                self.reveals.retain(|handle| handle.target() != target);
            }
        }
    }

    fn settle(&mut self, generation: u64, outcome: Outcome) {
        match &self.pending {
            Some(pending) if pending.generation == generation => {}
            _ => {
                debug!(generation, "dropping reply for abandoned request");
                return;
            }
        }
        self.pending = None;
        self.indicator.hide();
        self.state = SessionState::Idle;

        match outcome {
            Outcome::Delivered(reply) => {
                let target = self
                    .log
                    .append(Role::Assistant, &reply, Render::Reveal, &mut self.chat_list)
                    .id();
                self.scroll.pin_to_bottom();
                self.reveals.retain(|handle| !handle.is_finished());
                self.reveals.push(self.animator.reveal(target, reply, self.events.clone()));
                info!(generation, "reply received");
            }
            Outcome::Failed(reason) => {
                warn!(generation, %reason, "showing fallback reply");
                self.log
                    .append(Role::Assistant, FALLBACK_MESSAGE, Render::Whole, &mut self.chat_list);
                self.scroll.pin_to_bottom();
            }
        }
    }

    fn cancel_reveal(&mut self, target: BubbleId) {
        self.reveals.retain(|handle| {
            if handle.target() == target {
                handle.cancel();
                false
            } else {
                true
            }
        });
    }

    /// Drop every message, stop running reveals and abandon any pending request.
    pub fn clear_chat(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.task.abort();
            debug!(generation = pending.generation, "abandoned pending request");
        }
        for handle in self.reveals.drain(..) {
            handle.cancel();
        }
        self.state = SessionState::Idle;
        self.log.clear();
        self.indicator.hide();
        self.scroll.pin_to_bottom();
        info!("chat cleared");
    }

    /// Clear, then open a fresh entry at the top of the chat list.
    pub fn new_chat(&mut self) {
        self.clear_chat();
        let id = self.chat_list.start_new();
        self.welcome.show();
        info!(%id, "new chat");
    }

    pub fn conversation_state(&self) -> ConversationState {
        ConversationState {
            message_count: self.log.message_count(),
            is_awaiting_reply: self.state == SessionState::Submitting,
        }
    }

    /// True while a request or a reveal is still producing events.
    #[cfg(test)]
    pub fn is_busy(&self) -> bool {
        self.pending.is_some() || !self.reveals.is_empty()
    }

    #[cfg(test)]
    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    pub fn indicator(&self) -> &TypingIndicator {
        &self.indicator
    }

    pub fn scroll(&self) -> &ScrollCoordinator {
        &self.scroll
    }

    pub fn scroll_mut(&mut self) -> &mut ScrollCoordinator {
        &mut self.scroll
    }

    pub fn chat_list(&self) -> &ChatList {
        &self.chat_list
    }

    pub fn welcome(&self) -> &WelcomePlaceholder {
        &self.welcome
    }
}
