//! Message lifecycle for the single active conversation

pub mod chat_list;
pub mod controller;
pub mod indicator;
pub mod log;
pub mod reveal;
pub mod scroll;

pub use chat_list::ChatList;
pub use controller::{ChatSession, IgnoreReason, SubmitOutcome};
pub use indicator::TypingIndicator;
pub use log::{Bubble, ConversationLog, Render};
pub use reveal::{RevealAnimator, RevealHandle};
pub use scroll::ScrollCoordinator;

/// Snapshot of the counters the rest of the UI cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConversationState {
    pub message_count: usize,
    pub is_awaiting_reply: bool,
}

/// Greeting shown over an empty conversation
#[derive(Debug, Clone)]
pub struct WelcomePlaceholder {
    visible: bool,
}

impl Default for WelcomePlaceholder {
    fn default() -> Self {
        Self { visible: true }
    }
}

impl WelcomePlaceholder {
    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}
