use crate::endpoint::Outcome;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Author of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn avatar(&self) -> &'static str {
        match self {
            Role::User => "👤",
            Role::Assistant => "🤖",
        }
    }
}

/// Handle naming one rendered bubble in the conversation log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BubbleId(Uuid);

impl BubbleId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BubbleId {
    fn default() -> Self {
        Self::new()
    }
}

/// Results of background work, delivered back to the session owner.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// The endpoint round trip for submission `generation` resolved
    Settled { generation: u64, outcome: Outcome },

    /// One more character of a reply is ready for `target`
    RevealTick { target: BubbleId, prefix: String },

    /// The reveal for `target` emitted its last character
    RevealFinished { target: BubbleId },
}

/// Terminal input, already filtered to what the app reacts to
#[derive(Debug, Clone)]
pub enum TuiEvent {
    /// Key press event
    Key(crossterm::event::KeyEvent),

    /// Bracketed paste
    Paste(String),

    /// Terminal resize; the next draw picks up the new size
    Resize,

    /// Terminal window gained (true) or lost (false) focus
    Focus(bool),

    /// Redraw tick for the typing animations
    Tick,
}
