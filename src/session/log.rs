use crate::events::{BubbleId, Role};
use crate::session::chat_list::ChatList;
use tracing::trace;

/// One logical chat message. Never changes after it is appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    role: Role,
    text: String,
    sequence: usize,
}

impl Message {
    pub fn role(&self) -> Role {
        self.role
    }

    #[cfg(test)]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[cfg(test)]
    pub fn sequence(&self) -> usize {
        self.sequence
    }
}

/// How a freshly appended message is first drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Render {
    /// Full text at once
    Whole,
    /// Empty bubble that a reveal fills in
    Reveal,
}

/// Rendered form of a message. `rendered` is what is on screen right now.
#[derive(Debug, Clone)]
pub struct Bubble {
    id: BubbleId,
    message: Message,
    rendered: String,
    revealing: bool,
}

impl Bubble {
    pub fn id(&self) -> BubbleId {
        self.id
    }

    pub fn message(&self) -> &Message {
        &self.message
    }

    pub fn rendered(&self) -> &str {
        &self.rendered
    }

    pub fn is_revealing(&self) -> bool {
        self.revealing
    }
}

/// Ordered messages of the active conversation
#[derive(Debug, Clone, Default)]
pub struct ConversationLog {
    bubbles: Vec<Bubble>,
    message_count: usize,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a message, bump the counter and refresh the sidebar preview.
    pub fn append(&mut self, role: Role, text: &str, render: Render, chat_list: &mut ChatList) -> &Bubble {
        self.message_count += 1;
        let message = Message {
            role,
            text: text.to_string(),
            sequence: self.message_count,
        };
        let (rendered, revealing) = match render {
            Render::Whole => (message.text.clone(), false),
            Render::Reveal => (String::new(), true),
        };
        chat_list.update_active_preview(text);
        trace!(sequence = message.sequence, %role, ?render, "message appended");

        self.bubbles.push(Bubble {
            id: BubbleId::new(),
            message,
            rendered,
            revealing,
        });
        &self.bubbles[self.bubbles.len() - 1]
    }

    /// Replace the on-screen text of a revealing bubble.
    /// Returns false if the bubble is gone (detached by a clear).
    pub fn apply_reveal(&mut self, id: BubbleId, prefix: String) -> bool {
        match self.bubbles.iter_mut().find(|b| b.id == id) {
            Some(bubble) => {
                bubble.rendered = prefix;
                true
            }
            None => false,
        }
    }

    pub fn finish_reveal(&mut self, id: BubbleId) -> bool {
        match self.bubbles.iter_mut().find(|b| b.id == id) {
            Some(bubble) => {
                bubble.revealing = false;
                true
            }
            None => false,
        }
    }

    #[cfg(test)]
    pub fn contains(&self, id: BubbleId) -> bool {
        self.bubbles.iter().any(|b| b.id == id)
    }

    #[cfg(test)]
    pub fn bubble(&self, id: BubbleId) -> Option<&Bubble> {
        self.bubbles.iter().find(|b| b.id == id)
    }

    pub fn clear(&mut self) {
        self.bubbles.clear();
        self.message_count = 0;
    }

    pub fn bubbles(&self) -> &[Bubble] {
        &self.bubbles
    }

    #[cfg(test)]
    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.bubbles.iter().map(|b| &b.message)
    }

    pub fn message_count(&self) -> usize {
        self.message_count
    }

    pub fn is_empty(&self) -> bool {
        self.bubbles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_assigns_sequence_and_preview() {
        let mut list = ChatList::new();
        let mut log = ConversationLog::new();

        let first = log.append(Role::User, "hi", Render::Whole, &mut list).message().clone();
        let second = log.append(Role::Assistant, "hello there", Render::Whole, &mut list).message().clone();

        assert_eq!(first.sequence(), 1);
        assert_eq!(second.sequence(), 2);
        assert_eq!(log.message_count(), 2);
        assert_eq!(list.active().unwrap().snippet, "hello there");
    }

    #[test]
    fn reveal_bubbles_start_empty() {
        let mut list = ChatList::new();
        let mut log = ConversationLog::new();
        let id = log.append(Role::Assistant, "abc", Render::Reveal, &mut list).id();

        let bubble = log.bubble(id).unwrap();
        assert_eq!(bubble.rendered(), "");
        assert!(bubble.is_revealing());
        assert_eq!(bubble.message().text(), "abc");

        assert!(log.apply_reveal(id, "ab".into()));
        assert_eq!(log.bubble(id).unwrap().rendered(), "ab");
        assert!(log.finish_reveal(id));
        assert!(!log.bubble(id).unwrap().is_revealing());
    }

    #[test]
    fn cleared_bubbles_reject_updates() {
        let mut list = ChatList::new();
        let mut log = ConversationLog::new();
        let id = log.append(Role::Assistant, "abc", Render::Reveal, &mut list).id();

        log.clear();

        assert_eq!(log.message_count(), 0);
        assert!(!log.contains(id));
        assert!(!log.apply_reveal(id, "a".into()));
        assert!(!log.finish_reveal(id));

        let next = log.append(Role::User, "again", Render::Whole, &mut list).message().sequence();
        assert_eq!(next, 1);
    }
}
