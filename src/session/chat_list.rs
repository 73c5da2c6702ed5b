use chrono::{DateTime, Local};
use uuid::Uuid;

const PREVIEW_CHARS: usize = 50;
const NEW_CHAT_TITLE: &str = "New Chat";
const NEW_CHAT_SNIPPET: &str = "Start a conversation...";

/// One conversation in the sidebar
#[derive(Debug, Clone)]
pub struct ChatListEntry {
    pub id: Uuid,
    pub title: String,
    pub snippet: String,
    pub created_at: DateTime<Local>,
    pub active: bool,
}

impl ChatListEntry {
    fn fresh() -> Self {
        Self {
            id: Uuid::new_v4(),
            title: NEW_CHAT_TITLE.to_string(),
            snippet: NEW_CHAT_SNIPPET.to_string(),
            created_at: Local::now(),
            active: true,
        }
    }

    /// Relative time label: "Now" for the first minute, then the clock time.
    pub fn time_label(&self, now: DateTime<Local>) -> String {
        if now.signed_duration_since(self.created_at).num_seconds() < 60 {
            "Now".to_string()
        } else {
            self.created_at.format("%H:%M").to_string()
        }
    }
}

/// Sidebar list of conversations. Only the active entry is ever written to.
#[derive(Debug, Clone)]
pub struct ChatList {
    entries: Vec<ChatListEntry>,
}

impl Default for ChatList {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatList {
    pub fn new() -> Self {
        Self {
            entries: vec![ChatListEntry::fresh()],
        }
    }

    /// Insert a fresh entry at the head, make it the only active one.
    pub fn start_new(&mut self) -> Uuid {
        for entry in &mut self.entries {
            entry.active = false;
        }
        let entry = ChatListEntry::fresh();
        let id = entry.id;
        self.entries.insert(0, entry);
        id
    }

    pub fn update_active_preview(&mut self, text: &str) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.active) {
            entry.snippet = preview(text);
        }
    }

    #[cfg(test)]
    pub fn active(&self) -> Option<&ChatListEntry> {
        self.entries.iter().find(|e| e.active)
    }

    pub fn entries(&self) -> &[ChatListEntry] {
        &self.entries
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// First 50 characters of `text`, with "..." appended when cut.
pub fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
