use tracing::debug;

/// "Assistant is typing" state; while shown, the submit affordance is disabled.
#[derive(Debug, Clone, Default)]
pub struct TypingIndicator {
    visible: bool,
}

impl TypingIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether anything changed.
    pub fn show(&mut self) -> bool {
        if self.visible {
            return false;
        }
        self.visible = true;
        debug!("typing indicator on");
        true
    }

    /// Returns whether anything changed.
    pub fn hide(&mut self) -> bool {
        if !self.visible {
            return false;
        }
        self.visible = false;
        debug!("typing indicator off");
        true
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn submit_enabled(&self) -> bool {
        !self.visible
    }
}
