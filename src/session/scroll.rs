/// Keeps the conversation viewport following its newest line.
///
/// `pin_to_bottom` only records the request; the offset is resolved against
/// real geometry in `layout`, so any number of pins between two frames
/// collapse into one adjustment.
#[derive(Debug, Clone)]
pub struct ScrollCoordinator {
    offset: usize,
    pinned: bool,
    #[cfg(test)]
    pin_requests: u64,
}

impl Default for ScrollCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollCoordinator {
    pub fn new() -> Self {
        Self {
            offset: 0,
            pinned: true,
            #[cfg(test)]
            pin_requests: 0,
        }
    }

    pub fn pin_to_bottom(&mut self) {
        self.pinned = true;
        #[cfg(test)]
        {
            self.pin_requests += 1;
        }
    }

    /// Manual scroll towards older content; stops following the bottom.
    pub fn scroll_up(&mut self, lines: usize) {
        self.pinned = false;
        self.offset = self.offset.saturating_sub(lines);
    }

    /// Manual scroll towards newer content. Reaching the bottom re-pins in `layout`.
    pub fn scroll_down(&mut self, lines: usize) {
        self.offset = self.offset.saturating_add(lines);
    }

    /// Resolve the offset for the current frame and return it.
    pub fn layout(&mut self, content_height: usize, viewport_height: usize) -> usize {
        let max = content_height.saturating_sub(viewport_height);
        if self.pinned || self.offset >= max {
            self.offset = max;
            self.pinned = true;
        }
        self.offset
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    /// Number of `pin_to_bottom` calls so far
    #[cfg(test)]
    pub fn pin_requests(&self) -> u64 {
        self.pin_requests
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pinned_offset_tracks_growing_content() {
        let mut scroll = ScrollCoordinator::new();
        assert_eq!(scroll.layout(5, 10), 0);

        scroll.pin_to_bottom();
        assert_eq!(scroll.layout(25, 10), 15);

        scroll.pin_to_bottom();
        scroll.pin_to_bottom();
        assert_eq!(scroll.layout(40, 10), 30);
        assert_eq!(scroll.pin_requests(), 3);
    }

    #[test]
    fn manual_scroll_unpins_until_next_pin() {
        let mut scroll = ScrollCoordinator::new();
        scroll.layout(30, 10);

        scroll.scroll_up(5);
        assert!(!scroll.is_pinned());
        assert_eq!(scroll.layout(35, 10), 15);

        scroll.pin_to_bottom();
        assert_eq!(scroll.layout(35, 10), 25);
    }

    #[test]
    fn scrolling_past_the_end_repins() {
        let mut scroll = ScrollCoordinator::new();
        scroll.layout(30, 10);
        scroll.scroll_up(3);
        scroll.scroll_down(100);

        assert_eq!(scroll.layout(30, 10), 20);
        assert!(scroll.is_pinned());
    }
}
