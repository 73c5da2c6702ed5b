//! Typed-out rendering of assistant replies.
//!
//! [`reveal_prefixes`] is the animation itself: a stream that waits a random
//! 20..50ms before each character and yields the text revealed so far.
//! [`RevealAnimator::reveal`] drives that stream on a task and forwards every
//! prefix to the session as a [`SessionEvent`], checking its cancel flag
//! before each one.

use crate::config::RevealConfig;
use crate::events::{BubbleId, SessionEvent};
use futures::{Stream, StreamExt, stream};
use rand::Rng;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::trace;

/// Yield successive prefixes of `text`, one more character each time.
pub fn reveal_prefixes(text: String, min_delay: Duration, max_delay: Duration) -> impl Stream<Item = String> {
    let chars: Vec<char> = text.chars().collect();
    stream::unfold((chars, 0usize, String::new()), move |(chars, cursor, mut prefix)| async move {
        let ch = *chars.get(cursor)?;
        tokio::time::sleep(tick_delay(min_delay, max_delay)).await;
        prefix.push(ch);
        Some((prefix.clone(), (chars, cursor + 1, prefix)))
    })
}

fn tick_delay(min: Duration, max: Duration) -> Duration {
    if min >= max {
        return min;
    }
    rand::thread_rng().gen_range(min..max)
}

/// Stops a running reveal. Dropping the handle does not stop it.
#[derive(Debug)]
pub struct RevealHandle {
    target: BubbleId,
    cancelled: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl RevealHandle {
    pub fn target(&self) -> BubbleId {
        self.target
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
        self.task.abort();
    }

    #[cfg(test)]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RevealAnimator {
    min_delay: Duration,
    max_delay: Duration,
}

impl Default for RevealAnimator {
    fn default() -> Self {
        Self::new(RevealConfig::default())
    }
}

impl RevealAnimator {
    pub fn new(config: RevealConfig) -> Self {
        let (min_delay, max_delay) = config.delay_range();
        Self { min_delay, max_delay }
    }

    /// Start revealing `text` into `target`. Each reveal owns its own cursor
    /// and timer, so several may run at once.
    pub fn reveal(&self, target: BubbleId, text: String, events: mpsc::UnboundedSender<SessionEvent>) -> RevealHandle {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);
        let prefixes = reveal_prefixes(text, self.min_delay, self.max_delay);

        let task = tokio::spawn(async move {
            let mut prefixes = std::pin::pin!(prefixes);
            while let Some(prefix) = prefixes.next().await {
                if flag.load(Ordering::Acquire) {
                    trace!(?target, "reveal cancelled");
                    return;
                }
                if events.send(SessionEvent::RevealTick { target, prefix }).is_err() {
                    return;
                }
            }
            let _ = events.send(SessionEvent::RevealFinished { target });
        });

        RevealHandle {
            target,
            cancelled,
            task,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN: Duration = Duration::from_millis(20);
    const MAX: Duration = Duration::from_millis(50);

    #[tokio::test(start_paused = true)]
    async fn prefixes_grow_one_char_at_a_time() {
        let text = "héllo 👋 world";
        let prefixes: Vec<String> = reveal_prefixes(text.to_string(), MIN, MAX).collect().await;

        assert_eq!(prefixes.len(), text.chars().count());
        for pair in prefixes.windows(2) {
            assert!(pair[1].starts_with(&pair[0]));
            assert_eq!(pair[1].chars().count(), pair[0].chars().count() + 1);
        }
        assert_eq!(prefixes.last().map(String::as_str), Some(text));
    }

    #[tokio::test(start_paused = true)]
    async fn each_tick_waits_within_bounds() {
        let start = tokio::time::Instant::now();
        let mut prefixes = std::pin::pin!(reveal_prefixes("abcd".to_string(), MIN, MAX));
        let mut last = start;

        while prefixes.next().await.is_some() {
            let now = tokio::time::Instant::now();
            let gap = now - last;
            assert!(gap >= MIN && gap <= MAX, "tick gap {gap:?} out of range");
            last = now;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn empty_text_yields_nothing() {
        let prefixes: Vec<String> = reveal_prefixes(String::new(), MIN, MAX).collect().await;
        assert!(prefixes.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn driver_sends_ticks_then_finish() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let target = BubbleId::new();
        let handle = RevealAnimator::default().reveal(target, "abc".to_string(), tx);

        let mut seen = Vec::new();
        while let Some(event) = rx.recv().await {
            match event {
                SessionEvent::RevealTick { target: t, prefix } => {
                    assert_eq!(t, target);
                    seen.push(prefix);
                }
                SessionEvent::RevealFinished { target: t } => {
                    assert_eq!(t, target);
                    break;
                }
                other => panic!("unexpected event {other:?}"),
            }
        }

        assert_eq!(seen, vec!["a", "ab", "abc"]);
        assert!(!handle.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_reveal_goes_quiet() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = RevealAnimator::default().reveal(BubbleId::new(), "a long reply".to_string(), tx);

        let first = rx.recv().await;
        assert!(matches!(first, Some(SessionEvent::RevealTick { .. })));

        handle.cancel();
        tokio::time::sleep(Duration::from_secs(2)).await;

        assert!(handle.is_cancelled());
        assert!(handle.is_finished());
        // The sender was dropped with the aborted task, so the channel closes
        // without delivering anything past the first tick.
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_reveals_are_independent() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let animator = RevealAnimator::default();
        let a = BubbleId::new();
        let b = BubbleId::new();
        let _ha = animator.reveal(a, "first".to_string(), tx.clone());
        let _hb = animator.reveal(b, "second reply".to_string(), tx);

        let mut last_a = String::new();
        let mut last_b = String::new();
        let mut finished = 0;
        while finished < 2 {
            match rx.recv().await {
                Some(SessionEvent::RevealTick { target, prefix }) if target == a => {
                    assert!(prefix.starts_with(&last_a));
                    last_a = prefix;
                }
                Some(SessionEvent::RevealTick { target, prefix }) if target == b => {
                    assert!(prefix.starts_with(&last_b));
                    last_b = prefix;
                }
                Some(SessionEvent::RevealFinished { .. }) => finished += 1,
                other => panic!("unexpected event {other:?}"),
            }
        }

        assert_eq!(last_a, "first");
        assert_eq!(last_b, "second reply");
    }
}
