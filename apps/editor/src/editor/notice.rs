//! Transient user-facing messages. A notice disappears on its own after the
//! configured lifetime; posting a new one replaces the current one.

use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub message: String,
    #[serde(skip)]
    expires_at: Instant,
}

#[derive(Debug, Clone)]
pub struct NoticeBoard {
    ttl: Duration,
    current: Option<Notice>,
}

impl NoticeBoard {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, current: None }
    }

    pub fn post(&mut self, message: impl Into<String>) {
        self.current = Some(Notice {
            message: message.into(),
            expires_at: Instant::now() + self.ttl,
        });
    }

    /// The live notice, if it has not expired yet.
    pub fn current(&self) -> Option<&Notice> {
        self.current
            .as_ref()
            .filter(|n| Instant::now() < n.expires_at)
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_notice_expires() {
        let mut board = NoticeBoard::new(Duration::from_millis(2000));
        board.post("Error saving the resume. Please try again.");
        assert!(board.current().is_some());

        tokio::time::sleep(Duration::from_millis(1999)).await;
        assert!(board.current().is_some());

        tokio::time::sleep(Duration::from_millis(1)).await;
        assert!(board.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_notice_replaces_old() {
        let mut board = NoticeBoard::new(Duration::from_millis(2000));
        board.post("first");
        tokio::time::sleep(Duration::from_millis(1500)).await;
        board.post("second");
        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(board.current().map(|n| n.message.as_str()), Some("second"));

        board.dismiss();
        assert!(board.current().is_none());
    }
}
