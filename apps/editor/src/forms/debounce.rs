//! Cancellable deferred commits.
//!
//! Each scheduled commit replaces the previous one. Dropping the debouncer
//! (form unmount) cancels the pending commit without running it; `flush` runs
//! it immediately instead (explicit save).

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::JoinHandle;

type Commit = Box<dyn FnOnce() + Send + 'static>;

/// The pending commit and the schedule it belongs to. A timer only fires the
/// commit of its own generation, and fires it while holding the lock, so
/// `cancel` returning means no commit is running or will run.
#[derive(Default)]
struct Slot {
    generation: u64,
    pending: Option<Commit>,
}

impl Slot {
    fn reset(&mut self) -> Option<Commit> {
        self.generation = self.generation.wrapping_add(1);
        self.pending.take()
    }
}

pub struct Debouncer {
    delay: Duration,
    slot: Arc<Mutex<Slot>>,
    timer: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            slot: Arc::new(Mutex::new(Slot::default())),
            timer: None,
        }
    }

    /// Schedules `commit` to run once `delay` passes with no newer schedule.
    pub fn schedule(&mut self, commit: impl FnOnce() + Send + 'static) {
        self.stop_timer();
        let generation = {
            let mut slot = lock(&self.slot);
            slot.reset();
            slot.pending = Some(Box::new(commit));
            slot.generation
        };

        let slot = Arc::clone(&self.slot);
        let delay = self.delay;
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut slot = lock(&slot);
            if slot.generation != generation {
                return;
            }
            if let Some(commit) = slot.pending.take() {
                commit();
            }
        }));
    }

    /// Drops the pending commit without running it. Waits for a commit the
    /// timer already started.
    pub fn cancel(&mut self) {
        self.stop_timer();
        lock(&self.slot).reset();
    }

    /// Runs the pending commit now, if any. Returns whether one ran.
    pub fn flush(&mut self) -> bool {
        self.stop_timer();
        let mut slot = lock(&self.slot);
        match slot.reset() {
            Some(commit) => {
                commit();
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        lock(&self.slot).pending.is_some()
    }

    fn stop_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn lock(slot: &Mutex<Slot>) -> MutexGuard<'_, Slot> {
    // A panicking commit cannot leave the slot half-written; recover the guard.
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    const WINDOW: Duration = Duration::from_millis(300);

    fn counter() -> (Arc<AtomicU32>, impl Fn() -> Box<dyn FnOnce() + Send>) {
        let hits = Arc::new(AtomicU32::new(0));
        let h = Arc::clone(&hits);
        let make = move || {
            let h = Arc::clone(&h);
            Box::new(move || {
                h.fetch_add(1, Ordering::SeqCst);
            }) as Box<dyn FnOnce() + Send>
        };
        (hits, make)
    }

    #[tokio::test(start_paused = true)]
    async fn test_commit_runs_after_window() {
        let (hits, make) = counter();
        let mut d = Debouncer::new(WINDOW);
        d.schedule(make());

        tokio::time::sleep(Duration::from_millis(299)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(!d.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_schedule_supersedes_previous() {
        let (hits, make) = counter();
        let mut d = Debouncer::new(WINDOW);
        for _ in 0..5 {
            d.schedule(make());
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_without_running() {
        let (hits, make) = counter();
        {
            let mut d = Debouncer::new(WINDOW);
            d.schedule(make());
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_runs_immediately_once() {
        let (hits, make) = counter();
        let mut d = Debouncer::new(WINDOW);
        d.schedule(make());
        assert!(d.flush());
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(!d.flush());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_drop_never_leaves_a_commit_behind() {
        let hits = Arc::new(AtomicU32::new(0));
        for _ in 0..200 {
            let h = Arc::clone(&hits);
            let mut d = Debouncer::new(Duration::ZERO);
            d.schedule(move || {
                std::thread::sleep(Duration::from_micros(200));
                h.fetch_add(1, Ordering::SeqCst);
            });
            tokio::time::sleep(Duration::from_millis(1)).await;
            drop(d);

            let settled = hits.load(Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(1)).await;
            assert_eq!(hits.load(Ordering::SeqCst), settled);
        }
    }
}
