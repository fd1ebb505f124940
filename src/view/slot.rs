/// Cancellable async value slot
///
/// Holds the result of one in-flight load per display row. Re-assigning or
/// resetting aborts the previous task and bumps a generation counter, so a
/// response that was already past its await point can still never land in a
/// slot that has moved on.
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;

pub struct AsyncSlot<T> {
    value: Arc<Mutex<Option<T>>>,
    generation: Arc<AtomicU64>,
    task: Option<JoinHandle<()>>,
}

impl<T> Default for AsyncSlot<T> {
    fn default() -> Self {
        Self {
            value: Arc::new(Mutex::new(None)),
            generation: Arc::new(AtomicU64::new(0)),
            task: None,
        }
    }
}

impl<T: Send + 'static> AsyncSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a load, cancelling any previous one. `load` resolves to
    /// `None` on best-effort failure and the slot simply stays empty.
    pub fn assign<F>(&mut self, load: F)
    where
        F: Future<Output = Option<T>> + Send + 'static,
    {
        self.reset();

        let generation = self.generation.load(Ordering::SeqCst);
        let guard = Arc::clone(&self.generation);
        let value = Arc::clone(&self.value);

        self.task = Some(tokio::spawn(async move {
            let Some(loaded) = load.await else { return };
            // The generation re-check happens under the value lock, the
            // same lock `reset` bumps and clears under, so a reset can
            // never interleave between the check and the write.
            if let Ok(mut slot) = value.lock() {
                if guard.load(Ordering::SeqCst) == generation {
                    *slot = Some(loaded);
                }
            }
        }));
    }

    /// Abort the in-flight load and clear the value. Called when the row is
    /// recycled or its underlying data changes.
    pub fn reset(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        if let Ok(mut slot) = self.value.lock() {
            self.generation.fetch_add(1, Ordering::SeqCst);
            *slot = None;
        }
    }

    pub fn get(&self) -> Option<T>
    where
        T: Clone,
    {
        self.value.lock().ok().and_then(|slot| slot.clone())
    }
}

impl<T> Drop for AsyncSlot<T> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::oneshot;

    async fn settle() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn completed_load_fills_the_slot() {
        let mut slot = AsyncSlot::new();
        slot.assign(async { Some(42u32) });
        settle().await;
        assert_eq!(slot.get(), Some(42));
    }

    #[tokio::test]
    async fn failed_load_leaves_the_slot_empty() {
        let mut slot: AsyncSlot<u32> = AsyncSlot::new();
        slot.assign(async { None });
        settle().await;
        assert_eq!(slot.get(), None);
    }

    #[tokio::test]
    async fn recycled_slot_never_shows_the_stale_result() {
        let (release, gate) = oneshot::channel::<()>();

        let mut slot = AsyncSlot::new();
        slot.assign(async move {
            let _ = gate.await;
            Some("stale image")
        });

        // Row gets recycled while the first load is still in flight.
        slot.reset();
        let _ = release.send(());
        settle().await;
        assert_eq!(slot.get(), None);

        // The recycled row's own load lands normally.
        slot.assign(async { Some("fresh image") });
        settle().await;
        assert_eq!(slot.get(), Some("fresh image"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn reset_wins_the_race_against_a_completing_load() {
        // The load body has no await after its last suspension point, so a
        // reset racing its final stretch cannot rely on abort alone; the
        // locked generation re-check has to reject the write.
        let mut slot = AsyncSlot::new();
        for round in 0..500u32 {
            slot.assign(async move { Some(round) });
            tokio::task::yield_now().await;
            slot.reset();
            assert_eq!(slot.get(), None);
            settle().await;
            assert_eq!(slot.get(), None);
        }
    }

    #[tokio::test]
    async fn reassigning_cancels_the_previous_load() {
        let (release, gate) = oneshot::channel::<()>();

        let mut slot = AsyncSlot::new();
        slot.assign(async move {
            let _ = gate.await;
            Some("first")
        });
        slot.assign(async { Some("second") });

        let _ = release.send(());
        settle().await;
        assert_eq!(slot.get(), Some("second"));
    }
}
