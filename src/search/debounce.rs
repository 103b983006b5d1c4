use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

type PendingMap = HashMap<String, (u64, JoinHandle<()>)>;

/// Keyed trailing-edge debouncer.
///
/// Each `call` for a key cancels the task still waiting for that key and
/// schedules the new one after `delay`. Keys are independent.
pub struct Debouncer {
    delay: Duration,
    generation: AtomicU64,
    pending: Arc<Mutex<PendingMap>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: AtomicU64::new(0),
            pending: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn call<F>(&self, key: impl Into<String>, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let key = key.into();
        let generation = self.generation.fetch_add(1, Ordering::Relaxed);
        let pending = Arc::clone(&self.pending);
        let delay = self.delay;
        let task_key = key.clone();

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            {
                let mut map = pending.lock().unwrap_or_else(PoisonError::into_inner);
                if matches!(map.get(&task_key), Some((current, _)) if *current == generation) {
                    map.remove(&task_key);
                }
            }
            task.await;
        });

        let mut map = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some((_, previous)) = map.insert(key.clone(), (generation, handle)) {
            if !previous.is_finished() {
                debug!("Debounce: superseded pending task for {}", key);
            }
            previous.abort();
        }
    }

    /// Cancel whatever is waiting for `key`
    pub fn cancel(&self, key: &str) -> bool {
        let mut map = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        match map.remove(key) {
            Some((_, handle)) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    /// Number of tasks still waiting to fire
    pub fn pending(&self) -> usize {
        let map = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        map.values().filter(|(_, handle)| !handle.is_finished()).count()
    }
}
