pub mod data_loader;

use std::collections::HashMap;
use std::future::Future;
use tokio::task::JoinHandle;

/// Tracks tasks running off the UI loop.
///
/// Loads are keyed: a newer load for the same key aborts the older one so
/// stale data never lands. Write-backs are never aborted while the app runs.
pub struct BackgroundTaskManager {
    loads: HashMap<String, JoinHandle<()>>,
    writes: Vec<JoinHandle<()>>,
}

impl BackgroundTaskManager {
    pub fn new() -> Self {
        Self {
            loads: HashMap::new(),
            writes: Vec::new(),
        }
    }

    pub fn spawn_load_task<F>(&mut self, task_id: String, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if let Some(handle) = self.loads.remove(&task_id) {
            tracing::debug!("Superseding load task {}", task_id);
            handle.abort();
        }

        self.loads.insert(task_id, tokio::spawn(future));
    }

    pub fn spawn_write_task<F>(&mut self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.writes.retain(|handle| !handle.is_finished());
        self.writes.push(tokio::spawn(future));
    }

    pub fn in_flight_writes(&self) -> usize {
        self.writes.iter().filter(|h| !h.is_finished()).count()
    }

    /// Abort everything (shutdown only).
    pub fn cancel_all(&mut self) {
        for (_, handle) in self.loads.drain() {
            handle.abort();
        }
        for handle in self.writes.drain(..) {
            handle.abort();
        }
    }
}

impl Default for BackgroundTaskManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for BackgroundTaskManager {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn newer_load_supersedes_older_one() {
        let finished = Arc::new(AtomicUsize::new(0));
        let mut manager = BackgroundTaskManager::new();

        let slow = finished.clone();
        manager.spawn_load_task("load".to_string(), async move {
            tokio::time::sleep(Duration::from_secs(60)).await;
            slow.fetch_add(10, Ordering::SeqCst);
        });
        let fast = finished.clone();
        manager.spawn_load_task("load".to_string(), async move {
            fast.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(finished.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn write_tasks_run_to_completion() {
        let finished = Arc::new(AtomicUsize::new(0));
        let mut manager = BackgroundTaskManager::new();

        for _ in 0..3 {
            let counter = finished.clone();
            manager.spawn_write_task(async move {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(finished.load(Ordering::SeqCst), 3);
        assert_eq!(manager.in_flight_writes(), 0);
    }
}
