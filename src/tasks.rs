//! Async task management for non-blocking repository calls.
//!
//! Repository calls run in background tasks while the UI keeps drawing.
//! Results come back to the main event loop over a tokio channel.
//!
//! # Architecture
//!
//! 1. The app records a pending operation (e.g. `pending_submission`)
//! 2. The main loop takes it and spawns a background task via `TaskSpawner`
//! 3. The main loop continues rendering and handling events
//! 4. When the task completes, it sends an `ApiMessage` through the channel
//! 5. The main loop polls the channel with `try_recv()` and hands the
//!    message to the app

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use crate::api::{Bug, BugRepository, NewBug, ReferenceOptions};
use crate::form::{load_options, Generation};

/// Messages sent from background tasks to the main event loop.
#[derive(Debug)]
pub enum ApiMessage {
    /// Bug list fetched (initial load or refresh).
    BugsFetched(Result<Vec<Bug>, String>),

    /// Reference lists for the form.
    OptionsLoaded {
        generation: Generation,
        result: Result<ReferenceOptions, String>,
    },

    /// New bug stored.
    BugCreated(Result<Bug, String>),

    /// Existing bug replaced.
    BugUpdated(Result<Bug, String>),
}

/// Spawns background tasks for repository operations.
///
/// Each method clones the repository handle and spawns a tokio task that
/// sends its result through the channel.
#[derive(Clone)]
pub struct TaskSpawner {
    tx: mpsc::UnboundedSender<ApiMessage>,
}

impl TaskSpawner {
    /// Create a new TaskSpawner with the given channel sender.
    pub fn new(tx: mpsc::UnboundedSender<ApiMessage>) -> Self {
        Self { tx }
    }

    /// Spawn a task to fetch all bugs.
    pub fn spawn_fetch_bugs(&self, repo: &Arc<dyn BugRepository>) {
        let tx = self.tx.clone();
        let repo = Arc::clone(repo);
        tokio::spawn(async move {
            let result = repo.fetch_bugs().await.map_err(|e| e.to_string());
            let _ = tx.send(ApiMessage::BugsFetched(result));
        });
    }

    /// Spawn a task to load the form's reference lists.
    pub fn spawn_load_options(&self, repo: &Arc<dyn BugRepository>, generation: Generation) {
        let tx = self.tx.clone();
        let repo = Arc::clone(repo);
        debug!(generation, "Spawning option load");
        tokio::spawn(async move {
            let (generation, result) = load_options(repo.as_ref(), generation).await;
            let result = result.map_err(|e| e.to_string());
            let _ = tx.send(ApiMessage::OptionsLoaded { generation, result });
        });
    }

    /// Spawn a task to create a bug.
    pub fn spawn_create_bug(&self, repo: &Arc<dyn BugRepository>, new_bug: NewBug) {
        let tx = self.tx.clone();
        let repo = Arc::clone(repo);
        tokio::spawn(async move {
            let result = repo.create_bug(new_bug).await.map_err(|e| e.to_string());
            let _ = tx.send(ApiMessage::BugCreated(result));
        });
    }

    /// Spawn a task to update a bug.
    pub fn spawn_update_bug(&self, repo: &Arc<dyn BugRepository>, bug: Bug) {
        let tx = self.tx.clone();
        let repo = Arc::clone(repo);
        tokio::spawn(async move {
            let result = repo.update_bug(bug).await.map_err(|e| e.to_string());
            let _ = tx.send(ApiMessage::BugUpdated(result));
        });
    }
}

/// Create a new task channel and spawner.
///
/// Returns a tuple of (receiver, spawner). The receiver should be polled
/// in the main event loop, and the spawner should be used to spawn tasks.
pub fn create_task_channel() -> (mpsc::UnboundedReceiver<ApiMessage>, TaskSpawner) {
    let (tx, rx) = mpsc::unbounded_channel();
    (rx, TaskSpawner::new(tx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{seed_bugs, seed_options, InMemoryRepository, Latency, OptionKind};

    fn repo() -> (InMemoryRepository, Arc<dyn BugRepository>) {
        let memory = InMemoryRepository::seeded().with_latency(Latency::NONE);
        let shared: Arc<dyn BugRepository> = Arc::new(memory.clone());
        (memory, shared)
    }

    #[tokio::test]
    async fn test_spawn_fetch_bugs() {
        let (_, repo) = repo();
        let (mut rx, spawner) = create_task_channel();

        spawner.spawn_fetch_bugs(&repo);

        match rx.recv().await {
            Some(ApiMessage::BugsFetched(Ok(bugs))) => assert_eq!(bugs, seed_bugs()),
            other => panic!("Unexpected message: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_spawn_load_options_keeps_generation() {
        let (_, repo) = repo();
        let (mut rx, spawner) = create_task_channel();

        spawner.spawn_load_options(&repo, 42);

        match rx.recv().await {
            Some(ApiMessage::OptionsLoaded { generation, result }) => {
                assert_eq!(generation, 42);
                assert_eq!(result.unwrap(), seed_options());
            }
            other => panic!("Unexpected message: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_spawn_load_options_reports_failure() {
        let (memory, repo) = repo();
        memory.set_option_failure(OptionKind::Users, true);
        let (mut rx, spawner) = create_task_channel();

        spawner.spawn_load_options(&repo, 1);

        match rx.recv().await {
            Some(ApiMessage::OptionsLoaded { result, .. }) => {
                assert_eq!(result.unwrap_err(), "Failed to load users");
            }
            other => panic!("Unexpected message: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_spawn_create_bug() {
        let (_, repo) = repo();
        let (mut rx, spawner) = create_task_channel();

        spawner.spawn_create_bug(
            &repo,
            NewBug {
                title: "Crash on save".to_string(),
                ..Default::default()
            },
        );

        match rx.recv().await {
            Some(ApiMessage::BugCreated(Ok(bug))) => {
                assert_eq!(bug.title, "Crash on save");
                assert_eq!(bug.id, "BUG-004");
            }
            other => panic!("Unexpected message: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_spawn_update_missing_bug() {
        let (_, repo) = repo();
        let (mut rx, spawner) = create_task_channel();

        spawner.spawn_update_bug(
            &repo,
            Bug {
                id: "BUG-999".to_string(),
                ..Default::default()
            },
        );

        match rx.recv().await {
            Some(ApiMessage::BugUpdated(Err(e))) => assert!(e.contains("BUG-999")),
            other => panic!("Unexpected message: {:?}", other),
        }
    }
}
