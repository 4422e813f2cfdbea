//! In-memory bug repository with simulated network latency.
//!
//! This is the default data source. It is seeded with a handful of bugs and
//! fixed reference lists, and sleeps before answering so the UI exercises its
//! loading states the same way it would against a remote service.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::error::{ApiError, Result};
use super::repository::BugRepository;
use super::types::{Bug, NewBug, NotFixReason, OptionKind, ReferenceOption, ReferenceOptions};

/// Artificial delays applied by [`InMemoryRepository`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latency {
    pub fetch_bugs: Duration,
    pub create: Duration,
    pub update: Duration,
    pub options: Duration,
}

impl Latency {
    /// No delays at all.
    pub const NONE: Latency = Latency {
        fetch_bugs: Duration::ZERO,
        create: Duration::ZERO,
        update: Duration::ZERO,
        options: Duration::ZERO,
    };
}

impl Default for Latency {
    fn default() -> Self {
        Self {
            fetch_bugs: Duration::from_millis(500),
            create: Duration::from_millis(500),
            update: Duration::from_millis(400),
            options: Duration::from_millis(300),
        }
    }
}

/// A [`BugRepository`] backed by process memory.
///
/// Cloning is cheap and every clone shares the same store.
#[derive(Debug, Clone)]
pub struct InMemoryRepository {
    bugs: Arc<RwLock<Vec<Bug>>>,
    options: Arc<ReferenceOptions>,
    latency: Latency,
    failing: Arc<Mutex<HashSet<OptionKind>>>,
}

impl InMemoryRepository {
    /// Create a repository with the given bugs and reference lists.
    pub fn new(bugs: Vec<Bug>, options: ReferenceOptions) -> Self {
        Self {
            bugs: Arc::new(RwLock::new(bugs)),
            options: Arc::new(options),
            latency: Latency::default(),
            failing: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Create a repository populated with the demo data set.
    pub fn seeded() -> Self {
        Self::new(seed_bugs(), seed_options())
    }

    /// Set the artificial latency.
    pub fn with_latency(mut self, latency: Latency) -> Self {
        self.latency = latency;
        self
    }

    /// Get the configured latency.
    pub fn latency(&self) -> Latency {
        self.latency
    }

    /// Make fetches of the given reference list fail (or succeed again).
    pub fn set_option_failure(&self, kind: OptionKind, failing: bool) {
        let mut set = self
            .failing
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if failing {
            set.insert(kind);
        } else {
            set.remove(&kind);
        }
    }

    fn is_failing(&self, kind: OptionKind) -> bool {
        self.failing
            .lock()
            .map(|set| set.contains(&kind))
            .unwrap_or(false)
    }

    async fn delay(duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }

    async fn reference_list<T: Clone>(
        &self,
        kind: OptionKind,
        select: impl Fn(&ReferenceOptions) -> &Vec<T>,
    ) -> Result<Vec<T>> {
        Self::delay(self.latency.options).await;
        if self.is_failing(kind) {
            debug!(%kind, "Simulated reference list failure");
            return Err(ApiError::OptionsUnavailable(kind));
        }
        Ok(select(&self.options).clone())
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::seeded()
    }
}

#[async_trait]
impl BugRepository for InMemoryRepository {
    async fn fetch_bugs(&self) -> Result<Vec<Bug>> {
        Self::delay(self.latency.fetch_bugs).await;
        Ok(self.bugs.read().await.clone())
    }

    async fn create_bug(&self, new_bug: NewBug) -> Result<Bug> {
        Self::delay(self.latency.create).await;
        let mut bugs = self.bugs.write().await;
        let id = format!("BUG-{:03}", bugs.len() + 1);
        let created_at = chrono::Local::now().format("%Y-%m-%d").to_string();
        let bug = new_bug.into_bug(id, created_at);
        info!(id = %bug.id, "Created bug");
        bugs.push(bug.clone());
        Ok(bug)
    }

    async fn update_bug(&self, bug: Bug) -> Result<Bug> {
        Self::delay(self.latency.update).await;
        let mut bugs = self.bugs.write().await;
        let stored = bugs
            .iter_mut()
            .find(|b| b.id == bug.id)
            .ok_or_else(|| ApiError::NotFound(bug.id.clone()))?;
        *stored = bug;
        info!(id = %stored.id, "Updated bug");
        Ok(stored.clone())
    }

    async fn fetch_users(&self) -> Result<Vec<ReferenceOption>> {
        self.reference_list(OptionKind::Users, |o| &o.users).await
    }

    async fn fetch_projects(&self) -> Result<Vec<ReferenceOption>> {
        self.reference_list(OptionKind::Projects, |o| &o.projects)
            .await
    }

    async fn fetch_iterations(&self) -> Result<Vec<ReferenceOption>> {
        self.reference_list(OptionKind::Iterations, |o| &o.iterations)
            .await
    }

    async fn fetch_priorities(&self) -> Result<Vec<ReferenceOption>> {
        self.reference_list(OptionKind::Priorities, |o| &o.priorities)
            .await
    }

    async fn fetch_severities(&self) -> Result<Vec<ReferenceOption>> {
        self.reference_list(OptionKind::Severities, |o| &o.severities)
            .await
    }

    async fn fetch_bug_types(&self) -> Result<Vec<ReferenceOption>> {
        self.reference_list(OptionKind::BugTypes, |o| &o.bug_types)
            .await
    }

    async fn fetch_not_fix_reasons(&self) -> Result<Vec<NotFixReason>> {
        self.reference_list(OptionKind::NotFixReasons, |o| &o.not_fix_reasons)
            .await
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

/// The demo bug set.
pub fn seed_bugs() -> Vec<Bug> {
    vec![
        Bug {
            id: "BUG-001".to_string(),
            title: "Login button has the wrong style".to_string(),
            description: "The login page button color does not match the design.".to_string(),
            status: "open".to_string(),
            assignee: "user1".to_string(),
            creator: "user2".to_string(),
            created_at: "2023-10-15".to_string(),
            bug_type: "bug".to_string(),
            priority: "high".to_string(),
            iteration: "iteration1".to_string(),
            planned_start_date: "2023-10-16".to_string(),
            planned_end_date: "2023-10-18".to_string(),
            completion_date: String::new(),
            verifier: "user3".to_string(),
            project: "project1".to_string(),
            severity: "medium".to_string(),
            participants: strings(&["user1", "user2"]),
            cc: strings(&["user4"]),
            tags: strings(&["UI", "frontend"]),
            not_fix_reason: String::new(),
            custom_not_fix_reason: String::new(),
        },
        Bug {
            id: "BUG-002".to_string(),
            title: "User list fails to load".to_string(),
            description: "The user list page shows a 404 error instead of data.".to_string(),
            status: "fixed".to_string(),
            assignee: "user3".to_string(),
            creator: "user1".to_string(),
            created_at: "2023-10-14".to_string(),
            bug_type: "bug".to_string(),
            priority: "critical".to_string(),
            iteration: "iteration1".to_string(),
            planned_start_date: "2023-10-14".to_string(),
            planned_end_date: "2023-10-15".to_string(),
            completion_date: "2023-10-15".to_string(),
            verifier: "user2".to_string(),
            project: "project1".to_string(),
            severity: "high".to_string(),
            participants: strings(&["user1", "user3"]),
            cc: Vec::new(),
            tags: strings(&["API", "backend"]),
            not_fix_reason: String::new(),
            custom_not_fix_reason: String::new(),
        },
        Bug {
            id: "BUG-003".to_string(),
            title: "Slow rendering with large data sets".to_string(),
            description: "Pages load slowly when a table holds thousands of rows.".to_string(),
            status: "open".to_string(),
            assignee: "user2".to_string(),
            creator: "user4".to_string(),
            created_at: "2023-10-13".to_string(),
            bug_type: "bug".to_string(),
            priority: "medium".to_string(),
            iteration: "iteration2".to_string(),
            planned_start_date: String::new(),
            planned_end_date: String::new(),
            completion_date: String::new(),
            verifier: "user1".to_string(),
            project: "project2".to_string(),
            severity: "low".to_string(),
            participants: strings(&["user2", "user4"]),
            cc: strings(&["user3"]),
            tags: strings(&["performance", "frontend"]),
            not_fix_reason: "custom".to_string(),
            custom_not_fix_reason: "Waiting on the virtualized table rewrite".to_string(),
        },
    ]
}

/// The demo reference lists.
pub fn seed_options() -> ReferenceOptions {
    ReferenceOptions {
        users: vec![
            ReferenceOption::new("user1", "Zhang San"),
            ReferenceOption::new("user2", "Li Si"),
            ReferenceOption::new("user3", "Wang Wu"),
            ReferenceOption::new("user4", "Zhao Liu"),
        ],
        projects: vec![
            ReferenceOption::new("project1", "Project One"),
            ReferenceOption::new("project2", "Project Two"),
        ],
        iterations: vec![
            ReferenceOption::new("iteration1", "Iteration 1"),
            ReferenceOption::new("iteration2", "Iteration 2"),
        ],
        priorities: vec![
            ReferenceOption::new("low", "Low"),
            ReferenceOption::new("medium", "Medium"),
            ReferenceOption::new("high", "High"),
            ReferenceOption::new("critical", "Urgent"),
        ],
        severities: vec![
            ReferenceOption::new("low", "Minor"),
            ReferenceOption::new("medium", "Normal"),
            ReferenceOption::new("high", "Major"),
            ReferenceOption::new("critical", "Fatal"),
        ],
        bug_types: vec![
            ReferenceOption::new("bug", "Defect"),
            ReferenceOption::new("feature", "Feature"),
            ReferenceOption::new("improvement", "Improvement"),
        ],
        not_fix_reasons: vec![
            NotFixReason::new("duplicate", "Duplicate", false),
            NotFixReason::new("wontfix", "Won't fix", false),
            NotFixReason::new("notabug", "Not a bug", false),
            NotFixReason::new("custom", "Other reason", true),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::repository::fetch_reference_options;
    use tokio_test::{assert_err, assert_ok};

    fn repo() -> InMemoryRepository {
        InMemoryRepository::seeded().with_latency(Latency::NONE)
    }

    #[test]
    fn test_default_latency_values() {
        let latency = Latency::default();
        assert_eq!(latency.fetch_bugs, Duration::from_millis(500));
        assert_eq!(latency.update, Duration::from_millis(400));
        assert_eq!(latency.options, Duration::from_millis(300));
    }

    #[tokio::test]
    async fn test_fetch_bugs_returns_seed() {
        let bugs = assert_ok!(repo().fetch_bugs().await);
        assert_eq!(bugs.len(), 3);
        assert_eq!(bugs[0].id, "BUG-001");
    }

    #[tokio::test]
    async fn test_create_bug_assigns_identity() {
        let repo = repo();
        let new_bug = NewBug {
            title: "Crash on save".to_string(),
            status: "new".to_string(),
            ..Default::default()
        };

        let bug = assert_ok!(repo.create_bug(new_bug).await);
        assert_eq!(bug.id, "BUG-004");
        assert_eq!(bug.created_at.len(), 10);
        assert!(chrono::NaiveDate::parse_from_str(&bug.created_at, "%Y-%m-%d").is_ok());

        let bugs = assert_ok!(repo.fetch_bugs().await);
        assert_eq!(bugs.len(), 4);
        assert_eq!(bugs[3].title, "Crash on save");
    }

    #[tokio::test]
    async fn test_update_bug_replaces_record() {
        let repo = repo();
        let mut bug = seed_bugs().remove(0);
        bug.title = "Renamed".to_string();

        let updated = assert_ok!(repo.update_bug(bug).await);
        assert_eq!(updated.title, "Renamed");

        let bugs = assert_ok!(repo.fetch_bugs().await);
        assert_eq!(bugs[0].title, "Renamed");
    }

    #[tokio::test]
    async fn test_update_unknown_bug_fails() {
        let bug = Bug {
            id: "BUG-999".to_string(),
            ..Default::default()
        };
        let err = assert_err!(repo().update_bug(bug).await);
        assert_eq!(err, ApiError::NotFound("BUG-999".to_string()));
    }

    #[tokio::test]
    async fn test_clones_share_store() {
        let repo = repo();
        let other = repo.clone();
        assert_ok!(other.create_bug(NewBug::default()).await);
        assert_eq!(assert_ok!(repo.fetch_bugs().await).len(), 4);
    }

    #[tokio::test]
    async fn test_fetch_reference_options_all_lists() {
        let options = assert_ok!(fetch_reference_options(&repo()).await);
        assert_eq!(options.users.len(), 4);
        assert_eq!(options.projects.len(), 2);
        assert_eq!(options.iterations.len(), 2);
        assert_eq!(options.priorities.len(), 4);
        assert_eq!(options.severities.len(), 4);
        assert_eq!(options.bug_types.len(), 3);
        assert_eq!(options.not_fix_reasons.len(), 4);
        assert!(options.not_fix_reason("custom").unwrap().is_custom);
    }

    #[tokio::test]
    async fn test_option_failure_fails_joint_load() {
        let repo = repo();
        repo.set_option_failure(OptionKind::Users, true);

        assert_err!(repo.fetch_users().await);
        let err = assert_err!(fetch_reference_options(&repo).await);
        assert_eq!(err, ApiError::OptionsUnavailable(OptionKind::Users));

        repo.set_option_failure(OptionKind::Users, false);
        assert_ok!(fetch_reference_options(&repo).await);
    }
}
