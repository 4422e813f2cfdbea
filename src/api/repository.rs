//! The data collaborator contract consumed by the bug form and list.

use async_trait::async_trait;

use super::error::Result;
use super::types::{Bug, NewBug, NotFixReason, ReferenceOption, ReferenceOptions};

/// Storage for bugs and the reference lists that populate the form.
///
/// Implementations must be shareable across tasks; the UI holds one behind an
/// `Arc<dyn BugRepository>` and hands clones to background tasks.
#[async_trait]
pub trait BugRepository: Send + Sync {
    /// Fetch every bug.
    async fn fetch_bugs(&self) -> Result<Vec<Bug>>;

    /// Store a new bug, assigning its id and creation date.
    async fn create_bug(&self, new_bug: NewBug) -> Result<Bug>;

    /// Replace a stored bug with the given record.
    ///
    /// Fails with `ApiError::NotFound` when no bug has the record's id.
    async fn update_bug(&self, bug: Bug) -> Result<Bug>;

    async fn fetch_users(&self) -> Result<Vec<ReferenceOption>>;

    async fn fetch_projects(&self) -> Result<Vec<ReferenceOption>>;

    async fn fetch_iterations(&self) -> Result<Vec<ReferenceOption>>;

    async fn fetch_priorities(&self) -> Result<Vec<ReferenceOption>>;

    async fn fetch_severities(&self) -> Result<Vec<ReferenceOption>>;

    async fn fetch_bug_types(&self) -> Result<Vec<ReferenceOption>>;

    async fn fetch_not_fix_reasons(&self) -> Result<Vec<NotFixReason>>;
}

/// Fetch all seven reference lists concurrently.
///
/// Resolves once every list has arrived, or with the first error.
pub async fn fetch_reference_options(repo: &dyn BugRepository) -> Result<ReferenceOptions> {
    let (users, projects, iterations, priorities, severities, bug_types, not_fix_reasons) = tokio::try_join!(
        repo.fetch_users(),
        repo.fetch_projects(),
        repo.fetch_iterations(),
        repo.fetch_priorities(),
        repo.fetch_severities(),
        repo.fetch_bug_types(),
        repo.fetch_not_fix_reasons(),
    )?;

    Ok(ReferenceOptions {
        users,
        projects,
        iterations,
        priorities,
        severities,
        bug_types,
        not_fix_reasons,
    })
}
