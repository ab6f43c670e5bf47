use thiserror::Error;

/// The two job-pool-specific error cases, plus the filesystem
/// and plan-re-entry failures that can surface while running them.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("failed to spawn {0}: {1}")]
    Spawn(String, #[source] std::io::Error),
    #[error(transparent)]
    Fatal(#[from] dbulk_fs::FatalError),
    #[error(transparent)]
    Plan(#[from] dbulk_plan::PlanError),
    #[error("{name}: dep file is missing pkgname/version/revision, cannot form a log path")]
    IncompleteDepFile { name: String },
}
