use thiserror::Error;

/// The part of the error taxonomy the planner itself can raise.
/// `ExtractorFailed`/`BuildFailed` are raised by the job pool, not here.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error(transparent)]
    Fatal(#[from] dbulk_fs::FatalError),
}
