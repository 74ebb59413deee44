use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid grade: {0:?} (expected again, good or easy)")]
    InvalidGrade(String),
    #[error("storage error: {0}")]
    Storage(&'static str),
}
