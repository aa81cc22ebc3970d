#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    #[error("empty title")] EmptyTitle,
    #[error("empty content")] EmptyContent,
    #[error("not found")] NotFound,
}

pub type StoreResult<T> = Result<T, StoreError>;
