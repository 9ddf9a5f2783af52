use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("service is required")]
    MissingService,
    #[error("password is required")]
    MissingPassword,
    #[error("category name is required")]
    MissingCategoryName,
    #[error("icon \"{0}\" is not an emoji")]
    InvalidIcon(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    #[error("failed to read \"{key}\": {reason}")]
    Read { key: String, reason: String },
    #[error("failed to decode \"{key}\": {reason}")]
    Decode { key: String, reason: String },
    #[error("failed to write \"{key}\": {reason}")]
    Write { key: String, reason: String },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VaultError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error("no credential with id \"{0}\"")]
    UnknownCredential(String),
    #[error("no category with id \"{0}\"")]
    UnknownCategory(String),
    #[error("category \"{0}\" is built in and cannot be changed")]
    ProtectedCategory(String),
    #[error("system randomness unavailable: {0}")]
    Randomness(String),
}
