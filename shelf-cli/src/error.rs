use data_error::ShelfError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Couldn't retrieve the user cache directory!")]
    CacheDirNotFound,

    #[error("None of the given profiles could be added")]
    NoClients,

    #[error(transparent)]
    IoError(#[from] io::Error),

    #[error(transparent)]
    ShelfError(#[from] ShelfError),
}
