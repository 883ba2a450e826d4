use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by document operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("lopdf error: {0}")]
    Lopdf(#[from] lopdf::Error),

    /// PDFium failed to bind, load, render or extract.
    #[error("PDFium error: {0}")]
    Pdfium(String),

    #[error("page {page} does not exist (document has {total} pages)")]
    PageOutOfRange { page: usize, total: usize },

    #[error("invalid page range: {0}")]
    InvalidRange(String),

    /// PDFium cannot open the file without its user password.
    #[error("{} is password protected", .0.display())]
    PasswordRequired(PathBuf),

    #[error("wrong password")]
    WrongPassword,

    #[error("document is not encrypted")]
    NotEncrypted,

    #[error("no document loaded")]
    NoDocument,

    #[error("nothing to merge")]
    NothingToMerge,

    #[error("malformed document: {0}")]
    Malformed(String),

    #[error("failed to decode image: {0}")]
    Image(#[from] image::ImageError),

    /// The engine thread has shut down or dropped the reply.
    #[error("document engine is not running")]
    EngineGone,
}

pub type Result<T> = std::result::Result<T, Error>;
