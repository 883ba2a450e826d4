//! Document side of the pdfdesk viewer: the view-state reducer, lopdf edits,
//! and the PDFium engine thread the GUI talks to.

pub mod bookmarks;
pub mod commands;
pub mod edit;
pub mod engine;
pub mod error;
pub mod models;
pub mod page_range;
pub mod pdf_engine;
pub mod search;
pub mod storage;
pub mod viewer;

pub use error::{Error, Result};
