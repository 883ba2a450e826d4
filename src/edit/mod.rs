//! Structural edits performed with lopdf.
//!
//! Every operation here reads one or more files, writes a new file and never
//! touches viewer state. The app reloads the output when it should become the
//! active document.

mod highlight;
mod merge;
mod page;
mod rotate;
mod security;
mod split;
mod stamp;

#[cfg(test)]
pub(crate) mod fixtures;

pub use highlight::{HighlightRect, highlight_page, highlight_page_file};
pub use merge::{merge_documents, merge_files};
pub use rotate::{rotate_page, rotate_page_file};
pub use security::{decrypt_file, encrypt_document, encrypt_file};
pub use split::{split_document, split_file, split_output_paths};
pub use stamp::{
    IMAGE_BOX, Placement, TEXT_BOX, stamp_image, stamp_image_file, stamp_text, stamp_text_file,
};

use std::path::{Path, PathBuf};

use lopdf::{Document, ObjectId};

use crate::error::{Error, Result};

pub fn load(path: &Path) -> Result<Document> {
    Ok(Document::load(path)?)
}

/// Compresses and writes `doc` to `path`.
pub fn save(doc: &mut Document, path: &Path) -> Result<()> {
    doc.compress();
    doc.save(path)?;
    tracing::debug!(path = %path.display(), "wrote document");
    Ok(())
}

pub fn page_count(doc: &Document) -> usize {
    doc.get_pages().len()
}

/// Object id of the 1-based `page_number`.
pub fn page_id(doc: &Document, page_number: u32) -> Result<ObjectId> {
    let pages = doc.get_pages();
    pages.get(&page_number).copied().ok_or(Error::PageOutOfRange {
        page: page_number as usize,
        total: pages.len(),
    })
}

/// `report.pdf` + `rotated` -> `report_rotated.pdf`, next to the source.
pub fn derived_path(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "document".to_string());
    path.with_file_name(format!("{stem}_{suffix}.pdf"))
}
