use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use pdfium_render::prelude::*;

use crate::edit::HighlightRect;
use crate::error::{Error, Result};
use crate::search::{PageMatches, first_matching_page, match_rects};

/// Shown instead of an empty extraction.
pub const NO_TEXT_FALLBACK: &str = "No text found on this page.";

/// One entry of the document's own outline, flattened depth first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutlineEntry {
    pub title: String,
    pub page_index: usize,
    pub depth: usize,
}

#[derive(Clone, Debug)]
pub struct OpenedDocument {
    pub path: PathBuf,
    pub page_count: usize,
    pub outline: Vec<OutlineEntry>,
}

/// RGBA pixels of one page.
#[derive(Clone, Debug)]
pub struct RenderedPage {
    pub page_index: usize,
    pub zoom: f32,
    pub width: u32,
    pub height: u32,
    pub pixels: Arc<Vec<u8>>,
}

pub struct PdfEngine<'a> {
    pdfium: &'a Pdfium,
    active_doc: Option<PdfDocument<'a>>,
}

fn pdfium_err(e: PdfiumError) -> Error {
    Error::Pdfium(e.to_string())
}

fn open_err(path: &Path, e: PdfiumError) -> Error {
    match e {
        PdfiumError::PdfiumLibraryInternalError(PdfiumInternalError::PasswordError) => {
            Error::PasswordRequired(path.to_path_buf())
        }
        other => pdfium_err(other),
    }
}

impl<'a> PdfEngine<'a> {
    pub fn init_pdfium() -> Result<Pdfium> {
        let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name()))
            .map_err(|e| Error::Pdfium(format!("Failed to bind to Pdfium library: {e}")))?;

        Ok(Pdfium::new(bindings))
    }

    pub fn new(pdfium: &'a Pdfium) -> Self {
        Self {
            pdfium,
            active_doc: None,
        }
    }

    pub fn close_document(&mut self) {
        self.active_doc = None;
    }

    /// Replaces the active document. The previous handle is kept if `path`
    /// fails to load.
    pub fn open_document(&mut self, path: &Path) -> Result<OpenedDocument> {
        let doc = self
            .pdfium
            .load_pdf_from_file(path, None)
            .map_err(|e| open_err(path, e))?;
        let page_count = doc.pages().len() as usize;
        let outline = Self::extract_outline(doc.bookmarks().root().as_ref(), 0);
        self.active_doc = Some(doc);

        tracing::info!(path = %path.display(), page_count, "opened document");
        Ok(OpenedDocument {
            path: path.to_path_buf(),
            page_count,
            outline,
        })
    }

    fn extract_outline(parent: Option<&PdfBookmark>, depth: usize) -> Vec<OutlineEntry> {
        let mut result = Vec::new();
        let mut current = parent.and_then(PdfBookmark::first_child);

        while let Some(bm) = current {
            let page_index = bm
                .destination()
                .and_then(|dest| dest.page_index().ok())
                .map_or(0, |idx| idx as usize);
            result.push(OutlineEntry {
                title: bm.title().unwrap_or_default(),
                page_index,
                depth,
            });
            result.extend(Self::extract_outline(Some(&bm), depth + 1));
            current = bm.next_sibling();
        }
        result
    }

    fn document(&self) -> Result<&PdfDocument<'a>> {
        self.active_doc.as_ref().ok_or(Error::NoDocument)
    }

    fn page(&self, page_index: usize) -> Result<PdfPage<'_>> {
        let doc = self.document()?;
        let total = doc.pages().len() as usize;
        if page_index >= total {
            return Err(Error::PageOutOfRange {
                page: page_index + 1,
                total,
            });
        }
        doc.pages()
            .get(page_index as PdfPageIndex)
            .map_err(pdfium_err)
    }

    /// Rasterizes a page at 72 dpi times `zoom`.
    pub fn render_page(&self, page_index: usize, zoom: f32) -> Result<RenderedPage> {
        let started = Instant::now();
        let page = self.page(page_index)?;

        let render_config = PdfRenderConfig::new()
            .set_target_width((page.width().value * zoom).round() as i32)
            .set_maximum_height((page.height().value * zoom).round() as i32);

        let bitmap = page
            .render_with_config(&render_config)
            .map_err(pdfium_err)?;

        let width = bitmap.width() as u32;
        let height = bitmap.height() as u32;
        let pixels = bitmap.as_rgba_bytes().to_vec();

        tracing::debug!(
            page_index,
            zoom,
            width,
            height,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "rendered page"
        );
        Ok(RenderedPage {
            page_index,
            zoom,
            width,
            height,
            pixels: Arc::new(pixels),
        })
    }

    pub fn extract_text(&self, page_index: usize) -> Result<String> {
        let page = self.page(page_index)?;
        let text = page.text().map_err(pdfium_err)?;
        Ok(text_or_fallback(text.to_string()))
    }

    /// First page containing `query` and the area of every match on it.
    pub fn search(&self, query: &str) -> Result<Option<PageMatches>> {
        let pages = self.document()?.pages();
        let texts = pages.iter().enumerate().map(|(idx, page)| {
            let text = page.text().map(|t| t.to_string()).unwrap_or_default();
            (idx, text)
        });
        let Some(page_index) = first_matching_page(texts, query) else {
            tracing::info!(query, "search found nothing");
            return Ok(None);
        };

        let page = self.page(page_index)?;
        let text = page.text().map_err(pdfium_err)?;
        let found = text
            .search(query, &PdfSearchOptions::new())
            .map_err(pdfium_err)?;
        let mut matches = Vec::new();
        while let Some(segments) = found.find_next() {
            let bounds: Vec<HighlightRect> = segments
                .iter()
                .map(|segment| {
                    let bounds = segment.bounds();
                    HighlightRect {
                        left: bounds.left().value,
                        bottom: bounds.bottom().value,
                        right: bounds.right().value,
                        top: bounds.top().value,
                    }
                })
                .collect();
            matches.push(bounds);
        }
        let rects = match_rects(matches);

        tracing::info!(query, page_index, hits = rects.len(), "search matched");
        Ok(Some(PageMatches { page_index, rects }))
    }
}

/// Extraction result, or [`NO_TEXT_FALLBACK`] when it is blank.
pub fn text_or_fallback(text: String) -> String {
    if text.trim().is_empty() {
        NO_TEXT_FALLBACK.to_string()
    } else {
        text
    }
}
