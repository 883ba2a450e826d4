//! Page-render state machine.
//!
//! The viewer state is a plain value. Every UI action that touches the page
//! index, the zoom factor or the bookmarks goes through [`reduce`], which
//! returns the next state together with a flag telling the caller whether the
//! current page has to be rasterized again.

use std::path::PathBuf;

use thiserror::Error;

use crate::bookmarks::Bookmarks;

pub const ZOOM_STEP: f32 = 1.2;
pub const DEFAULT_ZOOM: f32 = 1.0;

/// Descriptor of the document currently held by the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedDocument {
    pub path: PathBuf,
    pub page_count: usize,
    /// Bumped on every open or reload so stale render replies can be dropped.
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewerState {
    pub document: Option<LoadedDocument>,
    pub page_index: usize,
    pub zoom: f32,
    pub default_zoom: f32,
    pub bookmarks: Bookmarks,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self::new(DEFAULT_ZOOM)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    /// A new file was opened.
    Opened { path: PathBuf, page_count: usize },
    /// A derived file replaced the active document. `page_index` is where the
    /// view should land, clamped to the new page count.
    Reloaded {
        path: PathBuf,
        page_count: usize,
        page_index: usize,
    },
    NextPage,
    PreviousPage,
    FirstPage,
    LastPage,
    /// 0-based target, clamped.
    GoToPage(usize),
    ZoomIn,
    ZoomOut,
    ResetZoom,
    AddBookmark(String),
    RemoveBookmark(String),
    GoToBookmark(String),
}

/// Rejected transitions. The state is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    #[error("a bookmark named \"{0}\" already exists")]
    DuplicateBookmark(String),
    #[error("no bookmark named \"{0}\"")]
    UnknownBookmark(String),
    #[error("bookmark name cannot be empty")]
    EmptyBookmarkName,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: ViewerState,
    pub render: bool,
}

impl Transition {
    fn unchanged(state: &ViewerState) -> Self {
        Self {
            state: state.clone(),
            render: false,
        }
    }
}

impl ViewerState {
    pub fn new(default_zoom: f32) -> Self {
        Self {
            document: None,
            page_index: 0,
            zoom: default_zoom,
            default_zoom,
            bookmarks: Bookmarks::new(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.document.is_some()
    }

    pub fn page_count(&self) -> usize {
        self.document.as_ref().map_or(0, |d| d.page_count)
    }

    pub fn generation(&self) -> u64 {
        self.document.as_ref().map_or(0, |d| d.generation)
    }

    /// "Page N of M", or an empty label without a document.
    pub fn page_label(&self) -> String {
        match &self.document {
            Some(doc) => format!("Page {} of {}", self.page_index + 1, doc.page_count),
            None => String::new(),
        }
    }

    /// Whether a bitmap rendered for `(generation, page_index, zoom)` still
    /// matches what should be on screen.
    pub fn is_current(&self, generation: u64, page_index: usize, zoom: f32) -> bool {
        self.is_loaded()
            && generation == self.generation()
            && page_index == self.page_index
            && (zoom - self.zoom).abs() <= f32::EPSILON * self.zoom.max(1.0)
    }

    fn last_index(&self) -> usize {
        self.page_count().saturating_sub(1)
    }

    fn with_page(&self, target: usize) -> Transition {
        let target = target.min(self.last_index());
        if target == self.page_index {
            return Transition::unchanged(self);
        }
        Transition {
            state: Self {
                page_index: target,
                ..self.clone()
            },
            render: true,
        }
    }

    fn with_zoom(&self, zoom: f32) -> Transition {
        Transition {
            state: Self {
                zoom,
                ..self.clone()
            },
            render: true,
        }
    }
}

/// Computes the state that follows `event`.
///
/// Page-level events are no-ops while no document is loaded.
pub fn reduce(state: &ViewerState, event: ViewEvent) -> Result<Transition, ViewError> {
    let transition = match event {
        ViewEvent::Opened { path, page_count } => Transition {
            state: ViewerState {
                document: Some(LoadedDocument {
                    path,
                    page_count,
                    generation: state.generation() + 1,
                }),
                page_index: 0,
                bookmarks: Bookmarks::new(),
                ..state.clone()
            },
            render: page_count > 0,
        },
        ViewEvent::Reloaded {
            path,
            page_count,
            page_index,
        } => Transition {
            state: ViewerState {
                document: Some(LoadedDocument {
                    path,
                    page_count,
                    generation: state.generation() + 1,
                }),
                page_index: page_index.min(page_count.saturating_sub(1)),
                ..state.clone()
            },
            render: page_count > 0,
        },
        _ if !state.is_loaded() => Transition::unchanged(state),
        ViewEvent::NextPage => state.with_page(state.page_index.saturating_add(1)),
        ViewEvent::PreviousPage => state.with_page(state.page_index.saturating_sub(1)),
        ViewEvent::FirstPage => state.with_page(0),
        ViewEvent::LastPage => state.with_page(state.last_index()),
        ViewEvent::GoToPage(index) => state.with_page(index),
        ViewEvent::ZoomIn => state.with_zoom(state.zoom * ZOOM_STEP),
        ViewEvent::ZoomOut => state.with_zoom(state.zoom / ZOOM_STEP),
        ViewEvent::ResetZoom => state.with_zoom(state.default_zoom),
        ViewEvent::AddBookmark(name) => Transition {
            state: ViewerState {
                bookmarks: state.bookmarks.add(&name, state.page_index)?,
                ..state.clone()
            },
            render: false,
        },
        ViewEvent::RemoveBookmark(name) => Transition {
            state: ViewerState {
                bookmarks: state.bookmarks.remove(&name)?,
                ..state.clone()
            },
            render: false,
        },
        ViewEvent::GoToBookmark(name) => state.with_page(state.bookmarks.get(&name)?),
    };
    Ok(transition)
}
