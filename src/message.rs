use std::path::PathBuf;

use pdfdesk::commands::EditOutcome;
use pdfdesk::models::AppSettings;
use pdfdesk::pdf_engine::{OpenedDocument, RenderedPage};
use pdfdesk::search::PageMatches;

use crate::prompt::{PromptField, PromptKind};

#[derive(Debug, Clone)]
pub enum Message {
    OpenDocument,
    OpenFile(PathBuf),
    /// `reload_at` is `None` for a fresh open and the landing page for a
    /// derived file.
    DocumentLoaded {
        result: Result<OpenedDocument, String>,
        reload_at: Option<usize>,
    },
    /// The file only opens with its password; offer a decrypted copy.
    PasswordRequired(PathBuf),
    PageRendered {
        generation: u64,
        result: Result<RenderedPage, String>,
    },

    NextPage,
    PrevPage,
    FirstPage,
    LastPage,
    JumpToPage(usize),
    PageInputChanged(String),
    PageInputSubmitted,
    ZoomIn,
    ZoomOut,
    ResetZoom,

    ExtractText,
    TextExtracted(Result<String, String>),
    CopyText,
    CloseText,

    ShowPrompt(PromptKind),
    PromptInput(PromptField, String),
    SubmitPrompt,
    CancelPrompt,

    GoToBookmark(String),
    RemoveBookmark(String),

    Merge,
    RotateCurrentPage,
    SearchFinished {
        query: String,
        result: Result<Option<PageMatches>, String>,
    },
    EditFinished {
        action: &'static str,
        reload_at: Option<usize>,
        result: Result<EditOutcome, String>,
    },

    OpenSettings,
    CloseSettings,
    SaveSettings(AppSettings),
    ToggleSidebar,
    ToggleKeyboardHelp,
    ClearStatus,
    /// A dialog was dismissed or cancelled. Nothing to do.
    DialogClosed,
    WindowCloseRequested,
}
