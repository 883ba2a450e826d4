//! Small input forms shown over the document before an action runs.

use std::path::PathBuf;

use pdfdesk::edit::Placement;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    AddBookmark,
    Search,
    Encrypt,
    Decrypt,
    Split,
    Annotate,
    InsertImage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptField {
    Text,
    Page,
    X,
    Y,
}

impl PromptKind {
    pub const fn title(self) -> &'static str {
        match self {
            Self::AddBookmark => "Add bookmark",
            Self::Search => "Search",
            Self::Encrypt => "Encrypt",
            Self::Decrypt => "Decrypt",
            Self::Split => "Split",
            Self::Annotate => "Add text annotation",
            Self::InsertImage => "Insert image",
        }
    }

    /// Label of the free-text field, if the form has one.
    pub const fn text_label(self) -> Option<&'static str> {
        match self {
            Self::AddBookmark => Some("Bookmark name"),
            Self::Search => Some("Search for"),
            Self::Encrypt | Self::Decrypt => Some("Password"),
            Self::Split => Some("Page ranges, e.g. 1-3,4,5-8"),
            Self::Annotate => Some("Annotation text"),
            Self::InsertImage => None,
        }
    }

    pub const fn is_secret(self) -> bool {
        matches!(self, Self::Encrypt | Self::Decrypt)
    }

    pub const fn has_placement(self) -> bool {
        matches!(self, Self::Annotate | Self::InsertImage)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub text: String,
    pub page: String,
    pub x: String,
    pub y: String,
    /// File the action reads instead of the open document.
    pub source: Option<PathBuf>,
}

impl Prompt {
    /// Placement fields start on the 1-based `current_page`.
    pub fn new(kind: PromptKind, current_page: usize) -> Self {
        Self {
            kind,
            text: String::new(),
            page: current_page.to_string(),
            x: "50".into(),
            y: "50".into(),
            source: None,
        }
    }

    /// Password form for a file that could not be opened.
    pub fn unlock(path: PathBuf) -> Self {
        Self {
            source: Some(path),
            ..Self::new(PromptKind::Decrypt, 1)
        }
    }

    pub fn set(&mut self, field: PromptField, value: String) {
        match field {
            PromptField::Text => self.text = value,
            PromptField::Page => self.page = value,
            PromptField::X => self.x = value,
            PromptField::Y => self.y = value,
        }
    }

    /// Page and top-left corner as typed. Range checks happen later.
    pub fn placement(&self) -> Result<Placement, String> {
        let page_number = self
            .page
            .trim()
            .parse::<u32>()
            .map_err(|_| format!("\"{}\" is not a page number", self.page.trim()))?;
        let coordinate = |label: &str, raw: &str| {
            raw.trim()
                .parse::<f32>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| format!("{label} must be a number, got \"{}\"", raw.trim()))
        };
        Ok(Placement {
            page_number,
            x: coordinate("x", &self.x)?,
            y: coordinate("y", &self.y)?,
        })
    }
}
