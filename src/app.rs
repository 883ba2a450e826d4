use std::path::{Path, PathBuf};

use iced::widget::image as iced_image;
use iced::{Element, Subscription, Task, Theme, event, keyboard};
use pdfdesk::commands::EditJob;
use pdfdesk::edit;
use pdfdesk::engine::{EngineHandle, spawn_engine_thread};
use pdfdesk::models::AppSettings;
use pdfdesk::pdf_engine::{OpenedDocument, OutlineEntry};
use pdfdesk::storage;
use pdfdesk::viewer::{Transition, ViewEvent, ViewerState, reduce};

use crate::message::Message;
use crate::prompt::Prompt;
use crate::ui;
use crate::update::handle_message;

/// Bitmap currently on screen.
pub struct PageImage {
    pub handle: iced_image::Handle,
    pub width: u32,
    pub height: u32,
}

pub struct PdfDeskApp {
    pub viewer: ViewerState,
    pub engine: EngineHandle,
    pub settings: AppSettings,
    pub dark: bool,
    pub page_image: Option<PageImage>,
    pub outline: Vec<OutlineEntry>,
    pub page_input: String,
    pub prompt: Option<Prompt>,
    pub extracted_text: Option<String>,
    pub status_message: Option<String>,
    pub show_settings: bool,
    pub show_sidebar: bool,
    pub show_keyboard_help: bool,
}

impl PdfDeskApp {
    pub fn new(initial: Option<PathBuf>) -> (Self, Task<Message>) {
        let settings = storage::load_settings();
        let app = Self {
            viewer: ViewerState::new(settings.default_zoom),
            engine: spawn_engine_thread(),
            dark: settings.theme.is_dark(),
            settings,
            page_image: None,
            outline: Vec::new(),
            page_input: String::new(),
            prompt: None,
            extracted_text: None,
            status_message: None,
            show_settings: false,
            show_sidebar: true,
            show_keyboard_help: false,
        };
        let task = initial.map_or_else(Task::none, |path| Task::done(Message::OpenFile(path)));
        (app, task)
    }

    pub fn title(&self) -> String {
        match &self.viewer.document {
            Some(doc) => format!("pdfdesk - {}", file_name(&doc.path)),
            None => "pdfdesk".to_string(),
        }
    }

    pub fn theme(&self) -> Theme {
        if self.dark { Theme::Dark } else { Theme::Light }
    }

    pub fn subscription(&self) -> Subscription<Message> {
        event::listen_with(|event, status, _window| {
            if let event::Event::Window(iced::window::Event::CloseRequested) = &event {
                return Some(Message::WindowCloseRequested);
            }
            if matches!(status, event::Status::Captured) {
                return None;
            }
            match event {
                event::Event::Keyboard(keyboard::Event::KeyPressed { key, .. }) => shortcut(&key),
                _ => None,
            }
        })
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        handle_message(self, message)
    }

    pub fn view(&self) -> Element<'_, Message> {
        ui::view(self)
    }

    /// Runs `event` through the reducer and renders if the page changed.
    pub fn apply(&mut self, event: ViewEvent) -> Task<Message> {
        match reduce(&self.viewer, event) {
            Ok(Transition { state, render }) => {
                if state.page_index != self.viewer.page_index || state.generation() != self.viewer.generation() {
                    self.extracted_text = None;
                }
                self.viewer = state;
                self.page_input = if self.viewer.is_loaded() {
                    (self.viewer.page_index + 1).to_string()
                } else {
                    String::new()
                };
                if render {
                    self.render_current_page()
                } else {
                    Task::none()
                }
            }
            Err(e) => {
                tracing::warn!("{e}");
                self.status_message = Some(e.to_string());
                Task::none()
            }
        }
    }

    pub fn render_current_page(&self) -> Task<Message> {
        if !self.viewer.is_loaded() {
            return Task::none();
        }
        let engine = self.engine.clone();
        let generation = self.viewer.generation();
        let (page_index, zoom) = (self.viewer.page_index, self.viewer.zoom);
        Task::perform(
            async move {
                engine
                    .render(page_index, zoom)
                    .await
                    .map_err(|e| e.to_string())
            },
            move |result| Message::PageRendered { generation, result },
        )
    }

    pub fn open_path(&self, path: PathBuf, reload_at: Option<usize>) -> Task<Message> {
        let engine = self.engine.clone();
        Task::perform(async move { engine.open(path).await }, move |result| {
            loaded_message(result, reload_at)
        })
    }

    /// Asks where to write `<stem>_<suffix>.pdf`, then runs the job built for
    /// that output on the engine thread. A cancelled dialog does nothing.
    pub fn save_then_edit<F>(
        &self,
        action: &'static str,
        suffix: &str,
        reload_at: Option<usize>,
        build: F,
    ) -> Task<Message>
    where
        F: FnOnce(PathBuf, PathBuf) -> EditJob + Send + 'static,
    {
        let Some(doc) = &self.viewer.document else {
            return Task::none();
        };
        let input = doc.path.clone();
        let suggested = edit::derived_path(&input, suffix);
        let engine = self.engine.clone();
        Task::perform(
            async move {
                let output = save_dialog(&suggested).await?;
                let job = build(input, output);
                Some(engine.edit(job).await.map_err(|e| e.to_string()))
            },
            move |result| match result {
                Some(result) => Message::EditFinished {
                    action,
                    reload_at,
                    result,
                },
                None => Message::DialogClosed,
            },
        )
    }

    pub fn merge(&self) -> Task<Message> {
        let engine = self.engine.clone();
        let suggested = self.viewer.document.as_ref().map_or_else(
            || PathBuf::from("merged.pdf"),
            |doc| edit::derived_path(&doc.path, "merged"),
        );
        Task::perform(
            async move {
                let inputs: Vec<PathBuf> = rfd::AsyncFileDialog::new()
                    .set_title("Choose PDFs to merge, in order")
                    .add_filter("PDF", &["pdf"])
                    .pick_files()
                    .await?
                    .iter()
                    .map(|f| f.path().to_path_buf())
                    .collect();
                let output = save_dialog(&suggested).await?;
                Some(
                    engine
                        .edit(EditJob::Merge { inputs, output })
                        .await
                        .map_err(|e| e.to_string()),
                )
            },
            |result| match result {
                Some(result) => Message::EditFinished {
                    action: "merge",
                    reload_at: None,
                    result,
                },
                None => Message::DialogClosed,
            },
        )
    }

    pub fn pick_pdf() -> Task<Message> {
        Task::perform(
            async {
                rfd::AsyncFileDialog::new()
                    .add_filter("PDF", &["pdf"])
                    .pick_file()
                    .await
                    .map(|f| f.path().to_path_buf())
            },
            |path| path.map_or(Message::DialogClosed, Message::OpenFile),
        )
    }

    pub fn error_dialog(title: &str, description: &str) -> Task<Message> {
        tracing::error!("{title}: {description}");
        let dialog = rfd::AsyncMessageDialog::new()
            .set_level(rfd::MessageLevel::Error)
            .set_title(title)
            .set_description(description)
            .set_buttons(rfd::MessageButtons::Ok);
        Task::perform(dialog.show(), |_| Message::DialogClosed)
    }
}

pub(crate) async fn save_dialog(suggested: &Path) -> Option<PathBuf> {
    let mut dialog = rfd::AsyncFileDialog::new()
        .add_filter("PDF", &["pdf"])
        .set_file_name(file_name(suggested));
    if let Some(dir) = suggested.parent().filter(|d| !d.as_os_str().is_empty()) {
        dialog = dialog.set_directory(dir);
    }
    dialog.save_file().await.map(|f| f.path().to_path_buf())
}

fn loaded_message(result: pdfdesk::Result<OpenedDocument>, reload_at: Option<usize>) -> Message {
    match result {
        Err(pdfdesk::Error::PasswordRequired(path)) => Message::PasswordRequired(path),
        result => Message::DocumentLoaded {
            result: result.map_err(|e| e.to_string()),
            reload_at,
        },
    }
}

pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().to_string())
}

fn shortcut(key: &keyboard::Key) -> Option<Message> {
    use keyboard::Key;
    use keyboard::key::Named;

    match key {
        Key::Named(Named::ArrowRight | Named::PageDown) => Some(Message::NextPage),
        Key::Named(Named::ArrowLeft | Named::PageUp) => Some(Message::PrevPage),
        Key::Named(Named::Home) => Some(Message::FirstPage),
        Key::Named(Named::End) => Some(Message::LastPage),
        Key::Named(Named::F1) => Some(Message::ToggleKeyboardHelp),
        Key::Character(c) => match c.as_str() {
            "+" | "=" => Some(Message::ZoomIn),
            "-" => Some(Message::ZoomOut),
            "0" => Some(Message::ResetZoom),
            "?" => Some(Message::ToggleKeyboardHelp),
            _ => None,
        },
        _ => None,
    }
}
