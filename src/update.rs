use std::path::PathBuf;
use std::sync::Arc;

use iced::Task;
use iced::widget::image as iced_image;
use pdfdesk::commands::EditJob;
use pdfdesk::edit::{self, Placement};
use pdfdesk::page_range::parse_ranges_for;
use pdfdesk::search::PageMatches;
use pdfdesk::storage;
use pdfdesk::viewer::ViewEvent;

use crate::app::{PageImage, PdfDeskApp, file_name, save_dialog};
use crate::message::Message;
use crate::prompt::{Prompt, PromptKind};

pub fn handle_message(app: &mut PdfDeskApp, message: Message) -> Task<Message> {
    match message {
        Message::OpenDocument => PdfDeskApp::pick_pdf(),
        Message::OpenFile(path) => app.open_path(path, None),
        Message::DocumentLoaded { result, reload_at } => match result {
            Ok(opened) => {
                tracing::info!(path = %opened.path.display(), pages = opened.page_count, "document loaded");
                app.outline = opened.outline;
                let event = match reload_at {
                    None => ViewEvent::Opened {
                        path: opened.path,
                        page_count: opened.page_count,
                    },
                    Some(page_index) => ViewEvent::Reloaded {
                        path: opened.path,
                        page_count: opened.page_count,
                        page_index,
                    },
                };
                if opened.page_count == 0 {
                    app.page_image = None;
                }
                app.apply(event)
            }
            Err(e) => PdfDeskApp::error_dialog("Could not open document", &e),
        },
        Message::PageRendered { generation, result } => match result {
            Ok(page) => {
                if !app.viewer.is_current(generation, page.page_index, page.zoom) {
                    tracing::debug!(page = page.page_index, "dropping stale render");
                    return Task::none();
                }
                let pixels = Arc::try_unwrap(page.pixels).unwrap_or_else(|shared| (*shared).clone());
                app.page_image = Some(PageImage {
                    handle: iced_image::Handle::from_rgba(page.width, page.height, pixels),
                    width: page.width,
                    height: page.height,
                });
                Task::none()
            }
            Err(e) => {
                if generation != app.viewer.generation() {
                    return Task::none();
                }
                PdfDeskApp::error_dialog("Could not render page", &e)
            }
        },

        Message::NextPage => app.apply(ViewEvent::NextPage),
        Message::PrevPage => app.apply(ViewEvent::PreviousPage),
        Message::FirstPage => app.apply(ViewEvent::FirstPage),
        Message::LastPage => app.apply(ViewEvent::LastPage),
        Message::JumpToPage(page_index) => app.apply(ViewEvent::GoToPage(page_index)),
        Message::PageInputChanged(value) => {
            app.page_input = value;
            Task::none()
        }
        Message::PageInputSubmitted => match app.page_input.trim().parse::<usize>() {
            Ok(page) => app.apply(ViewEvent::GoToPage(page.saturating_sub(1))),
            Err(_) => {
                app.status_message = Some(format!("\"{}\" is not a page number", app.page_input.trim()));
                app.page_input = (app.viewer.page_index + 1).to_string();
                Task::none()
            }
        },
        Message::ZoomIn => app.apply(ViewEvent::ZoomIn),
        Message::ZoomOut => app.apply(ViewEvent::ZoomOut),
        Message::ResetZoom => app.apply(ViewEvent::ResetZoom),

        Message::ExtractText => {
            if !app.viewer.is_loaded() {
                return Task::none();
            }
            let engine = app.engine.clone();
            let page_index = app.viewer.page_index;
            Task::perform(
                async move { engine.extract_text(page_index).await.map_err(|e| e.to_string()) },
                Message::TextExtracted,
            )
        }
        Message::TextExtracted(result) => match result {
            Ok(text) => {
                app.extracted_text = Some(text);
                Task::none()
            }
            Err(e) => PdfDeskApp::error_dialog("Could not extract text", &e),
        },
        Message::CopyText => {
            if let Some(text) = &app.extracted_text {
                match arboard::Clipboard::new().and_then(|mut c| c.set_text(text.clone())) {
                    Ok(()) => app.status_message = Some("Text copied to clipboard".into()),
                    Err(e) => {
                        tracing::warn!("clipboard unavailable: {e}");
                        app.status_message = Some(format!("Could not copy: {e}"));
                    }
                }
            }
            Task::none()
        }
        Message::CloseText => {
            app.extracted_text = None;
            Task::none()
        }

        Message::PasswordRequired(path) => {
            tracing::info!(path = %path.display(), "document needs a password");
            app.prompt = Some(Prompt::unlock(path));
            Task::none()
        }
        Message::ShowPrompt(kind) => {
            if app.viewer.is_loaded() || kind == PromptKind::Decrypt {
                app.prompt = Some(Prompt::new(kind, app.viewer.page_index + 1));
            }
            Task::none()
        }
        Message::PromptInput(field, value) => {
            if let Some(prompt) = app.prompt.as_mut() {
                prompt.set(field, value);
            }
            Task::none()
        }
        Message::CancelPrompt => {
            app.prompt = None;
            Task::none()
        }
        Message::SubmitPrompt => match app.prompt.take() {
            Some(prompt) => submit_prompt(app, prompt),
            None => Task::none(),
        },

        Message::GoToBookmark(name) => app.apply(ViewEvent::GoToBookmark(name)),
        Message::RemoveBookmark(name) => app.apply(ViewEvent::RemoveBookmark(name)),

        Message::Merge => app.merge(),
        Message::RotateCurrentPage => {
            let page_index = app.viewer.page_index;
            app.save_then_edit("rotate", "rotated", Some(page_index), move |input, output| {
                EditJob::Rotate {
                    input,
                    page_number: page_number(page_index),
                    output,
                }
            })
        }
        Message::SearchFinished { query, result } => match result {
            Ok(Some(matches)) => highlight_matches(app, query, matches),
            Ok(None) => {
                app.status_message = Some(format!("\"{query}\" not found"));
                Task::none()
            }
            Err(e) => PdfDeskApp::error_dialog("Search failed", &e),
        },
        Message::EditFinished {
            action,
            reload_at,
            result,
        } => match result {
            Ok(outcome) => {
                if let (true, Some(page_index), Some(output)) =
                    (outcome.reload, reload_at, outcome.outputs.first())
                {
                    return app.open_path(output.clone(), Some(page_index));
                }
                let names: Vec<String> = outcome.outputs.iter().map(|p| file_name(p)).collect();
                tracing::info!(action, outputs = ?names, "edit finished");
                app.status_message = Some(format!("Saved {}", names.join(", ")));
                Task::none()
            }
            Err(e) => PdfDeskApp::error_dialog(&format!("Could not {action}"), &e),
        },

        Message::OpenSettings => {
            app.show_settings = true;
            Task::none()
        }
        Message::CloseSettings => {
            app.show_settings = false;
            Task::none()
        }
        Message::SaveSettings(settings) => {
            let settings = settings.sanitized();
            app.dark = settings.theme.is_dark();
            app.viewer.default_zoom = settings.default_zoom;
            storage::save_settings(&settings);
            app.settings = settings;
            Task::none()
        }
        Message::ToggleSidebar => {
            app.show_sidebar = !app.show_sidebar;
            Task::none()
        }
        Message::ToggleKeyboardHelp => {
            app.show_keyboard_help = !app.show_keyboard_help;
            Task::none()
        }
        Message::ClearStatus => {
            app.status_message = None;
            Task::none()
        }
        Message::DialogClosed => Task::none(),
        Message::WindowCloseRequested => {
            app.engine.close();
            iced::exit()
        }
    }
}

fn page_number(page_index: usize) -> u32 {
    u32::try_from(page_index + 1).unwrap_or(u32::MAX)
}

fn submit_prompt(app: &mut PdfDeskApp, prompt: Prompt) -> Task<Message> {
    let text = prompt.text.clone();
    match prompt.kind {
        PromptKind::AddBookmark => app.apply(ViewEvent::AddBookmark(text)),
        PromptKind::Search => {
            if text.trim().is_empty() {
                return Task::none();
            }
            let engine = app.engine.clone();
            Task::perform(
                {
                    let query = text.clone();
                    async move { engine.search(query).await.map_err(|e| e.to_string()) }
                },
                move |result| Message::SearchFinished {
                    query: text,
                    result,
                },
            )
        }
        PromptKind::Encrypt | PromptKind::Decrypt if text.is_empty() => {
            app.status_message = Some("Password cannot be empty".into());
            Task::none()
        }
        PromptKind::Encrypt => app.save_then_edit("encrypt", "encrypted", None, move |input, output| {
            EditJob::Encrypt {
                input,
                password: text,
                output,
            }
        }),
        PromptKind::Decrypt => decrypt(app, prompt.source, text),
        PromptKind::Split => match parse_ranges_for(&text, app.viewer.page_count()) {
            Ok(ranges) => app.save_then_edit("split", "split", None, move |input, base| {
                let outputs = edit::split_output_paths(&base, ranges.len());
                EditJob::Split {
                    input,
                    ranges,
                    outputs,
                }
            }),
            Err(e) => {
                tracing::warn!("{e}");
                app.status_message = Some(e.to_string());
                Task::none()
            }
        },
        PromptKind::Annotate => match checked_placement(app, &prompt) {
            Some(at) => app.save_then_edit(
                "annotate",
                "annotated",
                Some(at.page_number as usize - 1),
                move |input, output| EditJob::StampText {
                    input,
                    at,
                    text,
                    output,
                },
            ),
            None => Task::none(),
        },
        PromptKind::InsertImage => match checked_placement(app, &prompt) {
            Some(at) => insert_image(app, at),
            None => Task::none(),
        },
    }
}

/// Parsed placement, or `None` after reporting why. A page outside the
/// document is only logged.
fn checked_placement(app: &mut PdfDeskApp, prompt: &Prompt) -> Option<Placement> {
    let at = match prompt.placement() {
        Ok(at) => at,
        Err(e) => {
            app.status_message = Some(e);
            return None;
        }
    };
    let page_count = app.viewer.page_count();
    if at.page_number == 0 || at.page_number as usize > page_count {
        tracing::warn!(page = at.page_number, page_count, "placement outside document, ignoring");
        return None;
    }
    Some(at)
}

/// Writes an unlocked copy of `source`, the open document, or a file picked
/// now, in that order. PDFium never has to open the input.
fn decrypt(app: &PdfDeskApp, source: Option<PathBuf>, password: String) -> Task<Message> {
    let source = source.or_else(|| app.viewer.document.as_ref().map(|doc| doc.path.clone()));
    let engine = app.engine.clone();
    Task::perform(
        async move {
            let input = match source {
                Some(path) => path,
                None => rfd::AsyncFileDialog::new()
                    .set_title("Choose the PDF to decrypt")
                    .add_filter("PDF", &["pdf"])
                    .pick_file()
                    .await?
                    .path()
                    .to_path_buf(),
            };
            let output = save_dialog(&edit::derived_path(&input, "decrypted")).await?;
            let job = EditJob::Decrypt {
                input,
                password,
                output,
            };
            Some(engine.edit(job).await.map_err(|e| e.to_string()))
        },
        |result| match result {
            Some(result) => Message::EditFinished {
                action: "decrypt",
                reload_at: None,
                result,
            },
            None => Message::DialogClosed,
        },
    )
}

fn insert_image(app: &PdfDeskApp, at: Placement) -> Task<Message> {
    let Some(doc) = &app.viewer.document else {
        return Task::none();
    };
    let input = doc.path.clone();
    let suggested = edit::derived_path(&input, "image");
    let engine = app.engine.clone();
    let reload_at = Some(at.page_number as usize - 1);
    Task::perform(
        async move {
            let image = rfd::AsyncFileDialog::new()
                .add_filter("Images", &["png", "jpg", "jpeg"])
                .pick_file()
                .await?
                .path()
                .to_path_buf();
            let output = save_dialog(&suggested).await?;
            let job = EditJob::StampImage {
                input,
                at,
                image,
                output,
            };
            Some(engine.edit(job).await.map_err(|e| e.to_string()))
        },
        move |result| match result {
            Some(result) => Message::EditFinished {
                action: "insert image",
                reload_at,
                result,
            },
            None => Message::DialogClosed,
        },
    )
}

/// Lands on the matched page, writing a highlighted copy first when there is
/// something to mark.
fn highlight_matches(app: &mut PdfDeskApp, query: String, matches: PageMatches) -> Task<Message> {
    let PageMatches { page_index, rects } = matches;
    if rects.is_empty() {
        return app.apply(ViewEvent::GoToPage(page_index));
    }
    app.save_then_edit("highlight", "highlighted", Some(page_index), move |input, output| {
        EditJob::Highlight {
            input,
            page_number: page_number(page_index),
            rects,
            note: query,
            output,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idle_app() -> PdfDeskApp {
        PdfDeskApp::new(None).0
    }

    #[test]
    fn decrypt_form_opens_without_a_document() {
        let mut app = idle_app();
        let _ = handle_message(&mut app, Message::ShowPrompt(PromptKind::Search));
        assert!(app.prompt.is_none());

        let _ = handle_message(&mut app, Message::ShowPrompt(PromptKind::Decrypt));
        let prompt = app.prompt.as_ref().unwrap();
        assert_eq!(prompt.kind, PromptKind::Decrypt);
        assert_eq!(prompt.source, None);
    }

    #[test]
    fn locked_file_leads_to_the_decrypt_form() {
        let mut app = idle_app();
        let locked = PathBuf::from("/tmp/statement.pdf");
        let _ = handle_message(&mut app, Message::PasswordRequired(locked.clone()));

        assert!(!app.viewer.is_loaded());
        let prompt = app.prompt.as_ref().unwrap();
        assert_eq!(prompt.kind, PromptKind::Decrypt);
        assert_eq!(prompt.source, Some(locked));
    }

    #[test]
    fn empty_password_is_refused_before_any_dialog() {
        let mut app = idle_app();
        let _ = handle_message(&mut app, Message::PasswordRequired(PathBuf::from("/tmp/a.pdf")));
        let _ = handle_message(&mut app, Message::SubmitPrompt);

        assert!(app.prompt.is_none());
        assert_eq!(app.status_message.as_deref(), Some("Password cannot be empty"));
    }
}
