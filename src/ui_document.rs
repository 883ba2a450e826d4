use iced::widget::scrollable::{Direction, Scrollbar};
use iced::widget::{Space, button, column, container, row, scrollable, text, text_input};
use iced::{Element, Length};

use crate::app::PdfDeskApp;
use crate::message::Message;
use crate::prompt::PromptKind;
use crate::ui_prompt::prompt_view;

fn render_toolbar(app: &PdfDeskApp) -> Element<'_, Message> {
    let row1 = row![
        button("Open").on_press(Message::OpenDocument),
        button("☰").on_press(Message::ToggleSidebar),
        Space::new().width(Length::Fixed(10.0)),
        button("-").on_press(Message::ZoomOut),
        text(format!("{}%", (app.viewer.zoom * 100.0).round() as u32)),
        button("+").on_press(Message::ZoomIn),
        button("1:1").on_press(Message::ResetZoom),
        Space::new().width(Length::Fixed(10.0)),
        button("↻ Rotate").on_press(Message::RotateCurrentPage),
        button("Text").on_press(Message::ExtractText),
        button("Search").on_press(Message::ShowPrompt(PromptKind::Search)),
        Space::new().width(Length::Fill),
        button("?").on_press(Message::ToggleKeyboardHelp),
        button("⚙").on_press(Message::OpenSettings),
    ]
    .spacing(5)
    .align_y(iced::Alignment::Center);

    let row2 = row![
        button("Bookmark").on_press(Message::ShowPrompt(PromptKind::AddBookmark)),
        button("Annotate").on_press(Message::ShowPrompt(PromptKind::Annotate)),
        button("Image").on_press(Message::ShowPrompt(PromptKind::InsertImage)),
        Space::new().width(Length::Fixed(10.0)),
        button("Merge").on_press(Message::Merge),
        button("Split").on_press(Message::ShowPrompt(PromptKind::Split)),
        button("Encrypt").on_press(Message::ShowPrompt(PromptKind::Encrypt)),
        button("Decrypt").on_press(Message::ShowPrompt(PromptKind::Decrypt)),
    ]
    .spacing(5)
    .align_y(iced::Alignment::Center);

    column![row1, row2].spacing(10).padding(10).into()
}

fn render_page_nav(app: &PdfDeskApp) -> Element<'_, Message> {
    let status = app.status_message.as_ref().map_or_else(
        || row![],
        |msg| {
            row![
                Space::new().width(Length::Fill),
                text(msg).size(12),
                button("×").on_press(Message::ClearStatus).padding(2),
            ]
        },
    );

    row![
        button("Prev").on_press(Message::PrevPage),
        text(app.viewer.page_label()),
        button("Next").on_press(Message::NextPage),
        Space::new().width(Length::Fixed(20.0)),
        text_input("Go to page", &app.page_input)
            .on_input(Message::PageInputChanged)
            .on_submit(Message::PageInputSubmitted)
            .width(Length::Fixed(80.0)),
        status,
    ]
    .spacing(5)
    .padding(5)
    .align_y(iced::Alignment::Center)
    .into()
}

fn render_sidebar(app: &PdfDeskApp) -> Element<'_, Message> {
    let mut sidebar_col = column![].spacing(10).padding(5).width(Length::Fixed(180.0));

    if !app.outline.is_empty() {
        sidebar_col = sidebar_col.push(text("Outline").size(14));
        for entry in &app.outline {
            let indent = Space::new().width(Length::Fixed(entry.depth as f32 * 10.0));
            sidebar_col = sidebar_col.push(row![
                indent,
                button(text(&entry.title).size(12))
                    .on_press(Message::JumpToPage(entry.page_index))
                    .width(Length::Fill),
            ]);
        }
    }

    sidebar_col = sidebar_col.push(text("Bookmarks").size(14));
    if app.viewer.bookmarks.is_empty() {
        sidebar_col = sidebar_col.push(text("None yet").size(12));
    }
    for (name, page_index) in app.viewer.bookmarks.iter() {
        sidebar_col = sidebar_col.push(row![
            button(text(format!("{name} (p. {})", page_index + 1)).size(12))
                .on_press(Message::GoToBookmark(name.to_string()))
                .width(Length::Fill),
            button("×").on_press(Message::RemoveBookmark(name.to_string())),
        ]);
    }

    scrollable(sidebar_col).width(Length::Fixed(180.0)).into()
}

fn render_text_panel(text_content: &str) -> Element<'_, Message> {
    column![
        row![
            text("Page text").size(18),
            Space::new().width(Length::Fill),
            button("Copy").on_press(Message::CopyText),
            button("Close").on_press(Message::CloseText),
        ]
        .spacing(5),
        scrollable(text(text_content).width(Length::Fill)).height(Length::Fill),
    ]
    .spacing(10)
    .padding(10)
    .into()
}

fn render_page(app: &PdfDeskApp) -> Element<'_, Message> {
    let Some(page) = &app.page_image else {
        return container(text(if app.viewer.page_count() == 0 {
            "No pages"
        } else {
            "Loading..."
        }))
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into();
    };

    let img = iced::widget::Image::new(page.handle.clone())
        .width(Length::Fixed(page.width as f32))
        .height(Length::Fixed(page.height as f32));

    scrollable(container(img).padding(10))
        .direction(Direction::Both {
            vertical: Scrollbar::new(),
            horizontal: Scrollbar::new(),
        })
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

pub fn document_view(app: &PdfDeskApp) -> Element<'_, Message> {
    let main_content = if let Some(prompt) = &app.prompt {
        prompt_view(prompt)
    } else if let Some(extracted) = &app.extracted_text {
        render_text_panel(extracted)
    } else {
        render_page(app)
    };

    let content: Element<'_, Message> = if app.show_sidebar {
        row![render_sidebar(app), main_content].into()
    } else {
        main_content
    };

    column![render_toolbar(app), render_page_nav(app), content].into()
}
