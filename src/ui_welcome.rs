use iced::widget::{Space, button, column, row, text};
use iced::{Alignment, Element, Length};

pub fn welcome_view(app: &crate::PdfDeskApp) -> Element<'_, crate::Message> {
    let status = app.status_message.as_ref().map_or_else(
        || row![],
        |msg| {
            row![
                text(msg).size(12),
                button("×").on_press(crate::Message::ClearStatus).padding(2),
            ]
            .spacing(5)
        },
    );

    column![
        row![
            text("pdfdesk").size(32).width(Length::Fill),
            button("?").on_press(crate::Message::ToggleKeyboardHelp),
            button("Settings").on_press(crate::Message::OpenSettings),
        ]
        .spacing(5)
        .padding(20),
        column![
            text("Open a PDF to start").size(24),
            Space::new().height(Length::Fixed(20.0)),
            row![
                button("Open PDF")
                    .on_press(crate::Message::OpenDocument)
                    .padding(10),
                button("Merge PDFs")
                    .on_press(crate::Message::Merge)
                    .padding(10),
                button("Decrypt PDF")
                    .on_press(crate::Message::ShowPrompt(crate::prompt::PromptKind::Decrypt))
                    .padding(10),
            ]
            .spacing(10),
            Space::new().height(Length::Fixed(20.0)),
            status,
        ]
        .align_x(Alignment::Center)
        .width(Length::Fill)
        .height(Length::Fill),
    ]
    .into()
}
