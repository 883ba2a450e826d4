use iced::widget::{Space, button, column, container, row, text, text_input};
use iced::{Element, Length};

use crate::Message;
use crate::prompt::{Prompt, PromptField};

fn field<'a>(label: &'a str, value: &'a str, target: PromptField) -> Element<'a, Message> {
    row![
        text(label).width(Length::Fixed(60.0)),
        text_input(label, value)
            .on_input(move |v| Message::PromptInput(target, v))
            .on_submit(Message::SubmitPrompt)
            .width(Length::Fixed(100.0)),
    ]
    .spacing(10)
    .into()
}

pub fn prompt_view(prompt: &Prompt) -> Element<'_, Message> {
    let mut form = column![text(prompt.kind.title()).size(20)].spacing(10);

    if let Some(source) = &prompt.source {
        form = form.push(
            text(format!(
                "{} is password protected. Enter its password to save an unlocked copy.",
                crate::app::file_name(source)
            ))
            .size(12),
        );
    }

    if let Some(label) = prompt.kind.text_label() {
        form = form.push(
            text_input(label, &prompt.text)
                .on_input(|v| Message::PromptInput(PromptField::Text, v))
                .on_submit(Message::SubmitPrompt)
                .secure(prompt.kind.is_secret())
                .width(Length::Fixed(360.0)),
        );
    }

    if prompt.kind.has_placement() {
        form = form.push(text("Top-left corner in points, measured from the page's top-left").size(12));
        form = form.push(field("Page", &prompt.page, PromptField::Page));
        form = form.push(field("X", &prompt.x, PromptField::X));
        form = form.push(field("Y", &prompt.y, PromptField::Y));
    }

    form = form.push(
        row![
            Space::new().width(Length::Fill),
            button("Cancel").on_press(Message::CancelPrompt),
            button("OK").on_press(Message::SubmitPrompt),
        ]
        .spacing(10)
        .width(Length::Fixed(360.0)),
    );

    container(form.padding(20))
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}
