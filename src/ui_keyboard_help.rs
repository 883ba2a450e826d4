use iced::widget::{Space, button, column, container, text};
use iced::{Alignment, Element, Length};

pub fn keyboard_help_view(_app: &crate::PdfDeskApp) -> Element<'_, crate::Message> {
    let shortcuts = column![
        text("Keyboard Shortcuts").size(24),
        Space::new().height(Length::Fixed(20.0)),
        text("Navigation:").size(16),
        text("Right / Page Down - Next Page"),
        text("Left / Page Up - Previous Page"),
        text("Home/End - First/Last Page"),
        Space::new().height(Length::Fixed(10.0)),
        text("View:").size(16),
        text("+ - Zoom In"),
        text("- - Zoom Out"),
        text("0 - Reset Zoom"),
        Space::new().height(Length::Fixed(10.0)),
        text("Press ? or F1 to close this help").size(12),
    ]
    .padding(30)
    .align_x(Alignment::Center);

    container(column![
        button("Close")
            .on_press(crate::Message::ToggleKeyboardHelp)
            .padding(10),
        shortcuts,
    ])
    .width(Length::Fill)
    .height(Length::Fill)
    .center_x(Length::Fill)
    .center_y(Length::Fill)
    .into()
}
