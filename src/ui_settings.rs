use iced::widget::{Space, button, column, row, text};
use iced::{Alignment, Element, Length};
use pdfdesk::models::AppTheme;

const ZOOM_PRESETS: [f32; 5] = [0.75, 1.0, 1.25, 1.5, 2.0];

fn mark(label: String, selected: bool) -> String {
    if selected { format!("{label} ✓") } else { label }
}

pub fn settings_view(app: &crate::PdfDeskApp) -> Element<'_, crate::Message> {
    let theme_buttons = AppTheme::ALL.into_iter().fold(row![].spacing(10), |row, theme| {
        let mut s = app.settings.clone();
        s.theme = theme;
        row.push(
            button(text(mark(theme.to_string(), app.settings.theme == theme)))
                .on_press(crate::Message::SaveSettings(s)),
        )
    });

    let zoom_buttons = ZOOM_PRESETS.into_iter().fold(row![].spacing(10), |row, zoom| {
        let mut s = app.settings.clone();
        s.default_zoom = zoom;
        let selected = (app.settings.default_zoom - zoom).abs() < 0.001;
        row.push(
            button(text(mark(format!("{}%", (zoom * 100.0).round() as u32), selected)))
                .on_press(crate::Message::SaveSettings(s)),
        )
    });

    column![
        row![
            text("Settings").size(24),
            Space::new().width(Length::Fill),
            button("Close").on_press(crate::Message::CloseSettings),
        ]
        .padding(20),
        column![
            text("Appearance").size(18),
            theme_buttons.padding(10),
            Space::new().height(Length::Fixed(20.0)),
            text("Default zoom").size(18),
            zoom_buttons.padding(10),
            text("Used at startup and by Reset Zoom").size(12),
        ]
        .padding(20)
        .width(Length::Fixed(500.0))
    ]
    .align_x(Alignment::Center)
    .into()
}
