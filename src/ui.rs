use crate::PdfDeskApp;
use crate::ui_document::document_view;
use crate::ui_keyboard_help::keyboard_help_view;
use crate::ui_prompt::prompt_view;
use crate::ui_settings::settings_view;
use crate::ui_welcome::welcome_view;
use iced::Element;

pub fn view(app: &PdfDeskApp) -> Element<'_, crate::Message> {
    if app.show_keyboard_help {
        return keyboard_help_view(app);
    }

    if app.show_settings {
        return settings_view(app);
    }

    if !app.viewer.is_loaded() {
        return app.prompt.as_ref().map_or_else(|| welcome_view(app), prompt_view);
    }

    document_view(app)
}
