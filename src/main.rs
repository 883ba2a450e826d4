// Prevent console window on Windows in release
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod message;
mod prompt;
mod ui;
mod ui_document;
mod ui_keyboard_help;
mod ui_prompt;
mod ui_settings;
mod ui_welcome;
mod update;

use std::path::PathBuf;

use mimalloc::MiMalloc;
use tracing_subscriber::EnvFilter;

use crate::app::PdfDeskApp;
pub use crate::message::Message;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

pub fn main() -> iced::Result {
    human_panic::setup_panic!();
    init_logging();

    let initial = std::env::args_os().nth(1).map(PathBuf::from);
    tracing::info!(file = ?initial, "starting pdfdesk");

    iced::application(move || PdfDeskApp::new(initial.clone()), PdfDeskApp::update, PdfDeskApp::view)
        .title(PdfDeskApp::title)
        .theme(PdfDeskApp::theme)
        .subscription(PdfDeskApp::subscription)
        .window(iced::window::Settings {
            size: iced::Size::new(1100.0, 850.0),
            exit_on_close_request: false,
            ..iced::window::Settings::default()
        })
        .run()
}
