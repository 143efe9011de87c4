mod app;
mod event_handler;
mod input_handler;
mod state;
mod ui;
mod widgets;

pub use app::TuiApp;
