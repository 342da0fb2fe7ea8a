pub mod main_window;
pub mod window_creation_settings;

slint::include_modules!();

pub use crate::ui::window::main_window::MainWindow;
pub use crate::ui::window::window_creation_settings::get_window_creation_settings;
