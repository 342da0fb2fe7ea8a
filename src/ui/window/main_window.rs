use anyhow::Result;
use coverglow::{
    artwork::{Artwork, Rgb},
    settings::PlayerSettings,
};
use slint::{Color, ComponentHandle, PhysicalPosition};

use crate::{
    callback,
    ui::{
        to_slint_image,
        window::{
            window_creation_settings::SettingsChangedGuard, get_window_creation_settings,
            SlintMainWindow,
        },
    },
};

pub struct MainWindow {
    ui: SlintMainWindow,
    // Keeps the window attributes in place until the window got shown
    _attributes_guard: SettingsChangedGuard,
}

fn to_slint_color(c: Rgb) -> Color {
    Color::from_rgb_u8(c.r, c.g, c.b)
}

impl MainWindow {
    /// Builds the player window from [settings], showing the given [artwork].
    pub fn new(settings: &PlayerSettings, artwork: Artwork) -> Result<Self> {
        let title = settings.window.title.clone();
        let attributes_guard = get_window_creation_settings().change(move |attr| {
            attr.with_resizable(false).with_title(title.clone())
        });
        let app = MainWindow {
            ui: SlintMainWindow::new()?,
            _attributes_guard: attributes_guard,
        };

        app.apply_settings(settings);
        app.set_artwork(&artwork);
        app.enable_app_quit();
        app.enable_window_positioning();
        app.setup_playback_callbacks();

        Ok(app)
    }

    /// Start the main window event loop and
    /// shows the window. Blocks until the window closes.
    pub fn run_blocking(&self) -> Result<()> {
        self.ui.show()?;
        log::info!("Showing player window");
        tokio::task::block_in_place(slint::run_event_loop)?;
        self.ui.hide()?;
        Ok(())
    }

    fn apply_settings(&self, settings: &PlayerSettings) {
        let ui = &self.ui;
        let window = &settings.window;
        ui.set_window_title(window.title.as_str().into());
        ui.set_window_width(window.width as f32);
        ui.set_window_height(window.height as f32);
        ui.set_cover_size(settings.artwork.cover_size as f32);
        ui.set_base_color(to_slint_color(settings.artwork.base_color));

        let theme = &settings.theme;
        ui.set_text_color(to_slint_color(theme.text_color));
        ui.set_secondary_text_color(to_slint_color(theme.secondary_text_color));
        ui.set_accent_color(to_slint_color(theme.accent_color));
        ui.set_title_button_hover_color(to_slint_color(theme.title_button_hover_color));
    }

    /// Displays the rounded cover and, if rendered, the palette background.
    pub fn set_artwork(&self, artwork: &Artwork) {
        self.ui.set_cover_img(to_slint_image(&artwork.cover));
        if let Some(background) = &artwork.background {
            self.ui.set_background_img(to_slint_image(background));
        }
    }

    /// Dragging the custom title bar reports the mouse offset in logical pixels
    fn enable_window_positioning(&self) {
        let app = &self.ui;
        callback!(on_move_window, |app, dx, dy| {
            let window = app.window();
            let scale = window.scale_factor();
            let pos = window.position();
            window.set_position(PhysicalPosition::new(
                pos.x + (dx * scale).round() as i32,
                pos.y + (dy * scale).round() as i32,
            ));
        });

        callback!(on_minimize, |app| {
            app.window().set_minimized(true);
        });
    }

    fn enable_app_quit(&self) {
        let _app = &self.ui;
        callback!(on_close_window, |_app| {
            if let Err(e) = slint::quit_event_loop() {
                log::error!("Could not quit event loop: {}", e);
            }
        });
    }

    fn setup_playback_callbacks(&self) {
        let app = &self.ui;
        callback!(on_toggle_play, |app| {
            let playing = !app.get_playing();
            app.set_playing(playing);
            log::debug!("Playback toggled: {}", playing);
        });

        let _app = &self.ui;
        callback!(on_previous_track, |_app| {
            log::debug!("Previous track requested");
        });
        callback!(on_next_track, |_app| {
            log::debug!("Next track requested");
        });
        callback!(on_show_menu, |_app| {
            log::debug!("Menu requested");
        });
    }
}
