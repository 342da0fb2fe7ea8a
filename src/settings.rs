use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::artwork::{ArtworkError, ArtworkSettings, Rgb};

mod app_settings;

pub use crate::settings::app_settings::{AppSettings, SETTINGS_PATH_ENV};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct PlayerSettings {
    /// Base directory for every relative resource path
    pub resource_dir: PathBuf,
    pub window: WindowSettings,
    pub artwork: ArtworkSettings,
    pub theme: ThemeSettings,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ThemeSettings {
    pub text_color: Rgb,
    pub secondary_text_color: Rgb,
    pub accent_color: Rgb,
    pub title_button_hover_color: Rgb,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        PlayerSettings {
            resource_dir: PathBuf::from("res"),
            window: WindowSettings::default(),
            artwork: ArtworkSettings::default(),
            theme: ThemeSettings::default(),
        }
    }
}

impl Default for WindowSettings {
    fn default() -> Self {
        WindowSettings {
            title: String::from(env!("CARGO_PKG_NAME")),
            width: 530,
            height: 700,
        }
    }
}

impl Default for ThemeSettings {
    fn default() -> Self {
        ThemeSettings {
            text_color: Rgb::new(255, 255, 255),
            secondary_text_color: Rgb::new(200, 200, 200),
            accent_color: Rgb::new(233, 236, 239),
            title_button_hover_color: Rgb::new(0, 100, 182),
        }
    }
}

impl PlayerSettings {
    /// Full path of the album cover
    pub fn cover_path(&self) -> PathBuf {
        self.resource_dir.join(&self.artwork.cover_path)
    }

    /// Size of the area the background is painted on
    pub fn viewport(&self) -> (u32, u32) {
        (self.window.width, self.window.height)
    }

    /// Checks the settings for values the artwork pipeline would reject,
    /// so misconfigurations surface before any file is touched.
    pub fn validate(&self) -> Result<(), ArtworkError> {
        let invalid = |msg: &str| Err(ArtworkError::InvalidParameter(msg.into()));
        let artwork = &self.artwork;

        if self.window.width == 0 || self.window.height == 0 {
            return invalid("Window size must not be zero");
        }
        if artwork.cover_size == 0 {
            return invalid("Cover size must not be zero");
        }
        if !artwork.corner_radius.is_finite() || artwork.corner_radius < 0.0 {
            return invalid("Corner radius must be a finite, non-negative number");
        }
        if artwork.color_count < 1 {
            return invalid("Color count must be at least 1");
        }
        if artwork.quality < 1 {
            return invalid("Quality must be at least 1");
        }
        if artwork.background_enabled {
            let required = artwork.gradient.required_colors();
            let actual = artwork.color_count as usize;
            if actual < required {
                return Err(ArtworkError::InsufficientPalette { required, actual });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::path::Path;

    use super::*;

    #[test]
    fn defaults_are_valid() {
        let settings = PlayerSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.viewport(), (530, 700));
        assert_eq!(settings.artwork.base_color, Rgb::new(18, 18, 18));
        assert_eq!(settings.cover_path(), Path::new("res").join("img/album-cover-test.jpg"));
    }

    #[test]
    fn absolute_cover_path_ignores_resource_dir() {
        let mut settings = PlayerSettings::default();
        let absolute = std::env::temp_dir().join("cover.png");
        settings.artwork.cover_path = absolute.clone();
        assert_eq!(settings.cover_path(), absolute);
    }

    #[test]
    fn background_needs_three_colors() {
        let mut settings = PlayerSettings::default();
        settings.artwork.color_count = 2;
        assert!(matches!(
            settings.validate(),
            Err(ArtworkError::InsufficientPalette { required: 3, actual: 2 })
        ));

        settings.artwork.background_enabled = false;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn slot_order_raises_required_colors() {
        let mut settings = PlayerSettings::default();
        settings.artwork.gradient.slot_order = [0, 4, 1];
        settings.artwork.color_count = 4;
        assert!(matches!(
            settings.validate(),
            Err(ArtworkError::InsufficientPalette { required: 5, actual: 4 })
        ));

        settings.artwork.color_count = 5;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn rejects_invalid_values() {
        let cases: [fn(&mut PlayerSettings); 5] = [
            |s| s.artwork.color_count = 0,
            |s| s.artwork.quality = 0,
            |s| s.artwork.corner_radius = -2.0,
            |s| s.artwork.cover_size = 0,
            |s| s.window.height = 0,
        ];
        for change in cases {
            let mut settings = PlayerSettings::default();
            change(&mut settings);
            assert!(matches!(settings.validate(), Err(ArtworkError::InvalidParameter(_))));
        }
    }

    #[test]
    fn partial_json_uses_defaults() {
        let json = r##"{ "artwork": { "corner_radius": 12.5 }, "theme": { "text_color": "#101010" } }"##;
        let settings: PlayerSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.artwork.corner_radius, 12.5);
        assert_eq!(settings.artwork.color_count, 3);
        assert_eq!(settings.theme.text_color, Rgb::new(16, 16, 16));
        assert_eq!(settings.window, WindowSettings::default());
    }

    #[test]
    fn invalid_theme_color_is_rejected() {
        let json = r#"{ "theme": { "accent_color": "not a color" } }"#;
        assert!(serde_json::from_str::<PlayerSettings>(json).is_err());
    }
}
