// Prevent console window in addition to Slint window in Windows release builds when, e.g., starting the app via file manager. Ignored on other platforms.
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use anyhow::{Context, Result};
use coverglow::{
    artwork::load_artwork,
    settings::{AppSettings, PlayerSettings},
};

use crate::ui::{init_backend, window::MainWindow};

mod ui;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = AppSettings::<PlayerSettings>::default()?;
    let player_settings = {
        let mut sg = settings.write().await;
        if sg.load().await? {
            log::info!("Loaded settings from {:?}", sg.save_path());
        } else {
            sg.save().await?;
            log::info!("Created default settings at {:?}", sg.save_path());
        }
        sg.get_settings().clone()
    };
    player_settings.validate().context("Invalid settings")?;

    let cover_path = player_settings.cover_path();
    let artwork = load_artwork(
        cover_path.clone(),
        player_settings.artwork.clone(),
        player_settings.viewport(),
    )
    .await
    .with_context(|| format!("Could not load album cover {:?}", cover_path))?;

    init_backend()?;
    let app = MainWindow::new(&player_settings, artwork)?;
    app.run_blocking()?;
    Ok(())
}
