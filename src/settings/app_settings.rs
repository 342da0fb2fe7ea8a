use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// Overrides the location of the settings file
pub const SETTINGS_PATH_ENV: &str = "COVERGLOW_SETTINGS";

#[cfg(debug_assertions)]
static RELATIVE_SAVE_PATH: &str = concat!(env!("CARGO_PKG_NAME"), "/settings-dbg.json");

#[cfg(not(debug_assertions))]
static RELATIVE_SAVE_PATH: &str = concat!(env!("CARGO_PKG_NAME"), "/settings.json");

pub struct AppSettings<S> {
    save_path: PathBuf,
    settings: S,
}

fn get_default_save_path() -> Result<PathBuf> {
    if let Some(path) = std::env::var_os(SETTINGS_PATH_ENV) {
        return Ok(PathBuf::from(path));
    }
    let config_dir = dirs::config_dir().context("No configuration directory available")?;
    Ok(config_dir.join(RELATIVE_SAVE_PATH))
}

impl<S> AppSettings<S>
where
    S: Serialize + for<'de> Deserialize<'de> + Default + Send + Sync,
{
    pub fn default() -> Result<Arc<RwLock<Self>>> {
        let save_path = get_default_save_path()?;
        AppSettings::<S>::new(save_path)
    }

    pub fn new(save_path: impl Into<PathBuf>) -> Result<Arc<RwLock<Self>>> {
        let save_path = save_path.into();
        if let Some(parent) = save_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Could not create settings directory {:?}", parent))?;
        }
        let settings = Arc::new(RwLock::new(AppSettings {
            save_path,
            settings: S::default(),
        }));
        Ok(settings)
    }

    pub fn get_settings(&self) -> &S {
        &self.settings
    }

    pub fn get_settings_mut(&mut self) -> &mut S {
        &mut self.settings
    }

    pub fn save_path(&self) -> &PathBuf {
        &self.save_path
    }

    /// Writes the current settings to disk
    pub async fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.settings)?;
        tokio::fs::write(&self.save_path, json)
            .await
            .with_context(|| format!("Could not write settings to {:?}", self.save_path))?;
        Ok(())
    }

    /// Loads the settings from disk, overriding the currently loaded ones.
    /// Does nothing and returns false if the file doesn't exist.
    pub async fn load(&mut self) -> Result<bool> {
        let file_contents = tokio::fs::read(&self.save_path).await;
        let file_contents = match file_contents {
            Ok(res) => res,
            Err(e) => match e.kind() {
                std::io::ErrorKind::NotFound => return Ok(false),
                _ => bail!(e),
            },
        };
        self.settings = serde_json::from_slice::<S>(&file_contents)
            .with_context(|| format!("Invalid settings file {:?}", self.save_path))?;
        Ok(true)
    }
}
