pub mod artwork;
pub mod settings;
