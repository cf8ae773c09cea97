use crate::sources::themes::{ThemeLocation, BUNDLED_THEMES};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use directories::{BaseDirs, ProjectDirs};
use anyhow::{Context, Result};
use std::fs;

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub sources: SourceConfig,
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub settings: SettingsConfig,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SourceConfig {
    /// Scanned in order; earlier directories win on duplicates.
    #[serde(default = "default_application_dirs")]
    pub application_dirs: Vec<PathBuf>,
    #[serde(default = "default_theme_dirs")]
    pub theme_dirs: Vec<PathBuf>,
    #[serde(default = "default_true")]
    pub bundled_themes: bool,
}

fn default_true() -> bool { true }

fn default_application_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![
        PathBuf::from("/usr/share/applications"),
        PathBuf::from("/usr/local/share/applications"),
    ];
    if let Some(base_dirs) = BaseDirs::new() {
        dirs.push(base_dirs.data_dir().join("applications"));
    }
    dirs
}

fn default_theme_dirs() -> Vec<PathBuf> {
    project_dirs()
        .map(|dirs| vec![dirs.config_dir().join("themes")])
        .unwrap_or_default()
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            application_dirs: default_application_dirs(),
            theme_dirs: default_theme_dirs(),
            bundled_themes: true,
        }
    }
}

impl SourceConfig {
    pub fn theme_locations(&self) -> Vec<ThemeLocation> {
        let mut locations = Vec::new();
        if self.bundled_themes {
            locations.push(ThemeLocation::Bundled(BUNDLED_THEMES));
        }
        locations.extend(self.theme_dirs.iter().cloned().map(ThemeLocation::Directory));
        locations
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct WindowConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_icon_size")]
    pub icon_size: u32,
    #[serde(default = "default_padding")]
    pub padding: f32,
    #[serde(default = "default_spacing")]
    pub spacing: f32,
    #[serde(default = "default_item_height")]
    pub item_height: f32,
    #[serde(default = "default_border_radius")]
    pub border_radius: f32,
    #[serde(default = "default_font_size")]
    pub font_size: f32,
}

fn default_width() -> u32 { 650 }
fn default_height() -> u32 { 500 }
fn default_icon_size() -> u32 { 26 }
fn default_padding() -> f32 { 16.0 }
fn default_spacing() -> f32 { 10.0 }
fn default_item_height() -> f32 { 44.0 }
fn default_border_radius() -> f32 { 12.0 }
fn default_font_size() -> f32 { 15.0 }

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            icon_size: default_icon_size(),
            padding: default_padding(),
            spacing: default_spacing(),
            item_height: default_item_height(),
            border_radius: default_border_radius(),
            font_size: default_font_size(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct SettingsConfig {
    pub path: Option<PathBuf>,
}

impl SettingsConfig {
    pub fn resolved_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(|| match project_dirs() {
            Some(dirs) => dirs.config_dir().join("settings.json"),
            None => PathBuf::from("settings.json"),
        })
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "hotspot", "hotspot")
}

pub fn default_config_path() -> PathBuf {
    match project_dirs() {
        Some(dirs) => dirs.config_dir().join("config.toml"),
        None => PathBuf::from("config.toml"),
    }
}

/// Reads `path` (or the default location). A missing file yields defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config_path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);

    if !config_path.exists() {
        log::debug!("No config at {:?}, using defaults", config_path);
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&config_path)
        .with_context(|| format!("reading {}", config_path.display()))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("parsing {}", config_path.display()))?;
    Ok(config)
}
