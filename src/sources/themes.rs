use crate::model::{BundledTheme, ThemeEntry, ThemeResource};
use crate::settings::{SettingsStore, CURRENT_THEME_KEY};
use crate::sources::{files_with_extension, Source};
use crate::style::Style;
use std::io;
use std::path::{Path, PathBuf};
use log::{debug, info, warn};
use thiserror::Error;

pub const THEME_EXTENSION: &str = "theme";

pub const BUNDLED_THEMES: &[BundledTheme] = &[
    BundledTheme {
        file: "gruvbox_dark.theme",
        content: include_str!("../../themes/gruvbox_dark.theme"),
    },
    BundledTheme {
        file: "gruvbox_light.theme",
        content: include_str!("../../themes/gruvbox_light.theme"),
    },
    BundledTheme {
        file: "nord.theme",
        content: include_str!("../../themes/nord.theme"),
    },
    BundledTheme {
        file: "solarized_dark.theme",
        content: include_str!("../../themes/solarized_dark.theme"),
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThemeLocation {
    Bundled(&'static [BundledTheme]),
    Directory(PathBuf),
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("no themes available")]
    NoThemes,
    #[error("failed to load theme file {resource}: {source}")]
    Read {
        resource: String,
        #[source]
        source: io::Error,
    },
    #[error("invalid theme file {resource}: {source}")]
    Parse {
        resource: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Result of a successful apply.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedTheme {
    pub name: String,
    pub style: Style,
}

pub struct ThemeSource {
    pub locations: Vec<ThemeLocation>,
}

impl ThemeSource {
    pub fn new(locations: Vec<ThemeLocation>) -> Self {
        Self { locations }
    }
}

impl Source for ThemeSource {
    type Item = ThemeEntry;

    fn scan(&self) -> Vec<ThemeEntry> {
        load_themes(&self.locations)
    }
}

/// Collects themes in location order. Names are not deduplicated.
pub fn load_themes(locations: &[ThemeLocation]) -> Vec<ThemeEntry> {
    let mut themes = Vec::new();

    for location in locations {
        match location {
            ThemeLocation::Bundled(bundled) => {
                for theme in bundled.iter() {
                    if let Some(name) = base_name(Path::new(theme.file)) {
                        debug!("Found theme: {} at bundled:{}", name, theme.file);
                        themes.push(theme_entry(name, ThemeResource::Bundled(*theme)));
                    }
                }
            }
            ThemeLocation::Directory(dir) => {
                let dir = match std::path::absolute(dir) {
                    Ok(dir) => dir,
                    Err(err) => {
                        warn!("Skipping theme directory {:?}: {}", dir, err);
                        continue;
                    }
                };
                debug!("Scanning themes in {:?}", dir);
                for path in files_with_extension(&dir, THEME_EXTENSION) {
                    if let Some(name) = base_name(&path) {
                        debug!("Found filesystem theme: {} at {:?}", name, path);
                        themes.push(theme_entry(name, ThemeResource::File(path)));
                    }
                }
            }
        }
    }

    if themes.is_empty() {
        warn!("No themes found");
    }
    info!("ThemeSource: found {} themes", themes.len());
    themes
}

/// File name up to the first dot.
fn base_name(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    let name = file_name.split('.').next().unwrap_or(file_name);
    (!name.is_empty()).then(|| name.to_string())
}

fn theme_entry(name: String, resource: ThemeResource) -> ThemeEntry {
    ThemeEntry {
        display_name: display_name(&name),
        name,
        resource,
    }
}

pub fn display_name(name: &str) -> String {
    name.replace('_', " ")
        .replace(THEME_EXTENSION, "")
        .trim()
        .to_string()
}

/// Picks the theme called `requested` (or the first theme), loads its style
/// and persists its name. Nothing is persisted when loading fails.
///
/// The settings store is flushed before returning. A failed flush is logged
/// and the apply still succeeds: the style is active and the in-memory
/// setting holds the new name, so a later flush can still write it.
pub fn apply_theme<S: SettingsStore + ?Sized>(
    catalog: &[ThemeEntry],
    requested: &str,
    settings: &mut S,
) -> Result<AppliedTheme, ThemeError> {
    let theme = match catalog.iter().find(|t| t.name == requested) {
        Some(theme) => theme,
        None => {
            let first = catalog.first().ok_or(ThemeError::NoThemes)?;
            warn!("Theme {:?} not found, falling back to {:?}", requested, first.name);
            first
        }
    };

    let content = theme.resource.read().map_err(|source| ThemeError::Read {
        resource: theme.resource.to_string(),
        source,
    })?;
    let style = Style::parse(&content).map_err(|source| ThemeError::Parse {
        resource: theme.resource.to_string(),
        source,
    })?;

    settings.set_value(CURRENT_THEME_KEY, &theme.name);
    if let Err(err) = settings.sync() {
        warn!("Failed to persist theme {:?}: {}", theme.name, err);
    }

    info!("Theme applied: {}", theme.name);
    Ok(AppliedTheme {
        name: theme.name.clone(),
        style,
    })
}
