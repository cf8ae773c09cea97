use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Exec marker of the pseudo entry that opens the theme list.
pub const THEME_SELECTOR_EXEC: &str = "theme_selector";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationEntry {
    pub name: String,          // Display name
    pub exec: String,          // Raw launch command, field codes included
    pub icon: Option<String>,  // Icon name/path
    pub about: Option<String>, // Comment line
}

impl ApplicationEntry {
    pub fn new(name: impl Into<String>, exec: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            exec: exec.into(),
            icon: None,
            about: None,
        }
    }

    /// The entry listed first in application mode that switches to themes.
    pub fn theme_selector() -> Self {
        Self {
            name: "HotSpot: Select Theme".to_string(),
            exec: THEME_SELECTOR_EXEC.to_string(),
            icon: Some("preferences-desktop-theme".to_string()),
            about: Some("Change application theme".to_string()),
        }
    }

    pub fn is_theme_selector(&self) -> bool {
        self.exec == THEME_SELECTOR_EXEC
    }
}

/// A stylesheet compiled into the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BundledTheme {
    pub file: &'static str,
    pub content: &'static str,
}

/// Where a theme's stylesheet lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThemeResource {
    Bundled(BundledTheme),
    File(PathBuf),
}

impl ThemeResource {
    pub fn read(&self) -> io::Result<String> {
        match self {
            ThemeResource::Bundled(bundled) => Ok(bundled.content.to_string()),
            ThemeResource::File(path) => fs::read_to_string(path),
        }
    }
}

impl fmt::Display for ThemeResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeResource::Bundled(bundled) => write!(f, "bundled:{}", bundled.file),
            ThemeResource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeEntry {
    pub name: String,         // Persistence key, file name without extension
    pub display_name: String, // Shown in the list
    pub resource: ThemeResource,
}

/// Shared view of anything the list can show.
pub trait ListEntry {
    fn label(&self) -> &str;
    fn secondary(&self) -> Option<&str>;

    /// `query` must already be lowercase.
    fn matches(&self, query: &str) -> bool {
        self.label().to_lowercase().contains(query)
            || self
                .secondary()
                .is_some_and(|text| text.to_lowercase().contains(query))
    }
}

impl ListEntry for ApplicationEntry {
    fn label(&self) -> &str {
        &self.name
    }

    fn secondary(&self) -> Option<&str> {
        self.about.as_deref()
    }
}

impl ListEntry for ThemeEntry {
    fn label(&self) -> &str {
        &self.display_name
    }

    fn secondary(&self) -> Option<&str> {
        Some(&self.name)
    }
}

/// One row as the UI shell renders it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayItem {
    pub label: String,
    pub secondary: Option<String>,
    pub icon: Option<String>,
    /// Row is the currently applied theme.
    pub active: bool,
}
