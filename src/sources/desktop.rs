use crate::model::ApplicationEntry;
use crate::sources::{files_with_extension, Source, SourceError};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use log::{debug, info};

const DESKTOP_EXTENSION: &str = "desktop";
const ENTRY_GROUP: &str = "[Desktop Entry]";

/// Scans desktop-entry directories in the given order.
pub struct DesktopSource {
    pub dirs: Vec<PathBuf>,
}

impl DesktopSource {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }
}

impl Source for DesktopSource {
    type Item = ApplicationEntry;

    fn scan(&self) -> Vec<ApplicationEntry> {
        load_applications(&self.dirs)
    }
}

/// Reads every `.desktop` file in `search_paths`, keeping the first entry
/// seen for each name and each exec, sorted case-insensitively by name.
pub fn load_applications<P: AsRef<Path>>(search_paths: &[P]) -> Vec<ApplicationEntry> {
    let mut entries = Vec::new();
    let mut seen_names = HashSet::new();
    let mut seen_execs = HashSet::new();

    for dir in search_paths {
        let dir = dir.as_ref();
        debug!("Scanning desktop files in {:?}", dir);

        for path in files_with_extension(dir, DESKTOP_EXTENSION) {
            let entry = match read_desktop_file(&path) {
                Ok(Some(entry)) => entry,
                Ok(None) => continue,
                Err(err) => {
                    debug!("Skipping desktop file: {}", err);
                    continue;
                }
            };

            if seen_names.contains(&entry.name) || seen_execs.contains(&entry.exec) {
                debug!("Duplicate entry {:?} in {:?}", entry.name, path);
                continue;
            }
            seen_names.insert(entry.name.clone());
            seen_execs.insert(entry.exec.clone());
            entries.push(entry);
        }
    }

    // Stable: equal names keep discovery order.
    entries.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

    info!("DesktopSource: found {} entries", entries.len());
    entries
}

fn read_desktop_file(path: &Path) -> Result<Option<ApplicationEntry>, SourceError> {
    let content = fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let fields = entry_group(&content).ok_or_else(|| SourceError::MissingEntryGroup {
        path: path.to_path_buf(),
    })?;
    Ok(entry_from_fields(&fields))
}

/// Key/value pairs of the `[Desktop Entry]` group, or `None` if the file has
/// no such group.
fn entry_group(content: &str) -> Option<HashMap<&str, &str>> {
    let mut fields = HashMap::new();
    let mut found = false;
    let mut in_group = false;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if line.starts_with('[') {
            in_group = line == ENTRY_GROUP;
            found |= in_group;
            continue;
        }

        if !in_group {
            continue;
        }

        if let Some((key, value)) = line.split_once('=') {
            fields.insert(key.trim(), value.trim());
        }
    }

    found.then_some(fields)
}

fn entry_from_fields(fields: &HashMap<&str, &str>) -> Option<ApplicationEntry> {
    let flag = |key: &str| fields.get(key).is_some_and(|v| is_true(v));
    if flag("NoDisplay") || flag("Hidden") {
        return None;
    }

    let name = fields.get("Name").copied().unwrap_or_default();
    let exec = fields.get("Exec").copied().unwrap_or_default();
    if name.is_empty() || exec.is_empty() {
        return None;
    }

    let optional = |key: &str| {
        fields
            .get(key)
            .filter(|v| !v.is_empty())
            .map(|v| v.to_string())
    };

    Some(ApplicationEntry {
        name: name.to_string(),
        exec: exec.to_string(),
        icon: optional("Icon"),
        about: optional("Comment"),
    })
}

/// Anything but empty, `0` or `false` counts as set.
fn is_true(value: &str) -> bool {
    let value = value.trim();
    !(value.is_empty() || value == "0" || value.eq_ignore_ascii_case("false"))
}
