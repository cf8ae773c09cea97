use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

pub mod desktop;
pub mod themes;

/// A catalog producer. Scanning never fails as a whole: unreadable
/// directories and files are logged and skipped.
pub trait Source {
    type Item;

    fn scan(&self) -> Vec<Self::Item>;
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{path:?} has no [Desktop Entry] group")]
    MissingEntryGroup { path: PathBuf },
}

/// Files directly inside `dir` with the given extension, in file name order.
/// Symlinks count as the file they point at.
pub(crate) fn files_with_extension(dir: &Path, extension: &str) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                log::debug!("Skipping unreadable entry in {:?}: {}", dir, err);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().and_then(|s| s.to_str()) == Some(extension))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn lists_matching_files_sorted_and_skips_subdirectories() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join("b.desktop"), "").unwrap();
        fs::write(tmp.path().join("a.desktop"), "").unwrap();
        fs::write(tmp.path().join("c.txt"), "").unwrap();
        fs::create_dir(tmp.path().join("nested.desktop")).unwrap();

        let files = files_with_extension(tmp.path(), "desktop");
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.desktop", "b.desktop"]);
    }

    #[test]
    fn symlinked_files_are_listed_and_dangling_links_skipped() {
        let tmp = tempdir().unwrap();
        let store = tmp.path().join("store");
        let dir = tmp.path().join("apps");
        fs::create_dir_all(&store).unwrap();
        fs::create_dir_all(&dir).unwrap();
        fs::write(store.join("real.desktop"), "").unwrap();
        std::os::unix::fs::symlink(store.join("real.desktop"), dir.join("linked.desktop")).unwrap();
        std::os::unix::fs::symlink(store.join("absent.desktop"), dir.join("dangling.desktop")).unwrap();

        assert_eq!(files_with_extension(&dir, "desktop"), vec![dir.join("linked.desktop")]);
    }

    #[test]
    fn missing_directory_yields_nothing() {
        let tmp = tempdir().unwrap();
        assert!(files_with_extension(&tmp.path().join("absent"), "desktop").is_empty());
    }
}
