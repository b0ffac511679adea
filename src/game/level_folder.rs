//! Level discovery
//!
//! Lists the `*.txt` level files of a directory. When the directory cannot
//! be enumerated the list comes from the `manifest.txt` that build.rs writes
//! next to the levels.

use std::path::{Path, PathBuf};

pub const MANIFEST_FILE: &str = "manifest.txt";
const LEVEL_EXTENSION: &str = "txt";

/// A level file, not loaded yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelInfo {
    /// File name without extension
    pub name: String,
    pub path: PathBuf,
}

impl LevelInfo {
    fn from_path(path: PathBuf) -> Self {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "unnamed".to_string());
        Self { name, path }
    }
}

fn is_level_file(path: &Path) -> bool {
    path.extension().map_or(false, |e| e == LEVEL_EXTENSION)
        && path.file_name().map_or(false, |n| n != MANIFEST_FILE)
}

/// All levels in `dir`, sorted by name
pub fn discover_levels(dir: &Path) -> Vec<LevelInfo> {
    let mut levels = match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file() && is_level_file(p))
            .map(LevelInfo::from_path)
            .collect::<Vec<_>>(),
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "cannot list levels, trying manifest");
            load_manifest(dir)
        }
    };

    levels.sort_by(|a, b| a.name.cmp(&b.name));
    tracing::info!(count = levels.len(), dir = %dir.display(), "levels discovered");
    levels
}

fn load_manifest(dir: &Path) -> Vec<LevelInfo> {
    match std::fs::read_to_string(dir.join(MANIFEST_FILE)) {
        Ok(text) => parse_manifest(&text, dir),
        Err(e) => {
            tracing::error!(dir = %dir.display(), error = %e, "no level manifest");
            Vec::new()
        }
    }
}

/// One file name per line; blank lines and non-level names are skipped.
pub fn parse_manifest(text: &str, dir: &Path) -> Vec<LevelInfo> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| dir.join(line))
        .filter(|path| is_level_file(path))
        .map(LevelInfo::from_path)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_discover_sorted_txt_only() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b-level.txt"), "").unwrap();
        fs::write(dir.path().join("a-level.txt"), "").unwrap();
        fs::write(dir.path().join("notes.md"), "").unwrap();
        fs::write(dir.path().join(MANIFEST_FILE), "a-level.txt\n").unwrap();
        fs::create_dir(dir.path().join("sub.txt")).unwrap();

        let levels = discover_levels(dir.path());
        let names: Vec<_> = levels.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["a-level", "b-level"]);
        assert_eq!(levels[0].path, dir.path().join("a-level.txt"));
    }

    #[test]
    fn test_missing_dir_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(discover_levels(&dir.path().join("missing")).is_empty());
    }

    #[test]
    fn test_parse_manifest() {
        let levels = parse_manifest("intro.txt\n\n  cave.txt \nreadme.md\n", Path::new("levels"));
        assert_eq!(
            levels,
            vec![
                LevelInfo { name: "intro".to_string(), path: PathBuf::from("levels/intro.txt") },
                LevelInfo { name: "cave".to_string(), path: PathBuf::from("levels/cave.txt") },
            ]
        );
    }
}
