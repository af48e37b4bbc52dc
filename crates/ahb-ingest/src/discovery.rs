//! Discovery of format version directories and matching pruefid tables.
//!
//! Expected layout: `<root>/<FVYYMM>/<message_format>/csv/<pruefid>.csv`.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use ahb_model::FormatVersion;
use tracing::warn;

use crate::error::{IngestError, Result};

/// Environment variable overriding the default input root.
pub const INPUT_DIR_ENV_VAR: &str = "AHB_DIFF_INPUT_DIR";
const DEFAULT_INPUT_DIR: &str = "data/machine-readable_anwendungshandbuecher";
const CSV_DIR: &str = "csv";

/// Two adjacent format versions, `previous` being the older one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionPair {
    pub previous: FormatVersion,
    pub subsequent: FormatVersion,
}

impl VersionPair {
    /// Output directory name, newest version first (e.g. `FV2504_FV2410`).
    pub fn dir_name(&self) -> String {
        format!("{}_{}", self.subsequent, self.previous)
    }
}

/// A pruefid table present in both versions of a pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedFile {
    pub previous_path: PathBuf,
    pub subsequent_path: PathBuf,
    pub message_format: String,
    pub pruefid: String,
}

/// Location of a single pruefid table within one format version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PruefidFile {
    pub path: PathBuf,
    pub message_format: String,
}

pub fn default_input_root() -> PathBuf {
    if let Ok(root) = std::env::var(INPUT_DIR_ENV_VAR) {
        return PathBuf::from(root);
    }
    PathBuf::from(DEFAULT_INPUT_DIR)
}

/// Format versions found under `root`, latest first.
pub fn format_versions(root: &Path) -> Result<Vec<FormatVersion>> {
    let mut versions = Vec::new();
    for path in read_dir_sorted(root)? {
        if !path.is_dir() {
            continue;
        }
        let Some(name) = file_name(&path) else {
            continue;
        };
        if !FormatVersion::is_format_version_name(&name) {
            continue;
        }
        match FormatVersion::parse(&name) {
            Ok(version) => versions.push(version),
            Err(error) => warn!(path = %path.display(), %error, "skipping directory"),
        }
    }
    versions.sort_by(|a, b| b.cmp(a));
    Ok(versions)
}

/// Message format directories of one format version that contain a `csv/` directory.
pub fn message_format_dirs(format_version_dir: &Path) -> Result<Vec<PathBuf>> {
    Ok(read_dir_sorted(format_version_dir)?
        .into_iter()
        .filter(|path| path.is_dir() && path.join(CSV_DIR).is_dir())
        .collect())
}

fn has_message_formats(root: &Path, version: &FormatVersion) -> bool {
    let dir = root.join(version.as_str());
    dir.is_dir() && message_format_dirs(&dir).is_ok_and(|dirs| !dirs.is_empty())
}

/// Pairs of adjacent format versions, latest pair first.
///
/// Pairs where either side has no message format directories are skipped.
pub fn consecutive_pairs(root: &Path) -> Result<Vec<VersionPair>> {
    let versions = format_versions(root)?;
    let mut pairs = Vec::new();
    for window in versions.windows(2) {
        let pair = VersionPair {
            subsequent: window[0].clone(),
            previous: window[1].clone(),
        };
        if !has_message_formats(root, &pair.subsequent) || !has_message_formats(root, &pair.previous)
        {
            warn!(
                subsequent = %pair.subsequent,
                previous = %pair.previous,
                "skipping empty consecutive format versions"
            );
            continue;
        }
        pairs.push(pair);
    }
    Ok(pairs)
}

/// Every combination of an older and a newer format version, oldest
/// `previous` first and then by `subsequent`.
///
/// Versions without message format directories take part in no pair.
pub fn all_pairs(root: &Path) -> Result<Vec<VersionPair>> {
    let mut versions = Vec::new();
    for version in format_versions(root)? {
        if has_message_formats(root, &version) {
            versions.push(version);
        } else {
            warn!(format_version = %version, "skipping empty format version");
        }
    }
    versions.reverse();

    let mut pairs = Vec::new();
    for (idx, previous) in versions.iter().enumerate() {
        for subsequent in &versions[idx + 1..] {
            pairs.push(VersionPair {
                previous: previous.clone(),
                subsequent: subsequent.clone(),
            });
        }
    }
    Ok(pairs)
}

/// Lists all CSV files in a directory.
///
/// Returns files sorted by filename.
pub fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    Ok(read_dir_sorted(dir)?
        .into_iter()
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
        })
        .collect())
}

fn pruefid_files(message_format_dir: &Path) -> Result<BTreeMap<String, PathBuf>> {
    let csv_dir = message_format_dir.join(CSV_DIR);
    if !csv_dir.is_dir() {
        return Ok(BTreeMap::new());
    }
    Ok(list_csv_files(&csv_dir)?
        .into_iter()
        .filter_map(|path| file_stem(&path).map(|stem| (stem, path)))
        .collect())
}

fn message_formats_by_name(format_version_dir: &Path) -> Result<BTreeMap<String, PathBuf>> {
    Ok(message_format_dirs(format_version_dir)?
        .into_iter()
        .filter_map(|path| file_name(&path).map(|name| (name, path)))
        .collect())
}

/// Pruefid tables present in both versions of `pair`, sorted by message
/// format and then by pruefid.
pub fn matching_files(root: &Path, pair: &VersionPair) -> Result<Vec<MatchedFile>> {
    let previous = message_formats_by_name(&root.join(pair.previous.as_str()))?;
    let subsequent = message_formats_by_name(&root.join(pair.subsequent.as_str()))?;

    let mut matches = Vec::new();
    for (message_format, previous_dir) in &previous {
        let Some(subsequent_dir) = subsequent.get(message_format) else {
            continue;
        };
        let mut previous_files = pruefid_files(previous_dir)?;
        let mut subsequent_files = pruefid_files(subsequent_dir)?;
        let common: BTreeSet<String> = previous_files
            .keys()
            .filter(|pruefid| subsequent_files.contains_key(*pruefid))
            .cloned()
            .collect();
        for pruefid in common {
            let (Some(previous_path), Some(subsequent_path)) = (
                previous_files.remove(&pruefid),
                subsequent_files.remove(&pruefid),
            ) else {
                continue;
            };
            matches.push(MatchedFile {
                previous_path,
                subsequent_path,
                message_format: message_format.clone(),
                pruefid,
            });
        }
    }
    Ok(matches)
}

/// All pruefids available in one format version, sorted and deduplicated.
pub fn available_pruefids(root: &Path, version: &FormatVersion) -> Result<Vec<String>> {
    let dir = root.join(version.as_str());
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut pruefids = BTreeSet::new();
    for message_format_dir in message_format_dirs(&dir)? {
        pruefids.extend(pruefid_files(&message_format_dir)?.into_keys());
    }
    Ok(pruefids.into_iter().collect())
}

/// Finds the table of `pruefid` in any message format of `version`.
pub fn find_pruefid_file(
    root: &Path,
    version: &FormatVersion,
    pruefid: &str,
) -> Result<Option<PruefidFile>> {
    let dir = root.join(version.as_str());
    if !dir.is_dir() {
        return Ok(None);
    }
    for message_format_dir in message_format_dirs(&dir)? {
        if let Some(path) = pruefid_files(&message_format_dir)?.remove(pruefid) {
            return Ok(Some(PruefidFile {
                path,
                message_format: file_name(&message_format_dir).unwrap_or_default(),
            }));
        }
    }
    Ok(None)
}

fn read_dir_sorted(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }
    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::directory_read(dir, e))?;
    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| IngestError::directory_read(dir, e))?;
        paths.push(entry.path());
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(paths)
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
}

fn file_stem(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "Segmentname\nKopf\n").unwrap();
    }

    #[test]
    fn test_format_versions_latest_first() {
        let dir = TempDir::new().unwrap();
        for name in ["FV2410", "FV2504", "FV2310", "FVXX01", "notes"] {
            std::fs::create_dir_all(dir.path().join(name)).unwrap();
        }
        std::fs::write(dir.path().join("FV2604"), "not a dir").unwrap();

        let versions = format_versions(dir.path()).unwrap();
        let tags: Vec<&str> = versions.iter().map(FormatVersion::as_str).collect();
        assert_eq!(tags, vec!["FV2504", "FV2410", "FV2310"]);
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing");
        assert!(matches!(
            format_versions(&missing),
            Err(IngestError::DirectoryNotFound { .. })
        ));
    }

    #[test]
    fn test_message_format_dirs_require_csv_dir() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "UTILMD/csv/55001.csv");
        std::fs::create_dir_all(dir.path().join("MSCONS/flatahb")).unwrap();

        let dirs = message_format_dirs(dir.path()).unwrap();
        assert_eq!(dirs.len(), 1);
        assert!(dirs[0].ends_with("UTILMD"));
    }

    #[test]
    fn test_list_csv_files_sorted_case_insensitive() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "b.CSV");
        touch(dir.path(), "a.csv");
        touch(dir.path(), "c.json");
        let files = list_csv_files(dir.path()).unwrap();
        let names: Vec<String> = files.iter().filter_map(|p| file_name(p)).collect();
        assert_eq!(names, vec!["a.csv", "b.CSV"]);
    }
}
