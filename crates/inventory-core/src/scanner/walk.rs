use glob::Pattern;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, error};
use walkdir::WalkDir;

/// Entries found directly under a source directory.
#[derive(Debug, Default)]
pub struct Discovery {
    /// Files to ingest, sorted by file name.
    pub sources: Vec<PathBuf>,
    /// Everything else: other extensions, ignored files, subdirectories.
    pub skipped: Vec<PathBuf>,
}

/// Lists the direct children of `dir` and splits them into ingestible source
/// files and skipped entries. The extension match is exact and case-sensitive.
pub fn discover_source_files(
    dir: &Path,
    extension: &str,
    ignore_globs: &[String],
) -> io::Result<Discovery> {
    let ignore_patterns: Vec<Pattern> = ignore_globs
        .iter()
        .filter_map(|glob| match Pattern::new(glob) {
            Ok(p) => Some(p),
            Err(e) => {
                error!("Invalid glob pattern '{}': {}", glob, e);
                None
            }
        })
        .collect();

    let mut discovery = Discovery::default();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|err| {
            let kind = err.io_error().map(|e| e.kind()).unwrap_or(io::ErrorKind::Other);
            io::Error::new(
                kind,
                format!("Error reading directory {}: {}", dir.display(), err),
            )
        })?;
        let path = entry.into_path();

        let is_source = path.is_file()
            && path.extension().and_then(|e| e.to_str()) == Some(extension)
            && !ignore_patterns.iter().any(|p| {
                p.matches_path(&path)
                    || path
                        .file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(|n| p.matches(n))
            });

        if is_source {
            discovery.sources.push(path);
        } else {
            debug!("Skipping {}", path.display());
            discovery.skipped.push(path);
        }
    }

    Ok(discovery)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_only_matching_extension_is_a_source() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("sales.csv"), "a\n1\n").unwrap();
        fs::write(dir.path().join("purchases.csv"), "a\n1\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "hello").unwrap();
        fs::write(dir.path().join("LOUD.CSV"), "a\n1\n").unwrap();
        fs::create_dir(dir.path().join("archive.csv")).unwrap();

        let discovery = discover_source_files(dir.path(), "csv", &[]).unwrap();
        assert_eq!(names(&discovery.sources), ["purchases.csv", "sales.csv"]);
        assert_eq!(discovery.skipped.len(), 3);
    }

    #[test]
    fn test_ignore_patterns_match_file_names() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("sales.csv"), "a\n1\n").unwrap();
        fs::write(dir.path().join("sales_backup.csv"), "a\n1\n").unwrap();

        let ignore = vec!["*_backup*".to_string(), "[".to_string()];
        let discovery = discover_source_files(dir.path(), "csv", &ignore).unwrap();
        assert_eq!(names(&discovery.sources), ["sales.csv"]);
        assert_eq!(names(&discovery.skipped), ["sales_backup.csv"]);
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(discover_source_files(&missing, "csv", &[]).is_err());
    }
}
