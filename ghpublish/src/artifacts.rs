//! Enumeration of the fetched artifact tree.
//!
//! Artifacts are laid out as `<root>/<target>/<stage>/<file>`, one directory
//! per build target.

use crate::error::{PublishError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// List every artifact file, targets and files both in name order.
pub fn collect_artifacts(root: &Path, stage: &str) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(PublishError::Config(format!(
            "Artifact directory not found: {}",
            root.display()
        )));
    }

    let mut files = Vec::new();
    for target in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let target = target.map_err(walk_error)?;
        if !target.file_type().is_dir() {
            tracing::debug!("Skipping non-directory {}", target.path().display());
            continue;
        }

        let stage_dir = target.path().join(stage);
        if !stage_dir.is_dir() {
            return Err(PublishError::Config(format!(
                "No '{}' directory under target {}",
                stage,
                target.path().display()
            )));
        }

        let before = files.len();
        for entry in WalkDir::new(&stage_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(walk_error)?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        tracing::info!(
            "Found {} artifact(s) in {}",
            files.len() - before,
            stage_dir.display()
        );
    }

    Ok(files)
}

/// Basenames of `paths`, in the same order.
pub fn file_names(paths: &[PathBuf]) -> Vec<&str> {
    paths
        .iter()
        .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
        .collect()
}

fn walk_error(err: walkdir::Error) -> PublishError {
    match err.into_io_error() {
        Some(io) => PublishError::Io(io),
        None => PublishError::Config("Filesystem loop in artifact directory".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"artifact").unwrap();
    }

    #[test]
    fn test_collects_in_deterministic_order() {
        let dir = tempdir().unwrap();
        write(dir.path(), "Windows_64/Build/pkg_1.2.3.4_win64.nipkg");
        write(dir.path(), "Windows_32/Build/pkg_1.2.3.4_win32.nipkg.sig");
        write(dir.path(), "Windows_32/Build/pkg_1.2.3.4_win32.nipkg");
        write(dir.path(), "Windows_32/Build/lib.lvlibp");

        let files = collect_artifacts(dir.path(), "Build").unwrap();
        assert_eq!(
            file_names(&files),
            vec![
                "lib.lvlibp",
                "pkg_1.2.3.4_win32.nipkg",
                "pkg_1.2.3.4_win32.nipkg.sig",
                "pkg_1.2.3.4_win64.nipkg",
            ]
        );
    }

    #[test]
    fn test_ignores_other_stages_and_nested_dirs() {
        let dir = tempdir().unwrap();
        write(dir.path(), "Linux/Build/pkg_1.0.0.0.ipk");
        write(dir.path(), "Linux/Test/report_9.9.9.9.xml");
        write(dir.path(), "Linux/Build/nested/inner_1.0.0.0.ipk");
        fs::write(dir.path().join("stray.txt"), b"x").unwrap();

        let files = collect_artifacts(dir.path(), "Build").unwrap();
        assert_eq!(file_names(&files), vec!["pkg_1.0.0.0.ipk"]);
    }

    #[test]
    fn test_missing_stage_directory() {
        let dir = tempdir().unwrap();
        write(dir.path(), "Linux/Other/pkg_1.0.0.0.ipk");
        assert!(matches!(
            collect_artifacts(dir.path(), "Build"),
            Err(PublishError::Config(_))
        ));
    }

    #[test]
    fn test_missing_root() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            collect_artifacts(&dir.path().join("artifacts"), "Build"),
            Err(PublishError::Config(_))
        ));
    }
}
