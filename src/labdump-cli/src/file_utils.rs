//! File system helpers for locating samples

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

/// Files of a sixtysix sample directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SixtysixSample {
    pub file_a: PathBuf,
    pub file_b: PathBuf,
    pub file_c: Option<PathBuf>,
}

impl SixtysixSample {
    /// Find the `*.A`, `*.B` and optional `*.C` files directly inside `dir`
    pub fn resolve(dir: &Path) -> Result<Self> {
        let file_a = find_with_extension(dir, "A")?
            .with_context(|| format!("No *.A file in {}", dir.display()))?;
        let file_b = find_with_extension(dir, "B")?
            .with_context(|| format!("No *.B file in {}", dir.display()))?;
        let file_c = find_with_extension(dir, "C")?;

        Ok(Self {
            file_a,
            file_b,
            file_c,
        })
    }
}

/// Collect immediate child files or directories, sorted by name
///
/// Hidden entries and previously written `*_solution*` outputs are skipped.
fn collect_children(path: &Path, dirs: bool) -> Result<Vec<PathBuf>> {
    if !path.is_dir() {
        bail!("{} is not a directory", path.display());
    }

    let mut children = Vec::new();
    for entry in walkdir::WalkDir::new(path)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.with_context(|| format!("Failed to list {}", path.display()))?;
        let name = entry.file_name().to_string_lossy();
        if name.starts_with('.') || name.contains("_solution") {
            continue;
        }

        let wanted = if dirs {
            entry.file_type().is_dir()
        } else {
            entry.file_type().is_file()
        };
        if wanted {
            children.push(entry.into_path());
        }
    }

    Ok(children)
}

/// Dump files directly inside `path`
pub fn collect_files(path: &Path) -> Result<Vec<PathBuf>> {
    collect_children(path, false)
}

/// Sample directories directly inside `path`
pub fn collect_subdirs(path: &Path) -> Result<Vec<PathBuf>> {
    collect_children(path, true)
}

/// First file in `dir` whose extension matches, ignoring case
pub fn find_with_extension(dir: &Path, extension: &str) -> Result<Option<PathBuf>> {
    Ok(collect_files(dir)?.into_iter().find(|file| {
        file.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(extension))
    }))
}

/// Sample name used for output files: the file or directory name
pub fn sample_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "sample".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_collect_files_skips_outputs() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("scale2"), b"x").unwrap();
        fs::write(dir.path().join("scale1"), b"x").unwrap();
        fs::write(dir.path().join("scale1_solution.csv"), b"x").unwrap();
        fs::write(dir.path().join(".hidden"), b"x").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();

        let names: Vec<_> = collect_files(dir.path())
            .unwrap()
            .iter()
            .map(|p| sample_name(p))
            .collect();
        assert_eq!(names, vec!["scale1", "scale2"]);

        let subdirs = collect_subdirs(dir.path()).unwrap();
        assert_eq!(subdirs, vec![dir.path().join("nested")]);
    }

    #[test]
    fn test_resolve_sixtysix_sample() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("sixtysix.A"), b"").unwrap();
        fs::write(dir.path().join("sixtysix.b"), b"").unwrap();

        let sample = SixtysixSample::resolve(dir.path()).unwrap();
        assert_eq!(sample.file_a, dir.path().join("sixtysix.A"));
        assert_eq!(sample.file_b, dir.path().join("sixtysix.b"));
        assert_eq!(sample.file_c, None);
    }

    #[test]
    fn test_resolve_requires_file_b() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("sixtysix.A"), b"").unwrap();
        assert!(SixtysixSample::resolve(dir.path()).is_err());
    }

    #[test]
    fn test_not_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("pear1");
        fs::write(&file, b"").unwrap();
        assert!(collect_files(&file).is_err());
    }
}
