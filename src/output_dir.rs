//! Output directory allocation
//!
//! Every run writes into a directory that did not exist before it started:
//! `output`, then `output-02`, `output-03`, ... The numbering has no upper
//! bound, so the suffix simply grows past two digits after 99 runs.

use anyhow::{Context, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// First suffix tried once the base directory is taken
const FIRST_SUFFIX: u32 = 2;

fn candidate(base: &Path, index: u32) -> PathBuf {
    if index < FIRST_SUFFIX {
        base.to_path_buf()
    } else {
        PathBuf::from(format!("{}-{:02}", base.display(), index))
    }
}

/// Create and return a directory named after `base` that did not previously exist.
///
/// Candidates are created with a non-recursive `create_dir`; a candidate that
/// already exists (as a directory or anything else) is never reused.
/// Two processes racing on the same base may still interleave their probes.
pub fn allocate_output_dir(base: &Path) -> Result<PathBuf> {
    let mut index = FIRST_SUFFIX - 1;
    loop {
        let dir = candidate(base, index);
        match std::fs::create_dir(&dir) {
            Ok(()) => {
                log::debug!("Allocated output directory {}", dir.display());
                return Ok(dir);
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                log::trace!("{} already exists", dir.display());
                index += 1;
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to create output directory: {}", dir.display())
                });
            }
        }
    }
}

/// Name of the directory `allocate_output_dir` would create, without creating it
pub fn next_output_dir(base: &Path) -> PathBuf {
    let mut index = FIRST_SUFFIX - 1;
    loop {
        let dir = candidate(base, index);
        if !dir.exists() {
            return dir;
        }
        index += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_allocate_fresh_base() {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path().join("output");

        let dir = allocate_output_dir(&base).unwrap();

        assert_eq!(dir, base);
        assert!(dir.is_dir());
    }

    #[test]
    fn test_allocate_after_existing_runs() {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path().join("output");
        std::fs::create_dir(&base).unwrap();
        std::fs::create_dir(tmp.path().join("output-02")).unwrap();
        std::fs::create_dir(tmp.path().join("output-03")).unwrap();

        let dir = allocate_output_dir(&base).unwrap();

        assert_eq!(dir, tmp.path().join("output-04"));
        assert!(dir.is_dir());
    }

    #[test]
    fn test_allocate_sequence() {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path().join("output");

        let names: Vec<PathBuf> = (0..3)
            .map(|_| allocate_output_dir(&base).unwrap())
            .collect();

        assert_eq!(
            names,
            vec![
                tmp.path().join("output"),
                tmp.path().join("output-02"),
                tmp.path().join("output-03"),
            ]
        );
    }

    #[test]
    fn test_allocate_skips_plain_files() {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path().join("output");
        std::fs::write(&base, b"not a directory").unwrap();

        let dir = allocate_output_dir(&base).unwrap();

        assert_eq!(dir, tmp.path().join("output-02"));
        assert_eq!(std::fs::read(&base).unwrap(), b"not a directory");
    }

    #[test]
    fn test_suffix_grows_past_two_digits() {
        let base = Path::new("output");
        assert_eq!(candidate(base, 9), PathBuf::from("output-09"));
        assert_eq!(candidate(base, 100), PathBuf::from("output-100"));
    }

    #[test]
    fn test_next_output_dir_does_not_create() {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path().join("output");
        std::fs::create_dir(&base).unwrap();

        let next = next_output_dir(&base);

        assert_eq!(next, tmp.path().join("output-02"));
        assert!(!next.exists());
    }

    #[test]
    fn test_missing_parent_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path().join("missing").join("output");

        assert!(allocate_output_dir(&base).is_err());
    }
}
