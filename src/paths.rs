use std::path::{Path, PathBuf};

/// Dataset shipped with the crate under `data/`.
pub const DEFAULT_DATA_FILE: &str = "consumption.csv";

/// Directory that bare dataset filenames are resolved against.
pub fn base_dir() -> &'static Path {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/data"))
}

/// Joins `file_name` onto [`base_dir`]. No filesystem access happens here; a
/// missing file is reported by the loader.
pub fn resolve(file_name: impl AsRef<Path>) -> PathBuf {
    base_dir().join(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_is_absolute_under_base() {
        let path = resolve("readings.csv");
        assert!(path.is_absolute());
        assert!(path.starts_with(base_dir()));
        assert!(path.ends_with("readings.csv"));
    }

    #[test]
    fn test_resolve_does_not_check_existence() {
        let path = resolve("does-not-exist.csv");
        assert!(!path.exists());
    }

    #[test]
    fn test_default_data_file_is_bundled() {
        assert!(resolve(DEFAULT_DATA_FILE).is_file());
    }
}
