//! File provider: discovery and parsing of a flat YAML document.

use super::RawValueSet;
use crate::ConfigError;
use log::debug;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Conventional config locations, probed in order under the search root.
pub const DEFAULT_FILE_CANDIDATES: &[&str] = &[
    "config.yml",
    "config.yaml",
    "config/config.yml",
    "config/config.yaml",
];

/// A parsed config file.
#[derive(Debug, Clone)]
pub struct LoadedFile {
    pub path: PathBuf,
    pub values: RawValueSet,
}

/// Locates and reads the structured config file.
#[derive(Debug, Clone)]
pub struct FileProvider {
    explicit: Option<PathBuf>,
    search_root: PathBuf,
}

impl FileProvider {
    /// Provider that probes [`DEFAULT_FILE_CANDIDATES`] under `search_root`,
    /// or reads `explicit` when given (relative paths resolve against the
    /// search root).
    pub fn new(explicit: Option<PathBuf>, search_root: impl Into<PathBuf>) -> Self {
        Self {
            explicit,
            search_root: search_root.into(),
        }
    }

    /// Path of the file to read, if any.
    ///
    /// An explicit path is always returned; candidates are only returned when
    /// they exist as regular files.
    pub fn locate(&self) -> Option<PathBuf> {
        if let Some(explicit) = &self.explicit {
            return Some(self.search_root.join(explicit));
        }

        for candidate in DEFAULT_FILE_CANDIDATES {
            let path = self.search_root.join(candidate);
            if path.is_file() {
                debug!("discovered config file: {}", path.display());
                return Some(path);
            }
            debug!("config file candidate missing: {}", path.display());
        }
        None
    }

    /// Read and parse the file.
    ///
    /// `Ok(None)` when no candidate exists. A missing explicit file, an
    /// unreadable file or a malformed document is an error.
    pub fn load(&self) -> Result<Option<LoadedFile>, ConfigError> {
        let Some(path) = self.locate() else {
            debug!(
                "no config file found under {}",
                self.search_root.display()
            );
            return Ok(None);
        };

        let contents = fs::read_to_string(&path).map_err(|source| ConfigError::FileRead {
            path: path.clone(),
            source,
        })?;
        let values = parse_flat_yaml(&contents, &path)?;
        debug!(
            "loaded config file (path={}, keys={})",
            path.display(),
            values.len()
        );
        Ok(Some(LoadedFile { path, values }))
    }
}

/// Parse a flat `key: value` YAML document into raw text per key.
///
/// Scalars keep the text as written (`1.10` stays `1.10`) and `null` becomes
/// an empty string. Nested mappings, sequences and non-mapping documents are
/// rejected. `path` is only used for error reporting.
pub fn parse_flat_yaml(contents: &str, path: &Path) -> Result<RawValueSet, ConfigError> {
    if contents.trim().is_empty() {
        return Ok(RawValueSet::new());
    }

    let document: Option<HashMap<String, Option<String>>> = serde_yaml::from_str(contents)
        .map_err(|err| ConfigError::FileParse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;

    Ok(document
        .unwrap_or_default()
        .into_iter()
        .map(|(key, value)| (key, value.unwrap_or_default()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn write(path: &Path, contents: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("dir");
        }
        fs::write(path, contents).expect("write");
    }

    #[test]
    fn parses_scalars_as_text() {
        let values = parse_flat_yaml(
            "IntVal: 1000\nFloatVal: 0.5\nBoolVal: true\nStringVal: hello\nEmpty:\n",
            Path::new("config.yml"),
        )
        .expect("values");
        assert_eq!(values["IntVal"], "1000");
        assert_eq!(values["FloatVal"], "0.5");
        assert_eq!(values["BoolVal"], "true");
        assert_eq!(values["StringVal"], "hello");
        assert_eq!(values["Empty"], "");
    }

    #[test]
    fn numeric_looking_scalars_keep_their_spelling() {
        let values = parse_flat_yaml(
            "Version: 1.10\nCode: 007\nHex: 0x1F\nSci: 1e3\n\
             AccountId: 12345678901234567890123\nFlag: TRUE\nQuoted: '1.0'\n",
            Path::new("config.yml"),
        )
        .expect("values");
        assert_eq!(values["Version"], "1.10");
        assert_eq!(values["Code"], "007");
        assert_eq!(values["Hex"], "0x1F");
        assert_eq!(values["Sci"], "1e3");
        assert_eq!(values["AccountId"], "12345678901234567890123");
        assert_eq!(values["Flag"], "TRUE");
        assert_eq!(values["Quoted"], "1.0");
    }

    #[test]
    fn null_document_has_no_values() {
        let values = parse_flat_yaml("~\n", Path::new("config.yml")).expect("values");
        assert!(values.is_empty());
    }

    #[test]
    fn empty_document_has_no_values() {
        let values = parse_flat_yaml("", Path::new("config.yml")).expect("values");
        assert!(values.is_empty());
    }

    #[test]
    fn rejects_nested_and_malformed_documents() {
        for contents in [
            "Nested:\n  inner: 1\n",
            "List: [1, 2]\n",
            "- a\n- b\n",
            "key: [unclosed",
        ] {
            let err = parse_flat_yaml(contents, Path::new("bad.yml")).unwrap_err();
            assert!(
                matches!(err, ConfigError::FileParse { .. }),
                "contents {contents:?} gave {err}"
            );
        }
    }

    #[test]
    fn probes_candidates_in_order() {
        let temp = TempDir::new().expect("tmp");
        let root = temp.path();
        write(&root.join("config/config.yml"), "IntVal: 3\n");
        write(&root.join("config.yaml"), "IntVal: 2\n");

        let provider = FileProvider::new(None, root);
        let loaded = provider.load().expect("load").expect("file");
        assert_eq!(loaded.path, root.join("config.yaml"));
        assert_eq!(loaded.values["IntVal"], "2");

        write(&root.join("config.yml"), "IntVal: 1\n");
        let loaded = provider.load().expect("load").expect("file");
        assert_eq!(loaded.values["IntVal"], "1");
    }

    #[test]
    fn directory_named_like_candidate_is_skipped() {
        let temp = TempDir::new().expect("tmp");
        fs::create_dir_all(temp.path().join("config.yml")).expect("dir");
        let provider = FileProvider::new(None, temp.path());
        assert!(provider.load().expect("load").is_none());
    }

    #[test]
    fn absent_file_is_not_an_error() {
        let temp = TempDir::new().expect("tmp");
        let provider = FileProvider::new(None, temp.path());
        assert!(provider.load().expect("load").is_none());
    }

    #[test]
    fn explicit_file_must_exist() {
        let temp = TempDir::new().expect("tmp");
        let provider = FileProvider::new(Some(PathBuf::from("my_own_file.yml")), temp.path());
        let err = provider.load().unwrap_err();
        assert!(matches!(err, ConfigError::FileRead { .. }));

        write(&temp.path().join("my_own_file.yml"), "IntVal: 2000");
        let loaded = provider.load().expect("load").expect("file");
        assert_eq!(loaded.values["IntVal"], "2000");
    }
}
