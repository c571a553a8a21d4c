use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::case::ConversationFixture;

#[derive(Debug, Error)]
pub enum FixtureIoError {
    #[error("cannot list conversation fixtures in {path}: {source}")]
    ListDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot read conversation fixture {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("conversation fixture {path} does not decode: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Loads every `*.json` conversation in `dir`, in file-name order.
pub fn load_conversations(dir: &Path) -> Result<Vec<ConversationFixture>, FixtureIoError> {
    let list_error = |source: std::io::Error| FixtureIoError::ListDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut paths = fs::read_dir(dir)
        .map_err(list_error)?
        .map(|entry| entry.map(|entry| entry.path()).map_err(list_error))
        .filter(|path| match path {
            Ok(path) => path.extension().is_some_and(|ext| ext == "json"),
            Err(_) => true,
        })
        .collect::<Result<Vec<_>, _>>()?;
    paths.sort();

    paths
        .into_iter()
        .map(|path| {
            let raw = fs::read_to_string(&path).map_err(|source| FixtureIoError::Read {
                path: path.clone(),
                source,
            })?;
            serde_json::from_str(&raw).map_err(|source| FixtureIoError::Decode { path, source })
        })
        .collect()
}

pub fn default_fixture_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}
