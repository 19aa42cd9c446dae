//! # Private State Configuration

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// File store configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateStateConfig {
    /// Directory holding the document and the `LOCK` file.
    pub directory: PathBuf,

    /// File name of the JSON document.
    pub document_name: String,
}

impl Default for PrivateStateConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(".main-index/private-state"),
            document_name: "identities.json".to_string(),
        }
    }
}

impl PrivateStateConfig {
    /// Config rooted at `directory` with the default document name.
    pub fn in_dir(directory: impl AsRef<Path>) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Full path of the JSON document.
    pub fn document_path(&self) -> PathBuf {
        self.directory.join(&self.document_name)
    }
}
