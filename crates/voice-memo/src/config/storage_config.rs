use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where recordings and the recorder's working file live.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory for saved recordings (None = platform data directory).
    #[serde(default)]
    pub recordings_dir: Option<PathBuf>,
    /// Directory for the recorder's working file (None = platform cache directory).
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
}
