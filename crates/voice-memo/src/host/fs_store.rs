use voice_memo_core::{
    CoreResult,
    capability::{FileStore, FileWriter},
};

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::{self, File, OpenOptions};
use tracing::{debug, instrument};

const FILE_SCHEME: &str = "file://";

/// `file://` URI for `path`.
pub(crate) fn uri_for_path(path: &Path) -> String {
    format!("{}{}", FILE_SCHEME, path.display())
}

/// Filesystem path behind `uri`. Plain paths are accepted unchanged.
pub(crate) fn path_from_uri(uri: &str) -> PathBuf {
    PathBuf::from(uri.strip_prefix(FILE_SCHEME).unwrap_or(uri))
}

/// [`FileStore`] over the local filesystem rooted at the recordings directory.
#[derive(Debug, Clone)]
pub struct FsFileStore {
    recordings_dir: PathBuf,
}

impl FsFileStore {
    /// Store saving new recordings under `recordings_dir`.
    pub fn new(recordings_dir: PathBuf) -> Self {
        Self { recordings_dir }
    }
}

#[async_trait]
impl FileStore for FsFileStore {
    async fn exists(&self, uri: &str) -> bool {
        fs::try_exists(path_from_uri(uri)).await.unwrap_or(false)
    }

    async fn size(&self, uri: &str) -> CoreResult<u64> {
        let metadata = fs::metadata(path_from_uri(uri)).await?;
        Ok(metadata.len())
    }

    async fn read_bytes(&self, uri: &str) -> CoreResult<Vec<u8>> {
        Ok(fs::read(path_from_uri(uri)).await?)
    }

    #[instrument(skip(self))]
    async fn open_writer(&self, uri: &str) -> CoreResult<FileWriter> {
        let file = File::create(path_from_uri(uri)).await?;
        debug!(uri = %uri, "Opened writer");
        Ok(Box::pin(file))
    }

    #[instrument(skip(self))]
    async fn create_file(&self, file_name: &str) -> CoreResult<(String, FileWriter)> {
        let path = self.recordings_dir.join(file_name);
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;
        debug!(path = ?path, "Created file");
        Ok((uri_for_path(&path), Box::pin(file)))
    }

    #[instrument(skip(self))]
    async fn delete(&self, uri: &str) -> CoreResult<()> {
        fs::remove_file(path_from_uri(uri)).await?;
        debug!(uri = %uri, "Deleted file");
        Ok(())
    }

    fn stable_uri(&self, file_name: &str) -> String {
        uri_for_path(&self.recordings_dir.join(file_name))
    }
}
