use crate::CoreResult;

use std::pin::Pin;

use async_trait::async_trait;
use tokio::io::AsyncWrite;

/// Writable handle returned by a [`FileStore`]. Data is durable once
/// `shutdown` completes.
pub type FileWriter = Pin<Box<dyn AsyncWrite + Send>>;

/// Filesystem access for recordings.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Whether a file exists at `uri`.
    async fn exists(&self, uri: &str) -> bool;

    /// Size of the file at `uri` in bytes.
    async fn size(&self, uri: &str) -> CoreResult<u64>;

    /// Entire contents of the file at `uri`.
    async fn read_bytes(&self, uri: &str) -> CoreResult<Vec<u8>>;

    /// Open `uri` for writing, truncating any existing file.
    async fn open_writer(&self, uri: &str) -> CoreResult<FileWriter>;

    /// Create a new file named `file_name` in the recordings directory.
    ///
    /// Alternate creation primitive: fails if the file already exists.
    async fn create_file(&self, file_name: &str) -> CoreResult<(String, FileWriter)>;

    /// Remove the file at `uri`.
    async fn delete(&self, uri: &str) -> CoreResult<()>;

    /// Stable URI for `file_name` in the recordings directory.
    fn stable_uri(&self, file_name: &str) -> String;
}
