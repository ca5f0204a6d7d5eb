#![allow(clippy::unwrap_used)]

use crate::host::{FsFileStore, path_from_uri, uri_for_path};

use voice_memo_core::{VoiceNoteError, capability::FileStore};

use tokio::io::AsyncWriteExt;

/// WHAT: URIs and paths convert both ways
/// WHY: The core only sees URIs, the OS only paths
#[test]
fn given_path_when_converting_to_uri_and_back_then_same_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("note.wav");

    let uri = uri_for_path(&path);

    assert!(uri.starts_with("file://"));
    assert_eq!(path_from_uri(&uri), path);
    assert_eq!(path_from_uri("/plain/path.wav"), std::path::PathBuf::from("/plain/path.wav"));
}

/// WHAT: A written file reports existence, size and contents
/// WHY: The copy pipeline verifies writes through these calls
#[tokio::test]
async fn given_written_file_when_inspecting_then_size_and_bytes_match() {
    // Given: A store over a temp directory
    let dir = tempfile::tempdir().unwrap();
    let store = FsFileStore::new(dir.path().to_path_buf());
    let uri = store.stable_uri("a.wav");
    assert!(!store.exists(&uri).await);

    // When: Writing through the primary writer
    let mut writer = store.open_writer(&uri).await.unwrap();
    writer.write_all(&[1, 2, 3, 4]).await.unwrap();
    writer.shutdown().await.unwrap();

    // Then: The file is visible with the same bytes
    assert!(store.exists(&uri).await);
    assert_eq!(store.size(&uri).await.unwrap(), 4);
    assert_eq!(store.read_bytes(&uri).await.unwrap(), vec![1, 2, 3, 4]);
}

/// WHAT: The fallback primitive refuses to overwrite
/// WHY: A fresh name must never clobber an existing recording
#[tokio::test]
async fn given_existing_name_when_creating_file_then_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsFileStore::new(dir.path().to_path_buf());

    let (uri, mut writer) = store.create_file("b.wav").await.unwrap();
    writer.write_all(b"data").await.unwrap();
    writer.shutdown().await.unwrap();
    assert_eq!(uri, store.stable_uri("b.wav"));

    let again = store.create_file("b.wav").await;

    assert!(matches!(again, Err(VoiceNoteError::IoError { .. })));
    assert_eq!(store.read_bytes(&uri).await.unwrap(), b"data".to_vec());
}

/// WHAT: Delete removes the file, and deleting a missing file fails
/// WHY: The manager keeps the entry when deletion fails
#[tokio::test]
async fn given_file_when_deleting_twice_then_second_fails() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsFileStore::new(dir.path().to_path_buf());
    let (uri, mut writer) = store.create_file("c.wav").await.unwrap();
    writer.shutdown().await.unwrap();

    store.delete(&uri).await.unwrap();

    assert!(!store.exists(&uri).await);
    assert!(store.delete(&uri).await.is_err());
    assert!(store.size(&uri).await.is_err());
}
