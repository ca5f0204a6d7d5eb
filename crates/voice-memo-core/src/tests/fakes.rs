#![allow(clippy::unwrap_used)]

use crate::{
    Capabilities, CoreResult, ReadinessPolicy, ResumePolicy, SessionConfig, SettleDelays,
    TrackerEvents, VoiceNoteError, VoiceNoteManager,
    capability::{
        AudioMode, AudioSession, ConfirmDialog, FileStore, FileWriter, PermissionProvider,
        Player, Recorder, RecorderState,
    },
    config::PlayerSettle,
};

use std::{
    collections::HashMap,
    io,
    pin::Pin,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicU32, Ordering},
    },
    task::{Context, Poll},
    time::Duration,
};

use async_trait::async_trait;
use tokio::io::AsyncWrite;

/// Where the fake recorder leaves its working file.
pub(crate) const TEMP_URI: &str = "file:///cache/recording-temp.m4a";

/// Ordered log of capability calls shared by all fakes.
#[derive(Clone, Default)]
pub(crate) struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub(crate) fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub(crate) fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub(crate) fn clear(&self) {
        self.0.lock().unwrap().clear();
    }

    /// Index of the first entry equal to `entry`.
    pub(crate) fn index_of(&self, entry: &str) -> Option<usize> {
        self.0.lock().unwrap().iter().position(|e| e == entry)
    }
}

type FileMap = Arc<Mutex<HashMap<String, Vec<u8>>>>;

/// In-memory filesystem.
#[derive(Default)]
pub(crate) struct FakeFiles {
    files: FileMap,
    journal: Journal,
    pub(crate) fail_primary: AtomicBool,
    pub(crate) fail_fallback: AtomicBool,
    pub(crate) short_primary: AtomicBool,
    pub(crate) fail_delete: AtomicBool,
    /// Number of upcoming `exists` checks that report a missing file.
    pub(crate) hidden_checks: AtomicU32,
}

impl FakeFiles {
    fn new(journal: Journal) -> Self {
        Self {
            journal,
            ..Self::default()
        }
    }

    pub(crate) fn put(&self, uri: &str, bytes: Vec<u8>) {
        self.files.lock().unwrap().insert(uri.to_string(), bytes);
    }

    pub(crate) fn contents(&self, uri: &str) -> Option<Vec<u8>> {
        self.files.lock().unwrap().get(uri).cloned()
    }

    pub(crate) fn contains(&self, uri: &str) -> bool {
        self.files.lock().unwrap().contains_key(uri)
    }

    pub(crate) fn uris(&self) -> Vec<String> {
        self.files.lock().unwrap().keys().cloned().collect()
    }

    fn writer(&self, uri: &str, truncate_to_half: bool) -> FileWriter {
        Box::pin(MemWriter {
            uri: uri.to_string(),
            buf: Vec::new(),
            files: Arc::clone(&self.files),
            truncate_to_half,
        })
    }
}

fn not_found(uri: &str) -> VoiceNoteError {
    VoiceNoteError::from(io::Error::new(io::ErrorKind::NotFound, uri.to_string()))
}

#[async_trait]
impl FileStore for FakeFiles {
    async fn exists(&self, uri: &str) -> bool {
        let hidden = self
            .hidden_checks
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        !hidden && self.contains(uri)
    }

    async fn size(&self, uri: &str) -> CoreResult<u64> {
        self.contents(uri)
            .map(|bytes| bytes.len() as u64)
            .ok_or_else(|| not_found(uri))
    }

    async fn read_bytes(&self, uri: &str) -> CoreResult<Vec<u8>> {
        self.contents(uri).ok_or_else(|| not_found(uri))
    }

    async fn open_writer(&self, uri: &str) -> CoreResult<FileWriter> {
        self.journal.push("files.open_writer");
        if self.fail_primary.load(Ordering::SeqCst) {
            return Err(VoiceNoteError::device("primary write refused"));
        }
        Ok(self.writer(uri, self.short_primary.load(Ordering::SeqCst)))
    }

    async fn create_file(&self, file_name: &str) -> CoreResult<(String, FileWriter)> {
        self.journal.push("files.create_file");
        if self.fail_fallback.load(Ordering::SeqCst) {
            return Err(VoiceNoteError::device("fallback write refused"));
        }
        let uri = self.stable_uri(file_name);
        if self.contains(&uri) {
            return Err(VoiceNoteError::from(io::Error::from(
                io::ErrorKind::AlreadyExists,
            )));
        }
        let writer = self.writer(&uri, false);
        Ok((uri, writer))
    }

    async fn delete(&self, uri: &str) -> CoreResult<()> {
        self.journal.push("files.delete");
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(VoiceNoteError::device("file locked"));
        }
        self.files.lock().unwrap().remove(uri);
        Ok(())
    }

    fn stable_uri(&self, file_name: &str) -> String {
        format!("file:///documents/{}", file_name)
    }
}

/// Commits its buffer to the file map on shutdown.
struct MemWriter {
    uri: String,
    buf: Vec<u8>,
    files: FileMap,
    truncate_to_half: bool,
}

impl AsyncWrite for MemWriter {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        self.get_mut().buf.extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        let mut bytes = std::mem::take(&mut this.buf);
        if this.truncate_to_half {
            bytes.truncate(bytes.len() / 2);
        }
        this.files.lock().unwrap().insert(this.uri.clone(), bytes);
        Poll::Ready(Ok(()))
    }
}

/// Scripted behaviour of the fake recorder.
pub(crate) struct RecorderScript {
    pub(crate) duration_millis: u64,
    /// Bytes written to [`TEMP_URI`] on stop. `None` produces no URI.
    pub(crate) output: Option<Vec<u8>>,
    pub(crate) supports_pause: bool,
    pub(crate) fail_prepare: bool,
    pub(crate) fail_stop: bool,
    pub(crate) is_recording: bool,
    pub(crate) uri: Option<String>,
}

impl Default for RecorderScript {
    fn default() -> Self {
        Self {
            duration_millis: 3000,
            output: Some(vec![7u8; 2048]),
            supports_pause: true,
            fail_prepare: false,
            fail_stop: false,
            is_recording: false,
            uri: None,
        }
    }
}

pub(crate) struct FakeRecorder {
    script: Arc<Mutex<RecorderScript>>,
    files: Arc<FakeFiles>,
    journal: Journal,
}

#[async_trait]
impl Recorder for FakeRecorder {
    async fn prepare(&mut self) -> CoreResult<()> {
        self.journal.push("recorder.prepare");
        if self.script.lock().unwrap().fail_prepare {
            return Err(VoiceNoteError::device("microphone busy"));
        }
        Ok(())
    }

    async fn start(&mut self) -> CoreResult<()> {
        self.journal.push("recorder.start");
        self.script.lock().unwrap().is_recording = true;
        Ok(())
    }

    fn supports_pause(&self) -> bool {
        self.script.lock().unwrap().supports_pause
    }

    async fn pause(&mut self) -> CoreResult<()> {
        self.journal.push("recorder.pause");
        self.script.lock().unwrap().is_recording = false;
        Ok(())
    }

    async fn stop(&mut self) -> CoreResult<Option<String>> {
        self.journal.push("recorder.stop");
        let mut script = self.script.lock().unwrap();
        script.is_recording = false;
        if script.fail_stop {
            return Err(VoiceNoteError::device("encoder crashed"));
        }
        match script.output.clone() {
            Some(bytes) => {
                self.files.put(TEMP_URI, bytes);
                script.uri = Some(TEMP_URI.to_string());
            }
            None => script.uri = None,
        }
        Ok(script.uri.clone())
    }

    fn uri(&self) -> Option<String> {
        self.script.lock().unwrap().uri.clone()
    }

    fn state(&self) -> RecorderState {
        let script = self.script.lock().unwrap();
        RecorderState {
            is_recording: script.is_recording,
            duration_millis: script.duration_millis,
        }
    }
}

#[derive(Default)]
pub(crate) struct PlayerScript {
    pub(crate) source: Option<String>,
    pub(crate) playing: bool,
    pub(crate) fail_replace: bool,
    pub(crate) fail_play: bool,
}

pub(crate) struct FakePlayer {
    script: Arc<Mutex<PlayerScript>>,
    journal: Journal,
}

#[async_trait]
impl Player for FakePlayer {
    async fn replace(&mut self, uri: &str) -> CoreResult<()> {
        self.journal.push(format!("player.replace {}", uri));
        let mut script = self.script.lock().unwrap();
        if script.fail_replace {
            return Err(VoiceNoteError::device("unsupported codec"));
        }
        script.source = Some(uri.to_string());
        script.playing = false;
        Ok(())
    }

    async fn play(&mut self) -> CoreResult<()> {
        self.journal.push("player.play");
        let mut script = self.script.lock().unwrap();
        if script.fail_play {
            return Err(VoiceNoteError::device("output device lost"));
        }
        script.playing = true;
        Ok(())
    }

    async fn pause(&mut self) -> CoreResult<()> {
        self.journal.push("player.pause");
        self.script.lock().unwrap().playing = false;
        Ok(())
    }
}

pub(crate) struct FakeAudioSession {
    journal: Journal,
}

#[async_trait]
impl AudioSession for FakeAudioSession {
    async fn set_audio_mode(&self, mode: AudioMode) -> CoreResult<()> {
        let name = if mode.allows_recording {
            "audio_mode recording"
        } else {
            "audio_mode playback"
        };
        self.journal.push(name);
        Ok(())
    }
}

pub(crate) struct FakePermission {
    granted: Arc<AtomicBool>,
    requests: Arc<AtomicU32>,
}

#[async_trait]
impl PermissionProvider for FakePermission {
    async fn request_recording_permission(&self) -> bool {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.granted.load(Ordering::SeqCst)
    }
}

pub(crate) struct FakeConfirm {
    answer: Arc<AtomicBool>,
    journal: Journal,
}

#[async_trait]
impl ConfirmDialog for FakeConfirm {
    async fn confirm(&self, _title: &str, _message: &str) -> bool {
        self.journal.push("confirm");
        self.answer.load(Ordering::SeqCst)
    }
}

/// Shared handles onto every fake behind a manager.
pub(crate) struct Harness {
    pub(crate) journal: Journal,
    pub(crate) files: Arc<FakeFiles>,
    pub(crate) recorder: Arc<Mutex<RecorderScript>>,
    pub(crate) player: Arc<Mutex<PlayerScript>>,
    pub(crate) permission: Arc<AtomicBool>,
    pub(crate) permission_requests: Arc<AtomicU32>,
    pub(crate) confirm_answer: Arc<AtomicBool>,
}

impl Harness {
    pub(crate) fn new() -> Self {
        let journal = Journal::default();
        Self {
            files: Arc::new(FakeFiles::new(journal.clone())),
            journal,
            recorder: Arc::new(Mutex::new(RecorderScript::default())),
            player: Arc::new(Mutex::new(PlayerScript::default())),
            permission: Arc::new(AtomicBool::new(true)),
            permission_requests: Arc::new(AtomicU32::new(0)),
            confirm_answer: Arc::new(AtomicBool::new(true)),
        }
    }

    pub(crate) fn recorder(&self) -> FakeRecorder {
        FakeRecorder {
            script: Arc::clone(&self.recorder),
            files: Arc::clone(&self.files),
            journal: self.journal.clone(),
        }
    }

    pub(crate) fn player(&self) -> FakePlayer {
        FakePlayer {
            script: Arc::clone(&self.player),
            journal: self.journal.clone(),
        }
    }

    pub(crate) fn audio_session(&self) -> Arc<FakeAudioSession> {
        Arc::new(FakeAudioSession {
            journal: self.journal.clone(),
        })
    }

    pub(crate) fn capabilities(&self) -> Capabilities {
        Capabilities {
            recorder: Box::new(self.recorder()),
            player: Box::new(self.player()),
            files: self.files.clone(),
            audio_session: self.audio_session(),
            permission: Box::new(FakePermission {
                granted: Arc::clone(&self.permission),
                requests: Arc::clone(&self.permission_requests),
            }),
            confirm: Box::new(FakeConfirm {
                answer: Arc::clone(&self.confirm_answer),
                journal: self.journal.clone(),
            }),
        }
    }

    pub(crate) fn manager(&self) -> (VoiceNoteManager, TrackerEvents) {
        self.manager_with(test_config())
    }

    pub(crate) fn manager_with(&self, config: SessionConfig) -> (VoiceNoteManager, TrackerEvents) {
        VoiceNoteManager::new(self.capabilities(), config)
    }

    pub(crate) fn player_is_playing(&self) -> bool {
        self.player.lock().unwrap().playing
    }
}

pub(crate) fn test_config() -> SessionConfig {
    SessionConfig {
        extension: "m4a".to_string(),
        settle: SettleDelays {
            before_stop: Duration::from_millis(100),
            after_stop: Duration::from_millis(400),
        },
        readiness: ReadinessPolicy {
            attempts: 5,
            backoff: Duration::from_millis(100),
        },
        player_settle: PlayerSettle::default(),
        progress_interval: Duration::from_millis(100),
        resume: ResumePolicy::RestartFromZero,
    }
}

/// Record one clip of `duration_millis` through `manager` and return its URI.
pub(crate) async fn record_clip(
    harness: &Harness,
    manager: &mut VoiceNoteManager,
    duration_millis: u64,
) -> String {
    harness.recorder.lock().unwrap().duration_millis = duration_millis;
    manager.start_recording().await.unwrap();
    manager.stop_recording().await.unwrap().uri().to_string()
}
