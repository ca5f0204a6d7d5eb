use crate::host::{Resampler, uri_for_path};

use voice_memo_core::{
    CoreResult, VoiceNoteError,
    capability::{Recorder, RecorderConfig, RecorderState},
};

use std::{
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use cpal::{
    Device, Stream, StreamConfig,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use hound::{SampleFormat, WavSpec, WavWriter};
use tracing::{debug, error, info, instrument, warn};

/// Longest capture kept in memory, in seconds of mono audio.
pub(crate) const MAX_CAPTURE_SECS: usize = 30 * 60;

/// Name of the recorder's working file in the cache directory.
const TEMP_FILE_STEM: &str = "recording-temp";

/// Microphone recorder on the default cpal input device.
///
/// Audio is downmixed to mono while capturing and written as 16-bit WAV on
/// stop. Every session reuses the same working file, so callers must copy it
/// before the next `prepare`.
pub struct CpalRecorder {
    device: Device,
    stream_config: StreamConfig,
    config: RecorderConfig,
    temp_path: PathBuf,
    stream: Option<Stream>,
    samples: Arc<Mutex<Vec<f32>>>,
    /// Gates the input callback; cleared on pause and stop.
    capturing: Arc<AtomicBool>,
    uri: Option<String>,
    duration_millis: u64,
}

impl CpalRecorder {
    /// Open the default input device.
    #[track_caller]
    #[instrument(skip(config))]
    pub fn new(config: RecorderConfig, cache_dir: &Path) -> CoreResult<Self> {
        let host = cpal::default_host();

        let device = host
            .default_input_device()
            .ok_or_else(|| VoiceNoteError::device("No microphone found"))?;

        let input_config = device
            .default_input_config()
            .map_err(|e| VoiceNoteError::device(format!("Failed to get input config: {}", e)))?;

        let temp_path = cache_dir.join(format!("{}.{}", TEMP_FILE_STEM, config.extension));

        info!(
            device_id = ?device.id(),
            sample_rate = input_config.sample_rate(),
            channels = input_config.channels(),
            target_rate = config.sample_rate,
            temp_path = ?temp_path,
            "CpalRecorder initialized"
        );

        Ok(Self {
            device,
            stream_config: input_config.into(),
            config,
            temp_path,
            stream: None,
            samples: Arc::new(Mutex::new(Vec::new())),
            capturing: Arc::new(AtomicBool::new(false)),
            uri: None,
            duration_millis: 0,
        })
    }

    fn device_rate(&self) -> u32 {
        self.stream_config.sample_rate
    }

    fn captured_millis(&self) -> u64 {
        let frames = self.samples.lock().unwrap_or_else(|e| e.into_inner()).len();
        frames_to_millis(frames, self.device_rate())
    }
}

/// Milliseconds covered by `frames` at `rate` Hz.
pub(crate) fn frames_to_millis(frames: usize, rate: u32) -> u64 {
    if rate == 0 {
        return 0;
    }
    frames as u64 * 1000 / rate as u64
}

/// Average interleaved frames of `channels` into mono.
pub(crate) fn downmix(data: &[f32], channels: usize) -> impl Iterator<Item = f32> + '_ {
    let channels = channels.max(1);
    data.chunks(channels)
        .map(move |frame| frame.iter().sum::<f32>() / frame.len() as f32)
}

/// Write mono `samples` to `path` as 16-bit PCM, duplicated across `channels`.
///
/// An empty capture leaves a zero-byte file. Returns the frame count written.
pub(crate) fn write_wav(
    path: &Path,
    samples: &[f32],
    sample_rate: u32,
    channels: u16,
) -> CoreResult<usize> {
    if samples.is_empty() {
        std::fs::File::create(path)?;
        return Ok(0);
    }

    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec)
        .map_err(|e| VoiceNoteError::device(format!("Failed to create WAV file: {}", e)))?;

    for &sample in samples {
        let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        for _ in 0..channels {
            writer
                .write_sample(value)
                .map_err(|e| VoiceNoteError::device(format!("Failed to write sample: {}", e)))?;
        }
    }

    writer
        .finalize()
        .map_err(|e| VoiceNoteError::device(format!("Failed to finalize WAV file: {}", e)))?;

    Ok(samples.len())
}

#[async_trait]
impl Recorder for CpalRecorder {
    #[instrument(skip(self))]
    async fn prepare(&mut self) -> CoreResult<()> {
        self.stream = None;
        self.capturing.store(false, Ordering::Release);
        self.samples
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
        self.uri = None;
        self.duration_millis = 0;

        let samples = Arc::clone(&self.samples);
        let capturing = Arc::clone(&self.capturing);
        let channels = self.stream_config.channels as usize;
        let max_frames = MAX_CAPTURE_SECS * self.device_rate() as usize;

        let stream = self
            .device
            .build_input_stream(
                &self.stream_config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if !capturing.load(Ordering::Acquire) {
                        return;
                    }
                    let mut buf = samples.lock().unwrap_or_else(|e| {
                        error!("Capture buffer lock poisoned, recovering: {}", e);
                        e.into_inner()
                    });
                    let room = max_frames.saturating_sub(buf.len());
                    buf.extend(downmix(data, channels).take(room));
                },
                |err| {
                    error!("Audio input stream error: {}", err);
                },
                None,
            )
            .map_err(|e| VoiceNoteError::device(format!("Failed to build input stream: {}", e)))?;

        self.stream = Some(stream);
        debug!("Input stream prepared");

        Ok(())
    }

    #[instrument(skip(self))]
    async fn start(&mut self) -> CoreResult<()> {
        let stream = self
            .stream
            .as_ref()
            .ok_or_else(|| VoiceNoteError::device("Recorder not prepared"))?;

        self.capturing.store(true, Ordering::Release);
        stream
            .play()
            .map_err(|e| VoiceNoteError::device(format!("Failed to start input stream: {}", e)))?;

        info!("Audio capture started");
        Ok(())
    }

    fn supports_pause(&self) -> bool {
        true
    }

    #[instrument(skip(self))]
    async fn pause(&mut self) -> CoreResult<()> {
        self.capturing.store(false, Ordering::Release);
        if let Some(stream) = &self.stream {
            stream
                .pause()
                .map_err(|e| VoiceNoteError::device(format!("Failed to pause input stream: {}", e)))?;
        }

        info!(captured_ms = self.captured_millis(), "Audio capture paused");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn stop(&mut self) -> CoreResult<Option<String>> {
        self.capturing.store(false, Ordering::Release);

        if self.stream.take().is_none() {
            warn!("Stop requested without an active stream");
        }
        // Let an in-flight callback observe the flag before the buffer is taken.
        tokio::time::sleep(Duration::from_millis(5)).await;

        let samples = std::mem::take(&mut *self.samples.lock().unwrap_or_else(|e| e.into_inner()));
        let device_rate = self.device_rate();
        let target_rate = self.config.sample_rate;
        let channels = self.config.channels;
        let path = self.temp_path.clone();

        debug!(captured = samples.len(), device_rate, "Captured audio samples");

        let frames = tokio::task::spawn_blocking(move || {
            let resampled = Resampler::convert(device_rate, target_rate, samples)?;
            write_wav(&path, &resampled, target_rate, channels)
        })
        .await
        .map_err(|e| VoiceNoteError::device(format!("Encoder task failed: {}", e)))??;

        self.duration_millis = frames_to_millis(frames, target_rate);
        let uri = uri_for_path(&self.temp_path);
        self.uri = Some(uri.clone());

        info!(
            uri = %uri,
            frames,
            duration_ms = self.duration_millis,
            "Audio capture stopped"
        );

        Ok(Some(uri))
    }

    fn uri(&self) -> Option<String> {
        self.uri.clone()
    }

    fn state(&self) -> RecorderState {
        let is_recording = self.capturing.load(Ordering::Acquire);
        let duration_millis = if self.stream.is_some() {
            self.captured_millis()
        } else {
            self.duration_millis
        };
        RecorderState {
            is_recording,
            duration_millis,
        }
    }
}
