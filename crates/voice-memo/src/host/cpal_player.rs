use crate::host::{Resampler, path_from_uri};

use voice_memo_core::{CoreResult, VoiceNoteError, capability::Player};

use std::{
    path::Path,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use cpal::{
    Device, Stream, StreamConfig,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use hound::{SampleFormat, WavReader};
use tracing::{debug, error, info, instrument};

/// Player on the default cpal output device.
///
/// `replace` decodes the whole file up front; the output callback only copies
/// from memory and advances a cursor, so pause keeps the position.
pub struct CpalPlayer {
    device: Device,
    stream_config: StreamConfig,
    stream: Option<Stream>,
    cursor: Arc<AtomicUsize>,
    playing: Arc<AtomicBool>,
}

impl CpalPlayer {
    /// Open the default output device.
    #[track_caller]
    #[instrument]
    pub fn new() -> CoreResult<Self> {
        let host = cpal::default_host();

        let device = host
            .default_output_device()
            .ok_or_else(|| VoiceNoteError::device("No output device found"))?;

        let output_config = device
            .default_output_config()
            .map_err(|e| VoiceNoteError::device(format!("Failed to get output config: {}", e)))?;

        info!(
            device_id = ?device.id(),
            sample_rate = output_config.sample_rate(),
            channels = output_config.channels(),
            "CpalPlayer initialized"
        );

        Ok(Self {
            device,
            stream_config: output_config.into(),
            stream: None,
            cursor: Arc::new(AtomicUsize::new(0)),
            playing: Arc::new(AtomicBool::new(false)),
        })
    }
}

/// Decode a WAV file into mono `f32` samples and its sample rate.
pub(crate) fn read_wav(path: &Path) -> CoreResult<(Vec<f32>, u32)> {
    let reader = WavReader::open(path)
        .map_err(|e| VoiceNoteError::device(format!("Failed to open WAV file: {}", e)))?;

    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;

    let interleaved: Result<Vec<f32>, _> = match spec.sample_format {
        SampleFormat::Float => reader.into_samples::<f32>().collect(),
        SampleFormat::Int => {
            let max_value = (1i64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_value))
                .collect()
        }
    };
    let interleaved =
        interleaved.map_err(|e| VoiceNoteError::device(format!("Failed to read samples: {}", e)))?;

    let mono = interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect();

    Ok((mono, spec.sample_rate))
}

/// Repeat each mono sample across `channels` output channels.
pub(crate) fn spread(mono: &[f32], channels: usize) -> Vec<f32> {
    mono.iter()
        .flat_map(|&s| std::iter::repeat_n(s, channels.max(1)))
        .collect()
}

#[async_trait]
impl Player for CpalPlayer {
    #[instrument(skip(self))]
    async fn replace(&mut self, uri: &str) -> CoreResult<()> {
        self.stream = None;
        self.playing.store(false, Ordering::Release);
        self.cursor.store(0, Ordering::Release);

        let path = path_from_uri(uri);
        let device_rate = self.stream_config.sample_rate;
        let channels = self.stream_config.channels as usize;

        let frames: Arc<[f32]> = tokio::task::spawn_blocking(move || {
            let (mono, rate) = read_wav(&path)?;
            let mono = Resampler::convert(rate, device_rate, mono)?;
            Ok::<_, VoiceNoteError>(spread(&mono, channels))
        })
        .await
        .map_err(|e| VoiceNoteError::device(format!("Decoder task failed: {}", e)))??
        .into();

        let cursor = Arc::clone(&self.cursor);
        let playing = Arc::clone(&self.playing);
        let total = frames.len();

        let stream = self
            .device
            .build_output_stream(
                &self.stream_config,
                move |out: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    if !playing.load(Ordering::Acquire) {
                        out.fill(0.0);
                        return;
                    }
                    let start = cursor.load(Ordering::Acquire).min(total);
                    let n = out.len().min(total - start);
                    out[..n].copy_from_slice(&frames[start..start + n]);
                    out[n..].fill(0.0);
                    cursor.store(start + n, Ordering::Release);
                },
                |err| {
                    error!("Audio output stream error: {}", err);
                },
                None,
            )
            .map_err(|e| VoiceNoteError::device(format!("Failed to build output stream: {}", e)))?;

        self.stream = Some(stream);
        debug!(uri = %uri, samples = total, "Source loaded");

        Ok(())
    }

    #[instrument(skip(self))]
    async fn play(&mut self) -> CoreResult<()> {
        let stream = self
            .stream
            .as_ref()
            .ok_or_else(|| VoiceNoteError::device("No source loaded"))?;

        self.playing.store(true, Ordering::Release);
        stream
            .play()
            .map_err(|e| VoiceNoteError::device(format!("Failed to start output stream: {}", e)))?;

        debug!(position = self.cursor.load(Ordering::Acquire), "Output started");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn pause(&mut self) -> CoreResult<()> {
        self.playing.store(false, Ordering::Release);
        if let Some(stream) = &self.stream {
            stream
                .pause()
                .map_err(|e| VoiceNoteError::device(format!("Failed to pause output stream: {}", e)))?;
        }
        Ok(())
    }
}
