use voice_memo_core::{CoreResult, VoiceNoteError};

use audioadapter_buffers::direct::InterleavedSlice;
use rubato::{Fft, FixedSync, Resampler as RubatoResampler};
use tracing::{debug, instrument};

/// Requested frames per FFT call; the resampler may round it.
const CHUNK_FRAMES: usize = 1024;
const SUB_CHUNKS: usize = 2;

/// Mono sample-rate converter shared by capture and playback.
pub struct Resampler {
    inner: Fft<f32>,
    input_rate: u32,
    output_rate: u32,
    chunk_frames: usize,
}

impl Resampler {
    /// Converter from `input_rate` to `output_rate` Hz.
    #[track_caller]
    #[instrument]
    pub fn new(input_rate: u32, output_rate: u32) -> CoreResult<Self> {
        let inner = Fft::<f32>::new(
            input_rate as usize,
            output_rate as usize,
            CHUNK_FRAMES,
            SUB_CHUNKS,
            1,
            FixedSync::Input,
        )
        .map_err(|e| VoiceNoteError::device(format!("Failed to create resampler: {}", e)))?;

        let chunk_frames = inner.input_frames_next();
        debug!(input_rate, output_rate, chunk_frames, "Resampler initialized");

        Ok(Self {
            inner,
            input_rate,
            output_rate,
            chunk_frames,
        })
    }

    /// Convert `samples` at `input_rate` to `output_rate`, skipping the work
    /// when the rates already match.
    #[track_caller]
    pub fn convert(input_rate: u32, output_rate: u32, samples: Vec<f32>) -> CoreResult<Vec<f32>> {
        if input_rate == output_rate || samples.is_empty() {
            return Ok(samples);
        }
        Self::new(input_rate, output_rate)?.resample(&samples)
    }

    /// Resample a whole mono buffer. The last chunk is zero-padded and the
    /// output trimmed to the expected length.
    #[track_caller]
    #[instrument(skip(self, samples))]
    pub fn resample(&mut self, samples: &[f32]) -> CoreResult<Vec<f32>> {
        if samples.is_empty() {
            return Ok(Vec::new());
        }

        let expected =
            (samples.len() as f64 * self.output_rate as f64 / self.input_rate as f64) as usize;
        let mut output = Vec::with_capacity(expected);
        let mut padded = vec![0.0f32; self.chunk_frames];
        let mut chunk_out = vec![0.0f32; self.inner.output_frames_max()];

        for chunk in samples.chunks(self.chunk_frames) {
            padded[..chunk.len()].copy_from_slice(chunk);
            padded[chunk.len()..].fill(0.0);

            let input = InterleavedSlice::new(&padded, 1, self.chunk_frames).map_err(|e| {
                VoiceNoteError::device(format!("Failed to wrap resampler input: {}", e))
            })?;

            let capacity = chunk_out.len();
            let mut out = InterleavedSlice::new_mut(&mut chunk_out, 1, capacity).map_err(|e| {
                VoiceNoteError::device(format!("Failed to wrap resampler output: {}", e))
            })?;

            let (_read, written) = self
                .inner
                .process_into_buffer(&input, &mut out, None)
                .map_err(|e| VoiceNoteError::device(format!("Resampling failed: {}", e)))?;

            output.extend_from_slice(&chunk_out[..written]);
        }

        output.truncate(expected);

        debug!(
            input_len = samples.len(),
            output_len = output.len(),
            input_rate = self.input_rate,
            output_rate = self.output_rate,
            "Resampled audio"
        );

        Ok(output)
    }
}
