//! Compressed MP3 rendering
//!
//! The LAME encode runs on its own worker thread and streams progress
//! back over a channel; the caller blocks only on the terminal event.
//! Converted samples move into the worker, so no state is shared beyond
//! the channel and the process-wide busy flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, unbounded};
use log::debug;
use mp3lame_encoder::{Bitrate, Builder, DualPcm, FlushNoGap, Quality};

use sw_core::PcmBuffer;

use crate::error::{RenderError, RenderResult};
use crate::pcm::pcm16_channel;

/// Fixed output bitrate
const MP3_BITRATE: Bitrate = Bitrate::Kbps128;

/// Frames fed to the encoder per pass. Large enough to amortize the
/// per-call cost, small enough to keep progress at sub-second
/// granularity.
pub const ENCODE_CHUNK_FRAMES: usize = 36_864;

/// Worst-case LAME flush output in bytes
const FLUSH_RESERVE: usize = 7200;

/// Single-slot guard: one in-flight encode per process
static ENCODER_BUSY: AtomicBool = AtomicBool::new(false);

// ═══════════════════════════════════════════════════════════════════════════════
// EVENTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Events emitted by an encoding task: zero or more `Progress` updates,
/// then exactly one terminal `Done` or `Failed`, after which the channel
/// closes. Progress is best-effort; correctness never depends on it.
#[derive(Debug)]
pub enum EncodeEvent {
    /// Percentage of input frames consumed, 0-100, non-decreasing
    Progress(u8),
    /// Final artifact bytes, segments concatenated in emission order
    Done(Vec<u8>),
    /// Terminal failure; no partial artifact is produced
    Failed(String),
}

/// Releases the busy slot on every worker exit path, panics included
struct SlotGuard;

impl Drop for SlotGuard {
    fn drop(&mut self) {
        ENCODER_BUSY.store(false, Ordering::Release);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// JOB HANDLE
// ═══════════════════════════════════════════════════════════════════════════════

/// Handle to a running MP3 encode
pub struct Mp3Job {
    events: Receiver<EncodeEvent>,
    handle: JoinHandle<()>,
}

impl Mp3Job {
    /// Start encoding on a worker thread.
    ///
    /// The converted samples move into the worker; the caller keeps only
    /// this handle and stays responsive while the encode proceeds. Fails
    /// with `EncoderBusy` while another job is in flight — requests are
    /// rejected, not queued. There is no cancellation: once started, a
    /// job runs to completion or failure.
    pub fn spawn(buffer: &PcmBuffer) -> RenderResult<Self> {
        if buffer.frames() == 0 || buffer.channel_count() == 0 {
            return Err(RenderError::Encoding("cannot encode an empty buffer".to_string()));
        }

        if ENCODER_BUSY
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            return Err(RenderError::EncoderBusy);
        }

        let input = EncodeInput::from_buffer(buffer);
        let (tx, events) = unbounded();

        let handle = thread::spawn(move || {
            let _slot = SlotGuard;
            match run_encode(&input, &tx) {
                Ok(bytes) => {
                    let _ = tx.send(EncodeEvent::Done(bytes));
                }
                Err(cause) => {
                    let _ = tx.send(EncodeEvent::Failed(cause));
                }
            }
        });

        Ok(Self { events, handle })
    }

    /// Event stream for callers that poll progress themselves
    pub fn events(&self) -> &Receiver<EncodeEvent> {
        &self.events
    }

    /// Block until the terminal event, discarding progress
    pub fn wait(self) -> RenderResult<Vec<u8>> {
        self.wait_with_progress(|_| {})
    }

    /// Block until the terminal event, forwarding each progress update
    pub fn wait_with_progress<F: FnMut(u8)>(self, mut on_progress: F) -> RenderResult<Vec<u8>> {
        let mut outcome = Err(RenderError::Encoding(
            "encoder terminated without a result".to_string(),
        ));
        for event in self.events.iter() {
            match event {
                EncodeEvent::Progress(percent) => on_progress(percent),
                EncodeEvent::Done(bytes) => {
                    outcome = Ok(bytes);
                    break;
                }
                EncodeEvent::Failed(cause) => {
                    outcome = Err(RenderError::Encoding(cause));
                    break;
                }
            }
        }
        let _ = self.handle.join();
        outcome
    }
}

/// Encode a buffer to MP3, blocking until done, forwarding progress
pub fn encode_mp3<F: FnMut(u8)>(buffer: &PcmBuffer, on_progress: F) -> RenderResult<Vec<u8>> {
    Mp3Job::spawn(buffer)?.wait_with_progress(on_progress)
}

// ═══════════════════════════════════════════════════════════════════════════════
// WORKER
// ═══════════════════════════════════════════════════════════════════════════════

/// Converted samples handed to the worker. A mono source duplicates its
/// channel to fill the right input LAME expects, but the stream itself
/// stays single-channel; buffers wider than stereo encode their first
/// two channels.
struct EncodeInput {
    left: Vec<i16>,
    right: Vec<i16>,
    channels: u8,
    sample_rate: u32,
}

impl EncodeInput {
    fn from_buffer(buffer: &PcmBuffer) -> Self {
        let left = pcm16_channel(&buffer.channels[0]);
        let right = if buffer.channel_count() > 1 {
            pcm16_channel(&buffer.channels[1])
        } else {
            left.clone()
        };
        Self {
            left,
            right,
            channels: buffer.channel_count().min(2) as u8,
            sample_rate: buffer.sample_rate,
        }
    }
}

fn run_encode(input: &EncodeInput, tx: &Sender<EncodeEvent>) -> Result<Vec<u8>, String> {
    let mut builder = Builder::new().ok_or("LAME encoder init failed")?;
    builder
        .set_num_channels(input.channels)
        .map_err(|e| format!("LAME set channels failed: {e:?}"))?;
    builder
        .set_sample_rate(input.sample_rate)
        .map_err(|e| format!("LAME set sample rate failed: {e:?}"))?;
    builder
        .set_brate(MP3_BITRATE)
        .map_err(|e| format!("LAME set bitrate failed: {e:?}"))?;
    builder
        .set_quality(Quality::Best)
        .map_err(|e| format!("LAME set quality failed: {e:?}"))?;
    let mut encoder = builder
        .build()
        .map_err(|e| format!("LAME build failed: {e:?}"))?;

    let total_frames = input.left.len();
    let mut segments: Vec<Vec<u8>> = Vec::new();
    let mut frames_done = 0usize;

    while frames_done < total_frames {
        let end = (frames_done + ENCODE_CHUNK_FRAMES).min(total_frames);
        let chunk = DualPcm {
            left: &input.left[frames_done..end],
            right: &input.right[frames_done..end],
        };

        let mut segment =
            Vec::with_capacity(mp3lame_encoder::max_required_buffer_size(end - frames_done));
        let written = encoder
            .encode(chunk, segment.spare_capacity_mut())
            .map_err(|e| format!("LAME encode failed: {e:?}"))?;
        // SAFETY: the encoder wrote `written` bytes into spare capacity
        unsafe {
            segment.set_len(written);
        }

        if !segment.is_empty() {
            segments.push(segment);
        }

        frames_done = end;
        let percent = ((frames_done as f64 / total_frames as f64) * 100.0).round() as u8;
        let _ = tx.send(EncodeEvent::Progress(percent));
    }

    // Compressors buffer trailing state; flush it into a final segment
    let mut tail = Vec::with_capacity(FLUSH_RESERVE);
    let flushed = encoder
        .flush::<FlushNoGap>(tail.spare_capacity_mut())
        .map_err(|e| format!("LAME flush failed: {e:?}"))?;
    // SAFETY: the encoder wrote `flushed` bytes into spare capacity
    unsafe {
        tail.set_len(flushed);
    }
    if !tail.is_empty() {
        segments.push(tail);
    }

    let total_bytes: usize = segments.iter().map(Vec::len).sum();
    let mut bytes = Vec::with_capacity(total_bytes);
    for segment in &segments {
        bytes.extend_from_slice(segment);
    }
    debug!("mp3 encode: {total_frames} frames -> {} bytes", bytes.len());

    Ok(bytes)
}
