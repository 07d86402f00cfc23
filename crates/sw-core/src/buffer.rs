//! Planar PCM buffer model
//!
//! Every pipeline stage operates on planar (per-channel) 32-bit float
//! samples. Channel vectors are equal length; samples are nominally in
//! [-1.0, 1.0] but may exceed it transiently and are clamped only at
//! encode time.

/// Decoded audio held as one sample vector per channel
#[derive(Debug, Clone, PartialEq)]
pub struct PcmBuffer {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Per-channel sample data, equal lengths across channels
    pub channels: Vec<Vec<f32>>,
}

impl PcmBuffer {
    pub fn new(sample_rate: u32, channels: Vec<Vec<f32>>) -> Self {
        debug_assert!(
            channels.windows(2).all(|w| w[0].len() == w[1].len()),
            "channel length mismatch"
        );
        Self {
            sample_rate,
            channels,
        }
    }

    /// All-zero buffer with the given shape
    pub fn silence(sample_rate: u32, channel_count: usize, frames: usize) -> Self {
        Self {
            sample_rate,
            channels: vec![vec![0.0; frames]; channel_count],
        }
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Samples per channel
    pub fn frames(&self) -> usize {
        self.channels.first().map_or(0, |c| c.len())
    }

    /// Duration in seconds
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            0.0
        } else {
            self.frames() as f64 / self.sample_rate as f64
        }
    }
}
