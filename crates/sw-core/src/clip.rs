//! Clip model
//!
//! A clip is one user-defined, trimmed, ordered reference to a decoded
//! source buffer. The buffer is decoded once and owned exclusively by
//! its clip; trim points and order stay freely mutable until a mix is
//! generated.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::buffer::PcmBuffer;

/// Unique clip identifier
pub type ClipId = u64;

static CLIP_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone)]
pub struct Clip {
    /// Unique clip ID
    pub id: ClipId,

    /// Display name, taken from the source file
    pub name: String,

    /// Decoded source audio, owned by this clip
    pub buffer: PcmBuffer,

    /// Trim-in point in seconds
    pub start_time: f64,

    /// Trim-out point in seconds
    pub end_time: f64,

    /// Position in the mix; only the relative order matters, gaps are fine
    pub order: u32,
}

impl Clip {
    /// New full-range clip over a decoded buffer
    pub fn new(name: impl Into<String>, buffer: PcmBuffer, order: u32) -> Self {
        let end_time = buffer.duration_secs();
        Self {
            id: CLIP_ID_COUNTER.fetch_add(1, Ordering::Relaxed),
            name: name.into(),
            buffer,
            start_time: 0.0,
            end_time,
            order,
        }
    }

    /// Source duration in seconds
    pub fn duration_secs(&self) -> f64 {
        self.buffer.duration_secs()
    }

    /// Trimmed length in seconds
    pub fn trimmed_secs(&self) -> f64 {
        (self.end_time - self.start_time).max(0.0)
    }

    /// Set the trim range
    pub fn set_range(&mut self, start_time: f64, end_time: f64) {
        self.start_time = start_time;
        self.end_time = end_time;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clip_covers_full_range() {
        let clip = Clip::new("kick.wav", PcmBuffer::silence(44100, 1, 88200), 1);
        assert_eq!(clip.start_time, 0.0);
        assert!((clip.end_time - 2.0).abs() < 1e-9);
        assert!((clip.trimmed_secs() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Clip::new("a", PcmBuffer::silence(44100, 1, 10), 1);
        let b = Clip::new("b", PcmBuffer::silence(44100, 1, 10), 2);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_set_range() {
        let mut clip = Clip::new("c", PcmBuffer::silence(44100, 1, 44100), 1);
        clip.set_range(0.25, 0.75);
        assert!((clip.trimmed_secs() - 0.5).abs() < 1e-9);
    }
}
