//! Float to 16-bit PCM conversion
//!
//! Both container paths share one conversion rule: clamp to [-1, 1],
//! scale negative samples by 32768 and non-negative ones by 32767,
//! truncate. The asymmetric scale keeps a full-scale positive sample at
//! 32767 instead of overflowing to +32768.

/// Convert one float sample to 16-bit PCM
#[inline]
pub fn pcm16(sample: f32) -> i16 {
    let clamped = sample.clamp(-1.0, 1.0);
    let scaled = if clamped < 0.0 {
        clamped * 32768.0
    } else {
        clamped * 32767.0
    };
    scaled as i16
}

/// Convert one channel of float samples
pub fn pcm16_channel(samples: &[f32]) -> Vec<i16> {
    samples.iter().copied().map(pcm16).collect()
}
