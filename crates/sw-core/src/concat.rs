//! Ordered buffer concatenation

use crate::buffer::PcmBuffer;
use crate::error::{CoreError, CoreResult};

/// Join buffers back-to-back in slice order, with no gap or fade.
///
/// The output adopts the first buffer's sample rate (inputs are not
/// resampled) and the widest input channel count. Narrower inputs
/// duplicate channel 0 into the channels they lack, so a mono source
/// upmixes into a stereo mix instead of leaving silence.
pub fn concatenate(buffers: &[PcmBuffer]) -> CoreResult<PcmBuffer> {
    let first = buffers.first().ok_or(CoreError::EmptyInput)?;

    let sample_rate = first.sample_rate;
    let channel_count = buffers
        .iter()
        .map(|b| b.channel_count())
        .max()
        .unwrap_or(0);
    let total_frames: usize = buffers.iter().map(|b| b.frames()).sum();

    let mut channels: Vec<Vec<f32>> = (0..channel_count)
        .map(|_| Vec::with_capacity(total_frames))
        .collect();
    for buffer in buffers {
        if buffer.channel_count() == 0 {
            continue;
        }
        for (ch, output) in channels.iter_mut().enumerate() {
            let source = if ch < buffer.channel_count() {
                &buffer.channels[ch]
            } else {
                &buffer.channels[0]
            };
            output.extend_from_slice(source);
        }
    }

    Ok(PcmBuffer::new(sample_rate, channels))
}
