//! Sample-accurate trim engine

use crate::buffer::PcmBuffer;
use crate::error::{CoreError, CoreResult};

/// Copy the `[start_time, end_time)` sub-range of a buffer into a new,
/// independent buffer.
///
/// Sample indices floor toward zero. Reads past either end of the source
/// fill with silence, so an end point that rounds one frame past the
/// final sample still succeeds. The source is never mutated.
pub fn trim(buffer: &PcmBuffer, start_time: f64, end_time: f64) -> CoreResult<PcmBuffer> {
    let rate = buffer.sample_rate as f64;
    let start_sample = (start_time * rate).floor() as i64;
    let end_sample = (end_time * rate).floor() as i64;
    let length = end_sample - start_sample;

    if length <= 0 {
        return Err(CoreError::InvalidRange {
            start: start_time,
            end: end_time,
        });
    }
    let length = length as usize;

    let channels = buffer
        .channels
        .iter()
        .map(|source| {
            (0..length)
                .map(|i| {
                    let index = start_sample + i as i64;
                    usize::try_from(index)
                        .ok()
                        .and_then(|index| source.get(index).copied())
                        .unwrap_or(0.0)
                })
                .collect()
        })
        .collect();

    Ok(PcmBuffer::new(buffer.sample_rate, channels))
}
