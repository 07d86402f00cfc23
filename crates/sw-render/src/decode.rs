//! Source decoding boundary
//!
//! File bytes arrive with a declared media kind and come back as a
//! planar f32 buffer, or fail as one `Decode` error. Decoding is a pure
//! function of the byte content; every decoder resource is scoped to the
//! call and released on all exit paths.

use std::io::Cursor;
use std::path::Path;

use log::debug;
use symphonia::core::audio::{AudioBuffer, AudioBufferRef, Signal};
use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
use symphonia::core::conv::FromSample;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::sample::{Sample, i24, u24};

use sw_core::PcmBuffer;

use crate::error::{RenderError, RenderResult};

/// Media kinds accepted at the input boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Wav,
    Mp3,
}

impl MediaKind {
    /// Kind from a file extension; anything else is rejected
    pub fn from_path(path: &Path) -> RenderResult<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "wav" => Ok(Self::Wav),
            "mp3" => Ok(Self::Mp3),
            _ => Err(RenderError::UnsupportedMedia(path.display().to_string())),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Mp3 => "mp3",
        }
    }
}

/// Decode in-memory file content into a planar f32 buffer
pub fn decode_bytes(bytes: Vec<u8>, kind: MediaKind) -> RenderResult<PcmBuffer> {
    let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes)), Default::default());

    let mut hint = Hint::new();
    hint.with_extension(kind.extension());

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| RenderError::Decode(format!("failed to probe format: {e}")))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| RenderError::Decode("no audio track found".to_string()))?;
    let track_id = track.id;

    let codec_params = track.codec_params.clone();
    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|e| RenderError::Decode(format!("failed to create decoder: {e}")))?;

    let mut sample_rate = codec_params.sample_rate.unwrap_or(44100);
    let mut channels: Vec<Vec<f32>> = Vec::new();

    loop {
        match format.next_packet() {
            Ok(packet) => {
                if packet.track_id() != track_id {
                    continue;
                }

                match decoder.decode(&packet) {
                    Ok(decoded) => {
                        if channels.is_empty() {
                            sample_rate = decoded.spec().rate;
                            channels = vec![Vec::new(); decoded.spec().channels.count()];
                        }
                        append_planar(&decoded, &mut channels);
                    }
                    // Corrupt packets are skipped; the rest of the stream
                    // still decodes
                    Err(symphonia::core::errors::Error::DecodeError(_)) => continue,
                    Err(e) => return Err(RenderError::Decode(format!("decode error: {e}"))),
                }
            }
            Err(symphonia::core::errors::Error::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(RenderError::Decode(format!("packet read error: {e}"))),
        }
    }

    if channels.first().is_none_or(|c| c.is_empty()) {
        return Err(RenderError::Decode("stream contained no samples".to_string()));
    }

    let buffer = PcmBuffer::new(sample_rate, channels);
    debug!(
        "decoded {} source: {} Hz, {} ch, {:.2}s",
        kind.extension(),
        buffer.sample_rate,
        buffer.channel_count(),
        buffer.duration_secs()
    );
    Ok(buffer)
}

/// Append one decoded packet to the planar accumulator, converting from
/// whatever sample format the codec produced
fn append_planar(decoded: &AudioBufferRef<'_>, out: &mut Vec<Vec<f32>>) {
    match decoded {
        AudioBufferRef::U8(buf) => extend_channels::<u8>(buf, out),
        AudioBufferRef::U16(buf) => extend_channels::<u16>(buf, out),
        AudioBufferRef::U24(buf) => extend_channels::<u24>(buf, out),
        AudioBufferRef::U32(buf) => extend_channels::<u32>(buf, out),
        AudioBufferRef::S8(buf) => extend_channels::<i8>(buf, out),
        AudioBufferRef::S16(buf) => extend_channels::<i16>(buf, out),
        AudioBufferRef::S24(buf) => extend_channels::<i24>(buf, out),
        AudioBufferRef::S32(buf) => extend_channels::<i32>(buf, out),
        AudioBufferRef::F32(buf) => extend_channels::<f32>(buf, out),
        AudioBufferRef::F64(buf) => extend_channels::<f64>(buf, out),
    }
}

fn extend_channels<S>(buf: &AudioBuffer<S>, out: &mut Vec<Vec<f32>>)
where
    S: Sample,
    f32: FromSample<S>,
{
    let decoded_channels = buf.spec().channels.count();
    for (ch, plane) in out.iter_mut().enumerate() {
        if ch < decoded_channels {
            plane.extend(buf.chan(ch).iter().map(|&s| f32::from_sample(s)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wav_bytes(sample_rate: u32, channels: &[Vec<i16>]) -> Vec<u8> {
        let mut bytes = Vec::new();
        let spec = hound::WavSpec {
            channels: channels.len() as u16,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::new(Cursor::new(&mut bytes), spec).unwrap();
        for frame in 0..channels[0].len() {
            for channel in channels {
                writer.write_sample(channel[frame]).unwrap();
            }
        }
        writer.finalize().unwrap();
        bytes
    }

    #[test]
    fn test_kind_from_path() {
        assert_eq!(
            MediaKind::from_path(Path::new("a.wav")).unwrap(),
            MediaKind::Wav
        );
        assert_eq!(
            MediaKind::from_path(Path::new("Track.MP3")).unwrap(),
            MediaKind::Mp3
        );
        assert!(MediaKind::from_path(Path::new("notes.txt")).is_err());
        assert!(MediaKind::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn test_decode_wav_stereo() {
        let left = vec![0i16, 8192, -8192, 32767];
        let right = vec![0i16, -8192, 8192, -32768];
        let bytes = wav_bytes(48000, &[left.clone(), right.clone()]);

        let buffer = decode_bytes(bytes, MediaKind::Wav).unwrap();
        assert_eq!(buffer.sample_rate, 48000);
        assert_eq!(buffer.channel_count(), 2);
        assert_eq!(buffer.frames(), 4);

        for (i, &sample) in left.iter().enumerate() {
            let expected = sample as f32 / 32768.0;
            assert!((buffer.channels[0][i] - expected).abs() < 1e-3);
        }
        for (i, &sample) in right.iter().enumerate() {
            let expected = sample as f32 / 32768.0;
            assert!((buffer.channels[1][i] - expected).abs() < 1e-3);
        }
    }

    #[test]
    fn test_decode_reports_duration() {
        let bytes = wav_bytes(44100, &[vec![0i16; 22050]]);
        let buffer = decode_bytes(bytes, MediaKind::Wav).unwrap();
        assert!((buffer.duration_secs() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_garbage_bytes_fail() {
        let result = decode_bytes(vec![0xDE, 0xAD, 0xBE, 0xEF], MediaKind::Wav);
        assert!(matches!(result, Err(RenderError::Decode(_))));
    }
}
