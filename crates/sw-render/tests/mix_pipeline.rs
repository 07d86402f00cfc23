//! End-to-end pipeline tests
//!
//! Drives the full decode → validate → trim → concatenate → encode flow
//! the way a caller would, and checks the results with an independent
//! WAV reader.

use std::io::Cursor;

use sw_core::{Clip, PcmBuffer};
use sw_render::{ArtifactKind, MediaKind, MixSession, RenderError};

const SAMPLE_RATE: u32 = 44100;

/// Constant-valued clip; the value marks which clip a mix span came from
fn marker_clip(name: &str, value: f32, seconds: f64, order: u32) -> Clip {
    let frames = (seconds * SAMPLE_RATE as f64) as usize;
    Clip::new(
        name,
        PcmBuffer::new(SAMPLE_RATE, vec![vec![value; frames]]),
        order,
    )
}

/// In-memory 16-bit WAV content for the decode boundary
fn wav_source(channels: &[Vec<i16>]) -> Vec<u8> {
    let mut bytes = Vec::new();
    let spec = hound::WavSpec {
        channels: channels.len() as u16,
        sample_rate: SAMPLE_RATE,
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
fn order_decides_placement_and_lengths_add_up() {
    let mut session = MixSession::new();
    // Inserted out of order: orders 2 and 1, durations 5.0s and 3.0s
    session.add_clip(marker_clip("tail.wav", 0.25, 5.0, 2));
    session.add_clip(marker_clip("head.wav", -0.25, 3.0, 1));

    let artifact = session.generate_wav().unwrap();
    assert_eq!(artifact.kind, ArtifactKind::Wav);

    let expected_frames = 8 * SAMPLE_RATE as usize;
    assert_eq!(artifact.bytes.len(), 44 + expected_frames * 2);

    let mut reader = hound::WavReader::new(Cursor::new(artifact.bytes)).unwrap();
    assert_eq!(reader.spec().channels, 1);
    assert_eq!(reader.spec().sample_rate, SAMPLE_RATE);

    let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
    assert_eq!(samples.len(), expected_frames);
    // The order-1 clip comes first even though it was added second
    assert!(samples[0] < 0);
    assert!(samples[3 * SAMPLE_RATE as usize] > 0);
    assert!(*samples.last().unwrap() > 0);
}

#[test]
fn mono_and_stereo_clips_mix_into_stereo() {
    let mut session = MixSession::new();
    session.add_clip(marker_clip("mono.wav", 0.5, 1.0, 1));

    let stereo = Clip::new(
        "stereo.wav",
        PcmBuffer::new(
            SAMPLE_RATE,
            vec![
                vec![0.1; SAMPLE_RATE as usize],
                vec![-0.1; SAMPLE_RATE as usize],
            ],
        ),
        2,
    );
    session.add_clip(stereo);

    let mix = session.render_mix().unwrap();
    assert_eq!(mix.channel_count(), 2);
    assert_eq!(mix.frames(), 2 * SAMPLE_RATE as usize);
    // The mono second upmixes by duplicating its only channel
    assert_eq!(mix.channels[1][0], 0.5);
    assert_eq!(mix.channels[1][SAMPLE_RATE as usize], -0.1);
}

#[test]
fn decoded_sources_survive_trim_and_re_encode() {
    let source = wav_source(&[vec![4096i16; 2 * SAMPLE_RATE as usize]]);

    let mut session = MixSession::new();
    let id = session
        .add_source("steady.wav", source, MediaKind::Wav)
        .unwrap();

    // Keep the middle second of the two-second source
    session.clip_mut(id).unwrap().set_range(0.5, 1.5);

    let artifact = session.generate_wav().unwrap();
    let mut reader = hound::WavReader::new(Cursor::new(artifact.bytes)).unwrap();
    let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();

    assert_eq!(samples.len(), SAMPLE_RATE as usize);
    // 4096/32768 decodes to 0.125 and re-encodes within truncation error
    assert!(samples.iter().all(|&s| (s - 4095).abs() <= 1));
}

#[test]
fn duplicate_orders_block_generation() {
    let mut session = MixSession::new();
    session.add_clip(marker_clip("a.wav", 0.1, 1.0, 1));
    session.add_clip(marker_clip("b.wav", 0.2, 1.0, 1));

    match session.generate_wav() {
        Err(RenderError::Validation(violations)) => {
            assert!(
                violations
                    .iter()
                    .any(|v| v.to_string() == "duplicate order value: 1")
            );
        }
        other => panic!("expected validation failure, got {other:?}"),
    }

    // The set becomes eligible once the collision is resolved
    let id = session.clips()[1].id;
    session.clip_mut(id).unwrap().order = 2;
    assert!(session.generate_wav().is_ok());
}

#[test]
fn compressed_artifact_reports_progress_to_completion() {
    let mut session = MixSession::new();
    session.add_clip(marker_clip("tone.wav", 0.3, 1.0, 1));

    let mut progress = Vec::new();
    let artifact = session.generate_mp3(|percent| progress.push(percent)).unwrap();

    assert_eq!(artifact.kind, ArtifactKind::Mp3);
    assert!(!artifact.bytes.is_empty());
    assert!(!progress.is_empty());
    assert!(progress.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(*progress.last().unwrap(), 100);
}
