//! Mix session orchestration
//!
//! Owns the clip set and drives validate → sort → trim → concatenate →
//! encode. The uncompressed artifact renders synchronously; the
//! compressed one goes through the worker in `mp3` and forwards its
//! progress. A mix request is ephemeral — the ordering is recomputed
//! from the clips every time.

use std::collections::BTreeSet;

use log::{info, warn};

use sw_core::{Clip, ClipId, PcmBuffer, Violation, concatenate, trim, validate};

use crate::decode::{MediaKind, decode_bytes};
use crate::error::{RenderError, RenderResult};
use crate::mp3::encode_mp3;
use crate::wav::encode_wav;

/// Container kind of a finished artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Wav,
    Mp3,
}

impl ArtifactKind {
    /// Canonical download name
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Wav => "final_mix.wav",
            Self::Mp3 => "final_mix.mp3",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            Self::Wav => "audio/wav",
            Self::Mp3 => "audio/mp3",
        }
    }
}

/// A finished, immutable encode result
#[derive(Debug, Clone)]
pub struct MixArtifact {
    pub kind: ArtifactKind,
    pub bytes: Vec<u8>,
}

/// The clip set and the operations over it
#[derive(Debug, Default)]
pub struct MixSession {
    clips: Vec<Clip>,
}

impl MixSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode one source file and append it as a full-range clip taking
    /// the next position in the running order.
    ///
    /// A decode failure leaves the session unchanged; callers continue
    /// with their remaining files.
    pub fn add_source(
        &mut self,
        name: &str,
        bytes: Vec<u8>,
        kind: MediaKind,
    ) -> RenderResult<ClipId> {
        let buffer = decode_bytes(bytes, kind)?;
        let order = self.clips.len() as u32 + 1;
        let clip = Clip::new(name, buffer, order);
        let id = clip.id;
        info!(
            "added clip '{}' ({:.2}s, order {})",
            name,
            clip.duration_secs(),
            order
        );
        self.clips.push(clip);
        Ok(id)
    }

    /// Append an already-decoded clip as-is
    pub fn add_clip(&mut self, clip: Clip) -> ClipId {
        let id = clip.id;
        self.clips.push(clip);
        id
    }

    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    pub fn clip_mut(&mut self, id: ClipId) -> Option<&mut Clip> {
        self.clips.iter_mut().find(|c| c.id == id)
    }

    /// Remove one clip; true if it existed
    pub fn remove(&mut self, id: ClipId) -> bool {
        let before = self.clips.len();
        self.clips.retain(|c| c.id != id);
        self.clips.len() != before
    }

    /// Discard every clip
    pub fn reset(&mut self) {
        self.clips.clear();
    }

    pub fn validate(&self) -> Vec<Violation> {
        validate(&self.clips)
    }

    /// Sum of trimmed clip lengths in seconds
    pub fn total_trimmed_secs(&self) -> f64 {
        self.clips.iter().map(|c| c.trimmed_secs()).sum()
    }

    /// Run the sample pipeline: validate, sort by order, trim each clip,
    /// concatenate.
    pub fn render_mix(&self) -> RenderResult<PcmBuffer> {
        let violations = self.validate();
        if !violations.is_empty() {
            return Err(RenderError::Validation(violations));
        }

        let mut ordered: Vec<&Clip> = self.clips.iter().collect();
        ordered.sort_by_key(|c| c.order);

        let rates: BTreeSet<u32> = ordered.iter().map(|c| c.buffer.sample_rate).collect();
        if rates.len() > 1 {
            // Known gap: inputs are not resampled, the first rate wins
            warn!(
                "clips use differing sample rates {rates:?}; output keeps {} Hz without resampling",
                ordered[0].buffer.sample_rate
            );
        }

        let mut trimmed = Vec::with_capacity(ordered.len());
        for clip in &ordered {
            trimmed.push(trim(&clip.buffer, clip.start_time, clip.end_time)?);
        }

        let mix = concatenate(&trimmed)?;
        info!(
            "rendered mix: {:.2}s, {} ch @ {} Hz",
            mix.duration_secs(),
            mix.channel_count(),
            mix.sample_rate
        );
        Ok(mix)
    }

    /// Render and encode the uncompressed artifact
    pub fn generate_wav(&self) -> RenderResult<MixArtifact> {
        let mix = self.render_mix()?;
        let bytes = encode_wav(&mix)?;
        Ok(MixArtifact {
            kind: ArtifactKind::Wav,
            bytes,
        })
    }

    /// Render and encode the compressed artifact, forwarding progress
    pub fn generate_mp3<F: FnMut(u8)>(&self, on_progress: F) -> RenderResult<MixArtifact> {
        let mix = self.render_mix()?;
        let bytes = encode_mp3(&mix, on_progress)?;
        Ok(MixArtifact {
            kind: ArtifactKind::Mp3,
            bytes,
        })
    }
}
