//! Clip-set validation
//!
//! Every violation in the set is collected in one pass; generation is
//! blocked on any. The checks never mutate the clips.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::clip::Clip;

/// A single validation violation. Clip-scoped variants carry the clip
/// name so the message can be attributed; `DuplicateOrder` belongs to
/// the set as a whole.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Violation {
    #[error("{clip}: start time cannot be negative")]
    NegativeStart { clip: String },

    #[error("{clip}: end time must be greater than start time")]
    EndNotAfterStart { clip: String },

    #[error("{clip}: end time exceeds source duration ({duration:.2}s)")]
    EndExceedsDuration { clip: String, duration: f64 },

    #[error("duplicate order value: {order}")]
    DuplicateOrder { order: u32 },
}

/// Check every clip against the range and order invariants.
///
/// Violations accumulate rather than short-circuiting, so the caller can
/// surface the complete list. Colliding order values are reported once
/// per value no matter how many clips share them. An empty result means
/// the set is eligible for mix generation.
pub fn validate(clips: &[Clip]) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut order_counts: BTreeMap<u32, usize> = BTreeMap::new();

    for clip in clips {
        if clip.start_time < 0.0 {
            violations.push(Violation::NegativeStart {
                clip: clip.name.clone(),
            });
        }
        if clip.end_time <= clip.start_time {
            violations.push(Violation::EndNotAfterStart {
                clip: clip.name.clone(),
            });
        }
        if clip.end_time > clip.duration_secs() {
            violations.push(Violation::EndExceedsDuration {
                clip: clip.name.clone(),
                duration: clip.duration_secs(),
            });
        }
        *order_counts.entry(clip.order).or_default() += 1;
    }

    for (&order, &count) in &order_counts {
        if count > 1 {
            violations.push(Violation::DuplicateOrder { order });
        }
    }

    violations
}
